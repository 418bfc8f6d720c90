use std::any::Any;
use std::fmt;

/// Everything that can stop an extraction.  None of these are recoverable: a partial trace has no
/// meaningful Lean rendering, so the whole circuit or gadget being extracted is abandoned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A slice field's length disagrees with the length recorded in the schema.  This happens for
    /// ragged nested slices, where the schema takes its inner dimension from the first element.
    #[error("field `{field}` has length {actual}, but the schema expects {expected}")]
    SchemaMismatch { field: String, expected: usize, actual: usize },
    #[error("number of bits in to_binary must be non-negative, got {0}")]
    InvalidBitWidth(i64),
    #[error("{0} requires at least one argument")]
    EmptyInput(&'static str),
    #[error("unsupported circuit argument: {0}")]
    UnsupportedOperand(String),
    /// Any other broken invariant, including panics raised by circuit code during extraction.
    #[error("panic extracting circuit to Lean: {0}")]
    ExtractionPanic(String),
}

impl Error {
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Error {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_owned()
        };
        Error::ExtractionPanic(msg)
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Error {
        Error::ExtractionPanic("failed to format Lean output".to_owned())
    }
}
