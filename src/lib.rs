//! Extraction of arithmetic circuits into Lean.
//!
//! Circuits and gadgets are plain structs deriving `Record`.  Running their definitions against a
//! `CodeExtractor` records a symbolic trace instead of computing anything, and `back::lean`
//! renders the traces as Lean propositions over the `ProvenZk` gate library.  See `export` for
//! the entry points.

pub mod api;
pub mod back;
pub mod debug;
pub mod error;
pub mod export;
pub mod extract;
pub mod field;
pub mod init;
pub mod ir;
pub mod record;

pub use crate::api::{Api, ApiResult, Circuit, GadgetDefinition};
pub use crate::error::Error;
pub use crate::export::{
    circuit_to_lean, circuit_to_lean_with_name, extract_circuits, extract_gadgets,
    gadget_to_lean, gadget_to_lean_with_name, Config,
};
pub use crate::field::FieldId;
pub use crate::ir::variable::Variable;
pub use crate::record::Record;
