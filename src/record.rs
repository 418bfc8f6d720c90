//! Field introspection for circuit and gadget records.
//!
//! A record is a struct whose public fields are either *signals* (values that end up as Lean
//! arguments: `Variable`, `Vec<T>`, `[T; N]` and nestings of those) or *parameters* (plain
//! integers fixed at extraction time, which only influence the generated gadget name).
//! `#[derive(Record)]` produces the field list; everything else works on the resulting `Schema`.

use std::convert::TryInto;
use crate::error::Error;
use crate::ir::circuit::Shape;
use crate::ir::variable::Variable;

pub use lean_extractor_derive_record::Record;

pub trait Record {
    fn type_name(&self) -> &'static str;
    fn fields(&self) -> Vec<(&'static str, &dyn RecordField)>;
    fn fields_mut(&mut self) -> Vec<(&'static str, &mut dyn RecordField)>;
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FieldKind {
    Signal(Shape),
    /// A configuration value, already rendered as text.
    Param(String),
}

pub trait RecordField {
    fn kind(&self) -> FieldKind;
    /// The current value of a signal field.  `None` for parameters.
    fn value(&self) -> Option<Variable>;
    /// Overwrite a signal field with `value`, which must match the field's shape.
    fn assign(&mut self, field: &str, value: Variable) -> Result<(), Error>;
}


/// Types that can hold a circuit value.
pub trait Signal {
    fn shape(&self) -> Shape;
    fn to_variable(&self) -> Variable;
    fn assign_signal(&mut self, field: &str, value: Variable) -> Result<(), Error>;
    fn from_variable(value: Variable) -> Result<Self, Error> where Self: Sized;
}

impl Signal for Variable {
    fn shape(&self) -> Shape {
        Shape::Scalar
    }

    fn to_variable(&self) -> Variable {
        self.clone()
    }

    fn assign_signal(&mut self, _field: &str, value: Variable) -> Result<(), Error> {
        *self = value;
        Ok(())
    }

    fn from_variable(value: Variable) -> Result<Variable, Error> {
        Ok(value)
    }
}

fn assign_elements<T: Signal>(
    slots: &mut [T],
    field: &str,
    value: Variable,
) -> Result<(), Error> {
    let items = match value {
        Variable::List(items) => items,
        v => return Err(Error::ExtractionPanic(format!(
            "can't assign non-list value {:?} to array field `{}`", v, field,
        ))),
    };
    if items.len() != slots.len() {
        return Err(Error::SchemaMismatch {
            field: field.to_owned(),
            expected: items.len(),
            actual: slots.len(),
        });
    }
    // Every slot is overwritten, so nothing from a previous assignment survives.
    for (slot, item) in slots.iter_mut().zip(items) {
        slot.assign_signal(field, item)?;
    }
    Ok(())
}

fn array_shape<T: Signal>(xs: &[T]) -> Shape {
    Shape::array(xs.len(), xs.first().map_or(Shape::Scalar, |x| x.shape()))
}

impl<T: Signal> Signal for Vec<T> {
    fn shape(&self) -> Shape {
        array_shape(self)
    }

    fn to_variable(&self) -> Variable {
        Variable::List(self.iter().map(|x| x.to_variable()).collect())
    }

    fn assign_signal(&mut self, field: &str, value: Variable) -> Result<(), Error> {
        assign_elements(self, field, value)
    }

    fn from_variable(value: Variable) -> Result<Vec<T>, Error> {
        value.into_list()?.into_iter().map(T::from_variable).collect()
    }
}

impl<T: Signal, const N: usize> Signal for [T; N] {
    fn shape(&self) -> Shape {
        array_shape(self)
    }

    fn to_variable(&self) -> Variable {
        Variable::List(self.iter().map(|x| x.to_variable()).collect())
    }

    fn assign_signal(&mut self, field: &str, value: Variable) -> Result<(), Error> {
        assign_elements(self, field, value)
    }

    fn from_variable(value: Variable) -> Result<[T; N], Error> {
        let xs = Vec::<T>::from_variable(value)?;
        let len = xs.len();
        xs.try_into().map_err(|_| Error::ExtractionPanic(format!(
            "expected an array of length {}, but got {} elements", N, len,
        )))
    }
}

macro_rules! signal_record_field {
    (<$($P:ident),*> $T:ty) => {
        impl<$($P: Signal),*> RecordField for $T {
            fn kind(&self) -> FieldKind {
                FieldKind::Signal(self.shape())
            }

            fn value(&self) -> Option<Variable> {
                Some(self.to_variable())
            }

            fn assign(&mut self, field: &str, value: Variable) -> Result<(), Error> {
                self.assign_signal(field, value)
            }
        }
    };
}

signal_record_field!(<> Variable);
signal_record_field!(<T> Vec<T>);

impl<T: Signal, const N: usize> RecordField for [T; N] {
    fn kind(&self) -> FieldKind {
        FieldKind::Signal(self.shape())
    }

    fn value(&self) -> Option<Variable> {
        Some(self.to_variable())
    }

    fn assign(&mut self, field: &str, value: Variable) -> Result<(), Error> {
        self.assign_signal(field, value)
    }
}

macro_rules! param_record_field {
    ($($T:ty),*) => {
        $(
            impl RecordField for $T {
                fn kind(&self) -> FieldKind {
                    FieldKind::Param(self.to_string())
                }

                fn value(&self) -> Option<Variable> {
                    None
                }

                fn assign(&mut self, field: &str, _value: Variable) -> Result<(), Error> {
                    Err(Error::ExtractionPanic(format!(
                        "can't assign a placeholder to parameter field `{}`", field,
                    )))
                }
            }
        )*
    };
}

param_record_field!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
