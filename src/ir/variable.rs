use std::ops::Index;
use num_bigint::BigInt;
use crate::error::Error;
use crate::ir::circuit::{Operand, Shape};

/// A value as seen by circuit definition code.  During extraction, fields hold placeholders
/// (`Operand`s) and builder operations return them; literals and lists can be mixed in freely.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Variable {
    /// Not assigned yet.  Passing this to a builder operation is an error.
    Nil,
    Operand(Operand),
    Int(BigInt),
    List(Vec<Variable>),
}

impl Default for Variable {
    fn default() -> Variable { Variable::Nil }
}

impl Variable {
    pub fn as_operand(&self) -> Option<&Operand> {
        match *self {
            Variable::Operand(ref op) => Some(op),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Variable]> {
        match *self {
            Variable::List(ref vs) => Some(vs),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        *self == Variable::Nil
    }

    /// Number of elements, treating non-list values as having none.
    pub fn len(&self) -> usize {
        self.as_list().map_or(0, |vs| vs.len())
    }

    pub fn into_list(self) -> Result<Vec<Variable>, Error> {
        match self {
            Variable::List(vs) => Ok(vs),
            v => Err(Error::ExtractionPanic(format!("expected a list, but got {:?}", v))),
        }
    }

    /// Turn this value into an `Operand`: literals become `Const`s and lists become (possibly
    /// nested) `ProjArray`s.
    pub fn sanitize(&self) -> Result<Operand, Error> {
        Ok(match *self {
            Variable::Nil => return Err(Error::UnsupportedOperand("unassigned variable".into())),
            Variable::Operand(ref op) => op.clone(),
            Variable::Int(ref i) => Operand::Const(i.clone()),
            Variable::List(ref vs) => Operand::ProjArray(
                vs.iter().map(|v| v.sanitize()).collect::<Result<Vec<_>, _>>()?,
            ),
        })
    }

    /// Build the placeholder for a value of shape `shape` rooted at `base`.  Each array level
    /// adds one `Proj` layer.
    pub fn placeholder(shape: &Shape, base: Operand) -> Variable {
        match *shape {
            Shape::Scalar => Variable::Operand(base),
            Shape::Array { len, ref elem } => Variable::List(
                (0 .. len)
                    .map(|k| Variable::placeholder(elem, Operand::proj(base.clone(), k, len)))
                    .collect(),
            ),
        }
    }
}

impl Index<usize> for Variable {
    type Output = Variable;
    fn index(&self, i: usize) -> &Variable {
        match *self {
            Variable::List(ref vs) => &vs[i],
            ref v => panic!("can't index into non-list value {:?}", v),
        }
    }
}

impl From<Operand> for Variable {
    fn from(op: Operand) -> Variable { Variable::Operand(op) }
}

impl From<BigInt> for Variable {
    fn from(i: BigInt) -> Variable { Variable::Int(i) }
}

impl From<Vec<Variable>> for Variable {
    fn from(vs: Vec<Variable>) -> Variable { Variable::List(vs) }
}

impl From<&[Variable]> for Variable {
    fn from(vs: &[Variable]) -> Variable { Variable::List(vs.to_owned()) }
}

macro_rules! variable_from_int {
    ($($T:ty),*) => {
        $(
            impl From<$T> for Variable {
                fn from(x: $T) -> Variable { Variable::Int(BigInt::from(x)) }
            }
        )*
    };
}

variable_from_int!(i32, i64, u32, u64, usize);
