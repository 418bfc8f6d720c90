use num_bigint::BigInt;
use crate::error::Error;
use crate::ir::circuit::GadgetRef;
use crate::ir::variable::Variable;
use crate::record::{Record, Signal};

pub type ApiResult<T = Variable> = Result<T, Error>;

/// The operations available to circuit and gadget definitions.  `CodeExtractor` implements this
/// by recording each call; a proving backend would implement the same surface concretely.
pub trait Api {
    fn add(&mut self, a: Variable, b: Variable, rest: &[Variable]) -> ApiResult;
    fn mul_acc(&mut self, a: Variable, b: Variable, c: Variable) -> ApiResult;
    fn neg(&mut self, a: Variable) -> ApiResult;
    fn sub(&mut self, a: Variable, b: Variable, rest: &[Variable]) -> ApiResult;
    fn mul(&mut self, a: Variable, b: Variable, rest: &[Variable]) -> ApiResult;
    fn div_unchecked(&mut self, a: Variable, b: Variable) -> ApiResult;
    fn div(&mut self, a: Variable, b: Variable) -> ApiResult;
    fn inverse(&mut self, a: Variable) -> ApiResult;

    /// Decompose `a` into `bits` bits, little-endian.  Uses the bit length of the field modulus
    /// when `bits` is `None`.
    fn to_binary(&mut self, a: Variable, bits: Option<i64>) -> ApiResult<Vec<Variable>>;
    /// Pack little-endian bits into a single value.
    fn from_binary(&mut self, bits: Vec<Variable>) -> ApiResult;

    fn xor(&mut self, a: Variable, b: Variable) -> ApiResult;
    fn or(&mut self, a: Variable, b: Variable) -> ApiResult;
    fn and(&mut self, a: Variable, b: Variable) -> ApiResult;
    fn select(&mut self, b: Variable, a1: Variable, a2: Variable) -> ApiResult;
    fn lookup2(
        &mut self,
        b0: Variable,
        b1: Variable,
        i0: Variable,
        i1: Variable,
        i2: Variable,
        i3: Variable,
    ) -> ApiResult;
    fn is_zero(&mut self, a: Variable) -> ApiResult;
    fn cmp(&mut self, a: Variable, b: Variable) -> ApiResult;

    fn assert_is_equal(&mut self, a: Variable, b: Variable) -> ApiResult<()>;
    fn assert_is_different(&mut self, a: Variable, b: Variable) -> ApiResult<()>;
    fn assert_is_boolean(&mut self, a: Variable) -> ApiResult<()>;
    fn assert_is_less_or_equal(&mut self, v: Variable, bound: Variable) -> ApiResult<()>;

    /// The value of `v` if it is known at extraction time.
    fn constant_value(&self, v: &Variable) -> Option<BigInt>;

    /// Extract `gadget`, or find the already-extracted gadget with the same name.
    fn define_gadget(&mut self, gadget: &dyn GadgetDefinition) -> ApiResult<GadgetRef>;
    /// Emit a call to `handle`, passing the signal fields of `gadget` as arguments.
    fn call_gadget(
        &mut self,
        handle: &GadgetRef,
        gadget: &dyn GadgetDefinition,
    ) -> ApiResult;

    fn call(&mut self, gadget: &dyn GadgetDefinition) -> ApiResult {
        let handle = self.define_gadget(gadget)?;
        self.call_gadget(&handle, gadget)
    }
}

pub trait Circuit: Record {
    fn define(&self, api: &mut dyn Api) -> ApiResult<()>;
}

/// A reusable sub-circuit.  The returned value is the gadget's output: `Variable::Nil` for
/// none, a scalar, or a (nested) list.
pub trait GadgetDefinition: Record + GadgetClone {
    fn define_gadget(&self, api: &mut dyn Api) -> ApiResult;
}

pub trait GadgetClone {
    fn clone_gadget(&self) -> Box<dyn GadgetDefinition>;
}

impl<T: GadgetDefinition + Clone + 'static> GadgetClone for T {
    fn clone_gadget(&self) -> Box<dyn GadgetDefinition> {
        Box::new(self.clone())
    }
}


pub fn call(api: &mut dyn Api, gadget: &dyn GadgetDefinition) -> ApiResult {
    api.call(gadget)
}

/// Call a gadget that returns nothing.
pub fn call_void(api: &mut dyn Api, gadget: &dyn GadgetDefinition) -> ApiResult<()> {
    api.call(gadget)?;
    Ok(())
}

/// Call a gadget and convert its output to `T`, such as `Vec<Variable>` for a gadget returning a
/// vector, or `Vec<Vec<Variable>>` for a matrix.
pub fn call_as<T: Signal>(api: &mut dyn Api, gadget: &dyn GadgetDefinition) -> ApiResult<T> {
    T::from_variable(api.call(gadget)?)
}
