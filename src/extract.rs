use std::mem;
use log::*;
use num_bigint::BigInt;
use crate::api::{Api, ApiResult, GadgetDefinition};
use crate::error::Error;
use crate::field::FieldId;
use crate::init::{self, Schema};
use crate::ir::circuit::{App, Gadget, GadgetRef, Op, OpKind, Operand};
use crate::ir::variable::Variable;

/// Symbolic execution engine.  Each builder operation appends an `App` to the current trace and
/// returns a placeholder for its result.  Gadgets are extracted into their own traces and
/// memoized by name.
pub struct CodeExtractor {
    code: Vec<App>,
    gadgets: Vec<GadgetRef>,
    field: FieldId,
}

impl CodeExtractor {
    pub fn new(field: FieldId) -> CodeExtractor {
        CodeExtractor {
            code: Vec::new(),
            gadgets: Vec::new(),
            field,
        }
    }

    pub fn field(&self) -> FieldId {
        self.field
    }

    /// The trace recorded so far at the current level.
    pub fn code(&self) -> &[App] {
        &self.code
    }

    /// All gadgets extracted so far, in the order they were sealed.  A gadget always comes after
    /// every gadget it calls.
    pub fn gadgets(&self) -> &[GadgetRef] {
        &self.gadgets
    }

    /// Remove and return the current trace, leaving the gadget list in place.  Used between the
    /// circuits of a batch.
    pub fn take_code(&mut self) -> Vec<App> {
        mem::take(&mut self.code)
    }

    pub fn find_gadget(&self, name: &str) -> Option<&GadgetRef> {
        self.gadgets.iter().find(|g| g.name == name)
    }

    fn push(&mut self, op: Op, args: Vec<Operand>) -> Operand {
        trace!("gate_{} = {} {:?}", self.code.len(), op.name(), args);
        self.code.push(App { op, args });
        Operand::Gate(self.code.len() - 1)
    }

    fn add_app(&mut self, op: impl Into<Op>, args: &[Variable]) -> ApiResult<Operand> {
        let args = args.iter().map(|a| a.sanitize()).collect::<Result<Vec<_>, _>>()?;
        Ok(self.push(op.into(), args))
    }

    fn add_variadic(
        &mut self,
        kind: OpKind,
        a: Variable,
        b: Variable,
        rest: &[Variable],
    ) -> ApiResult {
        let mut args = Vec::with_capacity(2 + rest.len());
        args.push(a);
        args.push(b);
        args.extend_from_slice(rest);
        Ok(self.add_app(kind, &args)?.into())
    }

    /// Run the definition of `gadget` on placeholder inputs, in a fresh trace.
    fn extract_gadget(
        &mut self,
        gadget: &dyn GadgetDefinition,
        schema: Schema,
        name: String,
    ) -> ApiResult<GadgetRef> {
        debug!("extracting gadget {}", name);
        // Work on a copy, so the caller's record keeps its actual values for the call site.
        let mut local = gadget.clone_gadget();
        init::init_record(&mut *local, &schema)?;

        let old_code = mem::take(&mut self.code);
        let result = local.define_gadget(self);
        let code = mem::replace(&mut self.code, old_code);
        let output = result?;

        let output = if output.is_nil() { None } else { Some(output.sanitize()?) };
        let output_shape = output.as_ref().map(|op| op.shape());
        let g = GadgetRef::new(Gadget {
            name,
            arity: schema.arity(),
            code,
            output,
            output_shape,
            args: schema.fields,
        });
        debug!("sealed gadget {} with {} gates", g.name, g.code.len());
        self.gadgets.push(g.clone());
        Ok(g)
    }
}

/// Build the value a call site sees: `output` with every leaf replaced by a projection chain
/// rooted at `base`, the call's own gate.
fn call_result(output: &Operand, base: Operand) -> Variable {
    match *output {
        Operand::ProjArray(ref ops) => {
            let len = ops.len();
            Variable::List(
                ops.iter().enumerate()
                    .map(|(i, op)| call_result(op, Operand::proj(base.clone(), i, len)))
                    .collect(),
            )
        },
        _ => Variable::Operand(base),
    }
}

macro_rules! extractor_ops {
    ($( $op:ident($($arg:ident),*) => $Kind:ident; )*) => {
        $(
            fn $op(&mut self, $($arg: Variable),*) -> ApiResult {
                Ok(self.add_app(OpKind::$Kind, &[$($arg),*])?.into())
            }
        )*
    };
}

macro_rules! extractor_asserts {
    ($( $op:ident($($arg:ident),*) => $Kind:ident; )*) => {
        $(
            fn $op(&mut self, $($arg: Variable),*) -> ApiResult<()> {
                self.add_app(OpKind::$Kind, &[$($arg),*])?;
                Ok(())
            }
        )*
    };
}

impl Api for CodeExtractor {
    fn add(&mut self, a: Variable, b: Variable, rest: &[Variable]) -> ApiResult {
        self.add_variadic(OpKind::Add, a, b, rest)
    }

    fn sub(&mut self, a: Variable, b: Variable, rest: &[Variable]) -> ApiResult {
        self.add_variadic(OpKind::Sub, a, b, rest)
    }

    fn mul(&mut self, a: Variable, b: Variable, rest: &[Variable]) -> ApiResult {
        self.add_variadic(OpKind::Mul, a, b, rest)
    }

    extractor_ops! {
        mul_acc(a, b, c) => MulAcc;
        neg(a) => Neg;
        div_unchecked(a, b) => DivUnchecked;
        div(a, b) => Div;
        inverse(a) => Inverse;
        xor(a, b) => Xor;
        or(a, b) => Or;
        and(a, b) => And;
        select(b, a1, a2) => Select;
        lookup2(b0, b1, i0, i1, i2, i3) => Lookup;
        is_zero(a) => IsZero;
        cmp(a, b) => Cmp;
    }

    extractor_asserts! {
        assert_is_equal(a, b) => AssertEq;
        assert_is_different(a, b) => AssertNotEq;
        assert_is_boolean(a) => AssertIsBool;
        assert_is_less_or_equal(v, bound) => AssertLessOrEqual;
    }

    fn to_binary(&mut self, a: Variable, bits: Option<i64>) -> ApiResult<Vec<Variable>> {
        let n = match bits {
            Some(n) if n < 0 => return Err(Error::InvalidBitWidth(n)),
            Some(n) => n as usize,
            None => self.field().bit_len() as usize,
        };
        // The width stays a plain `Integer` so it renders as a `Nat`, not a field element.
        let a = a.sanitize()?;
        let gate = self.push(OpKind::ToBinary.into(), vec![a, Operand::Integer(BigInt::from(n))]);
        Ok((0 .. n).map(|i| Operand::proj(gate.clone(), i, n).into()).collect())
    }

    fn from_binary(&mut self, bits: Vec<Variable>) -> ApiResult {
        if bits.is_empty() {
            return Err(Error::EmptyInput("from_binary"));
        }
        if let Some(v) = bits.iter().find(|v| v.as_list().is_some()) {
            return Err(Error::UnsupportedOperand(format!(
                "from_binary takes individual bits, not a nested list ({:?})", v,
            )));
        }
        // All bits go in as a single vector argument, so a complete `to_binary` result collapses
        // back to the original gate when rendered.
        Ok(self.add_app(OpKind::FromBinary, &[Variable::List(bits)])?.into())
    }

    fn constant_value(&self, v: &Variable) -> Option<BigInt> {
        if let Variable::Int(ref i) = *v {
            return Some(i.clone());
        }
        match *v.as_operand()? {
            Operand::Const(ref i) => Some(i.clone()),
            Operand::Proj { ref base, .. } => match **base {
                Operand::Const(ref i) => Some(i.clone()),
                _ => None,
            },
            _ => None,
        }
    }

    fn define_gadget(&mut self, gadget: &dyn GadgetDefinition) -> ApiResult<GadgetRef> {
        let schema = Schema::of(gadget);
        let name = schema.unique_name();
        if let Some(g) = self.find_gadget(&name) {
            debug!("reusing gadget {}", name);
            return Ok(g.clone());
        }
        self.extract_gadget(gadget, schema, name)
    }

    fn call_gadget(
        &mut self,
        handle: &GadgetRef,
        gadget: &dyn GadgetDefinition,
    ) -> ApiResult {
        // Actual argument values, one per signal field.  Nested arrays become nested
        // `ProjArray`s, which the code generator reassembles.
        let args = gadget.fields().into_iter()
            .filter_map(|(_, f)| f.value())
            .collect::<Vec<_>>();
        if args.len() != handle.arity {
            return Err(Error::ExtractionPanic(format!(
                "gadget {} takes {} arguments, but the call site has {}",
                handle.name, handle.arity, args.len(),
            )));
        }
        let gate = self.add_app(Op::Gadget(handle.clone()), &args)?;
        Ok(match handle.output {
            Some(ref output) => call_result(output, gate),
            None => Variable::Nil,
        })
    }
}
