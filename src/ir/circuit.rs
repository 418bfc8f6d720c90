use std::fmt;
use std::ops::Deref;
use std::rc::Rc;
use num_bigint::BigInt;

/// A symbolic value appearing as an argument of a recorded operation.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub enum Operand {
    /// The `i`-th signal field of the enclosing circuit or gadget.
    Input(usize),
    /// The result of the node at this position of the current trace.
    Gate(usize),
    /// A literal, rendered as a field element.
    Const(BigInt),
    /// Element `index` of the array-valued `base`, which has `size` elements in total.  `size`
    /// is kept so the code generator can recognize a complete run of projections as the whole
    /// vector.
    Proj { base: Box<Operand>, index: usize, size: usize },
    /// An explicit array of operands, possibly nested.
    ProjArray(Vec<Operand>),
    /// A bare number, used where Lean expects a `Nat` (bit widths).
    Integer(BigInt),
}

impl Operand {
    pub fn proj(base: Operand, index: usize, size: usize) -> Operand {
        Operand::Proj { base: Box::new(base), index, size }
    }

    /// Visit every `Gate` index this operand depends on, looking through projections and arrays.
    pub fn for_each_gate(&self, f: &mut impl FnMut(usize)) {
        match *self {
            Operand::Gate(i) => f(i),
            Operand::Proj { ref base, .. } => base.for_each_gate(f),
            Operand::ProjArray(ref ops) => {
                for op in ops {
                    op.for_each_gate(f);
                }
            },
            Operand::Input(_) |
            Operand::Const(_) |
            Operand::Integer(_) => {},
        }
    }

    /// The shape of the value this operand stands for.  Arrays take their inner dimensions from
    /// their first element.
    pub fn shape(&self) -> Shape {
        match *self {
            Operand::ProjArray(ref ops) => Shape::Array {
                len: ops.len(),
                elem: Box::new(ops.first().map_or(Shape::Scalar, |op| op.shape())),
            },
            _ => Shape::Scalar,
        }
    }
}


#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum OpKind {
    Add,
    MulAcc,
    Neg,
    Sub,
    Mul,
    Div,
    DivUnchecked,
    Inverse,
    ToBinary,
    FromBinary,
    Xor,
    Or,
    And,
    Select,
    Lookup,
    IsZero,
    Cmp,
    AssertEq,
    AssertNotEq,
    AssertIsBool,
    AssertLessOrEqual,
}

/// How an operation is rendered in Lean.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum OpStyle {
    /// `∃g, g = op args ∧`
    Functional,
    /// `∃g, op args g ∧`
    Callback,
    /// `op args ∧`
    Assertion,
}

impl OpKind {
    pub fn style(self) -> OpStyle {
        use self::OpKind::*;
        match self {
            Add | MulAcc | Neg | Sub | Mul | FromBinary => OpStyle::Functional,
            Div | DivUnchecked | Inverse | Xor | Or | And | Select | Lookup | Cmp | IsZero |
            ToBinary => OpStyle::Callback,
            AssertEq | AssertNotEq | AssertIsBool | AssertLessOrEqual => OpStyle::Assertion,
        }
    }

    /// Operations taking any number of operands, rendered as a chain of binary gates.
    pub fn is_variadic(self) -> bool {
        match self {
            OpKind::Add | OpKind::Sub | OpKind::Mul => true,
            _ => false,
        }
    }

    /// Name of the corresponding definition in the Lean `Gates` structure.
    pub fn gate_name(self) -> &'static str {
        use self::OpKind::*;
        match self {
            Add => "add",
            MulAcc => "mul_acc",
            Neg => "neg",
            Sub => "sub",
            Mul => "mul",
            Div => "div",
            DivUnchecked => "div_unchecked",
            Inverse => "inv",
            ToBinary => "to_binary",
            FromBinary => "from_binary",
            Xor => "xor",
            Or => "or",
            And => "and",
            Select => "select",
            Lookup => "lookup",
            IsZero => "is_zero",
            Cmp => "cmp",
            AssertEq => "eq",
            AssertNotEq => "ne",
            AssertIsBool => "is_bool",
            AssertLessOrEqual => "le",
        }
    }
}


#[derive(Clone, Debug)]
pub enum Op {
    Gate(OpKind),
    /// A call to an extracted gadget.
    Gadget(GadgetRef),
}

impl Op {
    pub fn name(&self) -> &str {
        match *self {
            Op::Gate(kind) => kind.gate_name(),
            Op::Gadget(ref g) => &g.name,
        }
    }
}

impl From<OpKind> for Op {
    fn from(kind: OpKind) -> Op {
        Op::Gate(kind)
    }
}

/// One node of a trace.  Its position in the trace is its identity, referenced by
/// `Operand::Gate`.
#[derive(Clone, Debug)]
pub struct App {
    pub op: Op,
    pub args: Vec<Operand>,
}


/// The shape of a circuit argument or gadget output.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub enum Shape {
    Scalar,
    Array { len: usize, elem: Box<Shape> },
}

impl Shape {
    pub fn array(len: usize, elem: Shape) -> Shape {
        Shape::Array { len, elem: Box::new(elem) }
    }

    /// Array dimensions, outermost first.  Empty for scalars.
    pub fn dims(&self) -> Vec<usize> {
        let mut dims = Vec::new();
        let mut cur = self;
        while let Shape::Array { len, ref elem } = *cur {
            dims.push(len);
            cur = elem;
        }
        dims
    }
}

/// Static description of one signal field of a circuit or gadget.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct ExArg {
    pub name: String,
    pub shape: Shape,
}


/// A sub-circuit extracted once and shared by every call site with the same name.
#[derive(Debug)]
pub struct Gadget {
    pub name: String,
    /// Number of signal fields, which is also the number of arguments at each call site.
    pub arity: usize,
    pub code: Vec<App>,
    /// The value returned by the gadget definition, or `None` if it returns nothing.  Vector
    /// outputs are `ProjArray`s.
    pub output: Option<Operand>,
    pub output_shape: Option<Shape>,
    pub args: Vec<ExArg>,
}

/// Shared handle to a sealed `Gadget`.
#[derive(Clone)]
pub struct GadgetRef(pub Rc<Gadget>);

impl GadgetRef {
    pub fn new(g: Gadget) -> GadgetRef {
        GadgetRef(Rc::new(g))
    }

    pub fn ptr_eq(&self, other: &GadgetRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for GadgetRef {
    type Target = Gadget;
    fn deref(&self) -> &Gadget {
        &self.0
    }
}

impl fmt::Debug for GadgetRef {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        // The full body is printed with the gadget list; call sites only need the name.
        write!(fmt, "GadgetRef({:?})", self.0.name)
    }
}
