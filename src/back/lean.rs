//! Rendering of recorded traces as Lean propositions.
//!
//! Every trace node becomes one line of a conjunction.  Node results are introduced with `∃`
//! (or passed to a continuation, for gadget calls), and only nodes whose results are referenced
//! somewhere get a `gate_<i>` name.

use std::fmt::{self, Write};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use crate::ir::circuit::{App, ExArg, Gadget, GadgetRef, Op, OpKind, OpStyle, Operand, Shape};

/// A `set_option` directive for the prelude.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct LeanOption {
    pub name: String,
    pub value: String,
}

impl LeanOption {
    pub fn new(name: &str, value: &str) -> LeanOption {
        LeanOption { name: name.to_owned(), value: value.to_owned() }
    }
}

const IGNORED: &str = "_ignored_";

fn trim_namespace(namespace: &str) -> String {
    namespace.replace(' ', "")
}

pub fn export_prelude(
    namespace: &str,
    order: &BigUint,
    options: &[LeanOption],
) -> Result<String, fmt::Error> {
    let mut s = String::new();
    writeln!(s, "import ProvenZk.Gates")?;
    writeln!(s, "import ProvenZk.Ext.Vector")?;
    writeln!(s)?;
    if !options.is_empty() {
        for opt in options {
            writeln!(s, "set_option {} {}", opt.name, opt.value)?;
        }
        writeln!(s)?;
    }
    writeln!(s, "namespace {}", trim_namespace(namespace))?;
    writeln!(s)?;
    writeln!(s, "def Order : ℕ := 0x{}", order.to_str_radix(16))?;
    writeln!(s, "variable [Fact (Nat.Prime Order)]")?;
    writeln!(s, "abbrev F := ZMod Order")?;
    write!(s, "abbrev Gates := GatesGnark8 Order")?;
    Ok(s)
}

pub fn export_footer(namespace: &str) -> String {
    format!("end {}", trim_namespace(namespace))
}

/// Join the non-empty sections of a file with blank lines.
pub fn join_sections<S: AsRef<str>>(sections: &[S]) -> String {
    sections.iter()
        .map(|s| s.as_ref())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The Lean type of a value of shape `shape`.
pub fn lean_type(shape: &Shape) -> String {
    match *shape {
        Shape::Scalar => "F".to_owned(),
        Shape::Array { len, ref elem } => match **elem {
            Shape::Scalar => format!("Vector F {}", len),
            ref elem => format!("Vector ({}) {}", lean_type(elem), len),
        },
    }
}

fn gen_args(args: &[ExArg]) -> Vec<String> {
    args.iter().map(|a| format!("({}: {})", a.name, lean_type(&a.shape))).collect()
}

fn write_header(s: &mut String, name: &str, params: Vec<String>) -> fmt::Result {
    let mut parts = vec![format!("def {}", name)];
    parts.extend(params);
    writeln!(s, "{}: Prop :=", parts.join(" "))
}

/// Render the definition of a gadget.  The gadget's output is passed to the continuation `k`;
/// gadgets without an output have no continuation and end in `True`.
pub fn export_gadget(g: &Gadget) -> Result<String, fmt::Error> {
    let mut params = gen_args(&g.args);
    if let Some(ref shape) = g.output_shape {
        params.push(format!("(k: {} -> Prop)", lean_type(shape)));
    }
    let mut s = String::new();
    write_header(&mut s, &g.name, params)?;

    let gate_vars = assign_gate_vars(&g.code, g.output.as_ref());
    let env = Env { inputs: &g.args, gate_vars: &gate_vars };
    env.write_body(&mut s, &g.code)?;
    match g.output {
        Some(ref out) => write!(s, "    k {}", env.operand_expr(out))?,
        None => write!(s, "    True")?,
    }
    Ok(s)
}

pub fn export_gadgets(gadgets: &[GadgetRef]) -> Result<String, fmt::Error> {
    let defs = gadgets.iter().map(|g| export_gadget(g)).collect::<Result<Vec<_>, _>>()?;
    Ok(defs.join("\n\n"))
}

/// Render a top-level circuit as `def <name> <inputs>: Prop := ...`, ending in `True`.
pub fn export_circuit_def(
    name: &str,
    inputs: &[ExArg],
    code: &[App],
) -> Result<String, fmt::Error> {
    let mut s = String::new();
    write_header(&mut s, name, gen_args(inputs))?;
    let gate_vars = assign_gate_vars(code, None);
    let env = Env { inputs, gate_vars: &gate_vars };
    env.write_body(&mut s, code)?;
    write!(s, "    True")?;
    Ok(s)
}


/// Name every gate whose result is used, either by a later node or by the trace's output.
fn assign_gate_vars(code: &[App], output: Option<&Operand>) -> Vec<Option<String>> {
    let mut gate_vars = vec![None; code.len()];
    let mut mark = |i: usize| {
        let slot: &mut Option<String> = &mut gate_vars[i];
        if slot.is_none() {
            *slot = Some(format!("gate_{}", i));
        }
    };
    for app in code {
        for arg in &app.args {
            arg.for_each_gate(&mut mark);
        }
    }
    if let Some(out) = output {
        out.for_each_gate(&mut mark);
    }
    gate_vars
}

/// If `ops` is exactly `base[0], base[1], ..., base[n-1]` for a single `base` of size `n`,
/// return `base`.
fn whole_vector(ops: &[Operand]) -> Option<&Operand> {
    let mut whole = None;
    for (i, op) in ops.iter().enumerate() {
        match *op {
            Operand::Proj { ref base, index, size } if index == i && size == ops.len() => {
                match whole {
                    None => whole = Some(&**base),
                    Some(b) if b == &**base => {},
                    Some(_) => return None,
                }
            },
            _ => return None,
        }
    }
    whole
}

/// Replace every array literal that covers a whole vector, bottom up, with that vector.
fn collapse(op: &Operand) -> Operand {
    match *op {
        Operand::ProjArray(ref ops) => {
            let ops = ops.iter().map(collapse).collect::<Vec<_>>();
            match whole_vector(&ops) {
                Some(base) => base.clone(),
                None => Operand::ProjArray(ops),
            }
        },
        ref op => op.clone(),
    }
}

struct Env<'a> {
    inputs: &'a [ExArg],
    gate_vars: &'a [Option<String>],
}

impl Env<'_> {
    fn gate_var(&self, i: usize) -> &str {
        self.gate_vars[i].as_deref().unwrap_or(IGNORED)
    }

    fn operand_expr(&self, op: &Operand) -> String {
        self.expr(&collapse(op))
    }

    fn expr(&self, op: &Operand) -> String {
        match *op {
            Operand::Input(i) => self.inputs[i].name.clone(),
            Operand::Gate(i) => self.gate_var(i).to_owned(),
            Operand::Const(ref v) => format!("({}:F)", v),
            Operand::Integer(ref v) => v.to_string(),
            Operand::Proj { ref base, index, .. } => format!("{}[{}]", self.expr(base), index),
            Operand::ProjArray(ref ops) => {
                let elems = ops.iter().map(|op| self.expr(op)).collect::<Vec<_>>();
                format!("vec![{}]", elems.join(", "))
            },
        }
    }

    fn write_body(&self, s: &mut String, code: &[App]) -> fmt::Result {
        for (i, app) in code.iter().enumerate() {
            let args = app.args.iter().map(|a| self.operand_expr(a)).collect::<Vec<_>>();
            let var = self.gate_vars[i].as_deref();
            match app.op {
                Op::Gate(kind) => write_gate(s, kind, var, args)?,
                Op::Gadget(ref g) => write_gadget_call(s, g, var, args)?,
            }
        }
        Ok(())
    }
}

fn gate_expr(kind: OpKind, args: &[String]) -> String {
    let mut parts = vec![format!("Gates.{}", kind.gate_name())];
    parts.extend(args.iter().cloned());
    parts.join(" ")
}

fn write_gate(s: &mut String, kind: OpKind, var: Option<&str>, args: Vec<String>) -> fmt::Result {
    let name = var.unwrap_or(IGNORED);
    match kind.style() {
        OpStyle::Functional if kind.is_variadic() && args.len() > 2 => {
            // Left-associated chain of binary gates, accumulating into the same binder.
            writeln!(s, "    ∃{}, {} = {} ∧", name, name, gate_expr(kind, &args[.. 2]))?;
            for arg in &args[2 ..] {
                let step = [name.to_owned(), arg.clone()];
                writeln!(s, "    ∃{}, {} = {} ∧", name, name, gate_expr(kind, &step))?;
            }
        },
        OpStyle::Functional => {
            writeln!(s, "    ∃{}, {} = {} ∧", name, name, gate_expr(kind, &args))?;
        },
        OpStyle::Callback => {
            writeln!(s, "    ∃{}, {} {} ∧", name, gate_expr(kind, &args), name)?;
        },
        OpStyle::Assertion => {
            writeln!(s, "    {} ∧", gate_expr(kind, &args))?;
        },
    }
    Ok(())
}

fn write_gadget_call(
    s: &mut String,
    g: &Gadget,
    var: Option<&str>,
    args: Vec<String>,
) -> fmt::Result {
    let mut parts = vec![g.name.clone()];
    parts.extend(args);
    if g.output.is_some() {
        writeln!(s, "    {} fun {} =>", parts.join(" "), var.unwrap_or("_"))
    } else {
        writeln!(s, "    {} ∧", parts.join(" "))
    }
}
