use std::fmt::{self, Write};
use crate::ir::circuit::{App, Op, Operand};

fn write_operand(s: &mut String, op: &Operand) -> Result<(), fmt::Error> {
    match *op {
        Operand::Input(i) => write!(s, "in{}", i)?,
        Operand::Gate(i) => write!(s, "g{}", i)?,
        Operand::Const(ref v) => write!(s, "{}", v)?,
        Operand::Integer(ref v) => write!(s, "#{}", v)?,
        Operand::Proj { ref base, index, .. } => {
            write_operand(s, base)?;
            write!(s, "[{}]", index)?;
        },
        Operand::ProjArray(ref ops) => {
            for (i, op) in ops.iter().enumerate() {
                if i == 0 { write!(s, "[")?; } else { write!(s, ", ")?; }
                write_operand(s, op)?;
            }
            if ops.is_empty() { write!(s, "[")?; }
            write!(s, "]")?;
        },
    }
    Ok(())
}

/// Render a trace as a DOT graph.  Each node is labeled with its operation and arguments, and
/// has an edge from every earlier node it reads.
pub fn make_graph(code: &[App]) -> Result<String, fmt::Error> {
    let mut s = String::new();
    writeln!(s, "digraph {{")?;

    for (i, app) in code.iter().enumerate() {
        let mut label = String::new();
        match app.op {
            Op::Gate(kind) => write!(label, "{:?}", kind)?,
            Op::Gadget(ref g) => write!(label, "Gadget {}", g.name)?,
        }
        write!(label, "\n")?;
        for (j, arg) in app.args.iter().enumerate() {
            if j > 0 { write!(label, " ")?; }
            write_operand(&mut label, arg)?;
        }

        writeln!(s, "\"g{}\" [ label = {:?} ];", i, label)?;

        let mut deps = Vec::new();
        for arg in &app.args {
            arg.for_each_gate(&mut |j| if !deps.contains(&j) { deps.push(j) });
        }
        for j in deps {
            writeln!(s, "\"g{}\" -> \"g{}\";", j, i)?;
        }
    }

    writeln!(s, "}}")?;
    Ok(s)
}
