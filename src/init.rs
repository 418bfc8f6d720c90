use crate::error::Error;
use crate::ir::circuit::{ExArg, Operand};
use crate::ir::variable::Variable;
use crate::record::{FieldKind, Record};

/// The fields of a record, captured once.  Signal fields are numbered in declaration order,
/// which is the index used by `Operand::Input`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Schema {
    pub type_name: &'static str,
    pub fields: Vec<ExArg>,
    /// Rendered values of the parameter fields, in declaration order.
    pub params: Vec<String>,
}

impl Schema {
    pub fn of<R: Record + ?Sized>(r: &R) -> Schema {
        let mut fields = Vec::new();
        let mut params = Vec::new();
        for (name, f) in r.fields() {
            match f.kind() {
                FieldKind::Signal(shape) => fields.push(ExArg { name: name.to_owned(), shape }),
                FieldKind::Param(s) => params.push(s),
            }
        }
        Schema { type_name: r.type_name(), fields, params }
    }

    /// Name used for the Lean definition.  Instantiations with different array sizes or
    /// different parameter values must not collide, so the dimensions of every array field
    /// (outermost first) and the value of every parameter are appended to the type name.
    pub fn unique_name(&self) -> String {
        let mut name = self.type_name.to_owned();
        for arg in &self.fields {
            for d in arg.shape.dims() {
                name.push_str(&format!("_{}", d));
            }
        }
        for p in &self.params {
            // `-` can't appear in a Lean identifier.
            name.push_str(&format!("_{}", p.replace('-', "m")));
        }
        name
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }
}

/// Overwrite every signal field of `r` with placeholders: `Input(j)` for the `j`-th signal
/// field, wrapped in one `Proj` layer per array dimension.
pub fn init_record<R: Record + ?Sized>(r: &mut R, schema: &Schema) -> Result<(), Error> {
    let mut args = schema.fields.iter().enumerate();
    for (name, f) in r.fields_mut() {
        if let FieldKind::Param(_) = f.kind() {
            continue;
        }
        let (j, arg) = match args.next() {
            Some(x) => x,
            None => return Err(Error::ExtractionPanic(format!(
                "field `{}` of {} is missing from its schema", name, schema.type_name,
            ))),
        };
        if arg.name != name {
            return Err(Error::ExtractionPanic(format!(
                "schema of {} lists field `{}`, but the record has `{}`",
                schema.type_name, arg.name, name,
            )));
        }
        f.assign(name, Variable::placeholder(&arg.shape, Operand::Input(j)))?;
    }
    if let Some((_, arg)) = args.next() {
        return Err(Error::ExtractionPanic(format!(
            "schema of {} lists field `{}`, which the record doesn't have",
            schema.type_name, arg.name,
        )));
    }
    Ok(())
}
