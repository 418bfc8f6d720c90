//! Entry points: extract circuits and gadgets, and render them as a complete Lean file.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use log::*;
use serde::{Deserialize, Serialize};
use crate::api::{Api, Circuit, GadgetDefinition};
use crate::back::lean::{self, LeanOption};
use crate::debug::count_gates::count_gates;
use crate::debug::graphviz::make_graph;
use crate::error::Error;
use crate::extract::CodeExtractor;
use crate::field::FieldId;
use crate::init::{self, Schema};
use crate::ir::circuit::App;

pub fn default_options() -> Vec<LeanOption> {
    vec![LeanOption::new("linter.unusedVariables", "false")]
}

/// Settings for one extraction run.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub field: FieldId,
    /// Overrides the namespace otherwise derived from the circuit or passed to the batch
    /// functions.
    pub namespace: Option<String>,
    /// `set_option` lines for the prelude.
    pub options: Vec<LeanOption>,
}

impl Default for Config {
    fn default() -> Config {
        Config::new(FieldId::Bn254)
    }
}

impl Config {
    pub fn new(field: FieldId) -> Config {
        Config {
            field,
            namespace: None,
            options: default_options(),
        }
    }

    pub fn from_yaml(s: &str) -> Result<Config, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    pub fn from_json(s: &str) -> Result<Config, serde_json::Error> {
        serde_json::from_str(s)
    }

    fn namespace_or(&self, default: &str) -> String {
        self.namespace.clone().unwrap_or_else(|| default.to_owned())
    }

    fn prelude(&self, namespace: &str) -> Result<String, Error> {
        Ok(lean::export_prelude(namespace, &self.field.scalar_field(), &self.options)?)
    }

    /// Render `circuit` as `def circuit`, preceded by every gadget it uses.  The namespace is the
    /// circuit's type name unless overridden.
    pub fn circuit_to_lean(&self, circuit: &mut dyn Circuit) -> Result<String, Error> {
        let namespace = self.namespace_or(circuit.type_name());
        info!("extracting circuit {} into namespace {}", circuit.type_name(), namespace);
        guarded(|| {
            let mut ex = CodeExtractor::new(self.field);
            let (schema, code) = run_circuit(&mut ex, circuit)?;
            let def = lean::export_circuit_def("circuit", &schema.fields, &code)?;
            let gadgets = lean::export_gadgets(ex.gadgets())?;
            Ok(lean::join_sections(&[
                self.prelude(&namespace)?,
                gadgets,
                def,
                lean::export_footer(&namespace),
            ]))
        })
    }

    /// Render `gadget`, together with every gadget it calls.
    pub fn gadget_to_lean(&self, gadget: &dyn GadgetDefinition) -> Result<String, Error> {
        let namespace = self.namespace_or(gadget.type_name());
        info!("extracting gadget {} into namespace {}", gadget.type_name(), namespace);
        self.gadgets_file(&namespace, &[gadget])
    }

    /// Render several circuits into one file, sharing a single gadget table.  Each circuit is
    /// emitted as `def <UniqueName>`; circuits with the same unique name are emitted once.
    pub fn extract_circuits(
        &self,
        namespace: &str,
        circuits: &mut [&mut dyn Circuit],
    ) -> Result<String, Error> {
        let namespace = self.namespace_or(namespace);
        info!("extracting {} circuits into namespace {}", circuits.len(), namespace);
        guarded(|| {
            let mut ex = CodeExtractor::new(self.field);
            let mut seen = HashSet::new();
            let mut defs = Vec::new();
            for circuit in circuits.iter_mut() {
                let name = Schema::of(&**circuit).unique_name();
                if !seen.insert(name.clone()) {
                    debug!("skipping duplicate circuit {}", name);
                    continue;
                }
                let (schema, code) = run_circuit(&mut ex, &mut **circuit)?;
                defs.push(lean::export_circuit_def(&name, &schema.fields, &code)?);
            }
            Ok(lean::join_sections(&[
                self.prelude(&namespace)?,
                lean::export_gadgets(ex.gadgets())?,
                defs.join("\n\n"),
                lean::export_footer(&namespace),
            ]))
        })
    }

    /// Render several gadgets into one file.  Gadgets with the same unique name are emitted
    /// once.
    pub fn extract_gadgets(
        &self,
        namespace: &str,
        gadgets: &[&dyn GadgetDefinition],
    ) -> Result<String, Error> {
        let namespace = self.namespace_or(namespace);
        info!("extracting {} gadgets into namespace {}", gadgets.len(), namespace);
        self.gadgets_file(&namespace, gadgets)
    }

    fn gadgets_file(
        &self,
        namespace: &str,
        gadgets: &[&dyn GadgetDefinition],
    ) -> Result<String, Error> {
        guarded(|| {
            let mut ex = CodeExtractor::new(self.field);
            for &g in gadgets {
                ex.define_gadget(g)?;
            }
            log_gate_counts(&[], &ex)?;
            Ok(lean::join_sections(&[
                self.prelude(namespace)?,
                lean::export_gadgets(ex.gadgets())?,
                lean::export_footer(namespace),
            ]))
        })
    }
}

/// Initialize `circuit` with placeholders, run its definition and take the resulting trace.
fn run_circuit(
    ex: &mut CodeExtractor,
    circuit: &mut dyn Circuit,
) -> Result<(Schema, Vec<App>), Error> {
    let schema = Schema::of(&*circuit);
    init::init_record(circuit, &schema)?;
    circuit.define(ex)?;
    let code = ex.take_code();
    debug!("circuit {} recorded {} gates", schema.unique_name(), code.len());
    log_gate_counts(&code, ex)?;
    if log_enabled!(Level::Trace) {
        trace!("dependency graph of {}:\n{}", schema.unique_name(), make_graph(&code)?);
    }
    Ok((schema, code))
}

fn log_gate_counts(code: &[App], ex: &CodeExtractor) -> Result<(), Error> {
    if log_enabled!(Level::Debug) {
        debug!("gate counts:\n{}", count_gates(code, ex.gadgets())?);
    }
    Ok(())
}

/// Run `f`, turning a panic inside circuit code into `Error::ExtractionPanic`.  The panic hook
/// has already reported where the panic happened, with a full stack trace under
/// `RUST_BACKTRACE=1`; debug builds additionally log the message here.
fn guarded<T>(f: impl FnOnce() -> Result<T, Error>) -> Result<T, Error> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(r) => r,
        Err(payload) => {
            let e = Error::from_panic(payload);
            if cfg!(debug_assertions) {
                error!("{} (rerun with RUST_BACKTRACE=1 for the stack of the panic)", e);
            }
            Err(e)
        },
    }
}


pub fn circuit_to_lean(circuit: &mut dyn Circuit, field: FieldId) -> Result<String, Error> {
    Config::new(field).circuit_to_lean(circuit)
}

pub fn circuit_to_lean_with_name(
    circuit: &mut dyn Circuit,
    field: FieldId,
    namespace: &str,
) -> Result<String, Error> {
    Config { namespace: Some(namespace.to_owned()), ..Config::new(field) }.circuit_to_lean(circuit)
}

pub fn gadget_to_lean(gadget: &dyn GadgetDefinition, field: FieldId) -> Result<String, Error> {
    Config::new(field).gadget_to_lean(gadget)
}

pub fn gadget_to_lean_with_name(
    gadget: &dyn GadgetDefinition,
    field: FieldId,
    namespace: &str,
) -> Result<String, Error> {
    Config { namespace: Some(namespace.to_owned()), ..Config::new(field) }.gadget_to_lean(gadget)
}

pub fn extract_circuits(
    namespace: &str,
    field: FieldId,
    circuits: &mut [&mut dyn Circuit],
) -> Result<String, Error> {
    Config::new(field).extract_circuits(namespace, circuits)
}

pub fn extract_gadgets(
    namespace: &str,
    field: FieldId,
    gadgets: &[&dyn GadgetDefinition],
) -> Result<String, Error> {
    Config::new(field).extract_gadgets(namespace, gadgets)
}
