use std::collections::BTreeMap;
use std::fmt::{self, Write};
use crate::ir::circuit::{App, GadgetRef};

#[derive(Default)]
struct CountTree<'a> {
    count: usize,
    children: BTreeMap<&'a str, CountTree<'a>>,
}

impl<'a> CountTree<'a> {
    fn add(&mut self, label: &'a str, code: &'a [App]) {
        let sub = self.children.entry(label).or_insert_with(CountTree::default);
        for app in code {
            self.count += 1;
            sub.count += 1;
            let op = sub.children.entry(app.op.name()).or_insert_with(CountTree::default);
            op.count += 1;
        }
    }

    fn write(&self, s: &mut String, indent: &str, label: &str) -> fmt::Result {
        writeln!(s, "{}- {:9} {}", indent, self.count, label)?;

        let next_indent = format!("{}  ", indent);
        for (k, v) in &self.children {
            v.write(s, &next_indent, k)?;
        }
        Ok(())
    }
}

/// Count the nodes of a circuit trace and of every gadget body, grouped by operation.  Gadget
/// bodies are counted once, not once per call site.
pub fn count_gates(code: &[App], gadgets: &[GadgetRef]) -> Result<String, fmt::Error> {
    let mut tree = CountTree::default();
    tree.add("circuit", code);
    for g in gadgets {
        tree.add(&g.name, &g.code);
    }

    let mut s = String::new();
    tree.write(&mut s, "", "all gates")?;
    Ok(s)
}
