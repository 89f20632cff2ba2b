//! `rmib tree` — print the resolved OID tree.
use rmib_core::{Mib, NodeId, NodeKind};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::cmd::LoadOutcome;
use crate::error::CliError;

pub fn run(outcome: &LoadOutcome, root: Option<&str>, format: OutputFormat) -> Result<(), CliError> {
    let mib = &outcome.mib;
    let start = match root {
        Some(query) => mib
            .find_node(query)
            .ok_or_else(|| CliError::NotFound { query: query.to_owned() })?,
        None => mib.root(),
    };
    match format {
        OutputFormat::Text => print_text(mib, start),
        OutputFormat::Json => print_json(mib, start),
    }
    Ok(())
}

pub(crate) fn kind_str(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Internal => "internal",
        NodeKind::Scalar => "scalar",
        NodeKind::Table => "table",
        NodeKind::Row => "row",
        NodeKind::Column => "column",
        NodeKind::Notification => "notification",
        NodeKind::Group => "group",
        NodeKind::Compliance => "compliance",
        NodeKind::Capability => "capability",
    }
}

fn depth(mib: &Mib, id: NodeId) -> usize {
    let mut d = 0;
    let mut cur = id;
    while let Some(parent) = mib.node(cur).parent {
        cur = parent;
        d += 1;
    }
    d
}

fn print_text(mib: &Mib, start: NodeId) {
    let base_depth = depth(mib, start);
    for id in mib.subtree(start) {
        let node = mib.node(id);
        if node.parent.is_none() {
            // The pseudo-root has no arc to print.
            continue;
        }
        let indent = "  ".repeat(depth(mib, id) - base_depth);
        let name = node.name.as_deref().unwrap_or("-");
        println!("{indent}{} {name} ({})", node.arc, kind_str(node.kind));
    }
}

fn print_json(mib: &Mib, start: NodeId) {
    for id in mib.subtree(start) {
        let node = mib.node(id);
        if node.parent.is_none() {
            continue;
        }
        let module = node.module.map(|m| mib.module(m).name.clone());
        let line = json!({
            "oid": mib.oid(id).to_string(),
            "name": node.name,
            "kind": kind_str(node.kind),
            "module": module,
        });
        println!("{line}");
    }
}
