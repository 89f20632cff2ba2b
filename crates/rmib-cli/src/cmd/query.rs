//! `rmib query` — look up one definition and print its details.
use rmib_core::{Mib, NodeId};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::cmd::LoadOutcome;
use crate::cmd::tree::kind_str;
use crate::error::CliError;

pub fn run(outcome: &LoadOutcome, query: &str, format: OutputFormat) -> Result<(), CliError> {
    let mib = &outcome.mib;
    let node = mib
        .find_node(query)
        .ok_or_else(|| CliError::NotFound { query: query.to_owned() })?;
    match format {
        OutputFormat::Text => print_text(mib, node),
        OutputFormat::Json => print_json(mib, node),
    }
    Ok(())
}

fn print_text(mib: &Mib, id: NodeId) {
    let node = mib.node(id);
    println!("oid:    {}", mib.oid(id));
    println!("name:   {}", node.name.as_deref().unwrap_or("-"));
    println!("kind:   {}", kind_str(node.kind));
    if let Some(m) = node.module {
        println!("module: {}", mib.module(m).name);
    }
    if let Some(o) = node.object {
        let object = mib.object(o);
        if let Some(t) = object.type_id {
            println!("syntax: {}", mib.ty(t).name);
        }
        println!("access: {:?}", object.access);
        println!("status: {:?}", object.status);
        if let Some(defval) = &object.defval {
            println!("defval: {defval}");
        }
        let indexes = mib.effective_indexes(o);
        if !indexes.is_empty() {
            let labels: Vec<&str> = indexes.iter().map(|i| i.label.as_str()).collect();
            println!("index:  {}", labels.join(", "));
        }
    }
    if let Some(n) = node.notification {
        let notification = mib.notification(n);
        let labels: Vec<&str> = notification.objects.iter().map(|o| o.label.as_str()).collect();
        if !labels.is_empty() {
            println!("objects: {}", labels.join(", "));
        }
    }
}

fn print_json(mib: &Mib, id: NodeId) {
    let node = mib.node(id);
    let object = node.object.map(|o| {
        let object = mib.object(o);
        json!({
            "syntax": object.type_id.map(|t| mib.ty(t).name.clone()),
            "access": format!("{:?}", object.access),
            "status": format!("{:?}", object.status),
            "defval": object.defval.as_ref().map(|d| d.to_string()),
            "indexes": mib.effective_indexes(o).iter().map(|i| i.label.clone()).collect::<Vec<_>>(),
        })
    });
    let out = json!({
        "oid": mib.oid(id).to_string(),
        "name": node.name,
        "kind": kind_str(node.kind),
        "module": node.module.map(|m| mib.module(m).name.clone()),
        "object": object,
    });
    println!("{out}");
}
