//! `rmib check` — load modules and report diagnostics.
use rmib_core::Mib;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::cmd::LoadOutcome;
use crate::error::CliError;

pub fn run(outcome: &LoadOutcome, format: OutputFormat) -> Result<(), CliError> {
    let mib = &outcome.mib;
    match format {
        OutputFormat::Text => print_text(mib),
        OutputFormat::Json => print_json(mib),
    }
    let errors = mib
        .diagnostics()
        .iter()
        .filter(|d| d.severity.rank() <= rmib_core::Severity::Error.rank())
        .count();
    if outcome.failed || mib.has_errors() {
        Err(CliError::LoadFailed { errors })
    } else {
        Ok(())
    }
}

fn print_text(mib: &Mib) {
    for d in mib.diagnostics() {
        println!("{d}");
    }
    println!(
        "{} modules, {} nodes, {} objects, {} types, {} diagnostics, {} unresolved",
        mib.module_count(),
        mib.node_count(),
        mib.object_count(),
        mib.type_count(),
        mib.diagnostics().len(),
        mib.unresolved().len()
    );
}

fn print_json(mib: &Mib) {
    let report = json!({
        "modules": mib.module_count(),
        "nodes": mib.node_count(),
        "objects": mib.object_count(),
        "types": mib.type_count(),
        "complete": mib.is_complete(),
        "has_errors": mib.has_errors(),
        "diagnostics": mib.diagnostics(),
        "unresolved": mib.unresolved(),
    });
    println!("{report}");
}
