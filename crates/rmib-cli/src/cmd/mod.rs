//! Per-command handlers.
pub mod check;
pub mod query;
pub mod tree;

use std::path::PathBuf;

use rmib_core::{DirSource, LoadError, Loader, Mib};

use crate::cli::Cli;
use crate::error::CliError;
use crate::io;

/// Builds a loader from the global flags plus a command's file and module
/// arguments, and runs it. `Failed` loads still hand back the report-laden
/// `Mib`; callers decide the exit code.
pub fn load(cli: &Cli, files: &[PathBuf], modules: &[String]) -> Result<LoadOutcome, CliError> {
    let mut loader = Loader::new();
    for module in io::read_modules(files)? {
        loader = loader.add_module(module);
    }
    if !cli.mib_dirs.is_empty() {
        loader = loader.with_source(Box::new(DirSource::new(cli.mib_dirs.clone())));
    }
    if cli.system_paths {
        loader = loader.with_system_paths();
    }
    loader = loader
        .with_modules(modules.iter().cloned())
        .with_strictness(cli.strictness.into());

    match loader.load() {
        Ok(mib) => Ok(LoadOutcome { mib, failed: false }),
        Err(LoadError::Failed { mib, .. }) => Ok(LoadOutcome { mib: *mib, failed: true }),
        Err(LoadError::Cancelled) => Err(CliError::Source { detail: "cancelled".to_owned() }),
        Err(LoadError::Source(e)) => Err(CliError::Source { detail: e.to_string() }),
    }
}

/// A finished load: the frozen bundle plus whether the fail threshold
/// fired.
pub struct LoadOutcome {
    pub mib: Mib,
    pub failed: bool,
}
