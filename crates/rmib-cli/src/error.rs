//! CLI error types with associated exit codes.
//!
//! Every variant maps to a stable exit code via [`CliError::exit_code`]:
//!
//! - Exit code **2** — input failure: an IR file could not be read or
//!   decoded, or a module source failed. These terminate before the result
//!   is usable.
//! - Exit code **1** — logical failure: loading ran to completion but the
//!   report contains errors, or a query found nothing.
use std::path::PathBuf;

/// All error conditions the `rmib` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    /// An IR file argument could not be found.
    FileNotFound { path: PathBuf },
    /// An IR file could not be read.
    Io { path: PathBuf, detail: String },
    /// An IR file is not valid lowered-module JSON.
    Decode { path: PathBuf, detail: String },
    /// A module source failed while discovering imports.
    Source { detail: String },
    /// Loading finished with error-level diagnostics (already printed).
    LoadFailed { errors: usize },
    /// A query matched nothing.
    NotFound { query: String },
}

impl CliError {
    /// The message printed to stderr before exiting.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => format!("file not found: {}", path.display()),
            Self::Io { path, detail } => format!("cannot read {}: {detail}", path.display()),
            Self::Decode { path, detail } => {
                format!("cannot decode {}: {detail}", path.display())
            }
            Self::Source { detail } => format!("module source error: {detail}"),
            Self::LoadFailed { errors } => format!("load finished with {errors} error(s)"),
            Self::NotFound { query } => format!("no definition matches {query:?}"),
        }
    }

    /// The process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::Io { .. }
            | Self::Decode { .. }
            | Self::Source { .. } => 2,
            Self::LoadFailed { .. } | Self::NotFound { .. } => 1,
        }
    }
}
