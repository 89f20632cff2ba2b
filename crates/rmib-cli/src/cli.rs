//! Clap CLI definition: root struct, subcommands, and shared argument
//! types.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rmib_core::StrictnessLevel;

/// Output format for CLI commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default).
    Text,
    /// Structured JSON.
    Json,
}

/// Strictness preset, mirrored from the core library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Strictness {
    Strict,
    Normal,
    Permissive,
    Silent,
}

impl From<Strictness> for StrictnessLevel {
    fn from(s: Strictness) -> Self {
        match s {
            Strictness::Strict => Self::Strict,
            Strictness::Normal => Self::Normal,
            Strictness::Permissive => Self::Permissive,
            Strictness::Silent => Self::Silent,
        }
    }
}

/// `rmib` — load lowered SMI module IR and inspect the resolved model.
#[derive(Debug, Parser)]
#[command(name = "rmib", version, about)]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Strictness preset controlling reporting and fallbacks.
    #[arg(long, global = true, value_enum, default_value_t = Strictness::Normal)]
    pub strictness: Strictness,

    /// Directories searched for `<MODULE>.json` IR files, highest priority
    /// first.
    #[arg(long = "mib-dir", global = true, env = "RMIB_DIRS", value_delimiter = ':')]
    pub mib_dirs: Vec<PathBuf>,

    /// Also search the conventional system IR directories.
    #[arg(long, global = true)]
    pub system_paths: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load modules and report diagnostics.
    Check {
        /// IR files to load directly.
        files: Vec<PathBuf>,
        /// Module names to pull from the configured directories.
        #[arg(long = "module", short = 'm')]
        modules: Vec<String>,
    },
    /// Print the resolved OID tree.
    Tree {
        /// IR files to load directly.
        files: Vec<PathBuf>,
        /// Module names to pull from the configured directories.
        #[arg(long = "module", short = 'm')]
        modules: Vec<String>,
        /// Subtree to print (`MODULE::name`, bare name, or numeric OID).
        #[arg(long)]
        root: Option<String>,
    },
    /// Look up one definition by `MODULE::name`, bare name, or OID.
    Query {
        /// The query string.
        query: String,
        /// IR files to load directly.
        files: Vec<PathBuf>,
        /// Module names to pull from the configured directories.
        #[arg(long = "module", short = 'm')]
        modules: Vec<String>,
    },
}
