//! Module discovery sources.
//!
//! The SMI text parser is an external collaborator; what a
//! [`ModuleSource`] hands back is the lowered IR of a module
//! ([`SourceModule`]), typically stored as JSON. [`DirSource`] is the
//! built-in implementation: it looks for `<NAME>.json` in an ordered list
//! of directories.
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::ir::SourceModule;

// ---------------------------------------------------------------------------
// SourceError
// ---------------------------------------------------------------------------

/// Errors surfaced while fetching a module from a source. These are I/O
/// class failures, not diagnostics: they abort the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The file exists but could not be read.
    Io {
        /// The path that failed.
        path: String,
        /// The underlying error message.
        message: String,
    },
    /// The file was read but is not valid module IR.
    Decode {
        /// The path that failed.
        path: String,
        /// The decoder's error message.
        message: String,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Decode { path, message } => write!(f, "cannot decode {path}: {message}"),
        }
    }
}

impl std::error::Error for SourceError {}

// ---------------------------------------------------------------------------
// ModuleSource
// ---------------------------------------------------------------------------

/// Supplies lowered modules by name, on demand.
///
/// The loader consults the source for every module named in
/// [`with_modules`](crate::loader::Loader::with_modules) and for every
/// module discovered transitively through `IMPORTS`.
pub trait ModuleSource {
    /// Fetches a module. `Ok(None)` means the source does not know it —
    /// the binder will report `import-module-not-found` if anything
    /// imports from it.
    fn load(&self, name: &str) -> Result<Option<SourceModule>, SourceError>;
}

// ---------------------------------------------------------------------------
// DirSource
// ---------------------------------------------------------------------------

/// Loads module IR from `<dir>/<NAME>.json`, trying directories in order.
#[derive(Debug, Clone, Default)]
pub struct DirSource {
    dirs: Vec<PathBuf>,
}

impl DirSource {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self { dirs: dirs.into_iter().map(Into::into).collect() }
    }

    /// Appends a directory with lower precedence than the existing ones.
    pub fn push_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.push(dir.into());
    }

    /// The directories, in precedence order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl ModuleSource for DirSource {
    fn load(&self, name: &str) -> Result<Option<SourceModule>, SourceError> {
        // Module names never contain path separators, but a hostile name
        // must not escape the directory.
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Ok(None);
        }
        for dir in &self.dirs {
            let path = dir.join(format!("{name}.json"));
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(SourceError::Io {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    });
                }
            };
            let mut module: SourceModule =
                serde_json::from_str(&text).map_err(|e| SourceError::Decode {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
            if module.path.is_none() {
                module.path = Some(path.display().to_string());
            }
            return Ok(Some(module));
        }
        Ok(None)
    }
}

/// The conventional directories scanned by
/// [`with_system_paths`](crate::loader::Loader::with_system_paths).
pub fn system_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("/usr/share/rmib"),
        PathBuf::from("/usr/local/share/rmib"),
    ];
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(Path::new(&home).join(".local/share/rmib"));
    }
    paths
}
