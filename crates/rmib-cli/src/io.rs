//! Reading lowered-module IR files from disk.
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use rmib_core::SourceModule;

use crate::error::CliError;

/// Reads and decodes one IR file.
pub fn read_module(path: &Path) -> Result<SourceModule, CliError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CliError::FileNotFound { path: path.to_path_buf() });
        }
        Err(e) => {
            return Err(CliError::Io { path: path.to_path_buf(), detail: e.to_string() });
        }
    };
    let mut module: SourceModule = serde_json::from_str(&text)
        .map_err(|e| CliError::Decode { path: path.to_path_buf(), detail: e.to_string() })?;
    if module.path.is_none() {
        module.path = Some(path.display().to_string());
    }
    Ok(module)
}

/// Reads every IR file argument, in order.
pub fn read_modules(paths: &[std::path::PathBuf]) -> Result<Vec<SourceModule>, CliError> {
    paths.iter().map(|p| read_module(p)).collect()
}
