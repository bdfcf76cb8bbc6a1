//! Generated files and writing them to disk.

use std::path::{Path, PathBuf};
use wrapgen_common::{Result, WrapError};

/// One generated file, held in memory until written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperFile {
    pub path: PathBuf,
    pub contents: String,
}

impl WrapperFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Write the file, creating missing parent directories.
    pub fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WrapError::io(parent, e))?;
        }
        std::fs::write(&self.path, &self.contents).map_err(|e| WrapError::io(&self.path, e))
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}

/// Write every file in order, stopping at the first failure.
///
/// Writes are not transactional: files written before a failure stay on
/// disk.
pub fn write_all(files: &[WrapperFile]) -> Result<()> {
    for file in files {
        tracing::debug!("Writing {}", file.path.display());
        file.write()?;
    }
    Ok(())
}

/// Directory holding one module's wrappers.
pub fn module_dir(wrapper_root: &Path, module_name: &str) -> PathBuf {
    wrapper_root.join(module_name)
}
