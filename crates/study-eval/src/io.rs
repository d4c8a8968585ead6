//! Durable writes.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{EvaluatorError, Result};

/// Writes `bytes` to `path` through a temp file and rename, creating the
/// parent directory if needed.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| EvaluatorError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    let temp_path = match path.extension() {
        Some(ext) => path.with_extension(format!("{}.tmp", ext.to_string_lossy())),
        None => path.with_extension("tmp"),
    };

    let mut file = File::create(&temp_path).map_err(|e| EvaluatorError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(bytes).map_err(|e| EvaluatorError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| EvaluatorError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| EvaluatorError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Writes `bytes` to `path` directly, creating the parent directory.
pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| EvaluatorError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, bytes).map_err(|e| EvaluatorError::Io {
        operation: "write",
        path: path.to_path_buf(),
        source: e,
    })
}
