//! Script file writing
//!
//! This module provides:
//! - ScriptWriter for applying a batch of edits to a file
//! - Dry-run mode support (no actual file modifications)

use super::{apply_all, normalize_edits, TextEdit};
use crate::error::{AppError, ScriptError};
use std::fs;
use std::path::{Path, PathBuf};

/// Writer that applies text edits to build scripts and properties files
pub struct ScriptWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

/// Result of applying edits to a file
#[derive(Debug)]
pub struct WriteResult {
    /// Path to the file
    pub path: PathBuf,
    /// Number of edits applied
    pub edits_applied: usize,
    /// Whether the file was actually modified
    pub file_modified: bool,
    /// Content after the edits, also set in dry-run mode
    pub content: String,
}

impl WriteResult {
    fn new(path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            path: path.into(),
            edits_applied: 0,
            file_modified: false,
            content,
        }
    }

    /// Returns true if any edit changed the content
    pub fn has_changes(&self) -> bool {
        self.edits_applied > 0
    }
}

impl ScriptWriter {
    /// Create a new ScriptWriter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Create a ScriptWriter in dry-run mode
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    /// Check if this writer is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Apply `edits` (in original coordinates of the file) to `path`
    ///
    /// Edits are normalized first: no-ops and overlapping edits are dropped.
    pub fn apply(&self, path: &Path, edits: Vec<TextEdit>) -> Result<WriteResult, AppError> {
        let content = read_script(path)?;
        let edits = normalize_edits(&content, edits);
        let updated = apply_all(&content, &edits)?;

        let mut result = WriteResult::new(path, updated);
        result.edits_applied = edits.len();

        if result.has_changes() && !self.dry_run {
            write_script(path, &result.content)?;
            result.file_modified = true;
        }

        Ok(result)
    }
}

/// Read a script file
pub fn read_script(path: &Path) -> Result<String, ScriptError> {
    if !path.exists() {
        return Err(ScriptError::not_found(path));
    }
    fs::read_to_string(path).map_err(|e| ScriptError::read_error(path, e))
}

/// Write content to a script file
pub fn write_script(path: &Path, content: &str) -> Result<(), ScriptError> {
    fs::write(path, content).map_err(|e| ScriptError::write_error(path, e))
}
