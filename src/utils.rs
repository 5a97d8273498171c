// ABOUTME: Utility functions for the slidepack build-plan generator
// ABOUTME: Provides path validation and small parsing helpers

use crate::errors::{BuildError, Result};
use std::path::Path;

/// Validate that a directory exists
pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(BuildError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(BuildError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// Ensure a file's parent directory exists, creating it if necessary
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        } else if !parent.is_dir() {
            return Err(BuildError::NotADirectory(parent.to_path_buf()));
        }
    }
    Ok(())
}

/// Interpret an environment toggle. Only `1`, `true`, `yes` and `on` enable it.
pub fn parse_bool_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// True when `path` contains a glob metacharacter
pub fn has_glob_meta(path: &str) -> bool {
    path.contains(['*', '?', '['])
}
