//! Traversal-safe path validation and Unix permission warnings, applied to
//! the settings file before it is read.

use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// Validate that `path` resolves, via `canonicalize`, to a location inside
/// `expected_base`. Symlinks are fully resolved before the containment
/// check so a redirected settings file cannot smuggle a read from outside
/// the settings directory.
pub fn validate_settings_path(path: &Path, expected_base: &Path) -> Result<PathBuf, ConfigError> {
    let canonical = fs::canonicalize(path)?;
    let canonical_base =
        fs::canonicalize(expected_base).unwrap_or_else(|_| expected_base.to_path_buf());

    if !canonical.starts_with(&canonical_base) {
        return Err(ConfigError::PathTraversal(format!(
            "path '{}' resolves to '{}' which is outside the expected directory '{}'",
            path.display(),
            canonical.display(),
            canonical_base.display(),
        )));
    }

    Ok(canonical)
}

/// Warn (not fail) if the settings file is group- or world-readable on
/// Unix, since it may hold values the user does not want other local users
/// to read.
#[cfg(unix)]
pub fn warn_if_insecure_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(metadata) = fs::metadata(path) {
        let mode = metadata.permissions().mode();
        if mode & 0o044 != 0 {
            log::warn!(
                "settings file {:?} has insecure permissions (mode {:04o}); \
                 readable by group or others. Run: chmod 600 {:?}",
                path,
                mode & 0o777,
                path,
            );
        }
    }
}

#[cfg(not(unix))]
pub fn warn_if_insecure_permissions(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn path_inside_base_is_accepted() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.ini");
        std::fs::write(&file, "[theme]\n").unwrap();
        let result = validate_settings_path(&file, dir.path());
        assert!(result.is_ok());
    }

    #[test]
    fn path_outside_base_is_rejected() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        let file = outside.path().join("settings.ini");
        std::fs::write(&file, "[theme]\n").unwrap();
        let result = validate_settings_path(&file, dir.path());
        assert!(matches!(result, Err(ConfigError::PathTraversal(_))));
    }
}
