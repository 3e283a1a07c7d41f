//! Typed error variants for settings I/O, parsing, and validation.

use thiserror::Error;

/// Errors produced by loading, saving, or validating settings.
///
/// Converts into [`viloxterm_common::CoreError`] at call sites that need the
/// shared taxonomy; kept as its own enum here so callers inside this crate
/// can match on the specific failure mode the way `par-term-config`'s
/// `ConfigError` does.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading settings: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed INI-like document; `line` is 1-based.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Typed validation failure for a single field, addressed by dotted path.
    #[error("validation error at {path}: {message}")]
    Validation { path: String, message: String },

    #[error("path traversal detected: {0}")]
    PathTraversal(String),
}

impl From<ConfigError> for viloxterm_common::CoreError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Io(io) => viloxterm_common::CoreError::Io(io),
            ConfigError::Parse { line, message } => {
                viloxterm_common::CoreError::Parse(format!("line {line}: {message}"))
            }
            ConfigError::Validation { path, message } => {
                viloxterm_common::CoreError::SchemaViolation(format!("{path}: {message}"))
            }
            ConfigError::PathTraversal(msg) => viloxterm_common::CoreError::InvalidArgument(msg),
        }
    }
}
