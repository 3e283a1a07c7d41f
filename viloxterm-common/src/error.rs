//! Shared error taxonomy used across every core crate.
//!
//! Mirrors the categories the workspace, command, keybinding, config, and
//! terminal modules each surface at their fallible boundaries: invalid
//! arguments, state violations, parse errors, schema violations, I/O
//! failures, process failures, and corruption recovery. Crate-local errors
//! (`ConfigError`, `TerminalError`, ...) convert into this one so a caller
//! one layer up can match on a single, stable set of variants instead of
//! threading every downstream crate's error type through its own signature.

use thiserror::Error;

/// The error categories named in the core's error-handling design.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A caller passed an argument that is structurally invalid — an
    /// out-of-range ratio, an unknown enum tag, an empty required string.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested operation conflicts with the current state — closing
    /// the last pane in a tab, splitting a node that doesn't exist anymore.
    #[error("state violation: {0}")]
    StateViolation(String),

    /// Input text could not be parsed into the expected grammar (key chord
    /// syntax, context expression syntax, shortcut definition).
    #[error("parse error: {0}")]
    Parse(String),

    /// A document failed schema validation (settings file, workspace
    /// serialization) — well-formed but semantically invalid.
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    /// Reading or writing to the filesystem failed.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// Spawning, writing to, or waiting on a child process failed.
    #[error("process failure: {0}")]
    ProcessFailure(String),

    /// A persisted document was recoverable but required falling back to
    /// defaults for part of its content (corrupted settings section,
    /// unreadable workspace snapshot fragment).
    #[error("corruption recovery: {0}")]
    CorruptionRecovery(String),
}

/// Convenience alias for fallible operations at crate-public boundaries.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts_via_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CoreError = io_err.into();
        assert!(matches!(err, CoreError::Io(_)));
    }

    #[test]
    fn display_messages_are_distinguishable() {
        let a = CoreError::InvalidArgument("ratio out of range".into());
        let b = CoreError::StateViolation("cannot close last pane".into());
        assert_ne!(a.to_string(), b.to_string());
    }
}
