//! Schema-validated settings engine: layered precedence, INI-like
//! persistence, CLI/env bindings, and keyboard-shortcut storage.

pub mod cli;
pub mod defaults;
pub mod engine;
pub mod env;
pub mod error;
pub mod ini;
pub mod path_validation;
pub mod schema;

pub use engine::{resolve_location, ResolvedLocation, SettingsEngine};
pub use error::ConfigError;
