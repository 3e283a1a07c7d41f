//! `CommandResult` (§4.2): the structured, no-throw outcome every command
//! returns.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
    NotApplicable,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: String,
    pub data: Map<String, Value>,
    pub error: Option<String>,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        CommandResult {
            status: CommandStatus::Success,
            message: message.into(),
            data: Map::new(),
            error: None,
        }
    }

    pub fn success_with(message: impl Into<String>, data: Map<String, Value>) -> Self {
        CommandResult {
            status: CommandStatus::Success,
            message: message.into(),
            data,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        CommandResult {
            status: CommandStatus::Failure,
            error: Some(message.clone()),
            message,
            data: Map::new(),
        }
    }

    pub fn not_applicable(message: impl Into<String>) -> Self {
        CommandResult {
            status: CommandStatus::NotApplicable,
            message: message.into(),
            data: Map::new(),
            error: None,
        }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        CommandResult {
            status: CommandStatus::Cancelled,
            message: message.into(),
            data: Map::new(),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == CommandStatus::Success
    }

    /// Lift a `MutationResult` from the workspace model into a command
    /// outcome.
    pub fn from_mutation(message: impl Into<String>, result: viloxterm_workspace::MutationResult) -> Self {
        if result.success {
            CommandResult::success_with(message, result.data)
        } else {
            CommandResult::failure(result.error.unwrap_or_else(|| "mutation failed".to_string()))
        }
    }
}
