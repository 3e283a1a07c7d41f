//! The command system (§4.2): the only channel by which user intent
//! mutates the workspace model.

pub mod builtin;
pub mod command;
pub mod composite;
pub mod context;
pub mod registry;
pub mod result;
pub mod services;

pub use command::Command;
pub use composite::Composite;
pub use context::CommandContext;
pub use registry::Registry;
pub use result::{CommandResult, CommandStatus};
pub use services::Services;
