//! `state.save` / `state.restore` (§4.2): persist and reload the
//! workspace document. Actual storage is pluggable — a `StateStore`
//! registered in `ctx.services` receives the serialized document; without
//! one, `state.save` still succeeds and returns the document inline so a
//! caller can persist it some other way.

use serde_json::Value;

use crate::command::Command;
use crate::context::CommandContext;
use crate::result::CommandResult;

/// A pluggable sink/source for the workspace document, looked up by type
/// in `ctx.services`.
pub trait StateStore: Send + Sync {
    fn save(&mut self, document: &Value) -> Result<(), String>;
    fn load(&self) -> Result<Option<Value>, String>;
}

pub struct SaveState;

impl Command for SaveState {
    fn name(&self) -> &str {
        "state.save"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let document = ctx.model.serialize();
        if let Some(store) = ctx.services.get_mut::<Box<dyn StateStore>>() {
            if let Err(err) = store.save(&document) {
                return CommandResult::failure(format!("failed to save workspace state: {err}"));
            }
        }
        let mut data = serde_json::Map::new();
        data.insert("document".into(), document);
        CommandResult::success_with("workspace state saved", data)
    }
}

pub struct RestoreState;

impl Command for RestoreState {
    fn name(&self) -> &str {
        "state.restore"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let document = if let Some(doc) = ctx.param("document").cloned() {
            Some(doc)
        } else if let Some(store) = ctx.services.get::<Box<dyn StateStore>>() {
            match store.load() {
                Ok(doc) => doc,
                Err(err) => {
                    return CommandResult::failure(format!(
                        "failed to load workspace state: {err}"
                    ))
                }
            }
        } else {
            None
        };

        let Some(document) = document else {
            return CommandResult::not_applicable("no saved workspace state available");
        };

        ctx.model.restore(&document);
        CommandResult::success("workspace state restored")
    }
}
