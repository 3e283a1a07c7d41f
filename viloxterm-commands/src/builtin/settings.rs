//! Settings commands (§4.2). These look up a loaded `SettingsEngine` in
//! `ctx.services`; without one registered they report `NotApplicable`
//! rather than failing, since a settings engine is an optional dependency
//! of the command layer, not a hard requirement of the workspace model.

use viloxterm_config::SettingsEngine;
use viloxterm_workspace::WidgetKind;

use crate::command::Command;
use crate::context::CommandContext;
use crate::result::CommandResult;

const NO_ENGINE: &str = "no settings engine registered in services";

/// `settings.open`: switches the active pane to the Settings widget.
pub struct OpenSettings;

impl Command for OpenSettings {
    fn name(&self) -> &str {
        "settings.open"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(pane_id) = ctx.resolve_active_pane() else {
            return CommandResult::not_applicable("no active pane");
        };
        let result = ctx.model.change_pane_widget(&pane_id, WidgetKind::Settings);
        CommandResult::from_mutation("settings opened", result)
    }
}

pub struct ResetSettings;

impl Command for ResetSettings {
    fn name(&self) -> &str {
        "settings.reset"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(engine) = ctx.services.get_mut::<SettingsEngine>() else {
            return CommandResult::not_applicable(NO_ENGINE);
        };
        engine.reset();
        if let Err(err) = engine.save() {
            return CommandResult::failure(format!("failed to save reset settings: {err}"));
        }
        CommandResult::success("settings reset to defaults")
    }
}

pub struct ToggleTheme;

impl Command for ToggleTheme {
    fn name(&self) -> &str {
        "settings.toggleTheme"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(engine) = ctx.services.get_mut::<SettingsEngine>() else {
            return CommandResult::not_applicable(NO_ENGINE);
        };
        let theme = engine.toggle_theme();
        if let Err(err) = engine.save() {
            return CommandResult::failure(format!("failed to save theme change: {err}"));
        }
        let mut data = serde_json::Map::new();
        data.insert("theme".into(), theme.clone().into());
        CommandResult::success_with(format!("theme set to {theme}"), data)
    }
}

pub struct SetShortcut;

impl Command for SetShortcut {
    fn name(&self) -> &str {
        "settings.setShortcut"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(command_id) = ctx.param_str("cmd_id").map(str::to_string) else {
            return CommandResult::failure("missing required parameter `cmd_id`");
        };
        let Some(sequence) = ctx.param_str("seq").map(str::to_string) else {
            return CommandResult::failure("missing required parameter `seq`");
        };
        let Some(engine) = ctx.services.get_mut::<SettingsEngine>() else {
            return CommandResult::not_applicable(NO_ENGINE);
        };
        if let Err(err) = engine.set_shortcut(&command_id, &sequence) {
            return CommandResult::failure(err.to_string());
        }
        if let Err(err) = engine.save() {
            return CommandResult::failure(format!("failed to save shortcut: {err}"));
        }
        CommandResult::success(format!("shortcut {sequence} bound to {command_id}"))
    }
}

pub struct ResetShortcuts;

impl Command for ResetShortcuts {
    fn name(&self) -> &str {
        "settings.resetShortcuts"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(engine) = ctx.services.get_mut::<SettingsEngine>() else {
            return CommandResult::not_applicable(NO_ENGINE);
        };
        for command_id in engine.get_shortcuts().keys().cloned().collect::<Vec<_>>() {
            engine.unset_shortcut(&command_id);
        }
        if let Err(err) = engine.save() {
            return CommandResult::failure(format!("failed to save cleared shortcuts: {err}"));
        }
        CommandResult::success("all shortcuts reset")
    }
}
