//! Pane commands (§4.2): split, close, focus, widget changes, maximize.

use serde_json::Value;
use viloxterm_common::PaneId;
use viloxterm_workspace::Orientation;

use crate::builtin::util::widget_kind_from_str;
use crate::command::Command;
use crate::context::CommandContext;
use crate::result::CommandResult;

/// `pane.split`: orientation comes from the `orientation` parameter
/// (`"horizontal"` or `"vertical"`), defaulting to horizontal.
/// `pane.splitHorizontal`/`pane.splitVertical` are the same command with
/// the orientation injected by the registry (see `registry.rs`).
pub struct SplitPane;

impl Command for SplitPane {
    fn name(&self) -> &str {
        "pane.split"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(pane_id) = target_pane_id(ctx) else {
            return CommandResult::not_applicable("no active pane");
        };
        let orientation = match ctx.param_str("orientation") {
            Some("vertical") => Orientation::Vertical,
            _ => Orientation::Horizontal,
        };
        match ctx.model.split_pane(&pane_id, orientation) {
            Ok(new_pane_id) => {
                let mut data = serde_json::Map::new();
                data.insert("pane_id".into(), new_pane_id.as_str().into());
                CommandResult::success_with("pane split", data)
            }
            Err(result) => CommandResult::from_mutation("pane split", result),
        }
    }
}

pub struct ClosePane;

impl Command for ClosePane {
    fn name(&self) -> &str {
        "pane.close"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(pane_id) = target_pane_id(ctx) else {
            return CommandResult::not_applicable("no active pane");
        };
        let result = ctx.model.close_pane(&pane_id);
        CommandResult::from_mutation("pane closed", result)
    }
}

pub struct FocusPane;

impl Command for FocusPane {
    fn name(&self) -> &str {
        "pane.focus"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(pane_id) = ctx.param_str("pane_id").map(PaneId::from_raw) else {
            return CommandResult::failure("missing required parameter `pane_id`");
        };
        let result = ctx.model.focus_pane(&pane_id);
        CommandResult::from_mutation("pane focused", result)
    }
}

pub struct ChangePaneWidget;

impl Command for ChangePaneWidget {
    fn name(&self) -> &str {
        "pane.changeWidget"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(pane_id) = target_pane_id(ctx) else {
            return CommandResult::not_applicable("no active pane");
        };
        let Some(kind) = ctx.param_str("widget_kind").map(widget_kind_from_str) else {
            return CommandResult::failure("missing required parameter `widget_kind`");
        };
        let result = ctx.model.change_pane_widget(&pane_id, kind);
        CommandResult::from_mutation("pane widget changed", result)
    }
}

/// `pane.replace_widget`: same as `changeWidget`, addressed via the
/// `widget_id` parameter name the catalog prescribes.
pub struct ReplaceWidget;

impl Command for ReplaceWidget {
    fn name(&self) -> &str {
        "pane.replace_widget"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(pane_id) = target_pane_id(ctx) else {
            return CommandResult::not_applicable("no active pane");
        };
        let Some(kind) = ctx.param_str("widget_id").map(widget_kind_from_str) else {
            return CommandResult::failure("missing required parameter `widget_id`");
        };
        let result = ctx.model.change_pane_widget(&pane_id, kind);
        CommandResult::from_mutation("pane widget replaced", result)
    }
}

/// `pane.maximize_toggle`: toggles a `maximized` flag in the pane's
/// `widget_state`, per the Open Question decision recorded in `DESIGN.md`
/// — siblings stay in the tree and are simply excluded from bounds
/// computation by the caller while the flag is set.
pub struct MaximizeTogglePane;

impl Command for MaximizeTogglePane {
    fn name(&self) -> &str {
        "pane.maximize_toggle"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(pane_id) = target_pane_id(ctx) else {
            return CommandResult::not_applicable("no active pane");
        };
        let currently_maximized = ctx
            .model
            .get_pane(&pane_id)
            .and_then(|pane| pane.widget_state.get("maximized"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let mut state = serde_json::Map::new();
        state.insert("maximized".into(), Value::Bool(!currently_maximized));
        let result = ctx.model.update_widget_state(&pane_id, state, true);
        CommandResult::from_mutation("pane maximize toggled", result)
    }
}

fn target_pane_id(ctx: &CommandContext) -> Option<PaneId> {
    ctx.param_str("pane_id")
        .map(PaneId::from_raw)
        .or_else(|| ctx.resolve_active_pane())
}
