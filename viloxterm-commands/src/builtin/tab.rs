//! Tab commands (§4.2): `tab.create`, `tab.close`, `tab.rename`,
//! `tab.switch`, `tab.duplicate`, `tab.next`, `tab.previous`.

use viloxterm_common::TabId;
use viloxterm_workspace::WidgetKind;

use crate::builtin::util::widget_kind_from_str;
use crate::command::Command;
use crate::context::CommandContext;
use crate::result::CommandResult;

pub struct CreateTab;

impl Command for CreateTab {
    fn name(&self) -> &str {
        "tab.create"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let name = ctx.param_str("name").unwrap_or("Untitled").to_string();
        let widget_kind = ctx
            .param_str("widget_kind")
            .map(widget_kind_from_str)
            .unwrap_or(WidgetKind::Editor);
        let tab_id = ctx.model.create_tab(&name, widget_kind);
        let mut data = serde_json::Map::new();
        data.insert("tab_id".into(), tab_id.as_str().into());
        CommandResult::success_with("tab created", data)
    }
}

pub struct CloseTab;

impl Command for CloseTab {
    fn name(&self) -> &str {
        "tab.close"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(tab_id) = target_tab_id(ctx) else {
            return CommandResult::not_applicable("no active tab");
        };
        let result = ctx.model.close_tab(&tab_id);
        CommandResult::from_mutation("tab closed", result)
    }
}

pub struct RenameTab;

impl Command for RenameTab {
    fn name(&self) -> &str {
        "tab.rename"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(tab_id) = target_tab_id(ctx) else {
            return CommandResult::not_applicable("no active tab");
        };
        let Some(new_name) = ctx.param_str("name").map(str::to_string) else {
            return CommandResult::failure("missing required parameter `name`");
        };
        let result = ctx.model.rename_tab(&tab_id, &new_name);
        CommandResult::from_mutation("tab renamed", result)
    }
}

pub struct SwitchTab;

impl Command for SwitchTab {
    fn name(&self) -> &str {
        "tab.switch"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(target) = ctx.param_str("tab_id").map(TabId::from_raw) else {
            return CommandResult::failure("missing required parameter `tab_id`");
        };
        let result = ctx.model.set_active_tab(&target);
        CommandResult::from_mutation("tab switched", result)
    }
}

pub struct DuplicateTab;

impl Command for DuplicateTab {
    fn name(&self) -> &str {
        "tab.duplicate"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(tab_id) = target_tab_id(ctx) else {
            return CommandResult::not_applicable("no active tab");
        };
        match ctx.model.duplicate_tab(&tab_id) {
            Ok(new_id) => {
                let mut data = serde_json::Map::new();
                data.insert("tab_id".into(), new_id.as_str().into());
                CommandResult::success_with("tab duplicated", data)
            }
            Err(result) => CommandResult::from_mutation("tab duplicated", result),
        }
    }
}

pub struct NextTab;

impl Command for NextTab {
    fn name(&self) -> &str {
        "tab.next"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        step_tab(ctx, 1)
    }
}

/// `tab.closeToRight`: close every tab to the right of the target tab in
/// tab order, leaving the target and everything before it untouched.
pub struct CloseTabsToRight;

impl Command for CloseTabsToRight {
    fn name(&self) -> &str {
        "tab.closeToRight"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(tab_id) = target_tab_id(ctx) else {
            return CommandResult::not_applicable("no active tab");
        };
        let result = ctx.model.close_tabs_to_right(&tab_id);
        CommandResult::from_mutation("tabs closed to the right", result)
    }
}

/// `tab.closeOthers`: close every tab except the target, leaving it as the
/// sole remaining tab.
pub struct CloseOtherTabs;

impl Command for CloseOtherTabs {
    fn name(&self) -> &str {
        "tab.closeOthers"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(tab_id) = target_tab_id(ctx) else {
            return CommandResult::not_applicable("no active tab");
        };
        let result = ctx.model.close_other_tabs(&tab_id);
        CommandResult::from_mutation("other tabs closed", result)
    }
}

pub struct PreviousTab;

impl Command for PreviousTab {
    fn name(&self) -> &str {
        "tab.previous"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        step_tab(ctx, -1)
    }
}

fn step_tab(ctx: &mut CommandContext, delta: i64) -> CommandResult {
    let tabs = ctx.model.get_tabs();
    if tabs.is_empty() {
        return CommandResult::not_applicable("no tabs");
    }
    let Some(active) = ctx.model.active_tab_id().cloned() else {
        return CommandResult::not_applicable("no active tab");
    };
    let Some(current_index) = tabs.iter().position(|tab| tab.id == active) else {
        return CommandResult::not_applicable("active tab not found");
    };
    let len = tabs.len() as i64;
    let next_index = (current_index as i64 + delta).rem_euclid(len) as usize;
    let next_id = tabs[next_index].id.clone();
    let result = ctx.model.set_active_tab(&next_id);
    CommandResult::from_mutation("tab switched", result)
}

fn target_tab_id(ctx: &CommandContext) -> Option<TabId> {
    ctx.param_str("tab_id")
        .map(TabId::from_raw)
        .or_else(|| ctx.resolve_active_tab())
}
