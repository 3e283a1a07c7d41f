//! Spatial and sequential pane navigation (§4.2, §4.1).

use viloxterm_workspace::{tree, Direction};

use crate::command::Command;
use crate::context::CommandContext;
use crate::result::CommandResult;

pub struct NavigateDirection(pub Direction);

impl Command for NavigateDirection {
    fn name(&self) -> &str {
        match self.0 {
            Direction::Left => "navigate.left",
            Direction::Right => "navigate.right",
            Direction::Up => "navigate.up",
            Direction::Down => "navigate.down",
        }
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(from) = ctx.resolve_active_pane() else {
            return CommandResult::not_applicable("no active pane");
        };
        match ctx.model.find_pane_in_direction(&from, self.0) {
            Some(target) => {
                let result = ctx.model.focus_pane(&target);
                CommandResult::from_mutation("navigated", result)
            }
            None => CommandResult::not_applicable("no pane in that direction"),
        }
    }
}

/// `navigate.nextPane` / `navigate.previousPane`: step through the active
/// tab's leaves in reading order (§4.1's `reading_order_leaves`).
pub struct StepPane {
    pub forward: bool,
}

impl Command for StepPane {
    fn name(&self) -> &str {
        if self.forward {
            "navigate.nextPane"
        } else {
            "navigate.previousPane"
        }
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(active_tab) = ctx.model.get_active_tab() else {
            return CommandResult::not_applicable("no active tab");
        };
        let order = tree::reading_order_leaves(&active_tab.tree);
        if order.is_empty() {
            return CommandResult::not_applicable("no panes in active tab");
        }
        let Some(from) = ctx.resolve_active_pane() else {
            return CommandResult::not_applicable("no active pane");
        };
        let Some(current_index) = order.iter().position(|id| *id == from) else {
            return CommandResult::not_applicable("active pane not in reading order");
        };
        let len = order.len() as i64;
        let delta = if self.forward { 1 } else { -1 };
        let next_index = (current_index as i64 + delta).rem_euclid(len) as usize;
        let target = order[next_index].clone();
        let result = ctx.model.focus_pane(&target);
        CommandResult::from_mutation("navigated", result)
    }
}

/// `navigate.toPaneNumber(n)`: jump to the pane at 1-based reading-order
/// position `n` (capped at 9, per `pane_reading_index`).
pub struct ToPaneNumber;

impl Command for ToPaneNumber {
    fn name(&self) -> &str {
        "navigate.toPaneNumber"
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let Some(n) = ctx.param_u64("number") else {
            return CommandResult::failure("missing required parameter `number`");
        };
        let Some(active_tab) = ctx.model.get_active_tab() else {
            return CommandResult::not_applicable("no active tab");
        };
        let order = tree::reading_order_leaves(&active_tab.tree);
        let Some(target) = (n as usize).checked_sub(1).and_then(|i| order.get(i)).cloned() else {
            return CommandResult::not_applicable(format!("no pane numbered {n}"));
        };
        let result = ctx.model.focus_pane(&target);
        CommandResult::from_mutation("navigated", result)
    }
}
