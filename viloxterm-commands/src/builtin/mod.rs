//! The built-in command catalog (§4.2): the minimum required set, each
//! mapping directly to a `WorkspaceModel` operation.

pub mod navigate;
pub mod pane;
pub mod settings;
pub mod state;
pub mod tab;
mod util;

use viloxterm_workspace::Direction;

use crate::registry::Registry;

/// Register every built-in command and its aliases into a fresh registry.
pub fn register_all(registry: &mut Registry) {
    registry.register("tab.create", || Box::new(tab::CreateTab));
    registry.register("tab.close", || Box::new(tab::CloseTab));
    registry.register("tab.rename", || Box::new(tab::RenameTab));
    registry.register("tab.switch", || Box::new(tab::SwitchTab));
    registry.register("tab.duplicate", || Box::new(tab::DuplicateTab));
    registry.register("tab.next", || Box::new(tab::NextTab));
    registry.register("tab.previous", || Box::new(tab::PreviousTab));
    registry.register("tab.closeToRight", || Box::new(tab::CloseTabsToRight));
    registry.register("tab.closeOthers", || Box::new(tab::CloseOtherTabs));

    registry.register("pane.split", || Box::new(pane::SplitPane));
    registry.register("pane.close", || Box::new(pane::ClosePane));
    registry.register("pane.focus", || Box::new(pane::FocusPane));
    registry.register("pane.changeWidget", || Box::new(pane::ChangePaneWidget));
    registry.register("pane.maximize_toggle", || Box::new(pane::MaximizeTogglePane));
    registry.register("pane.replace_widget", || Box::new(pane::ReplaceWidget));

    // `splitHorizontal`/`splitVertical` are `pane.split` with the
    // orientation parameter injected by the registry before construction.
    registry.register("pane.splitHorizontal", || Box::new(pane::SplitPane));
    registry.register_injector("pane.splitHorizontal", |params| {
        params.insert("orientation".into(), "horizontal".into());
    });
    registry.register("pane.splitVertical", || Box::new(pane::SplitPane));
    registry.register_injector("pane.splitVertical", |params| {
        params.insert("orientation".into(), "vertical".into());
    });

    registry.register("navigate.left", || Box::new(navigate::NavigateDirection(Direction::Left)));
    registry.register("navigate.right", || {
        Box::new(navigate::NavigateDirection(Direction::Right))
    });
    registry.register("navigate.up", || Box::new(navigate::NavigateDirection(Direction::Up)));
    registry.register("navigate.down", || Box::new(navigate::NavigateDirection(Direction::Down)));
    registry.register("navigate.nextPane", || Box::new(navigate::StepPane { forward: true }));
    registry.register("navigate.previousPane", || {
        Box::new(navigate::StepPane { forward: false })
    });
    registry.register("navigate.toPaneNumber", || Box::new(navigate::ToPaneNumber));

    registry.register("settings.open", || Box::new(settings::OpenSettings));
    registry.register("settings.reset", || Box::new(settings::ResetSettings));
    registry.register("settings.toggleTheme", || Box::new(settings::ToggleTheme));
    registry.register("settings.setShortcut", || Box::new(settings::SetShortcut));
    registry.register("settings.resetShortcuts", || Box::new(settings::ResetShortcuts));

    registry.register("state.save", || Box::new(state::SaveState));
    registry.register("state.restore", || Box::new(state::RestoreState));
}
