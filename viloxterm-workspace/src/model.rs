//! `WorkspaceModel`: sole authority for workspace state (§4.1).

use serde_json::{json, Map, Value};
use viloxterm_common::{PaneId, TabId};

use crate::navigation::{self, Direction};
use crate::observer::{ObserverCallback, ObserverRegistry, ObserverToken};
use crate::serialization;
use crate::tree;
use crate::types::{MutationResult, Orientation, Pane, PaneNode, Tab, WidgetKind};

pub struct WorkspaceModel {
    tabs: Vec<Tab>,
    active_tab_id: Option<TabId>,
    metadata: Map<String, Value>,
    observers: ObserverRegistry,
}

impl Default for WorkspaceModel {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceModel {
    /// A fresh workspace always has one tab (invariant 1: `count(tabs) >= 1`).
    pub fn new() -> Self {
        let tab = Tab::new("Untitled", WidgetKind::Editor);
        let active_tab_id = Some(tab.id.clone());
        WorkspaceModel {
            tabs: vec![tab],
            active_tab_id,
            metadata: Map::new(),
            observers: ObserverRegistry::new(),
        }
    }

    pub fn register_observer(&mut self, callback: ObserverCallback) -> ObserverToken {
        self.observers.register(callback)
    }

    pub fn unregister_observer(&mut self, token: ObserverToken) -> bool {
        self.observers.unregister(token)
    }

    fn notify(&self, event_kind: &str, payload: Value) {
        self.observers.notify(event_kind, &payload);
    }

    // -- Tab operations ----------------------------------------------------

    pub fn create_tab(&mut self, name: &str, initial_widget_kind: WidgetKind) -> TabId {
        let tab = Tab::new(name, initial_widget_kind);
        let tab_id = tab.id.clone();
        self.tabs.push(tab);
        self.active_tab_id = Some(tab_id.clone());
        self.notify(
            "tab_created",
            json!({ "tab_id": tab_id.as_str(), "name": name }),
        );
        self.notify("active_tab_changed", json!({ "tab_id": tab_id.as_str() }));
        tab_id
    }

    pub fn close_tab(&mut self, tab_id: &TabId) -> MutationResult {
        if self.tabs.len() <= 1 {
            return MutationResult::fail("Cannot close last tab");
        }
        let Some(pos) = self.tabs.iter().position(|t| &t.id == tab_id) else {
            return MutationResult::fail("unknown tab id");
        };
        self.tabs.remove(pos);

        let was_active = self.active_tab_id.as_ref() == Some(tab_id);
        if was_active {
            let new_active = self.tabs.first().map(|t| t.id.clone());
            self.active_tab_id = new_active.clone();
            if let Some(new_active) = new_active {
                self.notify(
                    "active_tab_changed",
                    json!({ "tab_id": new_active.as_str() }),
                );
            }
        }

        self.notify("tab_closed", json!({ "tab_id": tab_id.as_str() }));
        MutationResult::ok()
    }

    pub fn rename_tab(&mut self, tab_id: &TabId, new_name: &str) -> MutationResult {
        let Some(tab) = self.tabs.iter_mut().find(|t| &t.id == tab_id) else {
            return MutationResult::fail("unknown tab id");
        };
        tab.name = new_name.to_string();
        self.notify(
            "tab_renamed",
            json!({ "tab_id": tab_id.as_str(), "name": new_name }),
        );
        MutationResult::ok()
    }

    pub fn duplicate_tab(&mut self, tab_id: &TabId) -> Result<TabId, MutationResult> {
        let Some(pos) = self.tabs.iter().position(|t| &t.id == tab_id) else {
            return Err(MutationResult::fail("unknown tab id"));
        };
        let original = &self.tabs[pos];
        let new_tree = tree::duplicate_with_new_ids(&original.tree);
        let new_active_pane_id = Some(tree::first_leaf_pane_id(&new_tree));
        let new_tab = Tab {
            id: TabId::new(),
            name: format!("{} (Copy)", original.name),
            tree: new_tree,
            active_pane_id: new_active_pane_id,
            metadata: original.metadata.clone(),
        };
        let new_tab_id = new_tab.id.clone();
        self.tabs.insert(pos + 1, new_tab);
        self.notify(
            "tab_duplicated",
            json!({ "original_tab_id": tab_id.as_str(), "new_tab_id": new_tab_id.as_str() }),
        );
        Ok(new_tab_id)
    }

    /// Close every tab positioned after `tab_id` (left-to-right tab order).
    /// A no-op, successfully, if `tab_id` is already the rightmost tab.
    pub fn close_tabs_to_right(&mut self, tab_id: &TabId) -> MutationResult {
        let Some(pos) = self.tabs.iter().position(|t| &t.id == tab_id) else {
            return MutationResult::fail("unknown tab id");
        };
        let victims: Vec<TabId> = self.tabs[pos + 1..].iter().map(|t| t.id.clone()).collect();
        let mut closed_count = 0u64;
        for victim in &victims {
            if self.close_tab(victim).success {
                closed_count += 1;
            }
        }
        let mut data = Map::new();
        data.insert("closed_count".into(), json!(closed_count));
        self.notify(
            "tabs_closed_to_right",
            json!({ "tab_id": tab_id.as_str(), "closed_count": closed_count }),
        );
        MutationResult::ok_with(data)
    }

    /// Close every tab except `tab_id`, leaving it as the sole, active tab.
    pub fn close_other_tabs(&mut self, tab_id: &TabId) -> MutationResult {
        if !self.tabs.iter().any(|t| &t.id == tab_id) {
            return MutationResult::fail("unknown tab id");
        }
        let victims: Vec<TabId> = self
            .tabs
            .iter()
            .filter(|t| &t.id != tab_id)
            .map(|t| t.id.clone())
            .collect();
        let mut closed_count = 0u64;
        for victim in &victims {
            if self.close_tab(victim).success {
                closed_count += 1;
            }
        }
        let mut data = Map::new();
        data.insert("closed_count".into(), json!(closed_count));
        self.notify(
            "other_tabs_closed",
            json!({ "tab_id": tab_id.as_str(), "closed_count": closed_count }),
        );
        MutationResult::ok_with(data)
    }

    pub fn set_active_tab(&mut self, tab_id: &TabId) -> MutationResult {
        if !self.tabs.iter().any(|t| &t.id == tab_id) {
            return MutationResult::fail("unknown tab id");
        }
        self.active_tab_id = Some(tab_id.clone());
        self.notify("active_tab_changed", json!({ "tab_id": tab_id.as_str() }));
        MutationResult::ok()
    }

    // -- Pane operations (scoped to active tab) -----------------------------

    fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        let id = self.active_tab_id.clone()?;
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn split_pane(&mut self, pane_id: &PaneId, orientation: Orientation) -> Result<PaneId, MutationResult> {
        let Some(tab) = self.active_tab_mut() else {
            return Err(MutationResult::fail("no active tab"));
        };
        let Some(path) = tree::find_path_to_pane(&tab.tree, pane_id) else {
            return Err(MutationResult::fail("unknown pane id"));
        };
        let tree_owned = std::mem::replace(
            &mut tab.tree,
            PaneNode::leaf(Pane::new(WidgetKind::Placeholder)),
        );
        let (new_tree, new_pane_id) = tree::split_at(tree_owned, &path, orientation);
        tab.tree = new_tree;
        tab.active_pane_id = Some(new_pane_id.clone());
        let tab_id = tab.id.clone();

        self.notify(
            "pane_split",
            json!({
                "tab_id": tab_id.as_str(),
                "source_pane_id": pane_id.as_str(),
                "new_pane_id": new_pane_id.as_str(),
            }),
        );
        Ok(new_pane_id)
    }

    pub fn close_pane(&mut self, pane_id: &PaneId) -> MutationResult {
        let Some(tab) = self.active_tab_mut() else {
            return MutationResult::fail("no active tab");
        };
        let Some(path) = tree::find_path_to_pane(&tab.tree, pane_id) else {
            return MutationResult::fail("unknown pane id");
        };
        if path.is_empty() {
            return MutationResult::fail("Cannot close last pane in tab");
        }

        let tree_owned = std::mem::replace(
            &mut tab.tree,
            PaneNode::leaf(Pane::new(WidgetKind::Placeholder)),
        );
        let new_tree = tree::close_at(tree_owned, &path);

        let was_active = tab.active_pane_id.as_ref() == Some(pane_id);
        // Deterministic successor: first leaf of the promoted subtree, i.e.
        // first leaf of the new tree reached by the parent path.
        let parent_path = &path[..path.len() - 1];
        let successor = tree::first_leaf_pane_id(tree::node_at_path(&new_tree, parent_path));

        tab.tree = new_tree;
        if was_active {
            tab.active_pane_id = Some(successor.clone());
        }
        let tab_id = tab.id.clone();

        self.notify(
            "pane_closed",
            json!({ "tab_id": tab_id.as_str(), "pane_id": pane_id.as_str() }),
        );
        if was_active {
            self.notify(
                "pane_focused",
                json!({ "tab_id": tab_id.as_str(), "pane_id": successor.as_str() }),
            );
        }
        MutationResult::ok()
    }

    pub fn focus_pane(&mut self, pane_id: &PaneId) -> MutationResult {
        let Some(tab) = self.active_tab_mut() else {
            return MutationResult::fail("no active tab");
        };
        let Some(path) = tree::find_path_to_pane(&tab.tree, pane_id) else {
            return MutationResult::fail("unknown pane id");
        };
        clear_focus(&mut tab.tree);
        if let PaneNode::Leaf { pane, .. } = tree::node_at_path_mut(&mut tab.tree, &path) {
            pane.focused = true;
        }
        tab.active_pane_id = Some(pane_id.clone());
        let tab_id = tab.id.clone();
        self.notify(
            "pane_focused",
            json!({ "tab_id": tab_id.as_str(), "pane_id": pane_id.as_str() }),
        );
        MutationResult::ok()
    }

    pub fn change_pane_widget(&mut self, pane_id: &PaneId, new_kind: WidgetKind) -> MutationResult {
        let Some(tab) = self.active_tab_mut() else {
            return MutationResult::fail("no active tab");
        };
        let Some(path) = tree::find_path_to_pane(&tab.tree, pane_id) else {
            return MutationResult::fail("unknown pane id");
        };
        tree::change_widget_at(&mut tab.tree, &path, new_kind.clone());
        let tab_id = tab.id.clone();
        self.notify(
            "pane_widget_changed",
            json!({ "tab_id": tab_id.as_str(), "pane_id": pane_id.as_str(), "widget_kind": new_kind.label() }),
        );
        MutationResult::ok()
    }

    pub fn update_widget_state(
        &mut self,
        pane_id: &PaneId,
        updates: Map<String, Value>,
        merge: bool,
    ) -> MutationResult {
        let Some(tab) = self.active_tab_mut() else {
            return MutationResult::fail("no active tab");
        };
        let Some(path) = tree::find_path_to_pane(&tab.tree, pane_id) else {
            return MutationResult::fail("unknown pane id");
        };
        tree::update_widget_state_at(&mut tab.tree, &path, updates, merge);
        let tab_id = tab.id.clone();
        self.notify(
            "widget_state_updated",
            json!({ "tab_id": tab_id.as_str(), "pane_id": pane_id.as_str() }),
        );
        MutationResult::ok()
    }

    pub fn set_split_ratio(&mut self, pane_id: &PaneId, ratio: f64) -> MutationResult {
        let Some(tab) = self.active_tab_mut() else {
            return MutationResult::fail("no active tab");
        };
        let Some(path) = tree::find_path_to_pane(&tab.tree, pane_id) else {
            return MutationResult::fail("unknown pane id");
        };
        if path.is_empty() {
            return MutationResult::fail("pane has no parent split");
        }
        let parent_path = &path[..path.len() - 1];
        tree::set_ratio_at(&mut tab.tree, parent_path, ratio);
        MutationResult::ok()
    }

    // -- Queries -------------------------------------------------------------

    pub fn get_active_tab(&self) -> Option<&Tab> {
        let id = self.active_tab_id.as_ref()?;
        self.tabs.iter().find(|t| &t.id == id)
    }

    pub fn get_active_pane(&self) -> Option<&Pane> {
        let tab = self.get_active_tab()?;
        let pane_id = tab.active_pane_id.as_ref()?;
        find_pane(&tab.tree, pane_id)
    }

    pub fn get_pane(&self, pane_id: &PaneId) -> Option<&Pane> {
        self.tabs.iter().find_map(|t| find_pane(&t.tree, pane_id))
    }

    pub fn get_all_panes_in_active_tab(&self) -> Vec<&Pane> {
        let Some(tab) = self.get_active_tab() else {
            return Vec::new();
        };
        collect_panes(&tab.tree)
    }

    pub fn get_tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_tab_id(&self) -> Option<&TabId> {
        self.active_tab_id.as_ref()
    }

    pub fn compute_pane_bounds(&self, pane_id: &PaneId) -> Option<(f64, f64, f64, f64)> {
        let tab = self.get_active_tab()?;
        let path = tree::find_path_to_pane(&tab.tree, pane_id)?;
        Some(tree::bounds_at_path(&tab.tree, &path))
    }

    pub fn find_pane_in_direction(&self, from_pane_id: &PaneId, direction: Direction) -> Option<PaneId> {
        let tab = self.get_active_tab()?;
        navigation::find_pane_in_direction(&tab.tree, from_pane_id, direction)
    }

    pub fn pane_reading_index(&self, pane_id: &PaneId) -> Option<usize> {
        let tab = self.get_active_tab()?;
        navigation::pane_reading_index(&tab.tree, pane_id)
    }

    // -- Serialization ---------------------------------------------------

    pub fn serialize(&self) -> Value {
        serialization::serialize_document(&self.tabs, &self.active_tab_id, &self.metadata)
    }

    pub fn deserialize(doc: &Value) -> (Self, bool) {
        let (tabs, active_tab_id, metadata, recovered) = serialization::deserialize_document(doc);
        let model = WorkspaceModel {
            tabs,
            active_tab_id,
            metadata,
            observers: ObserverRegistry::new(),
        };
        (model, recovered)
    }

    /// Replace in-place state from a document, firing `state_restored`.
    pub fn restore(&mut self, doc: &Value) {
        let (tabs, active_tab_id, metadata, recovered) = serialization::deserialize_document(doc);
        self.tabs = tabs;
        self.active_tab_id = active_tab_id;
        self.metadata = metadata;
        self.notify("state_restored", json!({ "recovered": recovered }));
    }
}

fn clear_focus(node: &mut PaneNode) {
    match node {
        PaneNode::Leaf { pane, .. } => pane.focused = false,
        PaneNode::Split { first, second, .. } => {
            clear_focus(first);
            clear_focus(second);
        }
    }
}

fn find_pane<'a>(node: &'a PaneNode, pane_id: &PaneId) -> Option<&'a Pane> {
    match node {
        PaneNode::Leaf { pane, .. } if &pane.id == pane_id => Some(pane),
        PaneNode::Leaf { .. } => None,
        PaneNode::Split { first, second, .. } => {
            find_pane(first, pane_id).or_else(|| find_pane(second, pane_id))
        }
    }
}

fn collect_panes(node: &PaneNode) -> Vec<&Pane> {
    match node {
        PaneNode::Leaf { pane, .. } => vec![pane],
        PaneNode::Split { first, second, .. } => {
            let mut panes = collect_panes(first);
            panes.extend(collect_panes(second));
            panes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_count_tabs_at_least_one() {
        let model = WorkspaceModel::new();
        assert_eq!(model.get_tabs().len(), 1);
    }

    #[test]
    fn closing_last_tab_is_rejected() {
        let mut model = WorkspaceModel::new();
        let only_tab = model.get_tabs()[0].id.clone();
        let result = model.close_tab(&only_tab);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Cannot close last tab"));
    }

    #[test]
    fn close_tabs_to_right_leaves_the_anchor_and_everything_before_it() {
        let mut model = WorkspaceModel::new();
        let t0 = model.get_tabs()[0].id.clone();
        let t1 = model.create_tab("two", WidgetKind::Editor);
        let _t2 = model.create_tab("three", WidgetKind::Editor);
        let _t3 = model.create_tab("four", WidgetKind::Editor);

        let result = model.close_tabs_to_right(&t1);
        assert!(result.success);
        assert_eq!(result.data.get("closed_count").and_then(|v| v.as_u64()), Some(2));

        let remaining: Vec<_> = model.get_tabs().iter().map(|t| t.id.clone()).collect();
        assert_eq!(remaining, vec![t0, t1]);
    }

    #[test]
    fn close_tabs_to_right_of_the_last_tab_is_a_no_op() {
        let mut model = WorkspaceModel::new();
        let only = model.get_tabs()[0].id.clone();
        let result = model.close_tabs_to_right(&only);
        assert!(result.success);
        assert_eq!(result.data.get("closed_count").and_then(|v| v.as_u64()), Some(0));
        assert_eq!(model.get_tabs().len(), 1);
    }

    #[test]
    fn close_other_tabs_leaves_only_the_target_active() {
        let mut model = WorkspaceModel::new();
        let _t0 = model.get_tabs()[0].id.clone();
        let t1 = model.create_tab("two", WidgetKind::Editor);
        let _t2 = model.create_tab("three", WidgetKind::Editor);

        let result = model.close_other_tabs(&t1);
        assert!(result.success);
        assert_eq!(result.data.get("closed_count").and_then(|v| v.as_u64()), Some(2));
        assert_eq!(model.get_tabs().len(), 1);
        assert_eq!(model.get_tabs()[0].id, t1);
        assert_eq!(model.active_tab_id(), Some(&t1));
    }

    #[test]
    fn closing_last_pane_in_tab_is_rejected() {
        let mut model = WorkspaceModel::new();
        let pane_id = model.get_active_pane().unwrap().id.clone();
        let result = model.close_pane(&pane_id);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Cannot close last pane in tab"));
    }

    #[test]
    fn scenario_a_split_navigate_close() {
        let mut model = WorkspaceModel::new();
        let l0 = model.get_active_pane().unwrap().id.clone();

        let l1 = model.split_pane(&l0, Orientation::Horizontal).unwrap();
        let l2 = model.split_pane(&l1, Orientation::Vertical).unwrap();

        let up = model.find_pane_in_direction(&l2, Direction::Up).unwrap();
        assert_eq!(up, l1);
        let left = model.find_pane_in_direction(&l1, Direction::Left).unwrap();
        assert_eq!(left, l0);

        model.close_pane(&l0);

        let tab = model.get_active_tab().unwrap();
        assert_eq!(tree::leaf_count(&tab.tree), 2);
        assert_eq!(tab.active_pane_id, Some(l1.clone()));

        let b1 = model.compute_pane_bounds(&l1).unwrap();
        let b2 = model.compute_pane_bounds(&l2).unwrap();
        assert_eq!(b1, (0.0, 0.0, 1.0, 0.5));
        assert_eq!(b2, (0.0, 0.5, 1.0, 1.0));
    }

    #[test]
    fn scenario_b_duplicate_tab_is_independent() {
        let mut model = WorkspaceModel::new();
        let original_tab_id = model.get_tabs()[0].id.clone();
        let l0 = model.get_active_pane().unwrap().id.clone();
        model.split_pane(&l0, Orientation::Horizontal).unwrap();

        let new_tab_id = model.duplicate_tab(&original_tab_id).unwrap();

        model.update_widget_state(
            &l0,
            serde_json::json!({ "content": "abc" }).as_object().unwrap().clone(),
            true,
        );

        let duplicate_tab = model.get_tabs().iter().find(|t| t.id == new_tab_id).unwrap();
        let duplicate_first_pane = tree::first_leaf_pane_id(&duplicate_tab.tree);
        let duplicate_pane = model.get_pane(&duplicate_first_pane).unwrap();
        assert!(duplicate_pane.widget_state.get("content").is_none());

        let duplicate_ids: Vec<_> = tree::reading_order_leaves(&duplicate_tab.tree);
        let original_tab = model.get_tabs().iter().find(|t| t.id == original_tab_id).unwrap();
        let original_ids: Vec<_> = tree::reading_order_leaves(&original_tab.tree);
        assert_ne!(duplicate_ids, original_ids);
    }
}
