//! Versioned document (de)serialization (§4.1).
//!
//! ```text
//! { version: "2.0",
//!   tabs: [ { id, name, tree: node, active_pane_id, metadata } ],
//!   active_tab_id, metadata }
//! node ::= { id, type: "leaf", pane: { id, widget_kind, widget_state, focused, metadata } }
//!        | { id, type: "split", orientation, ratio, first: node, second: node }
//! ```
//!
//! Deserialization never fails outright on a malformed node: the offending
//! subtree is replaced with a `Placeholder` leaf, and if the tree root
//! itself cannot be parsed as an object the whole tab falls back to a
//! single default `Editor` leaf. Either case flips `recovered` so the
//! caller can emit `state_restored` with its recovery flag set.

use serde_json::{json, Map, Value};
use viloxterm_common::{NodeId, PaneId, TabId};

use crate::types::{Orientation, Pane, PaneNode, Tab, WidgetKind};

pub const DOCUMENT_VERSION: &str = "2.0";

pub fn serialize_widget_kind(kind: &WidgetKind) -> Value {
    match kind {
        WidgetKind::Custom(tag) => json!({ "kind": "custom", "tag": tag }),
        other => Value::String(other.label().to_string()),
    }
}

pub fn deserialize_widget_kind(value: &Value) -> WidgetKind {
    match value {
        Value::String(s) => match s.as_str() {
            "terminal" => WidgetKind::Terminal,
            "editor" => WidgetKind::Editor,
            "output" => WidgetKind::Output,
            "settings" => WidgetKind::Settings,
            "fileExplorer" => WidgetKind::FileExplorer,
            "placeholder" => WidgetKind::Placeholder,
            other => WidgetKind::Custom(other.to_string()),
        },
        Value::Object(obj) => obj
            .get("tag")
            .and_then(Value::as_str)
            .map(|tag| WidgetKind::Custom(tag.to_string()))
            .unwrap_or(WidgetKind::Placeholder),
        _ => WidgetKind::Placeholder,
    }
}

pub fn serialize_pane(pane: &Pane) -> Value {
    json!({
        "id": pane.id.as_str(),
        "widget_kind": serialize_widget_kind(&pane.widget_kind),
        "widget_state": Value::Object(pane.widget_state.clone()),
        "focused": pane.focused,
        "metadata": Value::Object(pane.metadata.clone()),
    })
}

fn placeholder_leaf(id: Option<NodeId>) -> PaneNode {
    PaneNode::Leaf {
        id: id.unwrap_or_else(NodeId::new),
        pane: Pane::new(WidgetKind::Placeholder),
    }
}

/// Deserialize one node. Never fails: a malformed node becomes a
/// `Placeholder` leaf, with `*recovered` set to `true`.
pub fn deserialize_node(value: &Value, recovered: &mut bool) -> PaneNode {
    let Some(obj) = value.as_object() else {
        *recovered = true;
        return placeholder_leaf(None);
    };
    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .map(NodeId::from_raw);

    match obj.get("type").and_then(Value::as_str) {
        Some("leaf") => match obj.get("pane").and_then(Value::as_object) {
            Some(pane_obj) => {
                let pane_id = pane_obj
                    .get("id")
                    .and_then(Value::as_str)
                    .map(PaneId::from_raw)
                    .unwrap_or_else(PaneId::new);
                let widget_kind = pane_obj
                    .get("widget_kind")
                    .map(deserialize_widget_kind)
                    .unwrap_or(WidgetKind::Placeholder);
                let widget_state = pane_obj
                    .get("widget_state")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                let focused = pane_obj
                    .get("focused")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let metadata = pane_obj
                    .get("metadata")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                PaneNode::Leaf {
                    id: id.unwrap_or_else(NodeId::new),
                    pane: Pane {
                        id: pane_id,
                        widget_kind,
                        widget_state,
                        focused,
                        metadata,
                    },
                }
            }
            None => {
                *recovered = true;
                placeholder_leaf(id)
            }
        },
        Some("split") => {
            let orientation = match obj.get("orientation").and_then(Value::as_str) {
                Some("horizontal") => Orientation::Horizontal,
                Some("vertical") => Orientation::Vertical,
                _ => {
                    *recovered = true;
                    return placeholder_leaf(id);
                }
            };
            let ratio = obj.get("ratio").and_then(Value::as_f64).unwrap_or(0.5);
            let (Some(first_val), Some(second_val)) = (obj.get("first"), obj.get("second"))
            else {
                *recovered = true;
                return placeholder_leaf(id);
            };
            PaneNode::Split {
                id: id.unwrap_or_else(NodeId::new),
                orientation,
                ratio: ratio.clamp(crate::types::RATIO_MIN, crate::types::RATIO_MAX),
                first: Box::new(deserialize_node(first_val, recovered)),
                second: Box::new(deserialize_node(second_val, recovered)),
            }
        }
        _ => {
            *recovered = true;
            placeholder_leaf(id)
        }
    }
}

pub fn serialize_node(node: &PaneNode) -> Value {
    match node {
        PaneNode::Leaf { id, pane } => json!({
            "id": id.as_str(),
            "type": "leaf",
            "pane": serialize_pane(pane),
        }),
        PaneNode::Split {
            id,
            orientation,
            ratio,
            first,
            second,
        } => json!({
            "id": id.as_str(),
            "type": "split",
            "orientation": match orientation {
                Orientation::Horizontal => "horizontal",
                Orientation::Vertical => "vertical",
            },
            "ratio": ratio,
            "first": serialize_node(first),
            "second": serialize_node(second),
        }),
    }
}

pub fn serialize_tab(tab: &Tab) -> Value {
    json!({
        "id": tab.id.as_str(),
        "name": tab.name,
        "tree": serialize_node(&tab.tree),
        "active_pane_id": tab.active_pane_id.as_ref().map(|id| id.as_str()),
        "metadata": Value::Object(tab.metadata.clone()),
    })
}

/// Deserialize a tab. If the document doesn't even have a usable `tree`
/// field, falls back to a single default `Editor` leaf (the "root itself
/// unrecoverable" case), setting `*recovered`.
pub fn deserialize_tab(value: &Value, recovered: &mut bool) -> Tab {
    let obj = value.as_object().cloned().unwrap_or_default();
    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .map(TabId::from_raw)
        .unwrap_or_else(TabId::new);
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Untitled")
        .to_string();
    let metadata = obj
        .get("metadata")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let tree = match obj.get("tree") {
        Some(tree_val) => deserialize_node(tree_val, recovered),
        None => {
            *recovered = true;
            PaneNode::leaf(Pane::new(WidgetKind::Editor))
        }
    };

    let active_pane_id = obj
        .get("active_pane_id")
        .and_then(Value::as_str)
        .map(PaneId::from_raw)
        .filter(|id| crate::tree::find_path_to_pane(&tree, id).is_some())
        .or_else(|| Some(crate::tree::first_leaf_pane_id(&tree)));

    Tab {
        id,
        name,
        tree,
        active_pane_id,
        metadata,
    }
}

pub fn serialize_document(
    tabs: &[Tab],
    active_tab_id: &Option<TabId>,
    metadata: &Map<String, Value>,
) -> Value {
    json!({
        "version": DOCUMENT_VERSION,
        "tabs": tabs.iter().map(serialize_tab).collect::<Vec<_>>(),
        "active_tab_id": active_tab_id.as_ref().map(|id| id.as_str()),
        "metadata": Value::Object(metadata.clone()),
    })
}

/// Deserialize a full document. Returns the tabs, the active tab ID, the
/// root metadata, and whether any recovery substitution occurred.
pub fn deserialize_document(
    doc: &Value,
) -> (Vec<Tab>, Option<TabId>, Map<String, Value>, bool) {
    let mut recovered = false;
    let obj = doc.as_object().cloned().unwrap_or_default();

    let mut tabs: Vec<Tab> = obj
        .get("tabs")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .map(|t| deserialize_tab(t, &mut recovered))
                .collect()
        })
        .unwrap_or_default();

    if tabs.is_empty() {
        recovered = true;
        tabs.push(Tab::new("Untitled", WidgetKind::Editor));
    }

    let requested_active = obj
        .get("active_tab_id")
        .and_then(Value::as_str)
        .map(TabId::from_raw);
    let active_tab_id = match requested_active {
        Some(id) if tabs.iter().any(|t| t.id == id) => Some(id),
        _ => tabs.first().map(|t| t.id.clone()),
    };

    let metadata = obj
        .get("metadata")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    (tabs, active_tab_id, metadata, recovered)
}
