//! Core data types: panes, the recursive split tree, and tabs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use viloxterm_common::{NodeId, PaneId, TabId};

/// The kind of content a pane holds. Opaque to the model beyond the tag
/// itself — the widget layer is what interprets `widget_state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tag", rename_all = "camelCase")]
pub enum WidgetKind {
    Terminal,
    Editor,
    Output,
    Settings,
    FileExplorer,
    Placeholder,
    Custom(String),
}

impl WidgetKind {
    pub fn label(&self) -> &str {
        match self {
            WidgetKind::Terminal => "terminal",
            WidgetKind::Editor => "editor",
            WidgetKind::Output => "output",
            WidgetKind::Settings => "settings",
            WidgetKind::FileExplorer => "fileExplorer",
            WidgetKind::Placeholder => "placeholder",
            WidgetKind::Custom(tag) => tag,
        }
    }
}

/// A leaf content holder: a widget kind plus opaque state the model never
/// interprets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pane {
    pub id: PaneId,
    pub widget_kind: WidgetKind,
    pub widget_state: Map<String, Value>,
    pub focused: bool,
    pub metadata: Map<String, Value>,
}

impl Pane {
    pub fn new(widget_kind: WidgetKind) -> Self {
        Pane {
            id: PaneId::new(),
            widget_kind,
            widget_state: Map::new(),
            focused: false,
            metadata: Map::new(),
        }
    }
}

/// Orientation of a split: which axis the region divides along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Which child of a split a path step descends into. First is Left
/// (horizontal splits) or Top (vertical splits); Second is Right/Bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

/// Minimum and maximum a split ratio may take; requests outside this range
/// clamp silently rather than failing.
pub const RATIO_MIN: f64 = 0.1;
pub const RATIO_MAX: f64 = 0.9;

pub fn clamp_ratio(ratio: f64) -> f64 {
    ratio.clamp(RATIO_MIN, RATIO_MAX)
}

/// A node in a tab's recursively split pane tree.
#[derive(Debug, Clone)]
pub enum PaneNode {
    Leaf {
        id: NodeId,
        pane: Pane,
    },
    Split {
        id: NodeId,
        orientation: Orientation,
        ratio: f64,
        first: Box<PaneNode>,
        second: Box<PaneNode>,
    },
}

impl PaneNode {
    pub fn leaf(pane: Pane) -> Self {
        PaneNode::Leaf {
            id: NodeId::new(),
            pane,
        }
    }

    pub fn id(&self) -> &NodeId {
        match self {
            PaneNode::Leaf { id, .. } => id,
            PaneNode::Split { id, .. } => id,
        }
    }
}

/// A top-level container: one pane tree, one active pane within it.
#[derive(Debug, Clone)]
pub struct Tab {
    pub id: TabId,
    pub name: String,
    pub tree: PaneNode,
    pub active_pane_id: Option<PaneId>,
    pub metadata: Map<String, Value>,
}

impl Tab {
    pub fn new(name: impl Into<String>, initial_widget_kind: WidgetKind) -> Self {
        let pane = Pane::new(initial_widget_kind);
        let active_pane_id = Some(pane.id.clone());
        Tab {
            id: TabId::new(),
            name: name.into(),
            tree: PaneNode::leaf(pane),
            active_pane_id,
            metadata: Map::new(),
        }
    }
}

/// A mutating operation's structured outcome, per §4.1's no-throw contract.
#[derive(Debug, Clone, Default)]
pub struct MutationResult {
    pub success: bool,
    pub error: Option<String>,
    pub data: Map<String, Value>,
}

impl MutationResult {
    pub fn ok() -> Self {
        MutationResult {
            success: true,
            error: None,
            data: Map::new(),
        }
    }

    pub fn ok_with(data: Map<String, Value>) -> Self {
        MutationResult {
            success: true,
            error: None,
            data,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        MutationResult {
            success: false,
            error: Some(message.into()),
            data: Map::new(),
        }
    }
}
