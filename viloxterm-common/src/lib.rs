//! Shared foundations for the ViloxTerm core: opaque IDs and the common
//! error taxonomy every other crate builds on.

pub mod error;
pub mod id;

pub use error::{CoreError, CoreResult};

define_id!(
    /// Identifies a single pane (a leaf in a tab's split tree).
    PaneId,
    "pane"
);

define_id!(
    /// Identifies a split or leaf node within a tab's pane tree, independent
    /// of the pane it may hold — used to address tree structure directly.
    NodeId,
    "node"
);

define_id!(
    /// Identifies a tab (a top-level pane tree) within a workspace.
    TabId,
    "tab"
);

define_id!(
    /// Identifies a registered keyboard shortcut.
    ShortcutId,
    "sc"
);

define_id!(
    /// Identifies a live terminal session owned by a pane.
    SessionId,
    "sess"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_kinds_are_distinct_types() {
        let pane = PaneId::new();
        let tab = TabId::new();
        assert_ne!(pane.as_str(), tab.as_str());
    }
}
