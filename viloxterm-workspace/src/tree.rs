//! Recursive operations over a tab's pane tree.
//!
//! Grounded on the path-based tree transforms in
//! `aeschylus-bisque-computer`'s `pane_tree.rs` (`transform_split`,
//! `transform_close`, `node_at_path`, `rect_at_path`), generalized from a
//! single in-memory focus path to ID-addressed lookup (any operation here
//! starts by resolving a `PaneId`/`NodeId` to a path, since callers address
//! panes by their stable ID rather than a cursor the caller must track).

use serde_json::{Map, Value};
use viloxterm_common::{NodeId, PaneId};

use crate::types::{clamp_ratio, Orientation, Pane, PaneNode, Side, WidgetKind};

pub type Path = Vec<Side>;

/// Find the path from `node` down to the leaf holding `pane_id`.
pub fn find_path_to_pane(node: &PaneNode, pane_id: &PaneId) -> Option<Path> {
    match node {
        PaneNode::Leaf { pane, .. } => {
            if &pane.id == pane_id {
                Some(Vec::new())
            } else {
                None
            }
        }
        PaneNode::Split { first, second, .. } => {
            if let Some(mut path) = find_path_to_pane(first, pane_id) {
                path.insert(0, Side::First);
                return Some(path);
            }
            if let Some(mut path) = find_path_to_pane(second, pane_id) {
                path.insert(0, Side::Second);
                return Some(path);
            }
            None
        }
    }
}

/// Find the path from `node` down to the node (leaf or split) with `node_id`.
pub fn find_path_to_node(node: &PaneNode, node_id: &NodeId) -> Option<Path> {
    if node.id() == node_id {
        return Some(Vec::new());
    }
    if let PaneNode::Split { first, second, .. } = node {
        if let Some(mut path) = find_path_to_node(first, node_id) {
            path.insert(0, Side::First);
            return Some(path);
        }
        if let Some(mut path) = find_path_to_node(second, node_id) {
            path.insert(0, Side::Second);
            return Some(path);
        }
    }
    None
}

pub fn node_at_path<'a>(root: &'a PaneNode, path: &[Side]) -> &'a PaneNode {
    let mut current = root;
    for step in path {
        current = match current {
            PaneNode::Split { first, second, .. } => match step {
                Side::First => first,
                Side::Second => second,
            },
            PaneNode::Leaf { .. } => return current,
        };
    }
    current
}

pub fn node_at_path_mut<'a>(root: &'a mut PaneNode, path: &[Side]) -> &'a mut PaneNode {
    let mut current = root;
    for step in path {
        current = match current {
            PaneNode::Split { first, second, .. } => match step {
                Side::First => first.as_mut(),
                Side::Second => second.as_mut(),
            },
            PaneNode::Leaf { .. } => return current,
        };
    }
    current
}

/// Replace the leaf at `path` with a Split whose `first` is the original
/// leaf and whose `second` is a new leaf of the same widget kind. Returns
/// the new tree and the new pane's ID.
pub fn split_at(node: PaneNode, path: &[Side], orientation: Orientation) -> (PaneNode, PaneId) {
    if path.is_empty() {
        let PaneNode::Leaf { pane, .. } = node else {
            unreachable!("split path must resolve to a leaf");
        };
        let new_pane = Pane::new(pane.widget_kind.clone());
        let new_pane_id = new_pane.id.clone();
        let new_tree = PaneNode::Split {
            id: NodeId::new(),
            orientation,
            ratio: 0.5,
            first: Box::new(PaneNode::Leaf {
                id: NodeId::new(),
                pane,
            }),
            second: Box::new(PaneNode::leaf(new_pane)),
        };
        return (new_tree, new_pane_id);
    }

    match node {
        PaneNode::Split {
            id,
            orientation: o,
            ratio,
            first,
            second,
        } => match path[0] {
            Side::First => {
                let (new_first, new_id) = split_at(*first, &path[1..], orientation);
                (
                    PaneNode::Split {
                        id,
                        orientation: o,
                        ratio,
                        first: Box::new(new_first),
                        second,
                    },
                    new_id,
                )
            }
            Side::Second => {
                let (new_second, new_id) = split_at(*second, &path[1..], orientation);
                (
                    PaneNode::Split {
                        id,
                        orientation: o,
                        ratio,
                        first,
                        second: Box::new(new_second),
                    },
                    new_id,
                )
            }
        },
        leaf @ PaneNode::Leaf { .. } => (leaf, PaneId::new()), // unreachable: path invalid
    }
}

/// Remove the leaf at `path`, promoting its sibling into the parent split's
/// position. `path` must be non-empty (the root leaf cannot be closed this
/// way — callers must reject that case before calling).
pub fn close_at(node: PaneNode, path: &[Side]) -> PaneNode {
    if path.len() == 1 {
        return match node {
            PaneNode::Split { first, second, .. } => match path[0] {
                Side::First => *second,
                Side::Second => *first,
            },
            other => other,
        };
    }

    match node {
        PaneNode::Split {
            id,
            orientation,
            ratio,
            first,
            second,
        } => match path[0] {
            Side::First => PaneNode::Split {
                id,
                orientation,
                ratio,
                first: Box::new(close_at(*first, &path[1..])),
                second,
            },
            Side::Second => PaneNode::Split {
                id,
                orientation,
                ratio,
                first,
                second: Box::new(close_at(*second, &path[1..])),
            },
        },
        other => other,
    }
}

/// Set a split's ratio, clamped to `[0.1, 0.9]`.
pub fn set_ratio_at(node: &mut PaneNode, path: &[Side], ratio: f64) {
    let target = node_at_path_mut(node, path);
    if let PaneNode::Split { ratio: r, .. } = target {
        *r = clamp_ratio(ratio);
    }
}

/// Normalized rectangle `(x1, y1, x2, y2)` of the node at `path`, computed
/// by recursive descent from `(0,0,1,1)`.
pub fn bounds_at_path(root: &PaneNode, path: &[Side]) -> (f64, f64, f64, f64) {
    bounds_at_path_within(root, path, (0.0, 0.0, 1.0, 1.0))
}

fn bounds_at_path_within(
    node: &PaneNode,
    path: &[Side],
    region: (f64, f64, f64, f64),
) -> (f64, f64, f64, f64) {
    if path.is_empty() {
        return region;
    }
    let PaneNode::Split {
        orientation,
        ratio,
        first,
        second,
        ..
    } = node
    else {
        return region;
    };
    let (x1, y1, x2, y2) = region;
    let (first_region, second_region) = match orientation {
        Orientation::Horizontal => {
            let split_x = x1 + (x2 - x1) * ratio;
            ((x1, y1, split_x, y2), (split_x, y1, x2, y2))
        }
        Orientation::Vertical => {
            let split_y = y1 + (y2 - y1) * ratio;
            ((x1, y1, x2, split_y), (x1, split_y, x2, y2))
        }
    };
    match path[0] {
        Side::First => bounds_at_path_within(first, &path[1..], first_region),
        Side::Second => bounds_at_path_within(second, &path[1..], second_region),
    }
}

/// Collect every leaf's `(PaneId, bounds)` in the tab, in reading order
/// (first precedes second).
pub fn collect_leaf_bounds(root: &PaneNode) -> Vec<(PaneId, (f64, f64, f64, f64))> {
    let mut out = Vec::new();
    collect_leaf_bounds_within(root, (0.0, 0.0, 1.0, 1.0), &mut out);
    out
}

fn collect_leaf_bounds_within(
    node: &PaneNode,
    region: (f64, f64, f64, f64),
    out: &mut Vec<(PaneId, (f64, f64, f64, f64))>,
) {
    match node {
        PaneNode::Leaf { pane, .. } => out.push((pane.id.clone(), region)),
        PaneNode::Split {
            orientation,
            ratio,
            first,
            second,
            ..
        } => {
            let (x1, y1, x2, y2) = region;
            let (first_region, second_region) = match orientation {
                Orientation::Horizontal => {
                    let split_x = x1 + (x2 - x1) * ratio;
                    ((x1, y1, split_x, y2), (split_x, y1, x2, y2))
                }
                Orientation::Vertical => {
                    let split_y = y1 + (y2 - y1) * ratio;
                    ((x1, y1, x2, split_y), (x1, split_y, x2, y2))
                }
            };
            collect_leaf_bounds_within(first, first_region, out);
            collect_leaf_bounds_within(second, second_region, out);
        }
    }
}

/// Reading-order list of leaf pane IDs (first precedes second).
pub fn reading_order_leaves(root: &PaneNode) -> Vec<PaneId> {
    let mut out = Vec::new();
    collect_reading_order(root, &mut out);
    out
}

fn collect_reading_order(node: &PaneNode, out: &mut Vec<PaneId>) {
    match node {
        PaneNode::Leaf { pane, .. } => out.push(pane.id.clone()),
        PaneNode::Split { first, second, .. } => {
            collect_reading_order(first, out);
            collect_reading_order(second, out);
        }
    }
}

/// First leaf in reading order under `node`.
pub fn first_leaf_pane_id(node: &PaneNode) -> PaneId {
    match node {
        PaneNode::Leaf { pane, .. } => pane.id.clone(),
        PaneNode::Split { first, .. } => first_leaf_pane_id(first),
    }
}

pub fn leaf_count(node: &PaneNode) -> usize {
    match node {
        PaneNode::Leaf { .. } => 1,
        PaneNode::Split { first, second, .. } => leaf_count(first) + leaf_count(second),
    }
}

/// Deep-copy a tree, assigning fresh IDs to every node and pane while
/// preserving `widget_state` by value.
pub fn duplicate_with_new_ids(node: &PaneNode) -> PaneNode {
    match node {
        PaneNode::Leaf { pane, .. } => PaneNode::Leaf {
            id: NodeId::new(),
            pane: Pane {
                id: PaneId::new(),
                widget_kind: pane.widget_kind.clone(),
                widget_state: pane.widget_state.clone(),
                focused: pane.focused,
                metadata: pane.metadata.clone(),
            },
        },
        PaneNode::Split {
            orientation,
            ratio,
            first,
            second,
            ..
        } => PaneNode::Split {
            id: NodeId::new(),
            orientation: *orientation,
            ratio: *ratio,
            first: Box::new(duplicate_with_new_ids(first)),
            second: Box::new(duplicate_with_new_ids(second)),
        },
    }
}

/// Discard a leaf's widget_state and set a new widget kind, preserving the
/// pane's ID.
pub fn change_widget_at(node: &mut PaneNode, path: &[Side], new_kind: WidgetKind) -> bool {
    let target = node_at_path_mut(node, path);
    if let PaneNode::Leaf { pane, .. } = target {
        pane.widget_kind = new_kind;
        pane.widget_state = Map::new();
        true
    } else {
        false
    }
}

/// Merge or replace a leaf's widget_state.
pub fn update_widget_state_at(
    node: &mut PaneNode,
    path: &[Side],
    updates: Map<String, Value>,
    merge: bool,
) -> bool {
    let target = node_at_path_mut(node, path);
    let PaneNode::Leaf { pane, .. } = target else {
        return false;
    };
    if merge {
        for (key, value) in updates {
            pane.widget_state.insert(key, value);
        }
    } else {
        pane.widget_state = updates;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WidgetKind;

    fn leaf(kind: WidgetKind) -> PaneNode {
        PaneNode::leaf(Pane::new(kind))
    }

    #[test]
    fn split_then_close_restores_original_leaf_id() {
        let original = leaf(WidgetKind::Editor);
        let original_id = match &original {
            PaneNode::Leaf { pane, .. } => pane.id.clone(),
            _ => unreachable!(),
        };
        let (split, _new_pane_id) = split_at(original, &[], Orientation::Horizontal);
        let path_to_first = vec![Side::First];
        let closed = close_at(split, &[Side::Second]);
        // closing the second child promotes first back to root
        let PaneNode::Leaf { pane, .. } = closed else {
            panic!("expected leaf after close")
        };
        assert_eq!(pane.id, original_id);
        let _ = path_to_first;
    }

    #[test]
    fn bounds_partition_unit_square_after_two_splits() {
        let root = leaf(WidgetKind::Editor);
        let root_id = match &root {
            PaneNode::Leaf { pane, .. } => pane.id.clone(),
            _ => unreachable!(),
        };
        let (root, l1_id) = split_at(root, &[], Orientation::Horizontal);
        let path_l1 = find_path_to_pane(&root, &l1_id).unwrap();
        let (root, l2_id) = split_at(root, &path_l1, Orientation::Vertical);

        let path_l0 = find_path_to_pane(&root, &root_id).unwrap();
        let path_l1 = find_path_to_pane(&root, &l1_id).unwrap();
        let path_l2 = find_path_to_pane(&root, &l2_id).unwrap();

        let b0 = bounds_at_path(&root, &path_l0);
        let b1 = bounds_at_path(&root, &path_l1);
        let b2 = bounds_at_path(&root, &path_l2);

        assert_eq!(b0, (0.0, 0.0, 0.5, 1.0));
        assert_eq!(b1, (0.5, 0.0, 1.0, 0.5));
        assert_eq!(b2, (0.5, 0.5, 1.0, 1.0));
    }
}
