//! Spatial pane navigation and reading-order indexing (§4.1).

use viloxterm_common::PaneId;

use crate::tree::{collect_leaf_bounds, reading_order_leaves};
use crate::types::PaneNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

type Bounds = (f64, f64, f64, f64);

fn center(bounds: Bounds) -> (f64, f64) {
    let (x1, y1, x2, y2) = bounds;
    ((x1 + x2) / 2.0, (y1 + y2) / 2.0)
}

fn overlap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
    (a_max.min(b_max) - a_min.max(b_min)).max(0.0)
}

/// Find the best pane to navigate to from `from_pane_id` in `direction`,
/// scoring candidates by `(-perpendicular_overlap, distance_along_direction)`
/// ascending, tie-broken by the candidate's extreme position on the
/// direction axis.
pub fn find_pane_in_direction(
    root: &PaneNode,
    from_pane_id: &PaneId,
    direction: Direction,
) -> Option<PaneId> {
    let leaves = collect_leaf_bounds(root);
    let (_, source_bounds) = leaves.iter().find(|(id, _)| id == from_pane_id)?;
    let (cx, cy) = center(*source_bounds);

    let mut candidates: Vec<(PaneId, f64, f64, f64)> = Vec::new(); // (id, neg_overlap, distance, secondary_axis_value)
    for (id, bounds) in &leaves {
        if id == from_pane_id {
            continue;
        }
        let (x1, y1, x2, y2) = *bounds;
        let (ccx, ccy) = center(*bounds);

        let (on_side, perp_overlap, distance, secondary) = match direction {
            Direction::Right => (
                ccx > cx,
                overlap(source_bounds.1, source_bounds.3, y1, y2),
                ccx - cx,
                x1,
            ),
            Direction::Left => (
                ccx < cx,
                overlap(source_bounds.1, source_bounds.3, y1, y2),
                cx - ccx,
                -x2,
            ),
            Direction::Down => (
                ccy > cy,
                overlap(source_bounds.0, source_bounds.2, x1, x2),
                ccy - cy,
                y1,
            ),
            Direction::Up => (
                ccy < cy,
                overlap(source_bounds.0, source_bounds.2, x1, x2),
                cy - ccy,
                -y2,
            ),
        };

        if !on_side {
            continue;
        }
        candidates.push((id.clone(), -perp_overlap, distance, secondary));
    }

    candidates.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap()
            .then(a.2.partial_cmp(&b.2).unwrap())
            .then(a.3.partial_cmp(&b.3).unwrap())
    });

    candidates.into_iter().next().map(|(id, ..)| id)
}

/// 1-based position of `pane_id` in reading order, capped at 9 (`None`
/// beyond that, or if the pane isn't found).
pub fn pane_reading_index(root: &PaneNode, pane_id: &PaneId) -> Option<usize> {
    let order = reading_order_leaves(root);
    let index = order.iter().position(|id| id == pane_id)? + 1;
    if index > 9 {
        None
    } else {
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{find_path_to_pane, split_at};
    use crate::types::{Orientation, Pane, WidgetKind};

    #[test]
    fn scenario_a_navigate_up_then_left() {
        let l0_pane = Pane::new(WidgetKind::Editor);
        let l0_id = l0_pane.id.clone();
        let root = PaneNode::leaf(l0_pane);

        let (root, l1_id) = split_at(root, &[], Orientation::Horizontal);
        let path_l1 = find_path_to_pane(&root, &l1_id).unwrap();
        let (root, l2_id) = split_at(root, &path_l1, Orientation::Vertical);

        // from L2, navigate up -> L1
        let up = find_pane_in_direction(&root, &l2_id, Direction::Up).unwrap();
        assert_eq!(up, l1_id);

        // from L1, navigate left -> L0
        let left = find_pane_in_direction(&root, &l1_id, Direction::Left).unwrap();
        assert_eq!(left, l0_id);
    }

    #[test]
    fn reading_index_caps_at_nine() {
        let mut root = PaneNode::leaf(Pane::new(WidgetKind::Editor));
        let mut last_id = match &root {
            PaneNode::Leaf { pane, .. } => pane.id.clone(),
            _ => unreachable!(),
        };
        for _ in 0..10 {
            let path = find_path_to_pane(&root, &last_id).unwrap();
            let (new_root, new_id) = split_at(root, &path, Orientation::Horizontal);
            root = new_root;
            last_id = new_id;
        }
        assert_eq!(pane_reading_index(&root, &last_id), None);
    }
}
