use super::{LayoutReport, Relocation};
use crate::canvas::CanvasModel;
use crate::config::LayoutConfig;
use crate::ir::GeometryPatch;
use std::collections::HashSet;

/// Targets of `id`'s outgoing edges in edge-list order, read from the live model.
/// Edges pointing at unknown nodes are dropped.
pub fn child_ids<M: CanvasModel + ?Sized>(model: &M, id: &str) -> Vec<String> {
    model
        .edges()
        .iter()
        .filter(|edge| edge.from_node == id)
        .filter_map(|edge| model.node(&edge.to_node).map(|node| node.id.clone()))
        .collect()
}

/// Space a node and all of its descendants need across the growth axis.
pub fn subtree_extent<M: CanvasModel + ?Sized>(model: &M, id: &str, config: &LayoutConfig) -> f64 {
    let Some(node) = model.node(id) else {
        return 0.0;
    };
    let own = config.direction.cross_size(node);
    let children = child_ids(model, id);
    if children.is_empty() {
        return own;
    }
    let total: f64 = children
        .iter()
        .map(|child| subtree_extent(model, child, config))
        .sum();
    let gaps = children.len().saturating_sub(1) as f64 * config.sibling_gap;
    let extent = own.max(total + gaps);
    if config.trace {
        tracing::trace!(node = id, extent, "subtree extent");
    }
    extent
}

/// Places every descendant of `id`, stacking sibling bands from `base`.
/// The node itself is not moved.
pub fn position_subtree<M: CanvasModel + ?Sized>(
    model: &mut M,
    id: &str,
    base: f64,
    config: &LayoutConfig,
    report: &mut LayoutReport,
) {
    let Some(parent) = model.node(id).cloned() else {
        return;
    };
    if config.trace {
        tracing::debug!(node = id, base, "position subtree");
    }
    let mut cursor = base;
    for child_id in child_ids(&*model, id) {
        let Some(child) = model.node(&child_id).cloned() else {
            continue;
        };
        let extent = subtree_extent(&*model, &child_id, config);
        let (x, y) = config
            .direction
            .place_child(&parent, &child, cursor, extent, config.rank_spacing);
        if config.trace {
            tracing::debug!(
                node = child.caption(),
                width = child.width,
                height = child.height,
                from_x = child.x,
                from_y = child.y,
                to_x = x,
                to_y = y,
                extent,
                "relocate"
            );
        }
        model.move_or_resize(&child_id, GeometryPatch::position(x, y));
        report.relocations.push(Relocation {
            id: child_id.clone(),
            from: (child.x, child.y),
            to: (x, y),
        });
        // Descendants share the child's band origin rather than its centre.
        position_subtree(model, &child_id, cursor, config, report);
        cursor += extent + config.sibling_gap;
    }
}

/// First node found on a cycle reachable from `root` through live edges.
pub fn find_cycle<M: CanvasModel + ?Sized>(model: &M, root: &str) -> Option<String> {
    fn visit<M: CanvasModel + ?Sized>(
        model: &M,
        id: &str,
        on_path: &mut HashSet<String>,
        done: &mut HashSet<String>,
    ) -> Option<String> {
        if done.contains(id) {
            return None;
        }
        if !on_path.insert(id.to_string()) {
            return Some(id.to_string());
        }
        for child in child_ids(model, id) {
            if let Some(hit) = visit(model, &child, on_path, done) {
                return Some(hit);
            }
        }
        on_path.remove(id);
        done.insert(id.to_string());
        None
    }

    visit(model, root, &mut HashSet::new(), &mut HashSet::new())
}
