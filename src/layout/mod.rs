//! Tree and group layout for canvas diagrams.
//!
//! A pass rebuilds a forest from the live node/edge lists, re-flows every
//! descendant of the affected root into stacked bands, and refits group
//! nodes around the nodes they spatially contain.
//!
//! Known ordering hazard: groups are refit, and their origin captured, before
//! the tree is repositioned. A group member that the tree layout also moves is
//! afterwards translated from that earlier snapshot, so the group may no longer
//! enclose it. Callers that need a tight fit can run a second pass.

mod forest;
mod group;
mod subtree;

pub use forest::{GrowthDirection, TreeNode, build_forest, find_root, root_ids};
pub use group::{
    GroupDescriptor, adjust_group_members, enclosing_frame, resize_groups, resolve_groups,
};
pub use subtree::{child_ids, find_cycle, position_subtree, subtree_extent};

use crate::canvas::CanvasModel;
use crate::config::LayoutConfig;
use crate::ir::Rect;
use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("edges reachable from the root form a cycle through node '{node}'")]
    Cycle { node: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relocation {
    pub id: String,
    pub from: (f64, f64),
    pub to: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupResize {
    pub id: String,
    pub from: Rect,
    pub to: Rect,
}

/// What a layout pass changed. Empty when there was nothing to lay out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutReport {
    pub roots: Vec<String>,
    pub relocations: Vec<Relocation>,
    pub resized_groups: Vec<GroupResize>,
}

impl LayoutReport {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.relocations.is_empty() && self.resized_groups.is_empty()
    }
}

/// Re-flows the tree containing `trigger` and refits every non-empty group.
///
/// Returns an empty report when `trigger` does not belong to any tree.
pub fn adjust_layout<M: CanvasModel + ?Sized>(
    model: &mut M,
    trigger: &str,
    config: &LayoutConfig,
) -> Result<LayoutReport, LayoutError> {
    let forest = build_forest(model.nodes(), model.edges(), config.direction);
    let Some(root) = find_root(&forest, trigger).map(|tree| tree.id.clone()) else {
        if config.trace {
            tracing::debug!(trigger, "no root for trigger, skipping layout");
        }
        return Ok(LayoutReport::default());
    };
    if config.trace {
        tracing::debug!(trigger, root = root.as_str(), "adjust layout");
    }
    run_pass(model, &[root], config)
}

/// Runs the same pass for every tree of the forest.
pub fn adjust_forest<M: CanvasModel + ?Sized>(
    model: &mut M,
    config: &LayoutConfig,
) -> Result<LayoutReport, LayoutError> {
    let roots: Vec<String> = build_forest(model.nodes(), model.edges(), config.direction)
        .into_iter()
        .map(|tree| tree.id)
        .collect();
    if roots.is_empty() {
        if config.trace {
            tracing::debug!("no roots in canvas, skipping layout");
        }
        return Ok(LayoutReport::default());
    }
    run_pass(model, &roots, config)
}

fn run_pass<M: CanvasModel + ?Sized>(
    model: &mut M,
    roots: &[String],
    config: &LayoutConfig,
) -> Result<LayoutReport, LayoutError> {
    for root in roots {
        if let Some(node) = find_cycle(&*model, root) {
            tracing::warn!(root = root.as_str(), node = node.as_str(), "cycle detected, layout aborted");
            return Err(LayoutError::Cycle { node });
        }
    }

    let mut report = LayoutReport {
        roots: roots.to_vec(),
        ..LayoutReport::default()
    };
    let groups = resolve_groups(&*model, config);
    resize_groups(model, &groups, config, &mut report);
    for root in roots {
        lay_out_root(model, root, config, &mut report);
    }
    adjust_group_members(model, &groups, config);
    Ok(report)
}

fn lay_out_root<M: CanvasModel + ?Sized>(
    model: &mut M,
    root: &str,
    config: &LayoutConfig,
    report: &mut LayoutReport,
) {
    let extent = subtree_extent(&*model, root, config);
    let Some(node) = model.node(root) else {
        return;
    };
    let direction = config.direction;
    let base = direction.cross_origin(node) + direction.cross_size(node) / 2.0 - extent / 2.0;
    position_subtree(model, root, base, config, report);
}
