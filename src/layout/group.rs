use super::{GroupResize, LayoutReport};
use crate::canvas::CanvasModel;
use crate::config::LayoutConfig;
use crate::ir::{GeometryPatch, Node, Rect};

/// A group node and the members found inside it at resolve time.
///
/// Members are held by id and re-read from the model whenever their geometry
/// is needed.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDescriptor {
    pub group: String,
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
    pub members: Vec<String>,
    /// Group origin the members were measured against.
    pub origin: (f64, f64),
}

/// First member minimising `key`; ties keep the earlier member.
fn first_min<'a>(members: &[&'a Node], key: impl Fn(&Node) -> f64) -> &'a Node {
    let mut best = members[0];
    for member in &members[1..] {
        if key(*member) < key(best) {
            best = *member;
        }
    }
    best
}

/// First member maximising `key`; ties keep the earlier member.
fn first_max<'a>(members: &[&'a Node], key: impl Fn(&Node) -> f64) -> &'a Node {
    let mut best = members[0];
    for member in &members[1..] {
        if key(*member) > key(best) {
            best = *member;
        }
    }
    best
}

pub fn resolve_groups<M: CanvasModel + ?Sized>(model: &M, config: &LayoutConfig) -> Vec<GroupDescriptor> {
    let mut groups = Vec::new();
    for group in model.nodes().iter().filter(|node| node.kind.is_group()) {
        let members: Vec<&Node> = model
            .nodes_contained_in(group.bbox())
            .into_iter()
            .filter(|node| node.id != group.id)
            .collect();
        if members.is_empty() {
            continue;
        }
        let top = first_min(&members, |n| n.y);
        let bottom = first_max(&members, |n| n.y + n.height);
        let left = first_min(&members, |n| n.x);
        let right = first_max(&members, |n| n.x + n.width);

        let descriptor = GroupDescriptor {
            group: group.id.clone(),
            top: top.id.clone(),
            bottom: bottom.id.clone(),
            left: left.id.clone(),
            right: right.id.clone(),
            members: members.iter().map(|n| n.id.clone()).collect(),
            origin: (left.x - config.group_padding, top.y - config.group_padding),
        };
        if config.trace {
            tracing::debug!(
                group = group.caption(),
                members = descriptor.members.len(),
                "resolved group"
            );
        }
        groups.push(descriptor);
    }
    groups
}

/// Frame enclosing the descriptor's extreme members plus padding, read live.
pub fn enclosing_frame<M: CanvasModel + ?Sized>(
    model: &M,
    descriptor: &GroupDescriptor,
    padding: f64,
) -> Option<Rect> {
    let top = model.node(&descriptor.top)?;
    let bottom = model.node(&descriptor.bottom)?;
    let left = model.node(&descriptor.left)?;
    let right = model.node(&descriptor.right)?;
    let x = left.x - padding;
    let y = top.y - padding;
    Some(Rect::new(
        x,
        y,
        right.x + right.width - x + padding,
        bottom.y + bottom.height - y + padding,
    ))
}

pub fn resize_groups<M: CanvasModel + ?Sized>(
    model: &mut M,
    groups: &[GroupDescriptor],
    config: &LayoutConfig,
    report: &mut LayoutReport,
) {
    for descriptor in groups {
        let Some(before) = model.node(&descriptor.group).map(Node::bbox) else {
            continue;
        };
        let Some(after) = enclosing_frame(&*model, descriptor, config.group_padding) else {
            continue;
        };
        if config.trace {
            tracing::debug!(
                group = descriptor.group.as_str(),
                from = ?before,
                to = ?after,
                "resize group"
            );
        }
        model.move_or_resize(&descriptor.group, GeometryPatch::frame(after));
        report.resized_groups.push(GroupResize {
            id: descriptor.group.clone(),
            from: before,
            to: after,
        });
    }
}

/// Shifts each member by however far its group moved since `origin` was taken.
pub fn adjust_group_members<M: CanvasModel + ?Sized>(
    model: &mut M,
    groups: &[GroupDescriptor],
    config: &LayoutConfig,
) {
    for descriptor in groups {
        let Some((gx, gy)) = model.node(&descriptor.group).map(|g| (g.x, g.y)) else {
            continue;
        };
        let (dx, dy) = (gx - descriptor.origin.0, gy - descriptor.origin.1);
        for member_id in &descriptor.members {
            if *member_id == descriptor.group {
                continue;
            }
            let Some((mx, my)) = model.node(member_id).map(|m| (m.x, m.y)) else {
                continue;
            };
            if config.trace {
                tracing::debug!(
                    node = member_id.as_str(),
                    from_x = mx,
                    from_y = my,
                    to_x = mx + dx,
                    to_y = my + dy,
                    "relocate group member"
                );
            }
            model.move_or_resize(member_id, GeometryPatch::position(mx + dx, my + dy));
        }
    }
}
