use crate::ir::{Edge, Node};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthDirection {
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "BT")]
    BottomTop,
}

impl GrowthDirection {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "LR" => Some(Self::LeftRight),
            "RL" => Some(Self::RightLeft),
            "TB" | "TD" => Some(Self::TopBottom),
            "BT" => Some(Self::BottomTop),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
            Self::TopBottom => "TB",
            Self::BottomTop => "BT",
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }

    /// Whether an edge `parent -> child` counts as a tree edge in this direction.
    pub fn admits(self, parent: &Node, child: &Node) -> bool {
        match self {
            Self::LeftRight => parent.x < child.x,
            Self::RightLeft => parent.x > child.x,
            Self::TopBottom => parent.y < child.y,
            Self::BottomTop => parent.y > child.y,
        }
    }

    /// Size of a node across the growth axis.
    pub(crate) fn cross_size(self, node: &Node) -> f64 {
        if self.is_horizontal() {
            node.height
        } else {
            node.width
        }
    }

    /// Coordinate of a node across the growth axis.
    pub(crate) fn cross_origin(self, node: &Node) -> f64 {
        if self.is_horizontal() { node.y } else { node.x }
    }

    /// Top-left corner for `child` one rank away from `parent`, centred in the
    /// band `[band_start, band_start + band)` along the cross axis.
    pub(crate) fn place_child(
        self,
        parent: &Node,
        child: &Node,
        band_start: f64,
        band: f64,
        rank_spacing: f64,
    ) -> (f64, f64) {
        let cross = band_start + band / 2.0 - self.cross_size(child) / 2.0;
        match self {
            Self::LeftRight => (parent.x + parent.width + rank_spacing, cross),
            Self::RightLeft => (parent.x - rank_spacing - child.width, cross),
            Self::TopBottom => (cross, parent.y + parent.height + rank_spacing),
            Self::BottomTop => (cross, parent.y - rank_spacing - child.height),
        }
    }
}

impl std::fmt::Display for GrowthDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn contains(&self, id: &str) -> bool {
        self.id == id || self.children.iter().any(|child| child.contains(id))
    }
}

/// Ids of nodes that are never the target of an edge, in node order.
pub fn root_ids<'a>(nodes: &'a [Node], edges: &[Edge]) -> Vec<&'a str> {
    nodes
        .iter()
        .filter(|node| !edges.iter().any(|edge| edge.to_node == node.id))
        .map(|node| node.id.as_str())
        .collect()
}

/// Builds one tree per root, keeping only edges the direction admits.
pub fn build_forest(nodes: &[Node], edges: &[Edge], direction: GrowthDirection) -> Vec<TreeNode> {
    let by_id: HashMap<&str, &Node> = nodes.iter().map(|node| (node.id.as_str(), node)).collect();
    let mut outgoing: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        outgoing
            .entry(edge.from_node.as_str())
            .or_default()
            .push(edge.to_node.as_str());
    }

    root_ids(nodes, edges)
        .into_iter()
        .map(|root| build_tree(root, &outgoing, &by_id, direction))
        .collect()
}

fn build_tree(
    id: &str,
    outgoing: &HashMap<&str, Vec<&str>>,
    by_id: &HashMap<&str, &Node>,
    direction: GrowthDirection,
) -> TreeNode {
    let mut children = Vec::new();
    if let (Some(parent), Some(child_ids)) = (by_id.get(id), outgoing.get(id)) {
        for child_id in child_ids {
            let Some(child) = by_id.get(child_id) else {
                continue;
            };
            if direction.admits(parent, child) {
                children.push(build_tree(child_id, outgoing, by_id, direction));
            }
        }
    }
    TreeNode {
        id: id.to_string(),
        children,
    }
}

/// Root of the first tree that contains `id`.
pub fn find_root<'a>(forest: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
    forest.iter().find(|tree| tree.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{NodeKind, Side};

    fn node(id: &str, x: f64, y: f64) -> Node {
        Node::new(id, NodeKind::Text, x, y, 100.0, 50.0)
    }

    fn edge(from: &str, to: &str) -> Edge {
        Edge::new(&format!("{from}-{to}"), from, Side::Right, to, Side::Left)
    }

    impl TreeNode {
        fn len(&self) -> usize {
            1 + self.children.iter().map(TreeNode::len).sum::<usize>()
        }

        fn is_leaf(&self) -> bool {
            self.children.is_empty()
        }
    }

    #[test]
    fn roots_are_nodes_without_incoming_edges() {
        let nodes = vec![node("a", 0.0, 0.0), node("b", 300.0, 0.0), node("c", 0.0, 300.0)];
        let edges = vec![edge("a", "b")];
        assert_eq!(root_ids(&nodes, &edges), vec!["a", "c"]);
    }

    #[test]
    fn builds_forest_in_edge_order() {
        let nodes = vec![
            node("r", 0.0, 0.0),
            node("a", 300.0, 0.0),
            node("b", 300.0, 100.0),
            node("c", 600.0, 0.0),
            node("lone", 0.0, 500.0),
        ];
        let edges = vec![edge("r", "b"), edge("r", "a"), edge("a", "c")];
        let forest = build_forest(&nodes, &edges, GrowthDirection::LeftRight);
        assert_eq!(forest.len(), 2);
        let tree = &forest[0];
        assert_eq!(tree.id, "r");
        let order: Vec<&str> = tree.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(tree.children[1].children[0].id, "c");
        assert_eq!(tree.len(), 4);
        assert!(forest[1].is_leaf());
    }

    #[test]
    fn direction_predicate_drops_back_edges() {
        let nodes = vec![node("r", 0.0, 0.0), node("behind", -300.0, 0.0), node("ahead", 300.0, 0.0)];
        let edges = vec![edge("r", "behind"), edge("r", "ahead")];

        let lr = build_forest(&nodes, &edges, GrowthDirection::LeftRight);
        assert_eq!(lr[0].children.len(), 1);
        assert_eq!(lr[0].children[0].id, "ahead");

        let rl = build_forest(&nodes, &edges, GrowthDirection::RightLeft);
        assert_eq!(rl[0].children[0].id, "behind");

        let tb = build_forest(&nodes, &edges, GrowthDirection::TopBottom);
        assert!(tb[0].is_leaf());
    }

    #[test]
    fn dangling_edge_targets_are_skipped() {
        let nodes = vec![node("r", 0.0, 0.0)];
        let edges = vec![edge("r", "ghost")];
        let forest = build_forest(&nodes, &edges, GrowthDirection::LeftRight);
        assert_eq!(forest.len(), 1);
        assert!(forest[0].is_leaf());
    }

    #[test]
    fn find_root_locates_containing_tree() {
        let nodes = vec![node("r1", 0.0, 0.0), node("a", 300.0, 0.0), node("r2", 0.0, 400.0), node("b", 300.0, 400.0)];
        let edges = vec![edge("r1", "a"), edge("r2", "b")];
        let forest = build_forest(&nodes, &edges, GrowthDirection::LeftRight);
        assert_eq!(find_root(&forest, "b").map(|t| t.id.as_str()), Some("r2"));
        assert_eq!(find_root(&forest, "r1").map(|t| t.id.as_str()), Some("r1"));
        assert!(find_root(&forest, "nope").is_none());
    }

    #[test]
    fn parses_direction_tokens() {
        assert_eq!(GrowthDirection::from_token("lr"), Some(GrowthDirection::LeftRight));
        assert_eq!(GrowthDirection::from_token("TD"), Some(GrowthDirection::TopBottom));
        assert_eq!(GrowthDirection::from_token("BT"), Some(GrowthDirection::BottomTop));
        assert_eq!(GrowthDirection::from_token("up"), None);
        assert_eq!(GrowthDirection::RightLeft.to_string(), "RL");
    }
}
