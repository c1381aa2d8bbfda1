use crate::ir::{CanvasData, Edge, GeometryPatch, Node, NodeKind, Rect, Side};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("invalid canvas json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("node '{0}' already exists")]
    DuplicateNode(String),
    #[error("unknown node '{0}'")]
    UnknownNode(String),
}

/// View over a host diagram that the layout core reads and mutates.
///
/// Geometry changes made through [`CanvasModel::move_or_resize`] must be
/// visible to every later read in the same pass.
pub trait CanvasModel {
    fn nodes(&self) -> &[Node];

    fn edges(&self) -> &[Edge];

    fn node(&self, id: &str) -> Option<&Node> {
        self.nodes().iter().find(|node| node.id == id)
    }

    fn nodes_contained_in(&self, rect: Rect) -> Vec<&Node> {
        self.nodes()
            .iter()
            .filter(|node| rect.contains(&node.bbox()))
            .collect()
    }

    /// Unknown ids are ignored.
    fn move_or_resize(&mut self, id: &str, patch: GeometryPatch);

    fn request_redraw(&mut self) {}

    fn persist(&mut self) -> Result<(), CanvasError> {
        Ok(())
    }
}

/// Hex id in the style the canvas host uses for nodes and edges.
pub fn random_id(len: usize) -> String {
    let mut out = String::with_capacity(len);
    while out.len() < len {
        let chunk = uuid::Uuid::new_v4().simple().to_string();
        let take = (len - out.len()).min(chunk.len());
        out.push_str(&chunk[..take]);
    }
    out
}

pub const DEFAULT_ID_LEN: usize = 16;

#[derive(Debug, Clone)]
pub enum NodeContent {
    Text(String),
    File { path: String, subpath: Option<String> },
}

#[derive(Debug, Clone)]
pub struct NewNode {
    pub id: Option<String>,
    pub rect: Rect,
    pub content: NodeContent,
}

/// In-memory canvas host backed by a [`CanvasData`] document.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    data: CanvasData,
    index: HashMap<String, usize>,
    redraw_requests: usize,
    save_requested: bool,
}

impl Canvas {
    pub fn new(data: CanvasData) -> Self {
        let mut canvas = Self {
            data,
            ..Self::default()
        };
        canvas.reindex();
        canvas
    }

    pub fn from_json(input: &str) -> Result<Self, CanvasError> {
        Ok(Self::new(serde_json::from_str(input)?))
    }

    pub fn to_json_pretty(&self) -> Result<String, CanvasError> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    pub fn data(&self) -> &CanvasData {
        &self.data
    }

    pub fn into_data(self) -> CanvasData {
        self.data
    }

    pub fn redraw_requests(&self) -> usize {
        self.redraw_requests
    }

    pub fn save_requested(&self) -> bool {
        self.save_requested
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (idx, node) in self.data.nodes.iter().enumerate() {
            // Keep the first occurrence so lookups agree with a linear scan.
            self.index.entry(node.id.clone()).or_insert(idx);
        }
    }

    pub fn add_node(&mut self, new: NewNode) -> Result<&Node, CanvasError> {
        let id = new.id.unwrap_or_else(|| random_id(DEFAULT_ID_LEN));
        if self.index.contains_key(&id) {
            return Err(CanvasError::DuplicateNode(id));
        }
        let rect = new.rect;
        let node = match new.content {
            NodeContent::Text(text) => {
                let mut node = Node::new(&id, NodeKind::Text, rect.x, rect.y, rect.width, rect.height);
                node.text = Some(text);
                node
            }
            NodeContent::File { path, subpath } => {
                let mut node = Node::new(&id, NodeKind::File, rect.x, rect.y, rect.width, rect.height);
                node.file = Some(path);
                node.subpath = subpath;
                node
            }
        };
        self.data.nodes.push(node);
        let idx = self.data.nodes.len() - 1;
        self.index.insert(id, idx);
        self.request_redraw();
        Ok(&self.data.nodes[idx])
    }

    pub fn add_edge(
        &mut self,
        from: &str,
        from_side: Side,
        to: &str,
        to_side: Side,
    ) -> Result<&Edge, CanvasError> {
        for endpoint in [from, to] {
            if !self.index.contains_key(endpoint) {
                return Err(CanvasError::UnknownNode(endpoint.to_string()));
            }
        }
        let edge = Edge::new(&random_id(DEFAULT_ID_LEN), from, from_side, to, to_side);
        self.data.edges.push(edge);
        self.request_redraw();
        let idx = self.data.edges.len() - 1;
        Ok(&self.data.edges[idx])
    }

    /// Adds a node one rank to the right of `parent_id` and links it from the
    /// parent's right side. Returns the new node's id.
    pub fn create_child_node(
        &mut self,
        parent_id: &str,
        content: NodeContent,
        y: f64,
        rank_spacing: f64,
    ) -> Result<String, CanvasError> {
        let parent = self
            .node(parent_id)
            .ok_or_else(|| CanvasError::UnknownNode(parent_id.to_string()))?;
        let rect = Rect::new(
            parent.x + parent.width + rank_spacing,
            y,
            parent.width,
            parent.height * 0.6,
        );
        let child_id = self
            .add_node(NewNode {
                id: None,
                rect,
                content,
            })?
            .id
            .clone();
        self.add_edge(parent_id, Side::Right, &child_id, Side::Left)?;
        self.save_requested = true;
        Ok(child_id)
    }
}

impl CanvasModel for Canvas {
    fn nodes(&self) -> &[Node] {
        &self.data.nodes
    }

    fn edges(&self) -> &[Edge] {
        &self.data.edges
    }

    fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|idx| &self.data.nodes[*idx])
    }

    fn move_or_resize(&mut self, id: &str, patch: GeometryPatch) {
        if let Some(idx) = self.index.get(id).copied() {
            patch.apply_to(&mut self.data.nodes[idx]);
        }
    }

    fn request_redraw(&mut self) {
        self.redraw_requests += 1;
    }

    fn persist(&mut self) -> Result<(), CanvasError> {
        self.save_requested = true;
        Ok(())
    }
}
