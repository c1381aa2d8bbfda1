pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;

pub use canvas::{Canvas, CanvasError, CanvasModel, random_id};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use ir::{CanvasData, Edge, GeometryPatch, Node, NodeKind, Rect, Side};
pub use layout::{GrowthDirection, LayoutError, LayoutReport, adjust_forest, adjust_layout};
