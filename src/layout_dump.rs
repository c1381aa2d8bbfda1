use crate::canvas::CanvasModel;
use crate::config::LayoutConfig;
use crate::layout::{GroupResize, LayoutReport, Relocation};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub direction: String,
    pub roots: Vec<String>,
    pub nodes: Vec<NodeDump>,
    pub relocations: Vec<Relocation>,
    pub groups: Vec<GroupResize>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub moved: bool,
}

impl LayoutDump {
    pub fn from_report<M: CanvasModel + ?Sized>(
        report: &LayoutReport,
        model: &M,
        config: &LayoutConfig,
    ) -> Self {
        let moved: HashSet<&str> = report
            .relocations
            .iter()
            .map(|r| r.id.as_str())
            .chain(report.resized_groups.iter().map(|g| g.id.as_str()))
            .collect();

        let nodes = model
            .nodes()
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                kind: format!("{:?}", node.kind),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                moved: moved.contains(node.id.as_str()),
            })
            .collect();

        LayoutDump {
            direction: config.direction.to_string(),
            roots: report.roots.clone(),
            nodes,
            relocations: report.relocations.clone(),
            groups: report.resized_groups.clone(),
        }
    }
}

pub fn write_layout_dump<M: CanvasModel + ?Sized>(
    path: &Path,
    report: &LayoutReport,
    model: &M,
    config: &LayoutConfig,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_report(report, model, config);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
