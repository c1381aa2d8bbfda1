use crate::canvas::{Canvas, CanvasModel, NodeContent};
use crate::config::{Config, load_config};
use crate::layout::{GrowthDirection, LayoutReport, adjust_forest, adjust_layout};
use crate::layout_dump::write_layout_dump;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "canvas-autolayout",
    version,
    about = "Re-flow the tree around an edited node of a JSON Canvas file and refit its groups"
)]
pub struct Args {
    /// Input canvas file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Node whose tree should be re-flowed (defaults to the first node)
    #[arg(short = 'n', long = "node", conflicts_with = "all")]
    pub node: Option<String>,

    /// Re-flow every tree of the canvas
    #[arg(long = "all", action = ArgAction::SetTrue)]
    pub all: bool,

    /// Growth direction (overrides the config file)
    #[arg(short = 'd', long = "direction", value_enum)]
    pub direction: Option<DirectionArg>,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Write a JSON report of the layout pass to this path
    #[arg(long = "dump")]
    pub dump: Option<PathBuf>,

    /// Create a text child under this node first and re-flow around it
    #[arg(long = "add-child", requires = "text", conflicts_with_all = ["node", "all"])]
    pub add_child: Option<String>,

    /// Text of the child created with --add-child
    #[arg(long = "text", requires = "add_child")]
    pub text: Option<String>,

    /// Log every relocation to stderr
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum DirectionArg {
    #[value(name = "LR", alias = "lr")]
    LeftRight,
    #[value(name = "RL", alias = "rl")]
    RightLeft,
    #[value(name = "TB", alias = "tb")]
    TopBottom,
    #[value(name = "BT", alias = "bt")]
    BottomTop,
}

impl From<DirectionArg> for GrowthDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::LeftRight => Self::LeftRight,
            DirectionArg::RightLeft => Self::RightLeft,
            DirectionArg::TopBottom => Self::TopBottom,
            DirectionArg::BottomTop => Self::BottomTop,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    apply_args(&mut config, &args);
    if config.layout.trace {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_max_level(tracing::Level::TRACE)
            .with_target(false)
            .init();
    }

    let input = read_input(args.input.as_deref())?;
    let mut canvas = Canvas::from_json(&input).context("failed to parse canvas")?;

    let report = relayout(&mut canvas, &args, &config)?;
    canvas.request_redraw();
    canvas.persist()?;

    let json = canvas.to_json_pretty()?;
    write_output(&json, args.output.as_deref())?;
    if let Some(path) = args.dump.as_deref() {
        write_layout_dump(path, &report, &canvas, &config.layout)
            .with_context(|| format!("failed to write layout dump {}", path.display()))?;
    }
    Ok(())
}

fn apply_args(config: &mut Config, args: &Args) {
    if let Some(direction) = args.direction {
        config.layout.direction = direction.into();
    }
    if args.verbose {
        config.layout.trace = true;
    }
}

fn relayout(canvas: &mut Canvas, args: &Args, config: &Config) -> Result<LayoutReport> {
    let layout = &config.layout;
    if args.all {
        return Ok(adjust_forest(canvas, layout)?);
    }

    let trigger = match (&args.add_child, &args.text) {
        (Some(parent), Some(text)) => {
            let y = canvas
                .node(parent)
                .map(|node| node.y)
                .with_context(|| format!("unknown node '{parent}'"))?;
            canvas.create_child_node(
                parent,
                NodeContent::Text(text.clone()),
                y,
                layout.rank_spacing,
            )?
        }
        _ => match &args.node {
            Some(id) => id.clone(),
            None => match canvas.nodes().first() {
                Some(node) => node.id.clone(),
                None => return Ok(LayoutReport::default()),
            },
        },
    };
    Ok(adjust_layout(canvas, &trigger, layout)?)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_output(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) if path != Path::new("-") => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        _ => {
            println!("{json}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("canvas-autolayout").chain(argv.iter().copied()))
            .unwrap()
    }

    const SAMPLE: &str = r#"{
        "nodes": [
            {"id": "r", "type": "text", "text": "root", "x": 0, "y": 0, "width": 100, "height": 50},
            {"id": "a", "type": "text", "text": "a", "x": 700, "y": 333, "width": 100, "height": 50}
        ],
        "edges": [{"id": "e", "fromNode": "r", "fromSide": "right", "toNode": "a", "toSide": "left"}]
    }"#;

    #[test]
    fn direction_flag_overrides_config() {
        let args = parse(&["-d", "TB", "-v"]);
        let mut config = Config::default();
        apply_args(&mut config, &args);
        assert_eq!(config.layout.direction, GrowthDirection::TopBottom);
        assert!(config.layout.trace);
    }

    #[test]
    fn add_child_requires_text() {
        let result = Args::try_parse_from(["canvas-autolayout", "--add-child", "r"]);
        assert!(result.is_err());
    }

    #[test]
    fn relayout_defaults_to_first_node() {
        let mut canvas = Canvas::from_json(SAMPLE).unwrap();
        let report = relayout(&mut canvas, &parse(&[]), &Config::default()).unwrap();
        assert_eq!(report.roots, vec!["r".to_string()]);
        let a = canvas.node("a").unwrap();
        assert_eq!((a.x, a.y), (300.0, 0.0));
    }

    #[test]
    fn relayout_with_new_child_restacks_siblings() {
        let mut canvas = Canvas::from_json(SAMPLE).unwrap();
        let args = parse(&["--add-child", "r", "--text", "new idea"]);
        let report = relayout(&mut canvas, &args, &Config::default()).unwrap();
        assert_eq!(canvas.nodes().len(), 3);
        assert_eq!(report.relocations.len(), 2);
        let child = canvas.nodes().last().unwrap();
        assert_eq!(child.text.as_deref(), Some("new idea"));
        assert_eq!(child.height, 30.0);
        // Bands: a (50) + gap (20) + child (30), centred on the root.
        assert_eq!((child.x, child.y), (300.0, 45.0));
        assert_eq!(canvas.node("a").unwrap().y, -25.0);
    }
}
