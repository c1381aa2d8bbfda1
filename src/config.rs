use crate::layout::GrowthDirection;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Growth direction used both for the forest predicate and for placement.
    pub direction: GrowthDirection,
    /// Distance between a parent's far edge and its children's near edge.
    pub rank_spacing: f64,
    /// Gap between the reserved bands of adjacent siblings.
    pub sibling_gap: f64,
    /// Margin kept between a group's border and its extreme members.
    pub group_padding: f64,
    /// Emit per-node diagnostics through `tracing`.
    pub trace: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: GrowthDirection::LeftRight,
            rank_spacing: 200.0,
            sibling_gap: 20.0,
            group_padding: 20.0,
            trace: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub layout: LayoutConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    direction: Option<String>,
    rank_spacing: Option<f64>,
    sibling_gap: Option<f64>,
    group_padding: Option<f64>,
    trace: Option<bool>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let parsed = parse_config_file(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    apply_config_file(&mut config, parsed)?;
    Ok(config)
}

fn parse_config_file(contents: &str) -> anyhow::Result<ConfigFile> {
    match serde_json::from_str::<ConfigFile>(contents) {
        Ok(parsed) => Ok(parsed),
        // Hand-written configs often carry comments or trailing commas.
        Err(json_err) => json5::from_str::<ConfigFile>(contents)
            .map_err(|_| anyhow::Error::new(json_err)),
    }
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) -> anyhow::Result<()> {
    let layout = &mut config.layout;
    if let Some(token) = parsed.direction.as_deref() {
        layout.direction = GrowthDirection::from_token(token)
            .ok_or_else(|| anyhow::anyhow!("unknown growth direction '{token}'"))?;
    }
    if let Some(v) = parsed.rank_spacing {
        layout.rank_spacing = v;
    }
    if let Some(v) = parsed.sibling_gap {
        layout.sibling_gap = v;
    }
    if let Some(v) = parsed.group_padding {
        layout.group_padding = v;
    }
    if let Some(v) = parsed.trace {
        layout.trace = v;
    }
    Ok(())
}
