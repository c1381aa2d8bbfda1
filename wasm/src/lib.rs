use canvas_autolayout::{Canvas, GrowthDirection, LayoutConfig, adjust_layout};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CanvasLayoutOptions {
    direction: Option<String>,
    rank_spacing: Option<f64>,
    sibling_gap: Option<f64>,
    group_padding: Option<f64>,
}

fn build_layout_config(options: CanvasLayoutOptions) -> Result<LayoutConfig, String> {
    let mut config = LayoutConfig::default();
    if let Some(token) = options.direction.as_deref() {
        config.direction = GrowthDirection::from_token(token)
            .ok_or_else(|| format!("unknown growth direction '{token}'"))?;
    }
    if let Some(v) = options.rank_spacing {
        config.rank_spacing = v;
    }
    if let Some(v) = options.sibling_gap {
        config.sibling_gap = v;
    }
    if let Some(v) = options.group_padding {
        config.group_padding = v;
    }
    Ok(config)
}

fn relayout(canvas_json: &str, node_id: &str, options_json: Option<&str>) -> Result<String, String> {
    let options = match options_json {
        Some(raw) => serde_json::from_str::<CanvasLayoutOptions>(raw).map_err(|e| e.to_string())?,
        None => CanvasLayoutOptions::default(),
    };
    let config = build_layout_config(options)?;
    let mut canvas = Canvas::from_json(canvas_json).map_err(|e| e.to_string())?;
    adjust_layout(&mut canvas, node_id, &config).map_err(|e| e.to_string())?;
    canvas.to_json_pretty().map_err(|e| e.to_string())
}

/// Lays out the tree containing `node_id` and returns the updated canvas JSON.
#[wasm_bindgen]
pub fn adjust_canvas_layout(
    canvas_json: &str,
    node_id: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    relayout(canvas_json, node_id, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: &str = r#"{
        "nodes": [
            {"id": "r", "type": "text", "text": "root", "x": 0, "y": 0, "width": 100, "height": 50},
            {"id": "a", "type": "text", "text": "a", "x": 0, "y": 300, "width": 100, "height": 50}
        ],
        "edges": [{"id": "e", "fromNode": "r", "toNode": "a"}]
    }"#;

    #[test]
    fn lays_out_with_options() {
        let out = relayout(CANVAS, "a", Some(r#"{"direction": "TB", "rankSpacing": 100}"#))
            .expect("layout should succeed");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["nodes"][1]["x"], 0.0);
        assert_eq!(value["nodes"][1]["y"], 150.0);
    }

    #[test]
    fn rejects_unknown_direction() {
        let err = relayout(CANVAS, "a", Some(r#"{"direction": "sideways"}"#)).unwrap_err();
        assert!(err.contains("sideways"));
    }
}
