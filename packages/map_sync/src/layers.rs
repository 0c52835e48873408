//! Layer and source directives understood by the map renderer.

use geojson::FeatureCollection;
use opportunity_map_location_models::legend;
use serde::Serialize;
use serde_json::{Value, json};
use strum_macros::{AsRefStr, Display};

use crate::{BORDER_LAYER_ID, FILL_LAYER_ID, LABEL_LAYER_ID, SOURCE_ID};

/// Rendering primitive of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Filled polygons.
    Fill,
    /// Polygon outlines.
    Line,
    /// Text labels.
    Symbol,
}

/// A single map layer drawn from [`SOURCE_ID`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSpec {
    /// Layer identifier.
    pub id: String,
    /// Source the layer draws from.
    pub source: String,
    /// Rendering primitive.
    pub kind: LayerKind,
    /// Paint properties.
    pub paint: Value,
    /// Layout properties.
    pub layout: Value,
}

/// One step of a layer update, applied in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum LayerDirective {
    /// Remove a layer if it exists.
    RemoveLayer {
        /// Layer identifier.
        id: String,
    },
    /// Remove a source if it exists.
    RemoveSource {
        /// Source identifier.
        id: String,
    },
    /// Add a `GeoJSON` source.
    AddSource {
        /// Source identifier.
        id: String,
        /// Annotated feature collection.
        data: FeatureCollection,
    },
    /// Add a layer on top of the existing ones.
    AddLayer {
        /// Layer definition.
        layer: LayerSpec,
    },
}

/// Directives tearing down the rendered stack: labels, border, fill,
/// then the source they draw from.
#[must_use]
pub fn teardown() -> Vec<LayerDirective> {
    let mut directives: Vec<LayerDirective> = [LABEL_LAYER_ID, BORDER_LAYER_ID, FILL_LAYER_ID]
        .iter()
        .map(|id| LayerDirective::RemoveLayer { id: (*id).to_string() })
        .collect();
    directives.push(LayerDirective::RemoveSource {
        id: SOURCE_ID.to_string(),
    });
    directives
}

/// Directives building the stack for `data`: the source, then fill,
/// border, and labels.
#[must_use]
pub fn build(data: FeatureCollection) -> Vec<LayerDirective> {
    vec![
        LayerDirective::AddSource {
            id: SOURCE_ID.to_string(),
            data,
        },
        LayerDirective::AddLayer { layer: fill_layer() },
        LayerDirective::AddLayer {
            layer: border_layer(),
        },
        LayerDirective::AddLayer {
            layer: label_layer(),
        },
    ]
}

fn fill_layer() -> LayerSpec {
    LayerSpec {
        id: FILL_LAYER_ID.to_string(),
        source: SOURCE_ID.to_string(),
        kind: LayerKind::Fill,
        paint: json!({
            "fill-color": tier_color_stops(),
            "fill-opacity": 0.6,
        }),
        layout: json!({}),
    }
}

fn border_layer() -> LayerSpec {
    LayerSpec {
        id: BORDER_LAYER_ID.to_string(),
        source: SOURCE_ID.to_string(),
        kind: LayerKind::Line,
        paint: json!({
            "line-color": "#1f2937",
            "line-width": 0.5,
        }),
        layout: json!({}),
    }
}

fn label_layer() -> LayerSpec {
    LayerSpec {
        id: LABEL_LAYER_ID.to_string(),
        source: SOURCE_ID.to_string(),
        kind: LayerKind::Symbol,
        paint: json!({
            "text-color": "#111827",
            "text-halo-color": "#ffffff",
            "text-halo-width": 1,
        }),
        layout: json!({
            "text-field": ["get", "id"],
            "text-size": 10,
        }),
    }
}

/// A `step` expression over the `opportunity` property, with one stop per
/// tier taken from the shared legend thresholds.
#[must_use]
pub fn tier_color_stops() -> Value {
    let mut expression = vec![json!("step"), json!(["get", "opportunity"])];
    let mut entries = legend().into_iter();
    if let Some(lowest) = entries.next() {
        expression.push(json!(lowest.color));
    }
    for entry in entries {
        expression.push(json!(entry.min_opportunity));
        expression.push(json!(entry.color));
    }
    Value::Array(expression)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opportunity_map_location_models::{
        HIGH_OPPORTUNITY_THRESHOLD, MEDIUM_OPPORTUNITY_THRESHOLD, Tier,
    };

    #[test]
    fn color_stops_follow_tier_thresholds() {
        let stops = tier_color_stops();
        assert_eq!(
            stops,
            json!([
                "step",
                ["get", "opportunity"],
                Tier::Low.color(),
                MEDIUM_OPPORTUNITY_THRESHOLD,
                Tier::Medium.color(),
                HIGH_OPPORTUNITY_THRESHOLD,
                Tier::High.color(),
            ])
        );
    }

    #[test]
    fn teardown_removes_layers_before_source() {
        let directives = teardown();
        assert_eq!(directives.len(), 4);
        assert_eq!(
            directives.last(),
            Some(&LayerDirective::RemoveSource {
                id: SOURCE_ID.to_string()
            })
        );
    }

    #[test]
    fn build_adds_source_first() {
        let directives = build(FeatureCollection {
            bbox: None,
            features: vec![],
            foreign_members: None,
        });
        assert!(matches!(directives[0], LayerDirective::AddSource { .. }));
        let kinds: Vec<LayerKind> = directives
            .iter()
            .filter_map(|d| match d {
                LayerDirective::AddLayer { layer } => Some(layer.kind),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, [LayerKind::Fill, LayerKind::Line, LayerKind::Symbol]);
    }

    #[test]
    fn directives_serialize_with_op_tag() {
        let json = serde_json::to_value(&teardown()[0]).unwrap();
        assert_eq!(json["op"], "removeLayer");
        assert_eq!(json["id"], LABEL_LAYER_ID);
    }
}
