//! Layer replacement as a state machine.
//!
//! | previous   | next set          | instruction                                 |
//! |------------|-------------------|---------------------------------------------|
//! | any        | same hash         | no-op                                       |
//! | `Empty`    | non-empty         | add stack, fit bounds                       |
//! | `Rendered` | non-empty, new    | tear down, add stack, fit bounds            |
//! | `Rendered` | empty             | tear down, show empty state                 |
//! | `Empty`    | empty             | show empty state                            |

use opportunity_map_location_models::{AnnotatedCollection, MapBounds};
use opportunity_map_spatial::BoundsConfig;
use serde::Serialize;
use sha2::{Digest as _, Sha256};

use crate::layers::{self, LayerDirective};

/// What is currently on the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum LayerState {
    /// No source or layers are rendered.
    #[default]
    Empty,
    /// The stack is rendered for the collection with this hash.
    Rendered {
        /// Collection hash, see [`collection_hash`].
        hash: String,
    },
}

impl LayerState {
    /// Hash of the rendered collection, if any.
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Rendered { hash } => Some(hash),
        }
    }
}

/// Everything the map must do to reflect a new filtered set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderInstruction {
    /// Layer and source changes, in order.
    pub directives: Vec<LayerDirective>,
    /// Viewport to fit, when the set is non-empty and changed.
    pub fit_bounds: Option<MapBounds>,
    /// Whether the "no matching locations" state should be shown.
    pub show_empty_state: bool,
}

impl RenderInstruction {
    /// Whether applying this instruction would change nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.directives.is_empty() && self.fit_bounds.is_none() && !self.show_empty_state
    }
}

/// SHA-256 (hex) of the serialized annotated feature collection.
#[must_use]
pub fn collection_hash(collection: &AnnotatedCollection) -> String {
    let bytes = serde_json::to_vec(&collection.to_feature_collection()).unwrap_or_else(|e| {
        log::warn!("Failed to serialize collection for hashing: {e}");
        Vec::new()
    });
    hex::encode(Sha256::digest(&bytes))
}

/// Computes the instruction that moves the map from `previous` to
/// `collection`, and the resulting state.
#[must_use]
pub fn diff(
    previous: &LayerState,
    collection: &AnnotatedCollection,
    bounds: &BoundsConfig,
) -> (RenderInstruction, LayerState) {
    let mut directives = Vec::new();

    if collection.is_empty() {
        if matches!(previous, LayerState::Rendered { .. }) {
            directives.extend(layers::teardown());
        }
        log::debug!("Filtered set is empty; showing empty state");
        let instruction = RenderInstruction {
            directives,
            fit_bounds: None,
            show_empty_state: true,
        };
        return (instruction, LayerState::Empty);
    }

    let hash = collection_hash(collection);
    if previous.hash() == Some(hash.as_str()) {
        log::debug!("Filtered set unchanged ({hash}); nothing to render");
        return (RenderInstruction::default(), previous.clone());
    }

    if matches!(previous, LayerState::Rendered { .. }) {
        directives.extend(layers::teardown());
    }
    directives.extend(layers::build(collection.to_feature_collection()));

    let fit_bounds = bounds.bounds(collection.shapes());
    log::debug!(
        "Rendering {} features, fitting to {}",
        collection.len(),
        fit_bounds.to_bbox_string()
    );

    let instruction = RenderInstruction {
        directives,
        fit_bounds: Some(fit_bounds),
        show_empty_state: false,
    };
    (instruction, LayerState::Rendered { hash })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FILL_LAYER_ID, SOURCE_ID};
    use opportunity_map_location_models::{AnnotatedFeature, LocationRecord};
    use opportunity_map_scoring::{Seed, SynthesisOverrides, Synthesizer};
    use opportunity_map_spatial::CONTINENTAL_US_BOUNDS;

    fn feature(index: usize, id: &str, lng: f64, lat: f64) -> AnnotatedFeature {
        let record: LocationRecord = Synthesizer::default()
            .synthesize(&Seed::from_identifier(id), &SynthesisOverrides::default());
        let shape = geo::Geometry::Point(geo::Point::new(lng, lat));
        AnnotatedFeature {
            index,
            id: Some(id.to_string()),
            record,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&shape))),
            shape: Some(shape),
            properties: geojson::JsonObject::new(),
        }
    }

    fn collection(ids: &[&str]) -> AnnotatedCollection {
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                let offset = f64::from(u8::try_from(i).unwrap());
                feature(i, id, 0.01f64.mul_add(offset, -74.0), 40.7)
            })
            .collect()
    }

    #[test]
    fn first_render_adds_stack_and_fits() {
        let set = collection(&["10001", "10002"]);
        let (instruction, state) = diff(&LayerState::Empty, &set, &BoundsConfig::default());

        assert_eq!(instruction.directives.len(), 4);
        assert!(matches!(
            &instruction.directives[0],
            LayerDirective::AddSource { id, .. } if id == SOURCE_ID
        ));
        let fit = instruction.fit_bounds.unwrap();
        assert!(fit.contains(-74.0, 40.7));
        assert!(fit.contains(-73.99, 40.7));
        assert!(!instruction.show_empty_state);
        assert_eq!(state.hash(), Some(collection_hash(&set).as_str()));
    }

    #[test]
    fn unchanged_set_is_noop() {
        let set = collection(&["10001", "10002"]);
        let (_, state) = diff(&LayerState::Empty, &set, &BoundsConfig::default());
        let (instruction, next) = diff(&state, &set, &BoundsConfig::default());
        assert!(instruction.is_noop());
        assert_eq!(next, state);
    }

    #[test]
    fn changed_set_tears_down_then_rebuilds() {
        let (_, state) = diff(
            &LayerState::Empty,
            &collection(&["10001", "10002"]),
            &BoundsConfig::default(),
        );
        let (instruction, next) = diff(&state, &collection(&["10003"]), &BoundsConfig::default());

        assert_eq!(instruction.directives.len(), 8);
        assert!(matches!(
            &instruction.directives[2],
            LayerDirective::RemoveLayer { id } if id == FILL_LAYER_ID
        ));
        assert!(matches!(
            &instruction.directives[3],
            LayerDirective::RemoveSource { .. }
        ));
        assert!(matches!(
            &instruction.directives[4],
            LayerDirective::AddSource { .. }
        ));
        assert_ne!(next, state);
    }

    #[test]
    fn empty_set_removes_layers_and_shows_empty_state() {
        let (_, state) = diff(
            &LayerState::Empty,
            &collection(&["10001"]),
            &BoundsConfig::default(),
        );
        let (instruction, next) =
            diff(&state, &AnnotatedCollection::default(), &BoundsConfig::default());

        assert_eq!(instruction.directives.len(), 4);
        assert!(instruction.directives.iter().all(|d| matches!(
            d,
            LayerDirective::RemoveLayer { .. } | LayerDirective::RemoveSource { .. }
        )));
        assert!(instruction.fit_bounds.is_none());
        assert!(instruction.show_empty_state);
        assert_eq!(next, LayerState::Empty);
    }

    #[test]
    fn empty_to_empty_only_shows_empty_state() {
        let (instruction, next) = diff(
            &LayerState::Empty,
            &AnnotatedCollection::default(),
            &BoundsConfig::default(),
        );
        assert!(instruction.directives.is_empty());
        assert!(instruction.show_empty_state);
        assert_eq!(next, LayerState::Empty);
    }

    #[test]
    fn set_of_only_malformed_features_fits_fallback() {
        let mut set = collection(&["10001"]);
        set.features[0].shape = None;
        let (instruction, _) = diff(&LayerState::Empty, &set, &BoundsConfig::default());
        assert_eq!(instruction.fit_bounds, Some(CONTINENTAL_US_BOUNDS));
    }

    #[test]
    fn hash_is_stable_and_content_sensitive() {
        let a = collection(&["10001", "10002"]);
        assert_eq!(collection_hash(&a), collection_hash(&a.clone()));
        assert_eq!(collection_hash(&a).len(), 64);
        assert_ne!(collection_hash(&a), collection_hash(&collection(&["10001"])));
    }
}
