//! Applies render instructions to a map and resolves clicks.

use opportunity_map_location_models::{AnnotatedCollection, LocationRecord, MapBounds};
use opportunity_map_scoring::{Seed, SynthesisOverrides, Synthesizer};
use opportunity_map_spatial::{BoundsConfig, FeatureIndex};

use crate::diff::{LayerState, RenderInstruction, diff};
use crate::layers::{self, LayerDirective};

/// Rendering backend the controller drives.
///
/// Implementations must be `Send + Sync` so a controller can live inside
/// shared session state.
pub trait MapAdapter: Send + Sync {
    /// Apply layer and source directives in order.
    fn set_layers(&self, directives: &[LayerDirective]);

    /// Move the viewport to `bounds`.
    fn fit_bounds(&self, bounds: MapBounds);

    /// Show or hide the "no matching locations" overlay.
    fn set_empty_state(&self, visible: bool);
}

/// A [`MapAdapter`] that ignores every call.
///
/// Useful for the CLI and tests that only need the returned
/// [`RenderInstruction`]s.
pub struct NullMapAdapter;

impl MapAdapter for NullMapAdapter {
    fn set_layers(&self, _directives: &[LayerDirective]) {}
    fn fit_bounds(&self, _bounds: MapBounds) {}
    fn set_empty_state(&self, _visible: bool) {}
}

/// Keeps one map in sync with the current filtered set.
pub struct MapSyncController<A: MapAdapter> {
    adapter: A,
    bounds: BoundsConfig,
    synthesizer: Synthesizer,
    defaults: SynthesisOverrides,
    state: LayerState,
    current: AnnotatedCollection,
    index: FeatureIndex,
}

impl<A: MapAdapter> MapSyncController<A> {
    /// Creates a controller with nothing rendered.
    #[must_use]
    pub fn new(adapter: A, bounds: BoundsConfig, synthesizer: Synthesizer) -> Self {
        let current = AnnotatedCollection::default();
        let index = FeatureIndex::build(&current);
        Self {
            adapter,
            bounds,
            synthesizer,
            defaults: SynthesisOverrides::default(),
            state: LayerState::Empty,
            current,
            index,
        }
    }

    /// The adapter this controller drives.
    #[must_use]
    pub const fn adapter(&self) -> &A {
        &self.adapter
    }

    /// What is currently rendered.
    #[must_use]
    pub const fn state(&self) -> &LayerState {
        &self.state
    }

    /// The collection last synced.
    #[must_use]
    pub const fn current(&self) -> &AnnotatedCollection {
        &self.current
    }

    /// Sets the city and state given to synthesized click records, e.g.
    /// the selected region's. `None` lets the synthesizer pick.
    pub fn set_location_defaults(&mut self, city: Option<String>, state: Option<String>) {
        self.defaults = SynthesisOverrides {
            city,
            state,
            ..SynthesisOverrides::default()
        };
    }

    /// Brings the map in line with `collection` and returns what was
    /// applied. An unchanged collection applies nothing.
    pub fn sync(&mut self, collection: &AnnotatedCollection) -> RenderInstruction {
        let (instruction, next) = diff(&self.state, collection, &self.bounds);

        if !instruction.is_noop() {
            self.apply(&instruction);
            self.current = collection.clone();
            self.index = FeatureIndex::build(&self.current);
        }
        self.state = next;

        instruction
    }

    /// Removes everything rendered without showing the empty state, e.g.
    /// while a new region is loading.
    pub fn clear(&mut self) -> RenderInstruction {
        let directives = if matches!(self.state, LayerState::Rendered { .. }) {
            layers::teardown()
        } else {
            Vec::new()
        };
        let instruction = RenderInstruction {
            directives,
            fit_bounds: None,
            show_empty_state: false,
        };

        if !instruction.directives.is_empty() {
            self.adapter.set_layers(&instruction.directives);
        }
        self.adapter.set_empty_state(false);
        self.state = LayerState::Empty;
        self.current = AnnotatedCollection::default();
        self.index = FeatureIndex::build(&self.current);

        instruction
    }

    /// Record for a clicked feature identifier.
    ///
    /// Looks the identifier up in the current set; unknown identifiers
    /// are synthesized with the location defaults so every non-empty
    /// identifier yields a record.
    #[must_use]
    pub fn resolve_click(&self, identifier: &str) -> Option<LocationRecord> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }

        if let Some(record) = self.current.find(identifier) {
            return Some(record.clone());
        }

        log::debug!("{identifier} is not in the current set; synthesizing");
        Some(
            self.synthesizer
                .synthesize(&Seed::from_identifier(identifier), &self.defaults),
        )
    }

    /// Record for the feature under a clicked coordinate, if any.
    #[must_use]
    pub fn resolve_point(&self, lng: f64, lat: f64) -> Option<LocationRecord> {
        self.index
            .locate(lng, lat)
            .and_then(|id| self.current.find(id))
            .cloned()
    }

    /// Records of the current set whose geometry intersects `viewport`,
    /// ordered by identifier.
    #[must_use]
    pub fn resolve_viewport(&self, viewport: &MapBounds) -> Vec<LocationRecord> {
        self.index
            .visible(viewport)
            .into_iter()
            .filter_map(|id| self.current.find(id))
            .cloned()
            .collect()
    }

    fn apply(&self, instruction: &RenderInstruction) {
        if !instruction.directives.is_empty() {
            self.adapter.set_layers(&instruction.directives);
        }
        if let Some(bounds) = instruction.fit_bounds {
            self.adapter.fit_bounds(bounds);
        }
        self.adapter.set_empty_state(instruction.show_empty_state);
    }
}
