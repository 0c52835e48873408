#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map layer synchronization.
//!
//! The map shows one `GeoJSON` source with three layers on top of it
//! (tier-colored fill, border, label). Whenever the filtered set changes
//! the whole stack is replaced. [`diff`] models that replacement as a
//! small state machine over [`LayerState`], producing a
//! [`RenderInstruction`] that a [`MapAdapter`] applies to the real map.

pub mod controller;
pub mod diff;
pub mod layers;

pub use controller::{MapAdapter, MapSyncController, NullMapAdapter};
pub use diff::{LayerState, RenderInstruction, collection_hash, diff};
pub use layers::{LayerDirective, LayerKind, LayerSpec};

/// Identifier of the `GeoJSON` source holding the annotated features.
pub const SOURCE_ID: &str = "opportunity-source";
/// Identifier of the tier-colored fill layer.
pub const FILL_LAYER_ID: &str = "opportunity-fill";
/// Identifier of the polygon border layer.
pub const BORDER_LAYER_ID: &str = "opportunity-border";
/// Identifier of the ZIP label layer.
pub const LABEL_LAYER_ID: &str = "opportunity-labels";
