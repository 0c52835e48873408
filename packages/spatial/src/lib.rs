#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Viewport bounds and spatial lookups for annotated features.
//!
//! [`BoundsConfig::bounds`] computes the padded bounding box the map
//! should fit to after a re-filter. [`FeatureIndex`] builds an R-tree
//! over feature geometries for click-by-coordinate and viewport queries.
//! Both flatten every coordinate of every geometry type, so points,
//! polygons, and multi-polygons can be mixed freely.

use geo::{Contains, CoordsIter};
use opportunity_map_location_models::{AnnotatedCollection, MapBounds};
use rstar::{AABB, RTree, RTreeObject};
use serde::{Deserialize, Serialize};

/// Fallback viewport when nothing is retained: the contiguous United
/// States.
pub const CONTINENTAL_US_BOUNDS: MapBounds = MapBounds {
    min_lat: 24.396_308,
    max_lat: 49.384_358,
    min_lng: -124.848_974,
    max_lng: -66.885_444,
};

/// Fraction of each axis span added on both sides of the raw bounds.
pub const DEFAULT_PADDING_FRACTION: f64 = 0.1;

/// Smallest padding in degrees, so single points still get a viewport.
pub const DEFAULT_MIN_PADDING_DEGREES: f64 = 0.01;

/// How raw bounds are expanded and what to use when there are none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct BoundsConfig {
    /// Fraction of each axis span added on both sides.
    pub padding_fraction: f64,
    /// Minimum padding in degrees on each side.
    pub min_padding_degrees: f64,
    /// Viewport returned for an empty set.
    pub fallback: MapBounds,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            padding_fraction: DEFAULT_PADDING_FRACTION,
            min_padding_degrees: DEFAULT_MIN_PADDING_DEGREES,
            fallback: CONTINENTAL_US_BOUNDS,
        }
    }
}

impl BoundsConfig {
    /// Padded bounds covering every finite coordinate of `geometries`, or
    /// the fallback box when there are none.
    #[must_use]
    pub fn bounds<'a>(
        &self,
        geometries: impl IntoIterator<Item = &'a geo::Geometry<f64>>,
    ) -> MapBounds {
        raw_bounds(geometries).map_or(self.fallback, |raw| self.pad(raw))
    }

    /// Expands `raw` by the configured padding on every side.
    #[must_use]
    pub fn pad(&self, raw: MapBounds) -> MapBounds {
        let padding_fraction = self.padding_fraction.max(0.0);
        let min_padding = self.min_padding_degrees.max(0.0);
        let lat_pad = ((raw.max_lat - raw.min_lat) * padding_fraction).max(min_padding);
        let lng_pad = ((raw.max_lng - raw.min_lng) * padding_fraction).max(min_padding);

        MapBounds {
            min_lat: raw.min_lat - lat_pad,
            max_lat: raw.max_lat + lat_pad,
            min_lng: raw.min_lng - lng_pad,
            max_lng: raw.max_lng + lng_pad,
        }
    }
}

/// Padded bounds with the default configuration.
#[must_use]
pub fn bounds<'a>(geometries: impl IntoIterator<Item = &'a geo::Geometry<f64>>) -> MapBounds {
    BoundsConfig::default().bounds(geometries)
}

/// Minimal axis-aligned box over every finite coordinate, `None` if there
/// are no coordinates.
#[must_use]
pub fn raw_bounds<'a>(
    geometries: impl IntoIterator<Item = &'a geo::Geometry<f64>>,
) -> Option<MapBounds> {
    let mut acc: Option<MapBounds> = None;

    for geometry in geometries {
        for coord in geometry.coords_iter() {
            if !coord.x.is_finite() || !coord.y.is_finite() {
                continue;
            }
            acc = Some(match acc {
                None => MapBounds {
                    min_lat: coord.y,
                    max_lat: coord.y,
                    min_lng: coord.x,
                    max_lng: coord.x,
                },
                Some(b) => MapBounds {
                    min_lat: b.min_lat.min(coord.y),
                    max_lat: b.max_lat.max(coord.y),
                    min_lng: b.min_lng.min(coord.x),
                    max_lng: b.max_lng.max(coord.x),
                },
            });
        }
    }

    acc
}

/// A feature geometry stored in the R-tree with its identifier.
struct FeatureEntry {
    id: String,
    envelope: AABB<[f64; 2]>,
    shape: geo::Geometry<f64>,
}

impl RTreeObject for FeatureEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree over the well-formed features of a collection.
///
/// Features without an identifier or geometry are not indexed, so they
/// can never be the target of a click.
pub struct FeatureIndex {
    features: RTree<FeatureEntry>,
}

impl FeatureIndex {
    /// Indexes every well-formed feature of `collection`.
    #[must_use]
    pub fn build(collection: &AnnotatedCollection) -> Self {
        let entries: Vec<FeatureEntry> = collection
            .features
            .iter()
            .filter_map(|feature| {
                let id = feature.id.as_ref()?;
                let shape = feature.shape.as_ref()?;
                let raw = raw_bounds(std::iter::once(shape))?;
                Some(FeatureEntry {
                    id: id.clone(),
                    envelope: envelope(&raw),
                    shape: shape.clone(),
                })
            })
            .collect();

        log::debug!(
            "Indexed {} of {} features",
            entries.len(),
            collection.len()
        );

        Self {
            features: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.size()
    }

    /// Whether nothing was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.size() == 0
    }

    /// Identifier of the feature containing the point.
    ///
    /// ZIP polygons tile without overlap, so the first match wins.
    #[must_use]
    pub fn locate(&self, lng: f64, lat: f64) -> Option<&str> {
        let point = geo::Point::new(lng, lat);
        let query_env = AABB::from_point([lng, lat]);

        self.features
            .locate_in_envelope_intersecting(&query_env)
            .find(|entry| entry.shape.contains(&point))
            .map(|entry| entry.id.as_str())
    }

    /// Identifiers of features whose envelopes intersect `viewport`,
    /// sorted for stable output.
    #[must_use]
    pub fn visible(&self, viewport: &MapBounds) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .features
            .locate_in_envelope_intersecting(&envelope(viewport))
            .map(|entry| entry.id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }
}

fn envelope(bounds: &MapBounds) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [bounds.min_lng, bounds.min_lat],
        [bounds.max_lng, bounds.max_lat],
    )
}
