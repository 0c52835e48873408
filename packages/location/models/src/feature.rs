//! Annotated map features.
//!
//! An [`AnnotatedFeature`] pairs a raw `GeoJSON` feature with the
//! [`LocationRecord`] computed for it. The raw geometry is carried
//! through untouched; only properties are completed.

use geojson::{Feature, FeatureCollection, JsonObject};

use crate::LocationRecord;

/// A raw feature together with its scored record.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedFeature {
    /// Position of the feature in the source collection.
    pub index: usize,
    /// Location identifier read from the feature's properties. `None` for
    /// malformed features, which are excluded from click resolution.
    pub id: Option<String>,
    /// Scored record for this feature.
    pub record: LocationRecord,
    /// Original `GeoJSON` geometry, passed to the renderer unchanged.
    pub geometry: Option<geojson::Geometry>,
    /// Parsed geometry used for bounds and spatial lookups. `None` when
    /// the geometry is missing or invalid.
    pub shape: Option<geo::Geometry<f64>>,
    /// Completed properties (source values plus filled-in record fields).
    pub properties: JsonObject,
}

impl AnnotatedFeature {
    /// Whether this feature has both an identifier and a usable geometry.
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        self.id.is_some() && self.shape.is_some()
    }

    /// Converts back into a `GeoJSON` feature for the renderer.
    #[must_use]
    pub fn to_feature(&self) -> Feature {
        Feature {
            bbox: None,
            geometry: self.geometry.clone(),
            id: self.id.clone().map(geojson::feature::Id::String),
            properties: Some(self.properties.clone()),
            foreign_members: None,
        }
    }
}

/// An ordered set of annotated features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotatedCollection {
    /// Features in source order.
    pub features: Vec<AnnotatedFeature>,
}

impl AnnotatedCollection {
    /// Wraps a list of annotated features.
    #[must_use]
    pub const fn new(features: Vec<AnnotatedFeature>) -> Self {
        Self { features }
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterates the records of all features.
    pub fn records(&self) -> impl Iterator<Item = &LocationRecord> {
        self.features.iter().map(|f| &f.record)
    }

    /// Iterates parsed geometries of well-formed features.
    pub fn shapes(&self) -> impl Iterator<Item = &geo::Geometry<f64>> {
        self.features
            .iter()
            .filter(|f| f.is_well_formed())
            .filter_map(|f| f.shape.as_ref())
    }

    /// Finds a feature's record by identifier.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&LocationRecord> {
        self.features
            .iter()
            .find(|f| f.id.as_deref() == Some(id))
            .map(|f| &f.record)
    }

    /// Converts into a `GeoJSON` feature collection for the renderer.
    #[must_use]
    pub fn to_feature_collection(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.features.iter().map(AnnotatedFeature::to_feature).collect(),
            foreign_members: None,
        }
    }
}

impl FromIterator<AnnotatedFeature> for AnnotatedCollection {
    fn from_iter<T: IntoIterator<Item = AnnotatedFeature>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
