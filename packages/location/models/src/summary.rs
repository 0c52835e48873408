//! Aggregate shapes consumed by summary panels and the map viewport.

use serde::{Deserialize, Serialize};

use crate::Tier;

/// Count of locations per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCounts {
    /// Locations classified [`Tier::Low`].
    pub low: u64,
    /// Locations classified [`Tier::Medium`].
    pub medium: u64,
    /// Locations classified [`Tier::High`].
    pub high: u64,
}

impl TierCounts {
    /// Increments the counter for `tier`.
    pub const fn record(&mut self, tier: Tier) {
        match tier {
            Tier::Low => self.low += 1,
            Tier::Medium => self.medium += 1,
            Tier::High => self.high += 1,
        }
    }

    /// Returns the count for `tier`.
    #[must_use]
    pub const fn get(&self, tier: Tier) -> u64 {
        match tier {
            Tier::Low => self.low,
            Tier::Medium => self.medium,
            Tier::High => self.high,
        }
    }

    /// Sum across all tiers.
    #[must_use]
    pub const fn sum(&self) -> u64 {
        self.low + self.medium + self.high
    }
}

/// Tier breakdown of a filtered set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierSummary {
    /// Per-tier counts. Always sums to `total`.
    pub tier_counts: TierCounts,
    /// Number of locations in the set.
    pub total: u64,
}

/// A single labelled value in a [`RegionSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Display label.
    pub label: String,
    /// Formatted value.
    pub value: String,
}

impl Metric {
    /// Creates a metric from a label and anything displayable.
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl std::fmt::Display) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
        }
    }
}

/// Summary panel contents for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    /// Region name.
    pub region: String,
    /// Ordered metrics.
    pub metrics: Vec<Metric>,
}

impl RegionSummary {
    /// Looks up a metric value by label.
    #[must_use]
    pub fn metric(&self, label: &str) -> Option<&str> {
        self.metrics
            .iter()
            .find(|m| m.label == label)
            .map(|m| m.value.as_str())
    }
}

/// Axis-aligned geographic bounding box in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapBounds {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lng: f64,
    /// Eastern edge.
    pub max_lng: f64,
}

impl MapBounds {
    /// Whether the point lies inside or on the edge of these bounds.
    #[must_use]
    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        (self.min_lng..=self.max_lng).contains(&lng) && (self.min_lat..=self.max_lat).contains(&lat)
    }

    /// Formats as `west,south,east,north`, the order map libraries expect
    /// for `fitBounds` and bbox query strings.
    #[must_use]
    pub fn to_bbox_string(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lng, self.min_lat, self.max_lng, self.max_lat
        )
    }
}
