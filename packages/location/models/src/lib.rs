#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location classification types shared across the opportunity map.
//!
//! Defines the urbanicity and opportunity tier taxonomies, the scored
//! [`LocationRecord`], filter criteria, summary shapes, and the annotated
//! feature collection that flows from the loader to the map renderer.
//! The tier thresholds live here so that scoring, filtering, summaries,
//! and the map legend all classify with the same numbers.

pub mod criteria;
pub mod feature;
pub mod record;
pub mod summary;

pub use criteria::{
    CriteriaError, DEFAULT_MAX_NET_WORTH, FilterCriteria, TierFilter, UrbanicityFilter,
    ValidatedCriteria,
};
pub use feature::{AnnotatedCollection, AnnotatedFeature};
pub use record::{LocationAttributes, LocationRecord, MarketScore};
pub use summary::{MapBounds, Metric, RegionSummary, TierCounts, TierSummary};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Opportunity (in millions) at or above which a location is [`Tier::High`].
pub const HIGH_OPPORTUNITY_THRESHOLD: f64 = 10.0;

/// Opportunity (in millions) at or above which a location is at least
/// [`Tier::Medium`].
pub const MEDIUM_OPPORTUNITY_THRESHOLD: f64 = 1.0;

/// How built-up a location is.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Urbanicity {
    /// Dense city core.
    Urban,
    /// Residential ring around a city.
    Suburban,
    /// Low-density countryside.
    Rural,
}

impl Urbanicity {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Urban, Self::Suburban, Self::Rural]
    }
}

/// Discrete opportunity classification.
///
/// Variants are declared in ascending order so the derived [`Ord`] gives
/// `Low < Medium < High`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Tier {
    /// Opportunity below [`MEDIUM_OPPORTUNITY_THRESHOLD`].
    Low,
    /// Opportunity in `[MEDIUM_OPPORTUNITY_THRESHOLD, HIGH_OPPORTUNITY_THRESHOLD)`.
    Medium,
    /// Opportunity at or above [`HIGH_OPPORTUNITY_THRESHOLD`].
    High,
}

impl Tier {
    /// Classifies an opportunity value.
    ///
    /// Total over all `f64` inputs: negative values and `NaN` classify as
    /// [`Tier::Low`].
    #[must_use]
    pub fn classify(opportunity: f64) -> Self {
        if opportunity >= HIGH_OPPORTUNITY_THRESHOLD {
            Self::High
        } else if opportunity >= MEDIUM_OPPORTUNITY_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Inclusive lower bound of this tier's opportunity range.
    #[must_use]
    pub const fn lower_bound(self) -> f64 {
        match self {
            Self::Low => 0.0,
            Self::Medium => MEDIUM_OPPORTUNITY_THRESHOLD,
            Self::High => HIGH_OPPORTUNITY_THRESHOLD,
        }
    }

    /// Exclusive upper bound of this tier's opportunity range, `None` for
    /// the open-ended top tier.
    #[must_use]
    pub const fn upper_bound(self) -> Option<f64> {
        match self {
            Self::Low => Some(MEDIUM_OPPORTUNITY_THRESHOLD),
            Self::Medium => Some(HIGH_OPPORTUNITY_THRESHOLD),
            Self::High => None,
        }
    }

    /// Fill color used for this tier on the map and in the legend.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#ef4444",
            Self::Medium => "#facc15",
            Self::High => "#16a34a",
        }
    }

    /// Returns all variants of this enum, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

/// One row of the map legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Tier this row describes.
    pub tier: Tier,
    /// Human-readable range label (e.g. `"$1M – $10M"`).
    pub label: String,
    /// Inclusive lower opportunity bound.
    pub min_opportunity: f64,
    /// Exclusive upper opportunity bound, if any.
    pub max_opportunity: Option<f64>,
    /// Fill color.
    pub color: String,
}

/// Builds the legend from the shared tier thresholds, lowest tier first.
#[must_use]
pub fn legend() -> Vec<LegendEntry> {
    Tier::all()
        .iter()
        .map(|&tier| {
            let min = tier.lower_bound();
            let max = tier.upper_bound();
            let label = match max {
                Some(max) if min <= 0.0 => format!("{tier}: under ${max}M"),
                Some(max) => format!("{tier}: ${min}M – ${max}M"),
                None => format!("{tier}: ${min}M+"),
            };
            LegendEntry {
                tier,
                label,
                min_opportunity: min,
                max_opportunity: max,
                color: tier.color().to_string(),
            }
        })
        .collect()
}
