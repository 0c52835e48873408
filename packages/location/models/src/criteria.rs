//! Filter criteria and their validation boundary.
//!
//! [`FilterCriteria`] is what the UI holds and mutates. Before it reaches
//! the filter pipeline it is turned into a [`ValidatedCriteria`] by
//! [`FilterCriteria::validate`], which clamps negative values, rejects
//! inverted ranges, and converts the divorce-rate threshold from
//! percentage points to a fraction exactly once.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

use crate::{Tier, Urbanicity};

/// Default upper end of the net-worth range, in millions.
pub const DEFAULT_MAX_NET_WORTH: f64 = 1_000.0;

/// Urbanicity selector, `All` disables the predicate.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum UrbanicityFilter {
    /// Every urbanicity passes.
    #[default]
    All,
    /// Only urban locations.
    Urban,
    /// Only suburban locations.
    Suburban,
    /// Only rural locations.
    Rural,
}

impl UrbanicityFilter {
    /// Whether a location of the given urbanicity passes.
    #[must_use]
    pub const fn admits(self, urbanicity: Urbanicity) -> bool {
        matches!(
            (self, urbanicity),
            (Self::All, _)
                | (Self::Urban, Urbanicity::Urban)
                | (Self::Suburban, Urbanicity::Suburban)
                | (Self::Rural, Urbanicity::Rural)
        )
    }
}

impl From<Urbanicity> for UrbanicityFilter {
    fn from(value: Urbanicity) -> Self {
        match value {
            Urbanicity::Urban => Self::Urban,
            Urbanicity::Suburban => Self::Suburban,
            Urbanicity::Rural => Self::Rural,
        }
    }
}

/// Opportunity tier selector, `All` disables the predicate.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum TierFilter {
    /// Every tier passes.
    #[default]
    All,
    /// Only low-tier locations.
    Low,
    /// Only medium-tier locations.
    Medium,
    /// Only high-tier locations.
    High,
}

impl TierFilter {
    /// Whether a location of the given tier passes.
    #[must_use]
    pub const fn admits(self, tier: Tier) -> bool {
        matches!(
            (self, tier),
            (Self::All, _)
                | (Self::Low, Tier::Low)
                | (Self::Medium, Tier::Medium)
                | (Self::High, Tier::High)
        )
    }
}

impl From<Tier> for TierFilter {
    fn from(value: Tier) -> Self {
        match value {
            Tier::Low => Self::Low,
            Tier::Medium => Self::Medium,
            Tier::High => Self::High,
        }
    }
}

/// Filter state as held by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Urbanicity selector.
    pub urbanicity: UrbanicityFilter,
    /// Opportunity tier selector.
    pub opportunity_tier: TierFilter,
    /// Inclusive net-worth range in millions, `(min, max)`.
    pub net_worth_range: (f64, f64),
    /// Minimum divorce rate in percentage points (inclusive).
    pub divorce_rate_threshold: f64,
    /// Exclude locations that already have an office.
    pub hide_existing_offices: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            urbanicity: UrbanicityFilter::All,
            opportunity_tier: TierFilter::All,
            net_worth_range: (0.0, DEFAULT_MAX_NET_WORTH),
            divorce_rate_threshold: 0.0,
            hide_existing_offices: false,
        }
    }
}

/// Errors raised while validating [`FilterCriteria`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CriteriaError {
    /// The net-worth range minimum exceeds its maximum.
    #[error("Invalid net worth range: min {min} exceeds max {max}")]
    InvertedRange {
        /// Clamped minimum.
        min: f64,
        /// Clamped maximum.
        max: f64,
    },
}

impl FilterCriteria {
    /// Clamps and normalizes these criteria for the filter pipeline.
    ///
    /// Negative and `NaN` bounds and thresholds are clamped to `0`. The
    /// divorce-rate threshold is converted from percentage points to a
    /// fraction.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::InvertedRange`] if the clamped net-worth
    /// minimum exceeds the clamped maximum.
    pub fn validate(&self) -> Result<ValidatedCriteria, CriteriaError> {
        let min = clamp_non_negative(self.net_worth_range.0);
        let max = clamp_non_negative(self.net_worth_range.1);
        if min > max {
            return Err(CriteriaError::InvertedRange { min, max });
        }

        Ok(ValidatedCriteria {
            urbanicity: self.urbanicity,
            opportunity_tier: self.opportunity_tier,
            min_net_worth: min,
            max_net_worth: max,
            min_divorce_rate: clamp_non_negative(self.divorce_rate_threshold) / 100.0,
            hide_existing_offices: self.hide_existing_offices,
        })
    }
}

fn clamp_non_negative(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

/// Criteria that passed [`FilterCriteria::validate`].
///
/// Fields are private so the invariants (`0 <= min <= max`, fractional
/// divorce threshold) cannot be bypassed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedCriteria {
    urbanicity: UrbanicityFilter,
    opportunity_tier: TierFilter,
    min_net_worth: f64,
    max_net_worth: f64,
    min_divorce_rate: f64,
    hide_existing_offices: bool,
}

impl Default for ValidatedCriteria {
    fn default() -> Self {
        Self {
            urbanicity: UrbanicityFilter::All,
            opportunity_tier: TierFilter::All,
            min_net_worth: 0.0,
            max_net_worth: f64::INFINITY,
            min_divorce_rate: 0.0,
            hide_existing_offices: false,
        }
    }
}

impl ValidatedCriteria {
    /// Urbanicity selector.
    #[must_use]
    pub const fn urbanicity(&self) -> UrbanicityFilter {
        self.urbanicity
    }

    /// Opportunity tier selector.
    #[must_use]
    pub const fn opportunity_tier(&self) -> TierFilter {
        self.opportunity_tier
    }

    /// Inclusive net-worth range in millions.
    #[must_use]
    pub const fn net_worth_range(&self) -> (f64, f64) {
        (self.min_net_worth, self.max_net_worth)
    }

    /// Minimum divorce rate as a fraction.
    #[must_use]
    pub const fn min_divorce_rate(&self) -> f64 {
        self.min_divorce_rate
    }

    /// Whether locations with an existing office are excluded.
    #[must_use]
    pub const fn hide_existing_offices(&self) -> bool {
        self.hide_existing_offices
    }
}
