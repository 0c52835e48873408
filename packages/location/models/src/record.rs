//! Scored location records.

use serde::{Deserialize, Serialize};

use crate::{Tier, Urbanicity};

/// The raw demographic and financial inputs for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAttributes {
    /// Location identifier (usually a ZIP code).
    pub id: String,
    /// City name.
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Urbanicity classification.
    pub urbanicity: Urbanicity,
    /// Median household net worth in millions.
    pub net_worth: f64,
    /// Divorce rate as a fraction in `[0, 1]`.
    pub divorce_rate: f64,
    /// Number of competing offices in the area.
    pub competitor_count: u32,
    /// Whether the firm already has an office here.
    pub has_office: bool,
}

/// Market sizing derived from a location's attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketScore {
    /// Total addressable market in millions.
    pub tam: f64,
    /// Serviceable addressable market in millions. Never exceeds `tam`.
    pub sam: f64,
    /// Competitor-discounted opportunity in millions.
    pub opportunity: f64,
}

/// A fully-populated, scored location.
///
/// Built only through [`LocationRecord::scored`] so that `tier` always
/// agrees with `opportunity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    /// Location identifier (usually a ZIP code).
    pub id: String,
    /// City name.
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Urbanicity classification.
    pub urbanicity: Urbanicity,
    /// Median household net worth in millions.
    pub net_worth: f64,
    /// Divorce rate as a fraction in `[0, 1]`.
    pub divorce_rate: f64,
    /// Number of competing offices in the area.
    pub competitor_count: u32,
    /// Whether the firm already has an office here.
    pub has_office: bool,
    /// Total addressable market in millions.
    pub tam: f64,
    /// Serviceable addressable market in millions.
    pub sam: f64,
    /// Competitor-discounted opportunity in millions.
    pub opportunity: f64,
    /// Tier derived from `opportunity`.
    pub tier: Tier,
}

impl LocationRecord {
    /// Combines attributes with their market score and derives the tier.
    #[must_use]
    pub fn scored(attributes: LocationAttributes, score: MarketScore) -> Self {
        let LocationAttributes {
            id,
            city,
            state,
            urbanicity,
            net_worth,
            divorce_rate,
            competitor_count,
            has_office,
        } = attributes;

        Self {
            id,
            city,
            state,
            urbanicity,
            net_worth,
            divorce_rate,
            competitor_count,
            has_office,
            tam: score.tam,
            sam: score.sam,
            opportunity: score.opportunity,
            tier: Tier::classify(score.opportunity),
        }
    }

    /// Divorce rate expressed in percentage points.
    #[must_use]
    pub fn divorce_rate_percent(&self) -> f64 {
        self.divorce_rate * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes() -> LocationAttributes {
        LocationAttributes {
            id: "10001".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            urbanicity: Urbanicity::Urban,
            net_worth: 5.0,
            divorce_rate: 0.06,
            competitor_count: 2,
            has_office: false,
        }
    }

    #[test]
    fn scored_derives_tier_from_opportunity() {
        let record = LocationRecord::scored(
            attributes(),
            MarketScore {
                tam: 80.0,
                sam: 52.0,
                opportunity: 1.6,
            },
        );
        assert_eq!(record.tier, Tier::Medium);
        assert!((record.divorce_rate_percent() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let record = LocationRecord::scored(
            attributes(),
            MarketScore {
                tam: 80.0,
                sam: 52.0,
                opportunity: 12.0,
            },
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["netWorth"], 5.0);
        assert_eq!(json["competitorCount"], 2);
        assert_eq!(json["hasOffice"], false);
        assert_eq!(json["tier"], "High");
        assert_eq!(json["urbanicity"], "Urban");
    }
}
