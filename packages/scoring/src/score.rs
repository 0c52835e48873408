//! Market sizing and opportunity scoring.

use opportunity_map_location_models::MarketScore;
use serde::{Deserialize, Serialize};

use crate::ScoreError;

/// Fraction of TAM that is realistically serviceable.
///
/// Always within `[0, 1]`, so `sam <= tam` holds for any ratio.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SamRatio(f64);

impl SamRatio {
    /// Creates a ratio, clamping into `[0, 1]` (`NaN` becomes `0`).
    #[must_use]
    pub fn new(ratio: f64) -> Self {
        if ratio.is_nan() {
            Self(0.0)
        } else {
            Self(ratio.clamp(0.0, 1.0))
        }
    }

    /// The ratio value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

/// The band SAM ratios are drawn from.
///
/// This is the one tunable in scoring that is not derived from data; it
/// defaults to `[0.5, 0.8]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamRatioBand {
    min: f64,
    max: f64,
}

impl Default for SamRatioBand {
    fn default() -> Self {
        Self { min: 0.5, max: 0.8 }
    }
}

impl SamRatioBand {
    /// Creates a band.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidSamBand`] unless `0 <= min <= max <= 1`.
    pub fn new(min: f64, max: f64) -> Result<Self, ScoreError> {
        if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) || min > max {
            return Err(ScoreError::InvalidSamBand { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower edge of the band.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper edge of the band.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// The ratio at position `t` in `[0, 1]` along the band.
    #[must_use]
    pub fn ratio_at(&self, t: f64) -> SamRatio {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        SamRatio::new((self.max - self.min).mul_add(t, self.min))
    }

    /// Band midpoint, for callers that need a fixed ratio.
    #[must_use]
    pub fn midpoint(&self) -> SamRatio {
        self.ratio_at(0.5)
    }

    /// Whether `ratio` lies inside the band.
    #[must_use]
    pub fn contains(&self, ratio: f64) -> bool {
        (self.min..=self.max).contains(&ratio)
    }
}

/// Scores a location.
///
/// Negative or `NaN` net worth is treated as `0`; divorce rate is clamped
/// into `[0, 1]`. Outputs are always non-negative and `sam <= tam`.
#[must_use]
pub fn score(
    net_worth: f64,
    divorce_rate: f64,
    competitor_count: u32,
    sam_ratio: SamRatio,
) -> MarketScore {
    let net_worth = non_negative(net_worth);
    let divorce_rate = non_negative(divorce_rate).min(1.0);

    let tam = (net_worth * 10.0 * divorce_rate.mul_add(10.0, 1.0)).round();
    let sam = (tam * sam_ratio.value()).round().min(tam);
    let opportunity = tam * divorce_rate / (f64::from(competitor_count) + 1.0);

    MarketScore {
        tam,
        sam,
        opportunity,
    }
}

/// Scores a location whose competitor count came from untyped input.
///
/// # Errors
///
/// Returns [`ScoreError::NegativeCompetitorCount`] if `competitor_count`
/// is below zero.
pub fn score_checked(
    net_worth: f64,
    divorce_rate: f64,
    competitor_count: i64,
    sam_ratio: SamRatio,
) -> Result<MarketScore, ScoreError> {
    if competitor_count < 0 {
        return Err(ScoreError::NegativeCompetitorCount {
            count: competitor_count,
        });
    }
    let competitors = u32::try_from(competitor_count).unwrap_or(u32::MAX);
    Ok(score(net_worth, divorce_rate, competitors, sam_ratio))
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example() {
        let band = SamRatioBand::default();
        for t in [0.0, 0.25, 0.5, 1.0] {
            let result = score(5.0, 0.06, 2, band.ratio_at(t));
            assert!((result.tam - 80.0).abs() < f64::EPSILON);
            assert!(
                (40.0..=64.0).contains(&result.sam),
                "sam {} outside [40, 64]",
                result.sam
            );
            assert!((result.opportunity - 1.6).abs() < 1e-9);
        }
    }

    #[test]
    fn sam_never_exceeds_tam() {
        for net_worth in [0.0, 0.3, 1.0, 4.7, 9.99, 250.0] {
            for divorce_rate in [0.0, 0.02, 0.055, 0.1, 1.0] {
                for ratio in [0.0, 0.5, 0.8, 1.0] {
                    let result = score(net_worth, divorce_rate, 0, SamRatio::new(ratio));
                    assert!(result.sam >= 0.0);
                    assert!(
                        result.sam <= result.tam,
                        "sam {} > tam {} for nw={net_worth} dr={divorce_rate}",
                        result.sam,
                        result.tam
                    );
                }
            }
        }
    }

    #[test]
    fn opportunity_shrinks_with_competitors() {
        let ratio = SamRatioBand::default().midpoint();
        let mut previous = f64::INFINITY;
        for competitors in [0, 1, 2, 5, 50, 5_000, u32::MAX] {
            let result = score(8.0, 0.08, competitors, ratio);
            assert!(result.opportunity < previous);
            previous = result.opportunity;
        }
        assert!(previous < 1e-6);
    }

    #[test]
    fn bad_inputs_never_produce_negative_or_nan() {
        let ratio = SamRatio::new(f64::NAN);
        for net_worth in [-3.0, f64::NAN, f64::INFINITY] {
            let result = score(net_worth, -0.5, 0, ratio);
            assert!(result.tam.abs() < f64::EPSILON);
            assert!(result.sam.abs() < f64::EPSILON);
            assert!(result.opportunity.abs() < f64::EPSILON);
        }
    }

    #[test]
    fn negative_competitor_count_is_rejected() {
        let ratio = SamRatioBand::default().midpoint();
        assert_eq!(
            score_checked(5.0, 0.06, -1, ratio),
            Err(ScoreError::NegativeCompetitorCount { count: -1 })
        );
        assert!(score_checked(5.0, 0.06, 3, ratio).is_ok());
    }

    #[test]
    fn band_validation() {
        assert!(SamRatioBand::new(0.5, 0.8).is_ok());
        assert!(SamRatioBand::new(0.8, 0.5).is_err());
        assert!(SamRatioBand::new(-0.1, 0.5).is_err());
        assert!(SamRatioBand::new(0.5, 1.2).is_err());
        let band = SamRatioBand::default();
        assert!(band.contains(band.ratio_at(0.37).value()));
        assert!((band.midpoint().value() - 0.65).abs() < 1e-12);
    }
}
