//! Deterministic attribute synthesis.
//!
//! [`Synthesizer::synthesize`] always draws the same values from the
//! seed's PRNG in the same order, whether or not a field is overridden.
//! Overriding one field therefore never shifts the values synthesized for
//! the others.

use opportunity_map_location_models::{LocationAttributes, LocationRecord, Urbanicity};
use rand::Rng as _;

use crate::score::{SamRatioBand, score};
use crate::seed::Seed;

/// Synthesized net worth range in millions, `[min, max)`.
pub const NET_WORTH_RANGE: (f64, f64) = (1.0, 10.0);

/// Synthesized divorce rate range as a fraction, `[min, max)`.
pub const DIVORCE_RATE_RANGE: (f64, f64) = (0.02, 0.10);

/// Largest synthesized competitor count.
pub const MAX_SYNTHESIZED_COMPETITORS: u32 = 5;

/// Cities used for synthesized records when none is supplied.
const CITIES: &[(&str, &str)] = &[
    ("New York", "NY"),
    ("Los Angeles", "CA"),
    ("Chicago", "IL"),
    ("Houston", "TX"),
    ("Phoenix", "AZ"),
    ("Philadelphia", "PA"),
    ("San Antonio", "TX"),
    ("San Diego", "CA"),
    ("Dallas", "TX"),
    ("Austin", "TX"),
    ("Miami", "FL"),
    ("Seattle", "WA"),
];

/// Field values supplied by the caller instead of being synthesized.
///
/// Present values are kept verbatim (negative numbers are clamped to 0).
/// The target ranges only adjust values that were synthesized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesisOverrides {
    /// Record identifier; defaults to the seed label.
    pub id: Option<String>,
    /// City name.
    pub city: Option<String>,
    /// State abbreviation.
    pub state: Option<String>,
    /// Urbanicity.
    pub urbanicity: Option<Urbanicity>,
    /// Net worth in millions.
    pub net_worth: Option<f64>,
    /// Divorce rate as a fraction.
    pub divorce_rate: Option<f64>,
    /// Competitor count.
    pub competitor_count: Option<u32>,
    /// Existing office flag.
    pub has_office: Option<bool>,
    /// Opportunity reported by the data source. When present it is kept
    /// instead of the computed value.
    pub reported_opportunity: Option<f64>,
    /// Inclusive range a synthesized net worth must fall within.
    pub net_worth_range: Option<(f64, f64)>,
    /// Inclusive range a synthesized divorce rate must fall within.
    pub divorce_rate_range: Option<(f64, f64)>,
}

/// Builds [`LocationRecord`]s from seeds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Synthesizer {
    sam_band: SamRatioBand,
}

impl Synthesizer {
    /// Creates a synthesizer drawing SAM ratios from `sam_band`.
    #[must_use]
    pub const fn new(sam_band: SamRatioBand) -> Self {
        Self { sam_band }
    }

    /// The SAM ratio band in use.
    #[must_use]
    pub const fn sam_band(&self) -> SamRatioBand {
        self.sam_band
    }

    /// Synthesizes a fully-populated, scored record for `seed`.
    #[must_use]
    pub fn synthesize(&self, seed: &Seed, overrides: &SynthesisOverrides) -> LocationRecord {
        let mut rng = seed.rng();

        // Draw order is part of the determinism contract; append only.
        let base_net_worth = rng.random_range(NET_WORTH_RANGE.0..NET_WORTH_RANGE.1);
        let base_divorce_rate = rng.random_range(DIVORCE_RATE_RANGE.0..DIVORCE_RATE_RANGE.1);
        let base_competitors = rng.random_range(0..=MAX_SYNTHESIZED_COMPETITORS);
        let sam_position: f64 = rng.random();
        let city_index = rng.random_range(0..CITIES.len());
        let net_worth_shift: f64 = rng.random();
        let divorce_shift: f64 = rng.random();

        let net_worth = overrides.net_worth.map_or_else(
            || fit_to_range(base_net_worth, overrides.net_worth_range, net_worth_shift),
            clamp_non_negative,
        );
        let divorce_rate = overrides.divorce_rate.map_or_else(
            || fit_to_range(base_divorce_rate, overrides.divorce_rate_range, divorce_shift),
            |rate| clamp_non_negative(rate).min(1.0),
        );
        let competitor_count = overrides.competitor_count.unwrap_or(base_competitors);

        let (default_city, default_state) = CITIES[city_index];
        let attributes = LocationAttributes {
            id: overrides
                .id
                .clone()
                .unwrap_or_else(|| seed.label().to_string()),
            city: overrides
                .city
                .clone()
                .unwrap_or_else(|| default_city.to_string()),
            state: overrides
                .state
                .clone()
                .unwrap_or_else(|| default_state.to_string()),
            urbanicity: overrides.urbanicity.unwrap_or_else(|| seed.urbanicity()),
            net_worth,
            divorce_rate,
            competitor_count,
            has_office: overrides.has_office.unwrap_or(false),
        };

        let mut market = score(
            net_worth,
            divorce_rate,
            competitor_count,
            self.sam_band.ratio_at(sam_position),
        );
        if let Some(reported) = overrides.reported_opportunity {
            market.opportunity = clamp_non_negative(reported);
        }

        log::trace!(
            "Synthesized {} (seed {}): opportunity {:.3}",
            attributes.id,
            seed.value(),
            market.opportunity
        );

        LocationRecord::scored(attributes, market)
    }
}

/// Moves `value` into `range` when it falls outside, using `shift` in
/// `[0, 1)` to pick the replacement. Inverted ranges are reordered.
fn fit_to_range(value: f64, range: Option<(f64, f64)>, shift: f64) -> f64 {
    let Some((a, b)) = range else {
        return value;
    };
    let min = clamp_non_negative(a.min(b));
    let max = clamp_non_negative(a.max(b));
    if (min..=max).contains(&value) {
        value
    } else {
        (max - min).mul_add(shift, min)
    }
}

fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SamRatioBand;

    fn synth(seed: &str, overrides: &SynthesisOverrides) -> LocationRecord {
        Synthesizer::default().synthesize(&Seed::from(seed), overrides)
    }

    #[test]
    fn same_seed_same_record() {
        for zip in ["10001", "60614", "94103", "not-a-zip", ""] {
            let a = synth(zip, &SynthesisOverrides::default());
            let b = synth(zip, &SynthesisOverrides::default());
            assert_eq!(a, b, "synthesis not deterministic for {zip:?}");
        }
    }

    #[test]
    fn synthesized_values_in_documented_ranges() {
        let band = SamRatioBand::default();
        for zip in 10_000..10_200u64 {
            let record = Synthesizer::default()
                .synthesize(&Seed::from(zip), &SynthesisOverrides::default());
            assert!((NET_WORTH_RANGE.0..NET_WORTH_RANGE.1).contains(&record.net_worth));
            assert!((DIVORCE_RATE_RANGE.0..DIVORCE_RATE_RANGE.1).contains(&record.divorce_rate));
            assert!(record.competitor_count <= MAX_SYNTHESIZED_COMPETITORS);
            assert!(record.sam <= record.tam);
            assert!(record.sam >= (record.tam * band.min()).floor());
            assert!(record.opportunity >= 0.0 && record.opportunity.is_finite());
            assert!(!record.has_office);
            assert_eq!(record.id, zip.to_string());
        }
    }

    #[test]
    fn overrides_are_kept_verbatim() {
        let overrides = SynthesisOverrides {
            city: Some("Boise".to_string()),
            state: Some("ID".to_string()),
            urbanicity: Some(Urbanicity::Rural),
            net_worth: Some(42.0),
            divorce_rate: Some(0.07),
            competitor_count: Some(0),
            has_office: Some(true),
            ..SynthesisOverrides::default()
        };
        let record = synth("83702", &overrides);
        assert_eq!(record.city, "Boise");
        assert_eq!(record.state, "ID");
        assert_eq!(record.urbanicity, Urbanicity::Rural);
        assert!((record.net_worth - 42.0).abs() < f64::EPSILON);
        assert!((record.divorce_rate - 0.07).abs() < f64::EPSILON);
        assert!(record.has_office);
    }

    #[test]
    fn overriding_one_field_keeps_the_others() {
        let base = synth("30301", &SynthesisOverrides::default());
        let overridden = synth(
            "30301",
            &SynthesisOverrides {
                net_worth: Some(99.0),
                ..SynthesisOverrides::default()
            },
        );
        assert!((base.divorce_rate - overridden.divorce_rate).abs() < f64::EPSILON);
        assert_eq!(base.competitor_count, overridden.competitor_count);
        assert_eq!(base.city, overridden.city);
    }

    #[test]
    fn target_range_adjusts_out_of_range_baseline() {
        for zip in 20_000..20_100u64 {
            let record = Synthesizer::default().synthesize(
                &Seed::from(zip),
                &SynthesisOverrides {
                    net_worth_range: Some((20.0, 30.0)),
                    divorce_rate_range: Some((0.15, 0.2)),
                    ..SynthesisOverrides::default()
                },
            );
            assert!((20.0..=30.0).contains(&record.net_worth));
            assert!((0.15..=0.2).contains(&record.divorce_rate));
        }
    }

    #[test]
    fn target_range_leaves_in_range_baseline_alone() {
        let base = synth("73301", &SynthesisOverrides::default());
        let ranged = synth(
            "73301",
            &SynthesisOverrides {
                net_worth_range: Some((0.0, 100.0)),
                ..SynthesisOverrides::default()
            },
        );
        assert!((base.net_worth - ranged.net_worth).abs() < f64::EPSILON);
    }

    #[test]
    fn reported_opportunity_wins() {
        let record = synth(
            "02108",
            &SynthesisOverrides {
                reported_opportunity: Some(12.5),
                ..SynthesisOverrides::default()
            },
        );
        assert!((record.opportunity - 12.5).abs() < f64::EPSILON);
        assert_eq!(record.tier, opportunity_map_location_models::Tier::High);
    }

    #[test]
    fn urbanicity_follows_seed_partition() {
        assert_eq!(synth("10000", &SynthesisOverrides::default()).urbanicity, Urbanicity::Urban);
        assert_eq!(synth("10005", &SynthesisOverrides::default()).urbanicity, Urbanicity::Suburban);
        assert_eq!(synth("10009", &SynthesisOverrides::default()).urbanicity, Urbanicity::Rural);
    }
}
