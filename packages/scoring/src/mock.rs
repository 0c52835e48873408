//! Fully synthetic location sets.
//!
//! Used as the emergency dataset when a region's features cannot be
//! fetched, and for demos. Identifiers are ZIP-like codes under the
//! region's prefix so that re-generating the set yields the same records.

use opportunity_map_location_models::LocationRecord;

use crate::seed::Seed;
use crate::synthesize::{SynthesisOverrides, Synthesizer};

/// Width of a ZIP code.
const ZIP_WIDTH: usize = 5;

/// Generates `count` synthesized records for a region.
///
/// Identifiers are `prefix` followed by a zero-padded sequence number,
/// padded to five digits where the prefix allows. Roughly one in ten
/// records is marked as having an existing office.
#[must_use]
pub fn mock_records(
    synthesizer: &Synthesizer,
    prefix: &str,
    count: usize,
    city: &str,
    state: &str,
) -> Vec<LocationRecord> {
    let width = ZIP_WIDTH.saturating_sub(prefix.len()).max(1);

    (0..count)
        .map(|i| {
            let id = format!("{prefix}{i:0width$}");
            let seed = Seed::from_identifier(&id);
            let has_office = (seed.value() / 10) % 10 == 0;
            synthesizer.synthesize(
                &seed,
                &SynthesisOverrides {
                    city: Some(city.to_string()),
                    state: Some(state.to_string()),
                    has_office: Some(has_office),
                    ..SynthesisOverrides::default()
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn generates_unique_zip_like_ids() {
        let records = mock_records(&Synthesizer::default(), "100", 50, "New York", "NY");
        assert_eq!(records.len(), 50);
        assert_eq!(records[0].id, "10000");
        assert_eq!(records[49].id, "10049");
        let ids: BTreeSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 50);
        assert!(records.iter().all(|r| r.city == "New York" && r.state == "NY"));
    }

    #[test]
    fn marks_about_one_in_ten_as_office() {
        let records = mock_records(&Synthesizer::default(), "6", 1_000, "Chicago", "IL");
        let offices = records.iter().filter(|r| r.has_office).count();
        assert_eq!(offices, 100);
    }

    #[test]
    fn regeneration_is_stable() {
        let synthesizer = Synthesizer::default();
        assert_eq!(
            mock_records(&synthesizer, "941", 20, "San Francisco", "CA"),
            mock_records(&synthesizer, "941", 20, "San Francisco", "CA")
        );
    }
}
