//! Compile-time registry of selectable map regions.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a region requires creating a TOML file in `regions/` and adding
//! a corresponding entry here.

use opportunity_map_region_models::RegionSource;

use crate::FeatureError;

/// Number of registered regions. Enforced by a test.
#[cfg(test)]
const EXPECTED_REGION_COUNT: usize = 6;

/// Embedded TOML region definitions.
const REGION_TOMLS: &[(&str, &str)] = &[
    ("ny", include_str!("../regions/ny.toml")),
    ("ca", include_str!("../regions/ca.toml")),
    ("tx", include_str!("../regions/tx.toml")),
    ("fl", include_str!("../regions/fl.toml")),
    ("il", include_str!("../regions/il.toml")),
    ("wa", include_str!("../regions/wa.toml")),
];

/// Returns all registered regions.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. These are
/// compile-time constants, so a parse failure is a development error
/// caught by the tests below.
#[must_use]
pub fn all_regions() -> Vec<RegionSource> {
    REGION_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse region '{name}': {e}"))
        })
        .collect()
}

/// Looks up a region by identifier (case-insensitive).
///
/// # Errors
///
/// Returns [`FeatureError::UnknownRegion`] if no region matches.
pub fn find_region(id: &str) -> Result<RegionSource, FeatureError> {
    all_regions()
        .into_iter()
        .find(|region| region.id.eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| FeatureError::UnknownRegion { id: id.to_string() })
}
