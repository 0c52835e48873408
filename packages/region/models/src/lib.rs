#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region source definition types.
//!
//! Defines the TOML schema for the regions a user can select on the map:
//! where each region's ZIP polygons come from and which properties
//! identify a location.

use serde::{Deserialize, Serialize};

/// A selectable map region, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSource {
    /// Unique region identifier (e.g., `"ny"`).
    pub id: String,
    /// Human-readable name (e.g., "New York").
    pub name: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Largest city, used for synthesized records.
    pub city: String,
    /// ZIP code prefix for synthesized fallback records (e.g., `"100"`).
    pub zip_prefix: String,
    /// Fetcher configuration.
    pub fetcher: RegionFetcherConfig,
    /// Property mapping for identifying features.
    #[serde(default)]
    pub fields: FeatureFieldMapping,
}

/// How to fetch a region's feature collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegionFetcherConfig {
    /// A URL returning a `GeoJSON` `FeatureCollection`.
    GeojsonUrl {
        /// Full URL.
        url: String,
    },
    /// A `GeoJSON` file on local disk.
    File {
        /// Path to the file.
        path: String,
    },
}

/// Which feature properties identify a location.
///
/// Keys are tried in order; the first present, non-empty value wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFieldMapping {
    /// Candidate identifier properties.
    #[serde(default = "default_id_keys")]
    pub id_keys: Vec<String>,
    /// Candidate county properties.
    #[serde(default = "default_county_keys")]
    pub county_keys: Vec<String>,
}

impl Default for FeatureFieldMapping {
    fn default() -> Self {
        Self {
            id_keys: default_id_keys(),
            county_keys: default_county_keys(),
        }
    }
}

fn default_id_keys() -> Vec<String> {
    ["ZCTA5CE20", "GEOID20", "ZCTA5CE10", "GEOID10"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_county_keys() -> Vec<String> {
    ["COUNTY", "COUNTYFP20", "COUNTYFP10"]
        .into_iter()
        .map(str::to_string)
        .collect()
}
