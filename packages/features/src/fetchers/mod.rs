//! Fetcher dispatch and implementations for region feature sources.
//!
//! Each fetcher returns the raw `features` array of a `GeoJSON`
//! `FeatureCollection`. Features are kept as untyped JSON so that one
//! malformed feature cannot fail the whole collection; annotation
//! validates them one at a time.

pub mod file;
pub mod geojson_url;

use opportunity_map_region_models::{RegionFetcherConfig, RegionSource};

use crate::FeatureError;

/// Fetches raw `GeoJSON` features for a region.
///
/// # Errors
///
/// Returns [`FeatureError`] if the request, file read, or response
/// parsing fails.
pub async fn fetch_features(
    client: &reqwest::Client,
    region: &RegionSource,
) -> Result<Vec<serde_json::Value>, FeatureError> {
    match &region.fetcher {
        RegionFetcherConfig::GeojsonUrl { url } => geojson_url::fetch(client, url).await,
        RegionFetcherConfig::File { path } => file::fetch(path).await,
    }
}

/// Extracts the `features` array from a `FeatureCollection` body.
///
/// # Errors
///
/// Returns [`FeatureError::Conversion`] if the body is not JSON or has no
/// `features` array.
pub fn parse_feature_collection(
    body: &str,
    context: &str,
) -> Result<Vec<serde_json::Value>, FeatureError> {
    let mut json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| FeatureError::Conversion {
            message: format!("Failed to parse {context} response: {e}"),
        })?;

    match json.get_mut("features").map(serde_json::Value::take) {
        Some(serde_json::Value::Array(features)) => Ok(features),
        _ => Err(FeatureError::Conversion {
            message: format!("No features array in {context} response"),
        }),
    }
}
