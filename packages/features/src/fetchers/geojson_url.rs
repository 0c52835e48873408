//! Direct `GeoJSON` URL fetcher.
//!
//! Fetches a standard `GeoJSON` `FeatureCollection` from any URL that
//! returns it directly (static files on a CDN, open data exports).

use crate::FeatureError;

/// Fetches all features from a direct `GeoJSON` URL.
///
/// # Errors
///
/// Returns [`FeatureError`] if the request fails, the server answers with
/// a non-success status, or the response cannot be parsed.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<serde_json::Value>, FeatureError> {
    log::debug!("Fetching GeoJSON from {url}");

    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(FeatureError::Status {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }
    let body = resp.text().await?;

    super::parse_feature_collection(&body, "GeoJSON")
}
