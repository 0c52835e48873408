//! Local `GeoJSON` file fetcher.

use crate::FeatureError;

/// Reads all features from a `GeoJSON` file on disk.
///
/// # Errors
///
/// Returns [`FeatureError`] if the file cannot be read or parsed.
pub async fn fetch(path: &str) -> Result<Vec<serde_json::Value>, FeatureError> {
    log::debug!("Reading GeoJSON from {path}");

    let body = tokio::fs::read_to_string(path).await?;

    super::parse_feature_collection(&body, "GeoJSON file")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_feature_collection_from_disk() {
        let tmp = std::env::temp_dir().join("opportunity_map_file_fetch_test.geojson");
        std::fs::write(
            &tmp,
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"ZCTA5CE20":"10001"},"geometry":null}]}"#,
        )
        .unwrap();

        let features = fetch(tmp.to_str().unwrap()).await.unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"]["ZCTA5CE20"], "10001");

        let _ = std::fs::remove_file(&tmp);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = fetch("/definitely/not/here.geojson").await.unwrap_err();
        assert!(matches!(err, FeatureError::Io(_)));
    }
}
