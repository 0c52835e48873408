//! Region loading: fetch a region's polygons and annotate them.

use opportunity_map_location_models::AnnotatedCollection;
use opportunity_map_region_models::RegionSource;
use opportunity_map_scoring::Synthesizer;

use crate::FeatureError;

/// Fetches a region's features and annotates every one.
///
/// # Errors
///
/// Returns [`FeatureError`] if fetching or parsing the collection fails.
/// Individual malformed features never fail the load.
pub async fn load_region(
    client: &reqwest::Client,
    region: &RegionSource,
    synthesizer: &Synthesizer,
) -> Result<AnnotatedCollection, FeatureError> {
    log::info!(
        "Fetching features for {} ({}, {})",
        region.id,
        region.city,
        region.state,
    );

    let features = crate::fetchers::fetch_features(client, region).await?;
    log::info!("{}: fetched {} raw features", region.id, features.len());

    Ok(crate::annotate::annotate_features(
        &features,
        region,
        synthesizer,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use opportunity_map_region_models::{FeatureFieldMapping, RegionFetcherConfig};

    fn file_region(path: &str) -> RegionSource {
        RegionSource {
            id: "test".to_string(),
            name: "Test".to_string(),
            state: "TX".to_string(),
            city: "Austin".to_string(),
            zip_prefix: "787".to_string(),
            fetcher: RegionFetcherConfig::File {
                path: path.to_string(),
            },
            fields: FeatureFieldMapping::default(),
        }
    }

    #[tokio::test]
    async fn loads_and_annotates_local_file() {
        let path = std::env::temp_dir().join("opportunity_map_load_test.geojson");
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "ZCTA5CE20": "78701" },
                    "geometry": { "type": "Point", "coordinates": [-97.74, 30.27] }
                },
                {
                    "type": "Feature",
                    "properties": { "ZCTA5CE20": "78702", "opportunity": 12.5 },
                    "geometry": { "type": "Point", "coordinates": [-97.71, 30.26] }
                }
            ]
        }"#;
        tokio::fs::write(&path, body).await.unwrap();

        let region = file_region(path.to_str().unwrap());
        let collection = load_region(&reqwest::Client::new(), &region, &Synthesizer::default())
            .await
            .unwrap();

        assert_eq!(collection.len(), 2);
        assert!(collection.find("78701").is_some());
        assert!((collection.find("78702").unwrap().opportunity - 12.5).abs() < f64::EPSILON);
        assert_eq!(collection.find("78701").unwrap().city, "Austin");

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let region = file_region("/nonexistent/opportunity_map/none.geojson");
        let result = load_region(&reqwest::Client::new(), &region, &Synthesizer::default()).await;
        assert!(matches!(result, Err(FeatureError::Io(_))));
    }
}
