//! Where region features come from.

use opportunity_map_features::FeatureError;
use opportunity_map_location_models::AnnotatedCollection;
use opportunity_map_region_models::RegionSource;
use opportunity_map_scoring::Synthesizer;

use crate::{EngineConfig, EngineError};

/// Loads and annotates a region's features.
#[async_trait::async_trait]
pub trait FeatureSource: Send + Sync {
    /// Fetch and annotate every feature of `region`.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError`] if the collection cannot be obtained.
    async fn load(
        &self,
        region: &RegionSource,
        synthesizer: &Synthesizer,
    ) -> Result<AnnotatedCollection, FeatureError>;
}

/// Loads regions through their configured fetcher over HTTP or disk.
pub struct HttpFeatureSource {
    client: reqwest::Client,
}

impl HttpFeatureSource {
    /// Wraps an existing client.
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Builds a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Http`] if the client cannot be built.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()?;
        Ok(Self::new(client))
    }
}

#[async_trait::async_trait]
impl FeatureSource for HttpFeatureSource {
    async fn load(
        &self,
        region: &RegionSource,
        synthesizer: &Synthesizer,
    ) -> Result<AnnotatedCollection, FeatureError> {
        opportunity_map_features::load_region(&self.client, region, synthesizer).await
    }
}
