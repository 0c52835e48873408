//! Engine configuration.
//!
//! Defaults are embedded from `config/default.toml`. Setting
//! `OPPORTUNITY_MAP_CONFIG` to a TOML file path replaces them; any key the
//! file omits keeps its default.

use std::path::Path;
use std::time::Duration;

use opportunity_map_location_models::FilterCriteria;
use opportunity_map_scoring::{SamRatioBand, Synthesizer};
use opportunity_map_spatial::BoundsConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming a TOML file that overrides the defaults.
pub const CONFIG_ENV_VAR: &str = "OPPORTUNITY_MAP_CONFIG";

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The override file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The TOML could not be parsed.
    #[error("Invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Description of the problem.
        message: String,
    },
}

/// SAM ratio band settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Lower end of the SAM/TAM ratio.
    pub sam_ratio_min: f64,
    /// Upper end of the SAM/TAM ratio.
    pub sam_ratio_max: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let band = SamRatioBand::default();
        Self {
            sam_ratio_min: band.min(),
            sam_ratio_max: band.max(),
        }
    }
}

/// Top-level engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Scoring tunables.
    pub scoring: ScoringConfig,
    /// Viewport padding and fallback.
    pub bounds: BoundsConfig,
    /// Size of the synthesized dataset used when a fetch fails.
    pub fallback_record_count: usize,
    /// Timeout for region downloads, in seconds.
    pub http_timeout_secs: u64,
    /// Criteria a new session starts with.
    pub default_criteria: FilterCriteria,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            bounds: BoundsConfig::default(),
            fallback_record_count: 50,
            http_timeout_secs: 30,
            default_criteria: FilterCriteria::default(),
        }
    }
}

impl EngineConfig {
    /// Loads the override file named by [`CONFIG_ENV_VAR`], or the
    /// embedded defaults when it is unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or
    /// validated.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => {
                log::info!("Loading config from {path}");
                Self::from_path(path.trim())
            }
            _ => Self::embedded(),
        }
    }

    /// Parses the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the embedded TOML is invalid.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Reads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or
    /// validated.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parses and validates TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if parsing or validation fails.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sam_band()?;
        self.default_criteria
            .validate()
            .map_err(|e| ConfigError::Invalid {
                message: format!("default_criteria: {e}"),
            })?;
        if !(self.bounds.padding_fraction.is_finite() && self.bounds.padding_fraction >= 0.0) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "bounds.padding_fraction must be non-negative, got {}",
                    self.bounds.padding_fraction
                ),
            });
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "http_timeout_secs must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// The configured SAM ratio band.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the band is empty or outside
    /// `[0, 1]`.
    pub fn sam_band(&self) -> Result<SamRatioBand, ConfigError> {
        SamRatioBand::new(self.scoring.sam_ratio_min, self.scoring.sam_ratio_max).map_err(|e| {
            ConfigError::Invalid {
                message: format!("scoring: {e}"),
            }
        })
    }

    /// A synthesizer using the configured SAM band.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the band is invalid.
    pub fn synthesizer(&self) -> Result<Synthesizer, ConfigError> {
        Ok(Synthesizer::new(self.sam_band()?))
    }

    /// Region download timeout.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_matches_defaults() {
        assert_eq!(EngineConfig::embedded().unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let config = EngineConfig::from_toml(
            r"
            fallback_record_count = 10

            [scoring]
            sam_ratio_max = 0.7
            ",
        )
        .unwrap();
        assert_eq!(config.fallback_record_count, 10);
        assert!((config.scoring.sam_ratio_min - 0.5).abs() < f64::EPSILON);
        assert!((config.scoring.sam_ratio_max - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.bounds, BoundsConfig::default());
    }

    #[test]
    fn rejects_inverted_sam_band() {
        let err = EngineConfig::from_toml(
            r"
            [scoring]
            sam_ratio_min = 0.9
            sam_ratio_max = 0.6
            ",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }), "{err}");
    }

    #[test]
    fn rejects_inverted_default_criteria() {
        let err = EngineConfig::from_toml(
            r"
            [default_criteria]
            netWorthRange = [10.0, 2.0]
            ",
        )
        .unwrap_err();
        assert!(err.to_string().contains("default_criteria"), "{err}");
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            EngineConfig::from_toml("fallback_record_count = ["),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            EngineConfig::from_path("/nonexistent/opportunity_map.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
