#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Session orchestration for the opportunity map.
//!
//! A [`Session`] owns the currently selected region, its annotated
//! features, the active filter criteria, and the map sync controller.
//! Loading a region is asynchronous and generation-tagged so that only
//! the most recent selection is ever applied; changing criteria is
//! synchronous and never refetches.

pub mod config;
pub mod session;
pub mod source;

pub use config::{CONFIG_ENV_VAR, ConfigError, EngineConfig};
pub use session::{FilteredView, LoadOutcome, Notice, Session};
pub use source::{FeatureSource, HttpFeatureSource};

use opportunity_map_features::FeatureError;
use opportunity_map_location_models::CriteriaError;
use thiserror::Error;

/// Errors that can occur in a session.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Filter criteria were rejected.
    #[error("Invalid criteria: {0}")]
    Criteria(#[from] CriteriaError),

    /// Region lookup or loading failed.
    #[error(transparent)]
    Feature(#[from] FeatureError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The background load task failed.
    #[error("Load task failed: {message}")]
    Task {
        /// Description of the failure.
        message: String,
    },
}
