#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region feature loading and annotation.
//!
//! Downloads (or reads) a region's ZIP-code polygons as a `GeoJSON`
//! `FeatureCollection` and annotates every feature with a scored
//! [`LocationRecord`](opportunity_map_location_models::LocationRecord).
//! Properties the source already carries are kept; everything missing is
//! synthesized from the feature's identifier. Regions are defined as TOML
//! files embedded at compile time, following the same registry pattern
//! as the rest of the workspace.

pub mod annotate;
pub mod fetchers;
pub mod load;
pub mod registry;

pub use load::load_region;
pub use registry::{all_regions, find_region};

use thiserror::Error;

/// Errors that can occur while loading region features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The source answered with a non-success status.
    #[error("Request to {url} failed with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The payload was not a usable feature collection.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// No region is registered under the requested identifier.
    #[error("Unknown region: {id}")]
    UnknownRegion {
        /// The requested identifier.
        id: String,
    },
}
