#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Seeded attribute synthesis and opportunity scoring.
//!
//! Source data for the opportunity map is best-effort: most features
//! arrive with only a ZIP code and a polygon. This crate fills the gaps
//! deterministically. Every synthesized value comes from one PRNG keyed
//! by the location identifier, so re-querying the same location always
//! yields the same record.
//!
//! Scoring follows a fixed formula:
//!
//! * `tam = round(net_worth * 10 * (1 + divorce_rate * 10))`
//! * `sam = round(tam * f)` with `f` inside the [`SamRatioBand`]
//! * `opportunity = tam * divorce_rate / (competitor_count + 1)`

pub mod mock;
pub mod score;
pub mod seed;
pub mod synthesize;

pub use mock::mock_records;
pub use score::{SamRatio, SamRatioBand, score, score_checked};
pub use seed::Seed;
pub use synthesize::{SynthesisOverrides, Synthesizer};

use thiserror::Error;

/// Errors that can occur during scoring.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    /// A competitor count below zero has no meaningful opportunity.
    #[error("Competitor count must be non-negative, got {count}")]
    NegativeCompetitorCount {
        /// The rejected count.
        count: i64,
    },

    /// The SAM ratio band is outside `[0, 1]` or inverted.
    #[error("Invalid SAM ratio band [{min}, {max}]: expected 0 <= min <= max <= 1")]
    InvalidSamBand {
        /// Lower edge of the band.
        min: f64,
        /// Upper edge of the band.
        max: f64,
    },
}
