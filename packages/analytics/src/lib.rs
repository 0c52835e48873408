#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filtering and aggregation over scored locations.
//!
//! [`filter`] reduces a set of records (or annotated features) to those
//! passing every active criterion. [`summary`] turns the retained set
//! into tier counts, region metrics, and rankings for summary panels.
//! Everything here is a pure function of its inputs.

pub mod filter;
pub mod summary;

pub use filter::{Predicate, failed_predicates, filter, filter_features, matches};
pub use summary::{region_summary, summarize, top_opportunities};
