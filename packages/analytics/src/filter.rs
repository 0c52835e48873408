//! The multi-criteria filter pipeline.
//!
//! Predicates are applied conjunctively. Inputs are borrowed and never
//! modified; the retained records are cloned into a new collection in
//! their original order, which makes the pipeline idempotent.

use opportunity_map_location_models::{
    AnnotatedCollection, LocationRecord, Tier, ValidatedCriteria,
};
use strum_macros::{AsRefStr, Display};

/// One filter criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Predicate {
    /// Urbanicity selector.
    Urbanicity,
    /// Opportunity tier selector.
    OpportunityTier,
    /// Net-worth range.
    NetWorthRange,
    /// Minimum divorce rate.
    DivorceRate,
    /// Hide locations with an existing office.
    ExistingOffice,
}

impl Predicate {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Urbanicity,
            Self::OpportunityTier,
            Self::NetWorthRange,
            Self::DivorceRate,
            Self::ExistingOffice,
        ]
    }

    /// Whether `record` satisfies this single predicate.
    #[must_use]
    pub fn check(self, record: &LocationRecord, criteria: &ValidatedCriteria) -> bool {
        match self {
            Self::Urbanicity => criteria.urbanicity().admits(record.urbanicity),
            Self::OpportunityTier => criteria
                .opportunity_tier()
                .admits(Tier::classify(record.opportunity)),
            Self::NetWorthRange => {
                let (min, max) = criteria.net_worth_range();
                (min..=max).contains(&record.net_worth)
            }
            Self::DivorceRate => record.divorce_rate >= criteria.min_divorce_rate(),
            Self::ExistingOffice => !(criteria.hide_existing_offices() && record.has_office),
        }
    }
}

/// Whether `record` passes every predicate.
#[must_use]
pub fn matches(record: &LocationRecord, criteria: &ValidatedCriteria) -> bool {
    Predicate::all()
        .iter()
        .all(|predicate| predicate.check(record, criteria))
}

/// The predicates `record` fails, in declaration order.
#[must_use]
pub fn failed_predicates(record: &LocationRecord, criteria: &ValidatedCriteria) -> Vec<Predicate> {
    Predicate::all()
        .iter()
        .copied()
        .filter(|predicate| !predicate.check(record, criteria))
        .collect()
}

/// Returns the records passing every predicate, in input order.
///
/// An empty result is a valid outcome.
#[must_use]
pub fn filter(records: &[LocationRecord], criteria: &ValidatedCriteria) -> Vec<LocationRecord> {
    let retained: Vec<LocationRecord> = records
        .iter()
        .filter(|record| matches(record, criteria))
        .cloned()
        .collect();

    log::debug!("Filter retained {} of {} records", retained.len(), records.len());

    retained
}

/// Returns the features whose records pass every predicate, in input
/// order. Geometry and properties are carried over unchanged.
#[must_use]
pub fn filter_features(
    collection: &AnnotatedCollection,
    criteria: &ValidatedCriteria,
) -> AnnotatedCollection {
    let retained: AnnotatedCollection = collection
        .features
        .iter()
        .filter(|feature| matches(&feature.record, criteria))
        .cloned()
        .collect();

    log::debug!(
        "Filter retained {} of {} features",
        retained.len(),
        collection.len()
    );

    retained
}
