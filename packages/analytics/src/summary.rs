//! Aggregation over a filtered set of records.

use std::cmp::Ordering;

use opportunity_map_location_models::{
    LocationRecord, Metric, RegionSummary, Tier, TierCounts, TierSummary,
};

/// Metric label for the number of locations.
pub const LOCATIONS_LABEL: &str = "Locations";
/// Metric label for the total addressable market.
pub const TOTAL_TAM_LABEL: &str = "Total TAM";
/// Metric label for the serviceable addressable market.
pub const TOTAL_SAM_LABEL: &str = "Total SAM";
/// Metric label for summed opportunity.
pub const TOTAL_OPPORTUNITY_LABEL: &str = "Total Opportunity";
/// Metric label for mean net worth.
pub const AVG_NET_WORTH_LABEL: &str = "Average Net Worth";
/// Metric label for mean divorce rate.
pub const AVG_DIVORCE_RATE_LABEL: &str = "Average Divorce Rate";
/// Metric label for locations with an office.
pub const EXISTING_OFFICES_LABEL: &str = "Existing Offices";

/// Counts records per tier.
///
/// Tiers are reclassified from `opportunity` so the counts always use
/// the shared thresholds.
#[must_use]
pub fn summarize<'a>(records: impl IntoIterator<Item = &'a LocationRecord>) -> TierSummary {
    let mut tier_counts = TierCounts::default();
    let mut total = 0u64;

    for record in records {
        tier_counts.record(Tier::classify(record.opportunity));
        total += 1;
    }

    TierSummary { tier_counts, total }
}

/// Builds the summary panel for `region` from a filtered set.
#[must_use]
pub fn region_summary(region: &str, records: &[LocationRecord]) -> RegionSummary {
    let tiers = summarize(records);
    let total_tam: f64 = records.iter().map(|r| r.tam).sum();
    let total_sam: f64 = records.iter().map(|r| r.sam).sum();
    let total_opportunity: f64 = records.iter().map(|r| r.opportunity).sum();
    let offices = records.iter().filter(|r| r.has_office).count();

    let mut metrics = vec![Metric::new(LOCATIONS_LABEL, tiers.total)];
    metrics.extend(
        Tier::all()
            .iter()
            .rev()
            .map(|&tier| Metric::new(format!("{tier} Tier"), tiers.tier_counts.get(tier))),
    );
    metrics.push(Metric::new(TOTAL_TAM_LABEL, millions(total_tam)));
    metrics.push(Metric::new(TOTAL_SAM_LABEL, millions(total_sam)));
    metrics.push(Metric::new(TOTAL_OPPORTUNITY_LABEL, millions(total_opportunity)));
    metrics.push(Metric::new(
        AVG_NET_WORTH_LABEL,
        mean(records.iter().map(|r| r.net_worth)).map_or_else(not_available, millions),
    ));
    metrics.push(Metric::new(
        AVG_DIVORCE_RATE_LABEL,
        mean(records.iter().map(LocationRecord::divorce_rate_percent))
            .map_or_else(not_available, |pct| format!("{pct:.1}%")),
    ));
    metrics.push(Metric::new(EXISTING_OFFICES_LABEL, offices));

    RegionSummary {
        region: region.to_string(),
        metrics,
    }
}

/// The `limit` records with the highest opportunity, ties broken by id.
#[must_use]
pub fn top_opportunities(records: &[LocationRecord], limit: usize) -> Vec<LocationRecord> {
    let mut ranked: Vec<&LocationRecord> = records.iter().collect();
    ranked.sort_by(|a, b| {
        b.opportunity
            .partial_cmp(&a.opportunity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked.into_iter().take(limit).cloned().collect()
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn millions(value: f64) -> String {
    format!("${value:.1}M")
}

fn not_available() -> String {
    "n/a".to_string()
}
