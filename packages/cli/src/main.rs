#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for scoring and filtering market opportunities.
//!
//! ```text
//! opportunity_map regions
//! opportunity_map summarize ny [--urbanicity urban] [--tier high] [--min-divorce-rate 4]
//! opportunity_map summarize --file zips.geojson [--hide-offices] [--top 20]
//! opportunity_map detail 10001 [--region ny]
//! ```
//!
//! Results are printed as JSON. Set `OPPORTUNITY_MAP_CONFIG` to override
//! the embedded engine configuration.

use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use opportunity_map_analytics::top_opportunities;
use opportunity_map_engine::{EngineConfig, HttpFeatureSource, LoadOutcome, Session};
use opportunity_map_features::{all_regions, find_region};
use opportunity_map_location_models::{
    DEFAULT_MAX_NET_WORTH, FilterCriteria, TierFilter, UrbanicityFilter,
};
use opportunity_map_region_models::{FeatureFieldMapping, RegionFetcherConfig, RegionSource};
use opportunity_map_sync::NullMapAdapter;
use serde_json::json;

#[derive(Parser)]
#[command(
    name = "opportunity_map",
    about = "Score, filter, and summarize ZIP-level market opportunities"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in regions
    Regions,
    /// Load a region, filter it, and print summaries
    Summarize {
        /// Built-in region ID (see `regions`)
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        region: Option<String>,
        /// Local GeoJSON FeatureCollection to load instead of a region
        #[arg(long)]
        file: Option<String>,
        /// City used for synthesized values when loading a file
        #[arg(long, default_value = "Unknown", requires = "file")]
        city: String,
        /// State used for synthesized values when loading a file
        #[arg(long, default_value = "US", requires = "file")]
        state: String,
        #[command(flatten)]
        filters: FilterArgs,
        /// Number of top opportunities to list
        #[arg(long, default_value = "10")]
        top: usize,
    },
    /// Show the scored record for one location
    Detail {
        /// Location identifier (usually a ZIP code)
        id: String,
        /// Region to load first so real feature properties are used
        #[arg(long)]
        region: Option<String>,
    },
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Urbanicity to keep: all, urban, suburban, rural
    #[arg(long, default_value = "all")]
    urbanicity: UrbanicityFilter,
    /// Opportunity tier to keep: all, high, medium, low
    #[arg(long, default_value = "all")]
    tier: TierFilter,
    /// Minimum median net worth in millions
    #[arg(long, default_value = "0")]
    min_net_worth: f64,
    /// Maximum median net worth in millions
    #[arg(long, default_value_t = DEFAULT_MAX_NET_WORTH)]
    max_net_worth: f64,
    /// Minimum divorce rate in percent
    #[arg(long, default_value = "0")]
    min_divorce_rate: f64,
    /// Hide locations that already have an office
    #[arg(long)]
    hide_offices: bool,
}

impl FilterArgs {
    const fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            urbanicity: self.urbanicity,
            opportunity_tier: self.tier,
            net_worth_range: (self.min_net_worth, self.max_net_worth),
            divorce_rate_threshold: self.min_divorce_rate,
            hide_existing_offices: self.hide_offices,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    match cli.command {
        Commands::Regions => {
            println!("{:<6} {:<16} {:<16} STATE", "ID", "NAME", "CITY");
            println!("{}", "-".repeat(46));
            for region in all_regions() {
                println!(
                    "{:<6} {:<16} {:<16} {}",
                    region.id, region.name, region.city, region.state
                );
            }
        }
        Commands::Summarize {
            region,
            file,
            city,
            state,
            filters,
            top,
        } => {
            let region = match (region, file) {
                (_, Some(path)) => file_region(&path, city, state),
                (Some(id), None) => find_region(&id)?,
                (None, None) => return Err("either a region or --file is required".into()),
            };
            let session = session()?;
            let notice = match session.load_region(region).await? {
                LoadOutcome::Fallback { notice, .. } => Some(notice),
                LoadOutcome::Loaded(_) | LoadOutcome::Stale => None,
            };
            let view = session.apply_criteria(&filters.criteria())?;
            let records = view.records();

            let output = json!({
                "region": view.region_summary.region,
                "notice": notice,
                "tierSummary": view.tier_summary,
                "metrics": view.region_summary.metrics,
                "fitBounds": view.instruction.fit_bounds,
                "showEmptyState": view.instruction.show_empty_state,
                "topOpportunities": top_opportunities(&records, top),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Detail { id, region } => {
            let session = session()?;
            if let Some(region) = region {
                session.load_region(find_region(&region)?).await?;
            }
            let Some(record) = session.get_detail(&id) else {
                eprintln!("Location identifier must not be empty");
                std::process::exit(1);
            };
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

fn session() -> Result<Session<NullMapAdapter>, Box<dyn std::error::Error>> {
    let config = EngineConfig::load()?;
    let source = Arc::new(HttpFeatureSource::from_config(&config)?);
    Ok(Session::new(config, source, NullMapAdapter)?)
}

fn file_region(path: &str, city: String, state: String) -> RegionSource {
    let name = Path::new(path)
        .file_stem()
        .map_or_else(|| path.to_string(), |stem| stem.to_string_lossy().into_owned());
    RegionSource {
        id: "file".to_string(),
        name,
        state,
        city,
        zip_prefix: "000".to_string(),
        fetcher: RegionFetcherConfig::File {
            path: path.to_string(),
        },
        fields: FeatureFieldMapping::default(),
    }
}
