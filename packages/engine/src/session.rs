//! The interactive session: one selected region, one set of criteria,
//! one map.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use opportunity_map_analytics::{filter_features, region_summary, summarize};
use opportunity_map_features::annotate::synthesized_collection;
use opportunity_map_location_models::{
    AnnotatedCollection, FilterCriteria, LocationRecord, MapBounds, RegionSummary, TierSummary,
    ValidatedCriteria,
};
use opportunity_map_region_models::RegionSource;
use opportunity_map_scoring::{Synthesizer, mock_records};
use opportunity_map_sync::{MapAdapter, MapSyncController, RenderInstruction};
use serde::Serialize;
use tokio::task::AbortHandle;

use crate::{EngineConfig, EngineError, FeatureSource};

/// A dismissible message shown alongside the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Text to display.
    pub message: String,
}

/// The result of applying the current criteria to the current region.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView {
    /// Features passing every predicate, in source order.
    pub collection: AnnotatedCollection,
    /// Tier counts over the retained features.
    pub tier_summary: TierSummary,
    /// Summary panel metrics over the retained features.
    pub region_summary: RegionSummary,
    /// What was applied to the map.
    pub instruction: RenderInstruction,
}

impl FilteredView {
    /// Records of the retained features.
    #[must_use]
    pub fn records(&self) -> Vec<LocationRecord> {
        self.collection.records().cloned().collect()
    }
}

/// How a region load ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Features were fetched and applied.
    Loaded(FilteredView),
    /// Fetching failed; synthesized data was applied instead.
    Fallback {
        /// View over the synthesized data.
        view: FilteredView,
        /// Notice describing the failure.
        notice: Notice,
    },
    /// A newer load superseded this one; nothing was applied.
    Stale,
}

struct SessionState<A: MapAdapter> {
    region: Option<RegionSource>,
    collection: AnnotatedCollection,
    criteria: ValidatedCriteria,
    notice: Option<Notice>,
    controller: MapSyncController<A>,
}

/// One user's view of the opportunity map.
pub struct Session<A: MapAdapter> {
    config: EngineConfig,
    synthesizer: Synthesizer,
    source: Arc<dyn FeatureSource>,
    generation: AtomicU64,
    in_flight: Mutex<Option<AbortHandle>>,
    state: Mutex<SessionState<A>>,
}

impl<A: MapAdapter> Session<A> {
    /// Creates a session with no region selected and the configured
    /// default criteria.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the configuration is invalid.
    pub fn new(
        config: EngineConfig,
        source: Arc<dyn FeatureSource>,
        adapter: A,
    ) -> Result<Self, EngineError> {
        let synthesizer = config.synthesizer()?;
        let criteria = config.default_criteria.validate()?;
        let controller = MapSyncController::new(adapter, config.bounds, synthesizer);

        Ok(Self {
            config,
            synthesizer,
            source,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
            state: Mutex::new(SessionState {
                region: None,
                collection: AnnotatedCollection::default(),
                criteria,
                notice: None,
                controller,
            }),
        })
    }

    /// The configuration this session was built with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generation of the most recent load request.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// The region whose data is currently applied.
    #[must_use]
    pub fn region(&self) -> Option<RegionSource> {
        self.lock_state().region.clone()
    }

    /// The active criteria.
    #[must_use]
    pub fn criteria(&self) -> ValidatedCriteria {
        self.lock_state().criteria
    }

    /// The notice currently shown, if any.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        self.lock_state().notice.clone()
    }

    /// Hides the current notice and returns it.
    pub fn dismiss_notice(&self) -> Option<Notice> {
        self.lock_state().notice.take()
    }

    /// Selects `region` and loads its features.
    ///
    /// Each call supersedes the previous one: the earlier fetch is
    /// aborted, and a response that arrives after a newer request began
    /// is discarded as [`LoadOutcome::Stale`]. A failed fetch applies a
    /// synthesized dataset and raises a [`Notice`] instead of failing.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Task`] if the load task panicked.
    pub async fn load_region(&self, region: RegionSource) -> Result<LoadOutcome, EngineError> {
        // Bump, swap and clear under one lock so a newer request can never
        // be aborted (or have its map cleared) by an older one.
        let (generation, handle) = {
            let mut in_flight = self.lock_in_flight();
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            log::info!("Loading region {} (generation {generation})", region.id);

            let source = Arc::clone(&self.source);
            let synthesizer = self.synthesizer;
            let task_region = region.clone();
            let handle =
                tokio::spawn(async move { source.load(&task_region, &synthesizer).await });

            if let Some(previous) = in_flight.replace(handle.abort_handle()) {
                previous.abort();
            }
            self.lock_state().controller.clear();
            (generation, handle)
        };

        let result = match handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                log::warn!(
                    "Load of {} (generation {generation}) was superseded",
                    region.id
                );
                return Ok(LoadOutcome::Stale);
            }
            Err(e) => {
                return Err(EngineError::Task {
                    message: e.to_string(),
                });
            }
        };

        let mut state = self.lock_state();
        if self.generation() != generation {
            log::warn!(
                "Discarding stale response for {} (generation {generation}, latest {})",
                region.id,
                self.generation()
            );
            return Ok(LoadOutcome::Stale);
        }

        match result {
            Ok(collection) => {
                log::info!(
                    "{}: loaded {} annotated features",
                    region.id,
                    collection.len()
                );
                state.collection = collection;
                state.notice = None;
                Self::select(&mut state, region);
                Ok(LoadOutcome::Loaded(self.refresh(&mut state)))
            }
            Err(e) => {
                log::warn!("Failed to load {}: {e}; using synthesized data", region.id);
                let records = mock_records(
                    &self.synthesizer,
                    &region.zip_prefix,
                    self.config.fallback_record_count,
                    &region.city,
                    &region.state,
                );
                let notice = Notice {
                    message: format!(
                        "Could not load {} ({e}). Showing estimated data instead.",
                        region.name
                    ),
                };
                state.collection = synthesized_collection(records);
                Self::select(&mut state, region);
                state.notice = Some(notice.clone());
                Ok(LoadOutcome::Fallback {
                    view: self.refresh(&mut state),
                    notice,
                })
            }
        }
    }

    /// Replaces the active criteria and re-filters the loaded features.
    /// Never fetches.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Criteria`] if `criteria` is invalid; the
    /// previous criteria stay active.
    pub fn apply_criteria(&self, criteria: &FilterCriteria) -> Result<FilteredView, EngineError> {
        let validated = criteria.validate()?;
        let mut state = self.lock_state();
        state.criteria = validated;
        Ok(self.refresh(&mut state))
    }

    /// Re-filters with the active criteria.
    #[must_use]
    pub fn view(&self) -> FilteredView {
        let mut state = self.lock_state();
        self.refresh(&mut state)
    }

    /// Details for a location identifier.
    ///
    /// Loaded locations are returned as-is, including ones the current
    /// criteria hide. Any other non-empty identifier is synthesized.
    #[must_use]
    pub fn get_detail(&self, identifier: &str) -> Option<LocationRecord> {
        let state = self.lock_state();
        state
            .collection
            .find(identifier.trim())
            .cloned()
            .or_else(|| state.controller.resolve_click(identifier))
    }

    /// Details for the visible location under a map coordinate.
    #[must_use]
    pub fn detail_at(&self, lng: f64, lat: f64) -> Option<LocationRecord> {
        self.lock_state().controller.resolve_point(lng, lat)
    }

    /// Visible locations whose geometry intersects `viewport`.
    #[must_use]
    pub fn visible_in(&self, viewport: &MapBounds) -> Vec<LocationRecord> {
        self.lock_state().controller.resolve_viewport(viewport)
    }

    fn select(state: &mut SessionState<A>, region: RegionSource) {
        state
            .controller
            .set_location_defaults(Some(region.city.clone()), Some(region.state.clone()));
        state.region = Some(region);
    }

    fn refresh(&self, state: &mut SessionState<A>) -> FilteredView {
        let collection = filter_features(&state.collection, &state.criteria);
        let tier_summary = summarize(collection.records());
        let label = state
            .region
            .as_ref()
            .map_or_else(|| "No region".to_string(), |r| r.name.clone());
        let records: Vec<LocationRecord> = collection.records().cloned().collect();
        let region_summary = region_summary(&label, &records);
        let instruction = state.controller.sync(&collection);

        log::debug!(
            "{label}: {} of {} locations match (generation {})",
            collection.len(),
            state.collection.len(),
            self.generation()
        );

        FilteredView {
            collection,
            tier_summary,
            region_summary,
            instruction,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState<A>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<AbortHandle>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
