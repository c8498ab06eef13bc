//! Query model for the analysis track table
//!
//! The model keeps the current recency predicate and search text together and
//! hands both to the executor in a single [`QueryRequest`]. Each request gets
//! a new generation number; results for anything but the latest generation
//! are dropped, so the visible result set always belongs to one consistent
//! (predicate, text) pair.

use crate::analysis::TrackSelection;
use crate::filter::{build_relative_filter, empty_filter, FilterPredicate};
use crate::types::Track;

/// A combined query handed to the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Monotonic request counter, echoed back in the [`ResultSet`]
    pub generation: u64,
    pub filter: FilterPredicate,
    pub search_text: String,
}

/// Rows returned for a [`QueryRequest`]
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub request: QueryRequest,
    pub tracks: Vec<Track>,
}

/// Evaluates queries on behalf of the model
///
/// `submit` must not block. Results come back later through
/// [`LibraryQueryModel::on_results`].
pub trait QueryExecutor {
    fn submit(&mut self, request: QueryRequest);
}

/// Current filter, search text and result set of the analysis view
pub struct LibraryQueryModel<E: QueryExecutor> {
    executor: E,
    current_filter: FilterPredicate,
    current_search_text: String,
    /// Generation of the most recently submitted request
    latest_generation: u64,
    results: Option<ResultSet>,
}

impl<E: QueryExecutor> LibraryQueryModel<E> {
    /// Create a model without a recency constraint
    pub fn new(executor: E) -> Self {
        Self::with_filter(executor, empty_filter())
    }

    /// Create a model with an initial predicate; nothing is queried yet
    pub fn with_filter(executor: E, filter: FilterPredicate) -> Self {
        Self {
            executor,
            current_filter: filter,
            current_search_text: String::new(),
            latest_generation: 0,
            results: None,
        }
    }

    pub fn current_filter(&self) -> &FilterPredicate {
        &self.current_filter
    }

    pub fn current_search_text(&self) -> &str {
        &self.current_search_text
    }

    /// Replace the stored predicate without querying
    pub fn set_filter(&mut self, predicate: FilterPredicate) {
        if self.current_filter != predicate {
            log::debug!("set_filter: '{}'", predicate);
            self.current_filter = predicate;
        }
    }

    /// Remove the recency constraint without querying
    pub fn clear_filter(&mut self) {
        self.set_filter(empty_filter());
    }

    /// Submit exactly one request for the current predicate and search text
    pub fn refresh(&mut self) {
        self.latest_generation += 1;
        let request = QueryRequest {
            generation: self.latest_generation,
            filter: self.current_filter.clone(),
            search_text: self.current_search_text.clone(),
        };
        log::debug!(
            "refresh: generation {} filter='{}' text='{}'",
            request.generation,
            request.filter,
            request.search_text
        );
        self.executor.submit(request);
    }

    /// Search with the current predicate
    pub fn search(&mut self, text: &str) {
        self.current_search_text = text.to_string();
        self.refresh();
    }

    /// Replace predicate and search text together, then refresh
    pub fn search_with_filter(&mut self, text: &str, predicate: FilterPredicate) {
        self.current_filter = predicate;
        self.current_search_text = text.to_string();
        self.refresh();
    }

    /// Show tracks added within the last `days` days
    pub fn show_recent_tracks(&mut self, days: u32) {
        self.set_filter(build_relative_filter(days));
        self.refresh();
    }

    /// Show every track in the library
    pub fn show_all_tracks(&mut self) {
        self.clear_filter();
        self.refresh();
    }

    /// Search, optionally constrained to the last `days` days
    pub fn search_current_track_set(&mut self, text: &str, use_recent_filter: bool, days: u32) {
        let predicate = if use_recent_filter {
            build_relative_filter(days)
        } else {
            empty_filter()
        };
        self.search_with_filter(text, predicate);
    }

    /// Accept results from the executor
    ///
    /// Returns `false` when the result belongs to a superseded request.
    pub fn on_results(&mut self, results: ResultSet) -> bool {
        if results.request.generation != self.latest_generation {
            log::debug!(
                "on_results: Dropping stale generation {} (latest {})",
                results.request.generation,
                self.latest_generation
            );
            return false;
        }
        log::debug!(
            "on_results: {} tracks for generation {}",
            results.tracks.len(),
            results.request.generation
        );
        self.results = Some(results);
        true
    }

    /// Result set of the last completed refresh
    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    /// Rows of the last completed refresh in display order
    pub fn tracks(&self) -> &[Track] {
        self.results
            .as_ref()
            .map(|r| r.tracks.as_slice())
            .unwrap_or(&[])
    }

    /// Whether a submitted request has not completed yet
    pub fn is_loading(&self) -> bool {
        self.latest_generation > 0
            && self
                .results
                .as_ref()
                .map_or(true, |r| r.request.generation != self.latest_generation)
    }

    /// Gather the identifiers of selected rows
    ///
    /// `rows` are indices into [`Self::tracks`] in any order; identifiers are
    /// gathered in display order. Rows outside the result set are skipped.
    pub fn selection_from_rows(&self, rows: &[usize]) -> TrackSelection {
        let mut rows = rows.to_vec();
        rows.sort_unstable();
        rows.dedup();

        let tracks = self.tracks();
        TrackSelection::from_ids(
            rows.into_iter().filter_map(|row| tracks.get(row).map(|t| t.id)),
        )
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }
}
