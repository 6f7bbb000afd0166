//! Search controller
//!
//! Owns the filter state, the current result list and its lazy cursor.
//! Text-like edits (keyword, only-matched toggle, level inputs) are debounced
//! and applied by [`SearchController::tick`]; region and resistance toggles
//! recompute immediately and cancel any pending debounce. Listeners
//! registered with [`SearchController::on_filter_changed`] see the filter
//! state after every recompute.
//!
//! Pending edits live in [`filter`](SearchController::filter) until the next
//! recompute. The filter that produced the current results is kept apart as
//! [`applied_filter`](SearchController::applied_filter); cards and history
//! records are always derived from it.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::card::Card;
use crate::dataset::{NormalizedIndex, RegionOption};
use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE_MS};
use crate::history::{HistoryRecord, HistoryStore, RecordType};
use crate::matching::Marker;
use crate::pipeline::{
    recompute, Batch, FilterState, LazyCursor, LevelRange, ResultEntry, DEFAULT_BATCH_SIZE,
};
use crate::share::{share_url, ShareError};

/// Distance from the bottom of the content at which scrolling loads more
pub const NEAR_BOTTOM_PX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub batch_size: usize,
    pub debounce_ms: u64,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// A new result generation.
///
/// Hosts clear previously rendered cards on every `Refresh`, including one
/// with `total == 0` and no first batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refresh {
    pub generation: u64,
    pub total: usize,
    pub first: Option<Batch>,
}

pub type FilterListener = Box<dyn FnMut(&FilterState)>;

pub struct SearchController {
    index: Arc<NormalizedIndex>,
    filter: FilterState,
    applied: FilterState,
    results: Vec<ResultEntry>,
    cursor: LazyCursor,
    debouncer: Debouncer,
    listeners: Vec<FilterListener>,
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("filter", &self.filter)
            .field("applied", &self.applied)
            .field("results", &self.results.len())
            .field("cursor", &self.cursor)
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}

impl SearchController {
    /// Controller with default regions selected and the first batch revealed
    pub fn new(index: Arc<NormalizedIndex>, options: ControllerOptions) -> Self {
        let filter = FilterState {
            selected_regions: index.default_regions(),
            ..FilterState::default()
        };
        let mut controller = Self {
            index,
            applied: filter.clone(),
            filter,
            results: Vec::new(),
            cursor: LazyCursor::new(options.batch_size),
            debouncer: Debouncer::new(options.debounce_ms),
            listeners: Vec::new(),
        };
        controller.refresh();
        controller
    }

    pub fn index(&self) -> &NormalizedIndex {
        &self.index
    }

    /// Filter including edits not yet applied
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Filter the current results were computed from
    pub fn applied_filter(&self) -> &FilterState {
        &self.applied
    }

    /// Every entry of the current generation, revealed or not
    pub fn results(&self) -> &[ResultEntry] {
        &self.results
    }

    /// Entries revealed so far
    pub fn visible(&self) -> &[ResultEntry] {
        &self.results[..self.cursor.position()]
    }

    pub fn entries(&self, batch: &Batch) -> &[ResultEntry] {
        &self.results[batch.range.clone()]
    }

    /// Cards for `entries`, highlighted with the applied keyword
    pub fn cards(&self, entries: &[ResultEntry], marker: Marker) -> Vec<Card> {
        entries
            .iter()
            .map(|entry| Card::build(&self.index, entry, &self.applied.keyword, marker))
            .collect()
    }

    pub fn cursor(&self) -> &LazyCursor {
        &self.cursor
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Subscribe to filter changes; called after every recompute
    pub fn on_filter_changed<F>(&mut self, listener: F)
    where
        F: FnMut(&FilterState) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    // Debounced edits

    pub fn set_keyword(&mut self, keyword: &str, now_ms: u64) {
        self.filter.keyword = keyword.to_string();
        self.debouncer.trigger(now_ms);
    }

    pub fn set_only_matched_drops(&mut self, only_matched: bool, now_ms: u64) {
        self.filter.only_matched_drops = only_matched;
        self.debouncer.trigger(now_ms);
    }

    pub fn set_level_range(&mut self, levels: LevelRange, now_ms: u64) {
        self.filter.levels = levels;
        self.debouncer.trigger(now_ms);
    }

    /// Level bounds from free-text inputs, see [`LevelRange::from_inputs`]
    pub fn set_level_inputs(&mut self, min: &str, max: &str, now_ms: u64) {
        self.set_level_range(LevelRange::from_inputs(min, max), now_ms);
    }

    /// Run the pending debounced recompute if it is due
    pub fn tick(&mut self, now_ms: u64) -> Option<Refresh> {
        if self.debouncer.poll(now_ms) {
            Some(self.refresh())
        } else {
            None
        }
    }

    /// Run any pending debounced recompute now
    pub fn flush(&mut self) -> Option<Refresh> {
        if self.debouncer.cancel() {
            Some(self.refresh())
        } else {
            None
        }
    }

    // Immediate edits

    pub fn toggle_region(&mut self, region: &str) -> Refresh {
        toggle(&mut self.filter.selected_regions, region);
        self.refresh_now()
    }

    pub fn select_all_regions(&mut self) -> Refresh {
        self.filter.selected_regions = self
            .index
            .region_options()
            .into_iter()
            .map(|option| option.name)
            .collect();
        self.refresh_now()
    }

    pub fn deselect_all_regions(&mut self) -> Refresh {
        self.filter.selected_regions.clear();
        self.refresh_now()
    }

    pub fn select_default_regions(&mut self) -> Refresh {
        self.filter.selected_regions = self.index.default_regions();
        self.refresh_now()
    }

    pub fn toggle_resistance(&mut self, tag: &str) -> Refresh {
        toggle(&mut self.filter.selected_resistances, tag);
        self.refresh_now()
    }

    /// Set the keyword and recompute without debouncing
    pub fn search_now(&mut self, keyword: &str) -> Refresh {
        self.filter.keyword = keyword.to_string();
        self.refresh_now()
    }

    /// Re-run a past search; does not write a new history record
    pub fn apply_history_record(&mut self, record: &HistoryRecord) -> Refresh {
        self.search_now(&record.keyword)
    }

    fn refresh_now(&mut self) -> Refresh {
        self.debouncer.cancel();
        self.refresh()
    }

    /// Apply the pending filter, start a new cursor generation and reveal
    /// the first batch
    pub fn refresh(&mut self) -> Refresh {
        self.applied = self.filter.clone();
        self.results = recompute(&self.index, &self.applied);
        self.cursor.reset(self.results.len());
        for listener in &mut self.listeners {
            listener(&self.applied);
        }
        Refresh {
            generation: self.cursor.generation(),
            total: self.results.len(),
            first: self.cursor.advance(),
        }
    }

    /// Reveal the next batch ("load more")
    pub fn load_next_batch(&mut self) -> Option<Batch> {
        self.cursor.advance()
    }

    /// Reveal the next batch when the viewport is near the end of the content
    pub fn on_scroll(&mut self, viewport_bottom: f64, content_height: f64) -> Option<Batch> {
        if viewport_bottom >= content_height - NEAR_BOTTOM_PX {
            self.load_next_batch()
        } else {
            None
        }
    }

    /// Type the applied search would be recorded as.
    ///
    /// `None` for an empty keyword or an empty result list.
    pub fn confirmed_record_type(&self) -> Option<RecordType> {
        if self.applied.keyword.is_empty() || self.results.is_empty() {
            return None;
        }
        if self.results.iter().any(|entry| entry.monster_matched) {
            Some(RecordType::Monster)
        } else {
            Some(RecordType::Item)
        }
    }

    /// Apply pending edits, then record the search in `history` if it qualifies
    pub fn confirm_search(&mut self, history: &mut HistoryStore) -> Option<RecordType> {
        self.flush();
        let kind = self.confirmed_record_type()?;
        history
            .record(kind, &self.applied.keyword)
            .then_some(kind)
    }

    pub fn region_options(&self) -> Vec<RegionOption> {
        self.index.region_options()
    }

    pub fn resistance_tags(&self) -> Vec<String> {
        self.index.resistance_filter_tags()
    }

    /// Link to `base` carrying the keyword as typed
    pub fn share_url(&self, base: &str) -> Result<String, ShareError> {
        share_url(base, &self.filter.keyword)
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}
