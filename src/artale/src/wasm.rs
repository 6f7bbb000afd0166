//! WebAssembly bindings for artale
//!
//! Exposes [`DropExplorer`], a browser-facing wrapper around
//! [`SearchController`] that hands cards to JavaScript as JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

use crate::controller::{ControllerOptions, Refresh, SearchController};
use crate::dataset::{DatasetSources, NormalizedIndex};
use crate::history::{Clock, DocumentCookieStore, HistoryStore, LocalStorageStore};
use crate::matching::Marker;
use crate::pipeline::Batch;
use crate::view::{tag_views, BatchView};

fn js_clock() -> Clock {
    Arc::new(|| DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialize failed: {}", e)))
}

/// Search session over one data snapshot
#[wasm_bindgen]
pub struct DropExplorer {
    controller: SearchController,
    history: HistoryStore,
}

#[wasm_bindgen]
impl DropExplorer {
    /// Build from the JSON text of the eight datasets
    #[wasm_bindgen(constructor)]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        drops: &str,
        mobs: &str,
        items: &str,
        boss_timers: &str,
        spawn_maps: &str,
        map_corrections: &str,
        area_defaults: &str,
        aliases: &str,
    ) -> Result<DropExplorer, JsValue> {
        let index = NormalizedIndex::from_sources(&DatasetSources {
            drops,
            mobs,
            items,
            boss_timers,
            spawn_maps,
            map_corrections,
            area_defaults,
            aliases,
        })
        .map_err(|e| JsValue::from_str(&format!("Failed to load data: {}", e)))?;

        let history = HistoryStore::new(
            Box::new(LocalStorageStore::new()),
            Box::new(DocumentCookieStore::new().with_clock(js_clock())),
        )
        .with_clock(js_clock());

        Ok(DropExplorer {
            controller: SearchController::new(Arc::new(index), ControllerOptions::default()),
            history,
        })
    }

    fn refresh_json(&self, refresh: &Refresh) -> Result<String, JsValue> {
        to_json(&BatchView::refreshed(&self.controller, refresh, Marker::HTML))
    }

    fn maybe_refresh_json(&self, refresh: Option<Refresh>) -> Result<String, JsValue> {
        match refresh {
            Some(refresh) => self.refresh_json(&refresh),
            None => Ok("null".to_string()),
        }
    }

    fn batch_json(&self, batch: Option<Batch>) -> Result<String, JsValue> {
        match batch {
            Some(batch) => to_json(&BatchView::appended(&self.controller, &batch, Marker::HTML)),
            None => Ok("null".to_string()),
        }
    }

    #[wasm_bindgen(js_name = setKeyword)]
    pub fn set_keyword(&mut self, keyword: &str, now_ms: f64) {
        self.controller.set_keyword(keyword, now_ms as u64);
    }

    #[wasm_bindgen(js_name = setOnlyMatchedDrops)]
    pub fn set_only_matched_drops(&mut self, only_matched: bool, now_ms: f64) {
        self.controller.set_only_matched_drops(only_matched, now_ms as u64);
    }

    #[wasm_bindgen(js_name = setLevelInputs)]
    pub fn set_level_inputs(&mut self, min: &str, max: &str, now_ms: f64) {
        self.controller.set_level_inputs(min, max, now_ms as u64);
    }

    /// Apply a due debounced edit; returns the new generation's view or
    /// `null` when nothing was due
    #[wasm_bindgen(js_name = tick)]
    pub fn tick(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let refresh = self.controller.tick(now_ms as u64);
        self.maybe_refresh_json(refresh)
    }

    /// Apply pending edits now; `null` when nothing was pending
    #[wasm_bindgen(js_name = flush)]
    pub fn flush(&mut self) -> Result<String, JsValue> {
        let refresh = self.controller.flush();
        self.maybe_refresh_json(refresh)
    }

    #[wasm_bindgen(js_name = searchNow)]
    pub fn search_now(&mut self, keyword: &str) -> Result<String, JsValue> {
        let refresh = self.controller.search_now(keyword);
        self.refresh_json(&refresh)
    }

    /// Current results from the first batch
    #[wasm_bindgen(js_name = refresh)]
    pub fn refresh(&mut self) -> Result<String, JsValue> {
        let refresh = self.controller.refresh();
        self.refresh_json(&refresh)
    }

    #[wasm_bindgen(js_name = toggleRegion)]
    pub fn toggle_region(&mut self, region: &str) -> Result<String, JsValue> {
        let refresh = self.controller.toggle_region(region);
        self.refresh_json(&refresh)
    }

    #[wasm_bindgen(js_name = selectAllRegions)]
    pub fn select_all_regions(&mut self) -> Result<String, JsValue> {
        let refresh = self.controller.select_all_regions();
        self.refresh_json(&refresh)
    }

    #[wasm_bindgen(js_name = deselectAllRegions)]
    pub fn deselect_all_regions(&mut self) -> Result<String, JsValue> {
        let refresh = self.controller.deselect_all_regions();
        self.refresh_json(&refresh)
    }

    #[wasm_bindgen(js_name = selectDefaultRegions)]
    pub fn select_default_regions(&mut self) -> Result<String, JsValue> {
        let refresh = self.controller.select_default_regions();
        self.refresh_json(&refresh)
    }

    #[wasm_bindgen(js_name = toggleResistance)]
    pub fn toggle_resistance(&mut self, tag: &str) -> Result<String, JsValue> {
        let refresh = self.controller.toggle_resistance(tag);
        self.refresh_json(&refresh)
    }

    #[wasm_bindgen(js_name = loadMore)]
    pub fn load_more(&mut self) -> Result<String, JsValue> {
        let batch = self.controller.load_next_batch();
        self.batch_json(batch)
    }

    #[wasm_bindgen(js_name = onScroll)]
    pub fn on_scroll(&mut self, viewport_bottom: f64, content_height: f64) -> Result<String, JsValue> {
        let batch = self.controller.on_scroll(viewport_bottom, content_height);
        self.batch_json(batch)
    }

    #[wasm_bindgen(js_name = regionOptions)]
    pub fn region_options(&self) -> Result<String, JsValue> {
        to_json(&self.controller.region_options())
    }

    #[wasm_bindgen(js_name = selectedRegions)]
    pub fn selected_regions(&self) -> Result<String, JsValue> {
        to_json(&self.controller.filter().selected_regions)
    }

    #[wasm_bindgen(js_name = resistanceTags)]
    pub fn resistance_tags(&self) -> Result<String, JsValue> {
        to_json(&tag_views(&self.controller))
    }

    #[wasm_bindgen(js_name = shareUrl)]
    pub fn share_url(&self, base: &str) -> Result<String, JsValue> {
        self.controller
            .share_url(base)
            .map_err(|e| JsValue::from_str(&format!("Invalid share URL: {}", e)))
    }

    /// Record the current search; returns the record type or `undefined`.
    ///
    /// Pending edits are applied first, so call `flush` before this to get
    /// the resulting view.
    #[wasm_bindgen(js_name = confirmSearch)]
    pub fn confirm_search(&mut self) -> Option<String> {
        self.controller
            .confirm_search(&mut self.history)
            .map(|kind| kind.to_string())
    }

    #[wasm_bindgen(js_name = historyJson)]
    pub fn history_json(&mut self) -> Result<String, JsValue> {
        to_json(&self.history.get_records())
    }

    #[wasm_bindgen(js_name = clearHistory)]
    pub fn clear_history(&mut self) {
        self.history.clear_history();
    }
}
