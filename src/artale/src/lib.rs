//! # artale
//!
//! Monster and item drop lookup for Artale.
//!
//! This library provides functionality to:
//! - Load the drop, monster, item, map and alias datasets into a [`NormalizedIndex`]
//! - Search monsters and drops by keyword (OR-lists, aliases, `boss`)
//! - Filter by level range, region and elemental resistance
//! - Reveal results in batches and render them as [`Card`]s
//! - Keep a search history in a primary and a cookie-style secondary store
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let index = Arc::new(artale::NormalizedIndex::load_dir("data")?);
//! let mut controller = artale::SearchController::new(index, Default::default());
//!
//! let refresh = controller.search_now("sword | shell");
//! println!("{} results", refresh.total);
//! for card in controller.cards(controller.visible(), artale::Marker::PLAIN) {
//!     print!("{}", card.render_text());
//! }
//! # Ok(())
//! # }
//! ```

pub mod card;
pub mod controller;
pub mod dataset;
pub mod debounce;
pub mod error;
pub mod history;
pub mod matching;
pub mod pipeline;
pub mod resistance;
pub mod share;
pub mod view;

#[cfg(feature = "wasm")]
pub mod wasm;

#[doc(inline)]
pub use card::{Card, CardItem, CardStats, ItemGroup, ResistanceBadge};
#[doc(inline)]
pub use controller::{ControllerOptions, Refresh, SearchController, NEAR_BOTTOM_PX};
#[doc(inline)]
pub use dataset::{
    DatasetFile, DatasetSources, DropItem, ItemCategory, MobAttributes, Monster, NormalizedIndex,
    RawDatasets, RegionOption,
};
#[doc(inline)]
pub use debounce::Debouncer;
#[doc(inline)]
pub use error::{DataLoadError, StorageError, UnknownRecordType};
#[doc(inline)]
pub use history::{
    CookieJar, HistoryRecord, HistoryStore, MemoryStore, RecordType, StorageBackend,
};
#[cfg(feature = "db")]
#[doc(inline)]
pub use history::SqliteStore;
#[doc(inline)]
pub use matching::{highlight, Keyword, MatchEngine, Marker};
#[doc(inline)]
pub use pipeline::{recompute, Batch, FilterState, LazyCursor, LevelRange, ResultEntry};
#[doc(inline)]
pub use share::{initial_keyword, share_url, ShareError};
#[doc(inline)]
pub use view::{BatchView, TagView};
