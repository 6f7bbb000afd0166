//! JSON views handed to browser hosts
//!
//! Every recompute produces a [`BatchView`] with `reset: true`, even when the
//! new generation is empty, so the host knows to clear its cards. Batches
//! revealed later by "load more" or scrolling carry `reset: false`.

use serde::Serialize;

use crate::card::Card;
use crate::controller::{Refresh, SearchController};
use crate::matching::Marker;
use crate::pipeline::Batch;
use crate::resistance::tag_label;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchView {
    pub generation: u64,
    /// Whether previously rendered cards must be dropped first
    pub reset: bool,
    pub total: usize,
    pub cards: Vec<Card>,
    pub no_more: bool,
}

impl BatchView {
    /// View of a fresh generation
    pub fn refreshed(controller: &SearchController, refresh: &Refresh, marker: Marker) -> Self {
        let (cards, no_more) = match &refresh.first {
            Some(batch) => (controller.cards(controller.entries(batch), marker), batch.no_more),
            None => (Vec::new(), false),
        };
        Self {
            generation: refresh.generation,
            reset: true,
            total: refresh.total,
            cards,
            no_more,
        }
    }

    /// View of a batch appended to the current generation
    pub fn appended(controller: &SearchController, batch: &Batch, marker: Marker) -> Self {
        Self {
            generation: controller.cursor().generation(),
            reset: false,
            total: controller.results().len(),
            cards: controller.cards(controller.entries(batch), marker),
            no_more: batch.no_more,
        }
    }
}

/// A resistance filter option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagView {
    pub tag: String,
    pub label: String,
}

pub fn tag_views(controller: &SearchController) -> Vec<TagView> {
    controller
        .resistance_tags()
        .into_iter()
        .map(|tag| TagView {
            label: tag_label(&tag),
            tag,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ControllerOptions;
    use crate::dataset::fixtures;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn controller(batch_size: usize) -> SearchController {
        SearchController::new(
            Arc::new(fixtures::index()),
            ControllerOptions {
                batch_size,
                debounce_ms: 500,
            },
        )
    }

    fn to_value(view: &BatchView) -> Value {
        serde_json::to_value(view).unwrap()
    }

    #[test]
    fn test_empty_generation_resets() {
        let mut controller = controller(12);
        let refresh = controller.toggle_resistance("L3");
        let value = to_value(&BatchView::refreshed(&controller, &refresh, Marker::HTML));
        assert_eq!(value["reset"], json!(true));
        assert_eq!(value["total"], json!(0));
        assert_eq!(value["cards"], json!([]));
        assert_eq!(value["noMore"], json!(false));
        assert_eq!(value["generation"], json!(refresh.generation));
    }

    #[test]
    fn test_refreshed_then_appended() {
        let mut controller = controller(2);
        let refresh = controller.deselect_all_regions();
        let first = BatchView::refreshed(&controller, &refresh, Marker::HTML);
        assert!(first.reset);
        assert_eq!(first.total, 5);
        assert_eq!(first.cards.len(), 2);
        assert!(!first.no_more);

        controller.load_next_batch();
        let batch = controller.load_next_batch().unwrap();
        let last = to_value(&BatchView::appended(&controller, &batch, Marker::HTML));
        assert_eq!(last["reset"], json!(false));
        assert_eq!(last["noMore"], json!(true));
        assert_eq!(last["cards"][0]["monster"], json!("Balrog"));
        assert_eq!(last["generation"], json!(refresh.generation));
    }

    #[test]
    fn test_appended_uses_applied_keyword() {
        let mut controller = controller(1);
        controller.search_now("shell");
        controller.set_keyword("slime", 0);
        let batch = controller.load_next_batch().unwrap();
        let view = BatchView::appended(&controller, &batch, Marker::HTML);
        assert_eq!(view.cards[0].title, "Slime(Goo)");
    }

    #[test]
    fn test_tag_views() {
        let tags = tag_views(&controller(12));
        assert_eq!(tags[0].tag, "F3");
        assert_eq!(tags[0].label, tag_label("F3"));
    }
}
