use crate::sampler::{ActionHistory, Identified, Move, RandomSampler};
use chrono::Local;
use rand::Rng;
use serde::Serialize;

const SEED_LABELS: [&str; 5] = ["First", "Second", "Third", "Fourth", "Fifth"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoItem {
    pub id: u32,
    pub label: String,
}

impl Identified for DemoItem {
    type Id = u32;

    fn id(&self) -> &u32 {
        &self.id
    }
}

/// The reorder demo: a short list whose items can be moved to random slots.
#[derive(Debug, Clone)]
pub struct DemoBoard {
    items: Vec<DemoItem>,
    history: ActionHistory,
}

impl DemoBoard {
    pub fn seeded() -> Self {
        Self {
            items: seed_items(),
            history: ActionHistory::new(),
        }
    }

    pub fn items(&self) -> &[DemoItem] {
        &self.items
    }

    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    pub fn relocate<R: Rng>(&mut self, sampler: &mut RandomSampler<R>, id: u32) -> Option<Move> {
        let items = std::mem::take(&mut self.items);
        let out = sampler.relocate_randomly(items, &id);
        self.items = out.list;

        let mv = out.moved?;
        let label = self.items[mv.new_index].label.clone();
        tracing::debug!(
            item = id,
            from = mv.old_index + 1,
            to = mv.new_index + 1,
            "demo item relocated"
        );
        self.history.record(label, mv, Local::now());
        Some(mv)
    }

    /// Relocate an item chosen at random; `None` only when the board is empty.
    pub fn relocate_any<R: Rng>(&mut self, sampler: &mut RandomSampler<R>) -> Option<(u32, Move)> {
        let id = sampler.pick_random(&self.items)?.id;
        self.relocate(sampler, id).map(|mv| (id, mv))
    }

    pub fn reset(&mut self) {
        tracing::debug!(had_history = !self.history.is_empty(), "demo board reset");
        self.items = seed_items();
        self.history.clear();
    }
}

impl Default for DemoBoard {
    fn default() -> Self {
        Self::seeded()
    }
}

fn seed_items() -> Vec<DemoItem> {
    SEED_LABELS
        .iter()
        .zip(1u32..)
        .map(|(label, id)| DemoItem {
            id,
            label: label.to_string(),
        })
        .collect()
}
