use chrono::{DateTime, Local};
use rand::rngs::ThreadRng;
use rand::Rng;
use std::collections::VecDeque;

pub const HISTORY_CAPACITY: usize = 5;

/// Something a relocation can find by id.
pub trait Identified {
    type Id: PartialEq;

    fn id(&self) -> &Self::Id;
}

/// Where a relocated element started and ended (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub old_index: usize,
    pub new_index: usize,
}

#[derive(Debug, Clone)]
pub struct Relocation<T> {
    pub list: Vec<T>,
    /// `None` when the target id was not in the list; `list` is then untouched.
    pub moved: Option<Move>,
}

/// Single source of randomness for picking and relocating.
pub struct RandomSampler<R = ThreadRng> {
    rng: R,
}

impl RandomSampler<ThreadRng> {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RandomSampler<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomSampler<R> {
    #[cfg(test)]
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Uniform index in `[0, len)`, or `None` when `len == 0`.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rng.random_range(0..len))
        }
    }

    pub fn pick_random<'a, T>(&mut self, list: &'a [T]) -> Option<&'a T> {
        self.pick_index(list.len()).and_then(|i| list.get(i))
    }

    /// Take the element with `target` out and put it back at a uniform index
    /// over the remaining `len - 1` slots. Everything else keeps its order.
    pub fn relocate_randomly<T: Identified>(&mut self, mut list: Vec<T>, target: &T::Id) -> Relocation<T> {
        let Some(old_index) = list.iter().position(|item| item.id() == target) else {
            return Relocation { list, moved: None };
        };

        let item = list.remove(old_index);
        let new_index = self.pick_index(list.len()).unwrap_or(0);
        list.insert(new_index, item);

        Relocation {
            list,
            moved: Some(Move {
                old_index,
                new_index,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub label: String,
    /// 1-based.
    pub old_position: usize,
    /// 1-based.
    pub new_position: usize,
    pub at: DateTime<Local>,
}

/// Most recent relocations, newest first, bounded.
#[derive(Debug, Clone)]
pub struct ActionHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl ActionHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn record(&mut self, label: impl Into<String>, mv: Move, at: DateTime<Local>) {
        self.entries.push_front(HistoryEntry {
            label: label.into(),
            old_position: mv.old_index + 1,
            new_position: mv.new_index + 1,
            at,
        });
        self.entries.truncate(self.capacity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ActionHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
    }

    impl Identified for Item {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    fn items(n: u32) -> Vec<Item> {
        (1..=n).map(|id| Item { id }).collect()
    }

    fn seeded(seed: u64) -> RandomSampler<StdRng> {
        RandomSampler::with_rng(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn pick_from_empty_is_none() {
        let empty: Vec<u8> = Vec::new();
        assert_eq!(seeded(1).pick_random(&empty), None);
        assert_eq!(RandomSampler::new().pick_random(&empty), None);
    }

    #[test]
    fn pick_reaches_every_element() {
        let list = [10, 20, 30];
        let mut sampler = seeded(7);
        let mut seen = [false; 3];
        for _ in 0..300 {
            let v = *sampler.pick_random(&list).expect("non-empty");
            let i = list.iter().position(|x| *x == v).expect("member");
            seen[i] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn relocation_preserves_elements_and_relative_order() {
        let mut sampler = seeded(42);
        for target in 1..=5u32 {
            for _ in 0..50 {
                let out = sampler.relocate_randomly(items(5), &target);
                let mv = out.moved.expect("target present");
                assert_eq!(out.list.len(), 5);
                assert!(mv.new_index < 5);
                assert_eq!(out.list[mv.new_index].id, target);

                let mut sorted: Vec<_> = out.list.iter().map(|i| i.id).collect();
                sorted.sort_unstable();
                assert_eq!(sorted, vec![1, 2, 3, 4, 5]);

                let others: Vec<_> = out.list.iter().map(|i| i.id).filter(|id| *id != target).collect();
                let expected: Vec<_> = (1..=5).filter(|id| *id != target).collect();
                assert_eq!(others, expected);
            }
        }
    }

    #[test]
    fn relocation_eventually_moves_the_target() {
        let mut sampler = seeded(3);
        let moved = (0..200).any(|_| {
            let mv = sampler.relocate_randomly(items(5), &1).moved.expect("present");
            mv.new_index != mv.old_index
        });
        assert!(moved);
    }

    #[test]
    fn relocation_inserts_over_remaining_slots() {
        let mut sampler = seeded(11);
        for _ in 0..200 {
            let mv = sampler.relocate_randomly(items(4), &2).moved.expect("present");
            assert!(mv.new_index < 3, "new index {} outside remaining slots", mv.new_index);
        }
    }

    #[test]
    fn single_element_stays_put() {
        let out = seeded(5).relocate_randomly(items(1), &1);
        assert_eq!(out.moved, Some(Move { old_index: 0, new_index: 0 }));
        assert_eq!(out.list, items(1));
    }

    #[test]
    fn unknown_target_is_a_silent_no_op() {
        let out = seeded(9).relocate_randomly(items(3), &99);
        assert_eq!(out.moved, None);
        assert_eq!(out.list, items(3));
    }

    #[test]
    fn history_keeps_five_newest_first() {
        let mut history = ActionHistory::new();
        let now = Local::now();
        for i in 0..6 {
            history.record(
                format!("item {i}"),
                Move {
                    old_index: i,
                    new_index: 0,
                },
                now,
            );
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        let labels: Vec<_> = history.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["item 5", "item 4", "item 3", "item 2", "item 1"]);
        let first = history.iter().next().expect("newest");
        assert_eq!(first.old_position, 6);
        assert_eq!(first.new_position, 1);
    }
}
