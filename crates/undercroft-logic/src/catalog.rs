//! Part catalog with weighted, instance-capped selection.
//!
//! The catalog owns the per-session instance counters. A part that reaches
//! its `max_count` drops out of the draw and the cached total weight is
//! recomputed, so every roll is proportional to weight among the parts
//! still eligible.

use std::sync::Arc;

use rand::Rng;

use crate::part::PartDescriptor;

#[derive(Debug, Clone)]
struct Entry {
    part: Arc<PartDescriptor>,
    count: u32,
    /// Position of this part in the catalog a subset was taken from.
    origin: usize,
}

impl Entry {
    fn at_cap(&self) -> bool {
        self.part.max_count.is_some_and(|max| self.count >= max)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PartCatalog {
    entries: Vec<Entry>,
    total_weight: u32,
}

impl PartCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(parts: impl IntoIterator<Item = PartDescriptor>) -> Self {
        let mut catalog = Self::new();
        for part in parts {
            catalog.add(part);
        }
        catalog
    }

    /// Add a part with a fresh instance counter.
    pub fn add(&mut self, part: PartDescriptor) {
        let origin = self.entries.len();
        self.entries.push(Entry {
            part: Arc::new(part),
            count: 0,
            origin,
        });
        self.recalculate_total_weight();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of weights over parts not yet at their cap.
    pub fn total_weight(&self) -> u32 {
        self.total_weight
    }

    pub fn parts(&self) -> impl Iterator<Item = &Arc<PartDescriptor>> {
        self.entries.iter().map(|e| &e.part)
    }

    /// Instance count of the named part this session.
    pub fn count_of(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.part.name == name)
            .map(|e| e.count)
    }

    /// Start a new generation session: every counter back to zero.
    pub fn reset_counts(&mut self) {
        for e in &mut self.entries {
            e.count = 0;
        }
        self.recalculate_total_weight();
    }

    fn recalculate_total_weight(&mut self) {
        self.total_weight = self
            .entries
            .iter()
            .filter(|e| !e.at_cap())
            .map(|e| e.part.weight)
            .sum();
    }

    /// Draw a part proportional to weight, skipping parts at their cap.
    ///
    /// Counts the draw against the part's cap. `None` when nothing is
    /// eligible.
    pub fn select(&mut self, rng: &mut impl Rng) -> Option<Arc<PartDescriptor>> {
        if self.entries.is_empty() || self.total_weight == 0 {
            return None;
        }

        let mut roll = rng.gen_range(0..self.total_weight);
        for i in 0..self.entries.len() {
            let entry = &mut self.entries[i];
            if entry.at_cap() {
                continue;
            }
            if entry.part.weight > roll {
                entry.count += 1;
                let part = Arc::clone(&entry.part);
                if entry.at_cap() {
                    self.recalculate_total_weight();
                }
                return Some(part);
            }
            roll -= entry.part.weight;
        }

        // Unreachable while total_weight matches the eligible entries.
        None
    }

    /// A catalog of the parts matching `keep`, carrying their current counts.
    ///
    /// Fold its counts back with [`merge_counts`](Self::merge_counts) so caps
    /// hold across both catalogs.
    pub fn subset(&self, keep: impl Fn(&PartDescriptor) -> bool) -> Self {
        let mut sub = Self {
            entries: self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| keep(&e.part))
                .map(|(i, e)| Entry {
                    part: Arc::clone(&e.part),
                    count: e.count,
                    origin: i,
                })
                .collect(),
            total_weight: 0,
        };
        sub.recalculate_total_weight();
        sub
    }

    /// Copy instance counts from a catalog made by [`subset`](Self::subset).
    pub fn merge_counts(&mut self, sub: &PartCatalog) {
        for e in &sub.entries {
            if let Some(mine) = self.entries.get_mut(e.origin) {
                mine.count = e.count;
            }
        }
        self.recalculate_total_weight();
    }
}
