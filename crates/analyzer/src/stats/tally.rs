//! Tally: order-preserving counters with stable top-N ranking.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

/// One ranked key with its accumulated value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry<K> {
    pub key: K,
    pub value: u64,
}

/// Accumulates values per key, remembering the order keys were first seen.
///
/// Ranking is a stable descending sort over first-seen order, so equal values
/// keep the order they appeared in the input.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    index: HashMap<K, usize>,
    entries: Vec<RankedEntry<K>>,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, key: K, amount: u64) {
        match self.index.get(&key) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                entry.value = entry.value.saturating_add(amount);
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(RankedEntry { key, value: amount });
            }
        }
    }

    /// Number of distinct keys seen
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every key, highest value first
    pub fn ranked(self) -> Vec<RankedEntry<K>> {
        let mut entries = self.entries;
        // sort_by is stable: ties stay in first-seen order
        entries.sort_by(|a, b| b.value.cmp(&a.value));
        entries
    }

    /// The `n` highest-valued keys
    pub fn top(self, n: usize) -> Vec<RankedEntry<K>> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

impl<K: Eq + Hash + Clone> Default for Tally<K> {
    fn default() -> Self {
        Self::new()
    }
}
