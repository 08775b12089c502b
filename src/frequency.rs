//! Symbol frequency counting

use std::collections::HashMap;

use crate::symbol::Symbol;

/// Occurrence counts keyed by symbol. Every symbol seen appears exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S: Symbol> {
    counts: HashMap<S, u64>,
}

impl<S: Symbol> FrequencyTable<S> {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    /// Tally every symbol in `symbols`.
    pub fn count<I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut table = Self::new();
        for sym in symbols {
            *table.counts.entry(sym).or_insert(0) += 1;
        }
        table
    }

    pub fn get(&self, symbol: &S) -> u64 {
        self.counts.get(symbol).copied().unwrap_or(0)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (S, u64)> {
        let mut entries: Vec<(S, u64)> = self.counts.iter().map(|(&s, &f)| (s, f)).collect();
        entries.sort_unstable_by_key(|&(s, _)| s);
        entries.into_iter()
    }

    /// Fold the counts of another shard into this one.
    pub fn merge(&mut self, other: &FrequencyTable<S>) {
        for (&sym, &freq) in &other.counts {
            *self.counts.entry(sym).or_insert(0) += freq;
        }
    }

    /// Shannon entropy in bits per symbol.
    pub fn entropy_bits(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let len = total as f64;
        let mut entropy = 0.0;
        for &f in self.counts.values() {
            if f > 0 {
                let p = f as f64 / len;
                entropy -= p * p.log2();
            }
        }
        entropy
    }
}

impl<S: Symbol> Default for FrequencyTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> FromIterator<(S, u64)> for FrequencyTable<S> {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (sym, freq) in iter {
            *table.counts.entry(sym).or_insert(0) += freq;
        }
        table
    }
}
