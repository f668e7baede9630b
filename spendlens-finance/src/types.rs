use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// `(label, total)` pair produced by every aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub label: String,
    pub total: f64,
}

impl AggregateEntry {
    pub fn new(label: impl Into<String>, total: f64) -> Self {
        Self {
            label: label.into(),
            total,
        }
    }
}

/// Per-key sums that remember first-seen order, so ties resolve the same way
/// on every run.
#[derive(Debug, Clone)]
pub struct OrderedSums<K> {
    index: HashMap<K, usize>,
    sums: Vec<(K, f64)>,
}

impl<K: Eq + Hash + Clone> OrderedSums<K> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            sums: Vec::new(),
        }
    }

    pub fn add(&mut self, key: &K, amount: f64) {
        match self.index.get(key) {
            Some(&i) => self.sums[i].1 += amount,
            None => {
                self.index.insert(key.clone(), self.sums.len());
                self.sums.push((key.clone(), amount));
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.index.get(key).map(|&i| self.sums[i].1)
    }

    pub fn total(&self) -> f64 {
        self.sums.iter().map(|(_, s)| s).sum()
    }

    pub fn len(&self) -> usize {
        self.sums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }

    /// Largest sum; the earliest key wins a tie.
    pub fn max(&self) -> Option<(&K, f64)> {
        let mut best: Option<(&K, f64)> = None;
        for (key, sum) in &self.sums {
            if best.is_none_or(|(_, b)| *sum > b) {
                best = Some((key, *sum));
            }
        }
        best
    }

    /// Entries sorted descending by sum; equal sums keep first-seen order.
    pub fn into_sorted_desc(self) -> Vec<(K, f64)> {
        let mut sums = self.sums;
        sums.sort_by(|a, b| b.1.total_cmp(&a.1));
        sums
    }
}

impl<K: Eq + Hash + Clone> Default for OrderedSums<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sums_accumulate_in_first_seen_order() {
        let mut sums = OrderedSums::new();
        sums.add(&"b", 1.0);
        sums.add(&"a", 2.0);
        sums.add(&"b", 1.0);
        assert_eq!(sums.len(), 2);
        assert_eq!(sums.get(&"b"), Some(2.0));
        assert_eq!(sums.get(&"z"), None);
        assert_eq!(sums.total(), 4.0);
        // tie between b and a: b was seen first
        assert_eq!(sums.max(), Some((&"b", 2.0)));
        assert_eq!(sums.into_sorted_desc(), vec![("b", 2.0), ("a", 2.0)]);
    }

    #[test]
    fn test_empty() {
        let sums: OrderedSums<String> = OrderedSums::default();
        assert!(sums.is_empty());
        assert_eq!(sums.max(), None);
    }
}
