//! Spend per category bucket, small slices rolled up into "Other".

use serde::{Deserialize, Serialize};
use spendlens_core::{Bucket, CategoryPieConfig, TransactionRecord};

use crate::types::{AggregateEntry, OrderedSums};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// Largest first; the rollup, when present, is always last
    pub entries: Vec<AggregateEntry>,
    /// Sum of positive amounts in the input
    pub total: f64,
}

impl CategoryBreakdown {
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn amounts(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.total).collect()
    }

    pub fn share_of(&self, entry: &AggregateEntry) -> f64 {
        if self.total > 0.0 { entry.total / self.total } else { 0.0 }
    }
}

pub fn build_category_breakdown<'a, I>(records: I, config: &CategoryPieConfig) -> CategoryBreakdown
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut sums: OrderedSums<Bucket> = OrderedSums::new();
    for r in records.into_iter().filter(|r| r.is_spend()) {
        sums.add(&r.bucket, r.amount);
    }

    let total = sums.total();
    let min_share = config.effective_min_share();
    let keep_slots = config.effective_max_slices() - 1;

    let mut entries = Vec::new();
    let mut other = 0.0;
    for (bucket, sum) in sums.into_sorted_desc() {
        let label = bucket.label();
        let share = if total > 0.0 { sum / total } else { 0.0 };
        // a bucket already named like the rollup joins it, keeping labels unique
        if label == config.other_label || share < min_share || entries.len() >= keep_slots {
            other += sum;
        } else {
            entries.push(AggregateEntry::new(label, sum));
        }
    }
    if other > 0.0 {
        entries.push(AggregateEntry::new(config.other_label.clone(), other));
    }

    CategoryBreakdown { entries, total }
}
