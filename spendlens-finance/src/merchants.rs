//! Top merchants by summed amount.

use serde::{Deserialize, Serialize};
use spendlens_core::{Bucket, TransactionRecord};
use std::collections::HashMap;

use crate::types::OrderedSums;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantEntry {
    pub label: String,
    pub total: f64,
    /// Bucket holding the largest share of this merchant's amount
    pub dominant_bucket: Bucket,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MerchantRanking {
    /// Non-increasing by total
    pub entries: Vec<MerchantEntry>,
}

impl MerchantRanking {
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn amounts(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.total).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sum amounts per canonical description and keep the `top_n` largest.
pub fn build_merchant_ranking<'a, I>(records: I, top_n: usize) -> MerchantRanking
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut totals: OrderedSums<&str> = OrderedSums::new();
    let mut by_bucket: HashMap<&str, OrderedSums<Bucket>> = HashMap::new();

    for r in records {
        let label = r.description.as_str();
        totals.add(&label, r.amount);
        by_bucket.entry(label).or_default().add(&r.bucket, r.amount);
    }

    let entries = totals
        .into_sorted_desc()
        .into_iter()
        .take(top_n)
        .map(|(label, total)| {
            let dominant_bucket = by_bucket
                .get(label)
                .and_then(|sums| sums.max().map(|(b, _)| *b))
                .unwrap_or(Bucket::Other);
            MerchantEntry {
                label: label.to_string(),
                total,
                dominant_bucket,
            }
        })
        .collect();

    MerchantRanking { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(desc: &str, bucket: Bucket, amount: f64) -> TransactionRecord {
        TransactionRecord::new(
            NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
            desc,
            desc.to_uppercase(),
            amount,
            bucket.label(),
            bucket,
        )
    }

    #[test]
    fn test_top_five_of_twenty() {
        let records: Vec<_> = (1..=20)
            .map(|i| rec(&format!("Merchant {i}"), Bucket::ShoppingRetail, f64::from(i * 3 % 17)))
            .collect();
        let ranking = build_merchant_ranking(&records, 5);

        assert_eq!(ranking.len(), 5);
        let amounts = ranking.amounts();
        assert!(amounts.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(amounts[0], 16.0);
    }

    #[test]
    fn test_sums_all_amounts_per_description() {
        let records = vec![
            rec("Amazon", Bucket::ShoppingRetail, 40.0),
            rec("Starbucks", Bucket::Restaurants, 12.0),
            rec("Amazon", Bucket::ShoppingRetail, -15.0),
        ];
        let ranking = build_merchant_ranking(&records, 10);
        assert_eq!(ranking.labels(), vec!["Amazon", "Starbucks"]);
        assert_eq!(ranking.amounts(), vec![25.0, 12.0]);
    }

    #[test]
    fn test_dominant_bucket_first_seen_wins_tie() {
        let records = vec![
            rec("Target", Bucket::Groceries, 20.0),
            rec("Target", Bucket::ShoppingRetail, 20.0),
            rec("Costco", Bucket::Groceries, 5.0),
            rec("Costco", Bucket::ShoppingRetail, 30.0),
        ];
        let ranking = build_merchant_ranking(&records, 10);
        assert_eq!(ranking.entries[0].label, "Target");
        assert_eq!(ranking.entries[0].dominant_bucket, Bucket::Groceries);
        assert_eq!(ranking.entries[1].dominant_bucket, Bucket::ShoppingRetail);
    }

    #[test]
    fn test_empty() {
        assert!(build_merchant_ranking(&[], 5).is_empty());
    }
}
