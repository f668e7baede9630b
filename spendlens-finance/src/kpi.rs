use serde::{Deserialize, Serialize};
use spendlens_core::TransactionRecord;

use crate::types::{AggregateEntry, OrderedSums};

/// Headline numbers, computed over every filtered record (refunds included).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Kpis {
    pub total: f64,
    pub count: usize,
    pub average_abs: f64,
    pub top_merchant: Option<AggregateEntry>,
}

pub fn compute_kpis<'a, I>(records: I) -> Kpis
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut total = 0.0;
    let mut abs_total = 0.0;
    let mut count = 0usize;
    let mut by_merchant: OrderedSums<&str> = OrderedSums::new();

    for r in records {
        total += r.amount;
        abs_total += r.abs_amount();
        count += 1;
        by_merchant.add(&r.description.as_str(), r.amount);
    }

    let average_abs = if count > 0 { abs_total / count as f64 } else { 0.0 };
    let top_merchant = by_merchant
        .max()
        .map(|(label, sum)| AggregateEntry::new(*label, sum));

    Kpis {
        total,
        count,
        average_abs,
        top_merchant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use spendlens_core::Bucket;

    fn rec(desc: &str, amount: f64) -> TransactionRecord {
        TransactionRecord::new(
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            desc,
            desc,
            amount,
            "Misc",
            Bucket::Other,
        )
    }

    #[test]
    fn test_kpis_include_refunds() {
        let records = vec![rec("Shoe Store", 50.0), rec("Shoe Store", -50.0), rec("Cafe", 10.0)];
        let kpis = compute_kpis(&records);
        assert_eq!(kpis.total, 10.0);
        assert_eq!(kpis.count, 3);
        assert!((kpis.average_abs - 110.0 / 3.0).abs() < 1e-9);
        assert_eq!(kpis.top_merchant, Some(AggregateEntry::new("Cafe", 10.0)));
    }

    #[test]
    fn test_no_records() {
        let kpis = compute_kpis(&[]);
        assert_eq!(kpis, Kpis::default());
    }
}
