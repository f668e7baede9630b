//! Refund-aware split of a record set.
//!
//! Statements often carry a charge and its later refund as two rows with
//! exactly opposite amounts. For charts those pairs cancel; for totals every
//! row counts.
//!
//! Matching is by absolute amount (to the cent) only, not by merchant or
//! date, so two unrelated transactions that share an amount can cancel each
//! other. This is a known approximation.

use spendlens_core::TransactionRecord;
use std::collections::HashMap;

/// Two views over the same records
#[derive(Debug, Clone)]
pub struct RefundSplit<'a> {
    /// Charges left after cancelling matched refunds; never contains amounts <= 0
    pub for_aggregation: Vec<&'a TransactionRecord>,
    /// Every record, unfiltered
    pub for_totals: Vec<&'a TransactionRecord>,
}

fn cents(amount: f64) -> i64 {
    (amount.abs() * 100.0).round() as i64
}

/// Split records (in date order) into aggregation and totals views.
pub fn split_refund_aware<'a, I>(records: I) -> RefundSplit<'a>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let for_totals: Vec<&TransactionRecord> = records.into_iter().collect();

    let mut refunds: HashMap<i64, usize> = HashMap::new();
    for r in for_totals.iter().filter(|r| r.is_credit()) {
        *refunds.entry(cents(r.amount)).or_insert(0) += 1;
    }

    let mut for_aggregation = Vec::new();
    for &r in &for_totals {
        if !r.is_spend() {
            continue;
        }
        match refunds.get_mut(&cents(r.amount)) {
            Some(n) if *n > 0 => *n -= 1,
            _ => for_aggregation.push(r),
        }
    }

    RefundSplit {
        for_aggregation,
        for_totals,
    }
}

/// Same shape as `split_refund_aware` but without cancelling pairs: every
/// charge is kept for aggregation.
pub fn split_without_refunds<'a, I>(records: I) -> RefundSplit<'a>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let for_totals: Vec<&TransactionRecord> = records.into_iter().collect();
    let for_aggregation = for_totals.iter().copied().filter(|r| r.is_spend()).collect();
    RefundSplit {
        for_aggregation,
        for_totals,
    }
}
