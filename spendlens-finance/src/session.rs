//! The working record set plus the active filters.
//!
//! A `Session` is a plain value: every operation takes it (or borrows it)
//! and hands back a new one, so a failed re-ingest never disturbs the
//! session the caller already holds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use spendlens_core::time::month_bounds;
use spendlens_core::{Bucket, PipelineConfig, PipelineError, PipelineResult, TransactionRecord};
use spendlens_ingest::{IngestReport, RawRow, RowNormalizer};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::{debug, info};

use crate::dashboard::Dashboard;
use crate::time_series::Granularity;

/// Inclusive date bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|f| date >= f) && self.to.is_none_or(|t| date <= t)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    records: Vec<TransactionRecord>,
    date_range: Option<DateRange>,
    category: Option<Bucket>,
    merchant: Option<String>,
}

/// Resolve a category label as shown in options or the breakdown. The
/// rollup label selects the `Other` bucket.
pub fn resolve_category(label: &str, other_label: &str) -> Option<Bucket> {
    let label = label.trim();
    if label.eq_ignore_ascii_case(other_label.trim()) {
        return Some(Bucket::Other);
    }
    Bucket::from_str(label).ok()
}

impl Session {
    /// Session over records that are already normalized. Records are kept
    /// in ascending date order and the date range covers all of them.
    pub fn new(mut records: Vec<TransactionRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        let date_range = full_span(&records);
        Self {
            records,
            date_range,
            category: None,
            merchant: None,
        }
    }

    /// Normalize `rows` into a fresh session.
    pub fn ingest(rows: &[RawRow], config: &PipelineConfig) -> PipelineResult<(Self, IngestReport)> {
        let normalizer = RowNormalizer::new(config)?;
        let batch = normalizer.normalize(rows);
        if batch.records.is_empty() {
            return Err(PipelineError::empty_batch(
                "no valid rows after parsing; check the column mapping",
            ));
        }
        info!(records = batch.records.len(), "session ingested");
        Ok((Self::new(batch.records), batch.report))
    }

    /// Normalize a new batch and swap it in, carrying over selections that
    /// still resolve. On error `self` is untouched.
    pub fn reingest(
        &self,
        rows: &[RawRow],
        config: &PipelineConfig,
    ) -> PipelineResult<(Self, IngestReport)> {
        let (fresh, report) = Self::ingest(rows, config)?;
        Ok((self.clone().replace_records(fresh.records), report))
    }

    pub fn replace_records(self, records: Vec<TransactionRecord>) -> Self {
        let mut next = Self::new(records);
        if let Some(bucket) = self.category {
            if next.records.iter().any(|r| r.bucket == bucket) {
                next.category = Some(bucket);
            } else {
                debug!(category = bucket.label(), "category selection dropped");
            }
        }
        if let Some(merchant) = self.merchant {
            if next.merchant_options().contains(&merchant) {
                next.merchant = Some(merchant);
            } else {
                debug!(%merchant, "merchant selection dropped");
            }
        }
        next
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn date_range(&self) -> Option<DateRange> {
        self.date_range
    }

    pub fn category(&self) -> Option<Bucket> {
        self.category
    }

    pub fn merchant(&self) -> Option<&str> {
        self.merchant.as_deref()
    }

    /// First and last record dates.
    pub fn span(&self) -> Option<DateRange> {
        full_span(&self.records)
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn clear_date_range(mut self) -> Self {
        self.date_range = None;
        self
    }

    pub fn with_category(mut self, category: Option<Bucket>) -> Self {
        self.category = category;
        if let Some(merchant) = self.merchant.take() {
            if self.merchant_options().contains(&merchant) {
                self.merchant = Some(merchant);
            }
        }
        self
    }

    pub fn with_merchant(mut self, merchant: Option<String>) -> Self {
        self.merchant = merchant;
        self
    }

    /// Select `bucket`, or clear the selection if it is already active.
    pub fn toggle_category(self, bucket: Bucket) -> Self {
        let next = if self.category == Some(bucket) { None } else { Some(bucket) };
        self.with_category(next)
    }

    pub fn toggle_merchant(self, label: &str) -> Self {
        let next = if self.merchant.as_deref() == Some(label) {
            None
        } else {
            Some(label.to_string())
        };
        self.with_merchant(next)
    }

    /// Narrow to the period behind a time-series label. Monthly labels
    /// select that calendar month; anything else resets to the full span.
    pub fn drill_into(mut self, granularity: Granularity, label: &str) -> Self {
        let month = match granularity {
            Granularity::Monthly => month_bounds(label),
            _ => None,
        };
        self.date_range = match month {
            Some((first, last)) => Some(DateRange::new(Some(first), Some(last))),
            None if granularity == Granularity::Monthly => self.date_range,
            None => self.span(),
        };
        self
    }

    /// Records passing every active filter, ascending date order kept.
    pub fn filtered(&self) -> Vec<&TransactionRecord> {
        self.records
            .iter()
            .filter(|r| self.date_range.is_none_or(|range| range.contains(r.date)))
            .filter(|r| self.category.is_none_or(|b| r.bucket == b))
            .filter(|r| self.merchant.as_deref().is_none_or(|m| r.description == m))
            .collect()
    }

    /// Distinct bucket labels over all records, sorted.
    pub fn category_options(&self) -> Vec<String> {
        let labels: BTreeSet<&str> = self.records.iter().map(|r| r.bucket.label()).collect();
        labels.into_iter().map(str::to_string).collect()
    }

    /// Distinct merchant labels, limited to the selected category.
    pub fn merchant_options(&self) -> Vec<String> {
        let labels: BTreeSet<&str> = self
            .records
            .iter()
            .filter(|r| self.category.is_none_or(|b| r.bucket == b))
            .map(|r| r.description.as_str())
            .collect();
        labels.into_iter().map(str::to_string).collect()
    }

    pub fn dashboard(&self, config: &PipelineConfig) -> Dashboard {
        let filtered = self.filtered();
        debug!(
            records = self.records.len(),
            filtered = filtered.len(),
            "building dashboard"
        );
        Dashboard {
            category_options: self.category_options(),
            merchant_options: self.merchant_options(),
            ..Dashboard::from_records(filtered.iter().copied(), config)
        }
    }
}

fn full_span(records: &[TransactionRecord]) -> Option<DateRange> {
    let first = records.first()?.date;
    let last = records.last()?.date;
    Some(DateRange::new(Some(first), Some(last)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn rec(date: NaiveDate, desc: &str, amount: f64, bucket: Bucket) -> TransactionRecord {
        TransactionRecord::new(date, desc, desc, amount, bucket.label(), bucket)
    }

    fn session() -> Session {
        Session::new(vec![
            rec(d(3, 20), "Starbucks", 6.0, Bucket::Restaurants),
            rec(d(1, 5), "Trader Joe's", 80.0, Bucket::Groceries),
            rec(d(2, 11), "Amazon", 35.0, Bucket::ShoppingRetail),
            rec(d(2, 14), "Starbucks", 5.0, Bucket::Restaurants),
            rec(d(3, 2), "Mystery Co", 12.0, Bucket::Other),
        ])
    }

    fn raw(date: &str, desc: &str, amount: &str, category: &str) -> RawRow {
        RawRow::new()
            .with("Date", date)
            .with("Description", desc)
            .with("Amount", amount)
            .with("Category", category)
    }

    #[test]
    fn test_new_sorts_and_spans() {
        let s = session();
        assert_eq!(s.records()[0].date, d(1, 5));
        assert_eq!(s.date_range(), Some(DateRange::new(Some(d(1, 5)), Some(d(3, 20)))));
    }

    #[test]
    fn test_full_range_filter_round_trips() {
        let s = session();
        let span = s.span().unwrap();
        let s = s.with_date_range(span);
        let filtered: Vec<TransactionRecord> = s.filtered().into_iter().cloned().collect();
        assert_eq!(filtered, s.records());
    }

    #[test]
    fn test_filters_combine() {
        let s = session()
            .with_date_range(DateRange::new(Some(d(2, 1)), None))
            .with_category(Some(Bucket::Restaurants));
        let dates: Vec<_> = s.filtered().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(2, 14), d(3, 20)]);

        let s = s.clear_date_range();
        assert_eq!(s.filtered().len(), 2);
    }

    #[test]
    fn test_toggle_category_clears_foreign_merchant() {
        let s = session().with_merchant(Some("Amazon".to_string()));
        let s = s.toggle_category(Bucket::Restaurants);
        assert_eq!(s.category(), Some(Bucket::Restaurants));
        assert_eq!(s.merchant(), None);

        let s = s.toggle_merchant("Starbucks");
        let s = s.toggle_category(Bucket::Restaurants);
        assert_eq!(s.category(), None);
        assert_eq!(s.merchant(), Some("Starbucks"));

        let s = s.toggle_merchant("Starbucks");
        assert_eq!(s.merchant(), None);
    }

    #[test]
    fn test_other_rollup_label_selects_other_bucket() {
        assert_eq!(resolve_category("Other", "Other"), Some(Bucket::Other));
        assert_eq!(resolve_category("misc", "Misc"), Some(Bucket::Other));
        assert_eq!(resolve_category("groceries", "Other"), Some(Bucket::Groceries));
        assert_eq!(resolve_category("Lawn Care", "Other"), None);

        let s = session().with_category(resolve_category("Other", "Other"));
        let descs: Vec<_> = s.filtered().iter().map(|r| r.description.as_str()).collect();
        assert_eq!(descs, vec!["Mystery Co"]);
    }

    #[test]
    fn test_options() {
        let s = session();
        assert_eq!(
            s.category_options(),
            vec!["Groceries", "Other", "Restaurants", "Shopping/Retail"]
        );
        assert_eq!(
            s.merchant_options(),
            vec!["Amazon", "Mystery Co", "Starbucks", "Trader Joe's"]
        );
        let s = s.with_category(Some(Bucket::Restaurants));
        assert_eq!(s.merchant_options(), vec!["Starbucks"]);
        // category options ignore the active filters
        assert_eq!(s.category_options().len(), 4);
    }

    #[test]
    fn test_drill_into_month_and_back() {
        let s = session().drill_into(Granularity::Monthly, "2024-02");
        assert_eq!(s.date_range(), Some(DateRange::new(Some(d(2, 1)), Some(d(2, 29)))));
        assert_eq!(s.filtered().len(), 2);

        let s = s.drill_into(Granularity::Weekly, "2024-02-12");
        assert_eq!(s.date_range(), s.span());

        let s = s
            .clear_date_range()
            .drill_into(Granularity::Monthly, "not a month");
        assert_eq!(s.date_range(), None);
    }

    #[test]
    fn test_ingest_and_empty_batch() {
        let rows = vec![
            raw("03/05/2024", "STARBUCKS STORE 1234", "4.50", "Restaurants"),
            raw("bad date", "X", "1", ""),
        ];
        let (s, report) = Session::ingest(&rows, &PipelineConfig::default()).unwrap();
        assert_eq!(s.records().len(), 1);
        assert_eq!(report.missing_date, 1);

        let err = Session::ingest(&rows[1..], &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyBatch { .. }));
    }

    #[test]
    fn test_reingest_keeps_resolvable_selections() {
        let config = PipelineConfig::default();
        let rows = vec![
            raw("2024-01-02", "Starbucks", "5", "Coffee"),
            raw("2024-01-09", "Shell", "40", "Fuel"),
        ];
        let (s, _) = Session::ingest(&rows, &config).unwrap();
        let s = s
            .with_category(Some(Bucket::Restaurants))
            .with_merchant(Some("Starbucks".to_string()))
            .with_date_range(DateRange::new(Some(d(1, 3)), None));

        let next_rows = vec![
            raw("2024-04-01", "Starbucks", "7", "Coffee"),
            raw("2024-04-03", "Kroger", "60", "Groceries"),
        ];
        let (next, _) = s.reingest(&next_rows, &config).unwrap();
        assert_eq!(next.category(), Some(Bucket::Restaurants));
        assert_eq!(next.merchant(), Some("Starbucks"));
        assert_eq!(next.date_range(), next.span());

        let gone = vec![raw("2024-05-01", "Kroger", "60", "Groceries")];
        let (next, _) = s.reingest(&gone, &config).unwrap();
        assert_eq!(next.category(), None);
        assert_eq!(next.merchant(), None);

        // failed re-ingest leaves the old session usable
        assert!(s.reingest(&[], &config).is_err());
        assert_eq!(s.merchant(), Some("Starbucks"));
    }

    #[test]
    fn test_dashboard_uses_filters() {
        let s = session().with_category(Some(Bucket::Restaurants));
        let dash = s.dashboard(&PipelineConfig::default());
        assert_eq!(dash.kpis.count, 2);
        assert_eq!(dash.kpis.total, 11.0);
        assert_eq!(dash.merchants.labels(), vec!["Starbucks"]);
        assert_eq!(dash.merchant_options, vec!["Starbucks"]);
        assert_eq!(dash.category_options.len(), 4);
    }
}
