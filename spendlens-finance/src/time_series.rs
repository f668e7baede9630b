//! Spend over time, bucketed by a granularity picked from the date span.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use spendlens_core::time::{format_iso_date, format_iso_month, month_start, next_month, week_start};
use spendlens_core::{TimeSeriesConfig, TransactionRecord};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
    /// No records, no series
    None,
}

impl Granularity {
    /// Pick the bucket size for a span of `span_days` (at least one).
    pub fn for_span(span_days: i64, config: &TimeSeriesConfig) -> Self {
        if span_days <= config.daily_max_span_days {
            Granularity::Daily
        } else if span_days <= config.weekly_max_span_days {
            Granularity::Weekly
        } else {
            Granularity::Monthly
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
            Granularity::None => "none",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Parallel label/amount arrays, zero-filled across the whole span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub granularity: Granularity,
    pub labels: Vec<String>,
    pub amounts: Vec<f64>,
}

impl TimeSeries {
    pub fn empty() -> Self {
        Self {
            granularity: Granularity::None,
            labels: Vec::new(),
            amounts: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.amounts.iter().sum()
    }

    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels.iter().map(String::as_str).zip(self.amounts.iter().copied())
    }
}

pub fn build_time_series<'a, I>(records: I, config: &TimeSeriesConfig) -> TimeSeries
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let records: Vec<&TransactionRecord> = records.into_iter().collect();
    let (Some(min), Some(max)) = (
        records.iter().map(|r| r.date).min(),
        records.iter().map(|r| r.date).max(),
    ) else {
        return TimeSeries::empty();
    };

    let span_days = (max - min).num_days().max(1);
    let granularity = Granularity::for_span(span_days, config);

    // bucket start dates, ascending and contiguous
    let starts: Vec<NaiveDate> = match granularity {
        Granularity::Daily => min.iter_days().take_while(|d| *d <= max).collect(),
        Granularity::Weekly => week_start(min)
            .iter_weeks()
            .take_while(|d| *d <= max)
            .collect(),
        Granularity::Monthly => {
            let mut months = Vec::new();
            let mut cursor = Some(month_start(min));
            while let Some(m) = cursor.filter(|m| *m <= max) {
                months.push(m);
                cursor = next_month(m);
            }
            months
        }
        Granularity::None => Vec::new(),
    };

    let key_of = |date: NaiveDate| match granularity {
        Granularity::Daily => date,
        Granularity::Weekly => week_start(date),
        _ => month_start(date),
    };

    let mut sums: HashMap<NaiveDate, f64> = HashMap::with_capacity(starts.len());
    for r in &records {
        if granularity == Granularity::Daily && config.daily_positive_only && !r.is_spend() {
            continue;
        }
        *sums.entry(key_of(r.date)).or_insert(0.0) += r.amount;
    }

    let labels = starts
        .iter()
        .map(|&d| match granularity {
            Granularity::Monthly => format_iso_month(d),
            _ => format_iso_date(d),
        })
        .collect();
    let amounts = starts
        .iter()
        .map(|d| sums.get(d).copied().unwrap_or(0.0))
        .collect();

    TimeSeries {
        granularity,
        labels,
        amounts,
    }
}
