//! Raw row -> validated `TransactionRecord`.

use spendlens_core::{
    Categorizer, PipelineConfig, PipelineResult, RowRejection, TransactionRecord, UNCATEGORIZED,
};
use tracing::{debug, info};

use crate::date::parse_date;
use crate::merchant::MerchantCleaner;
use crate::types::{IngestReport, NormalizedBatch, RawRow};

/// Keep digits, `.` and `-` only, then parse the longest leading decimal,
/// so `12.50-` reads as 12.5 and `1.2.3` as 1.2.
pub fn parse_amount(cell: &str) -> Result<f64, RowRejection> {
    let digits: String = cell
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if digits.is_empty() {
        return Err(RowRejection::MissingAmount);
    }
    match decimal_prefix(&digits).parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RowRejection::InvalidAmount),
    }
}

/// `-?\d*(\.\d*)?` with at least one digit, or empty.
fn decimal_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut seen_digit = end > int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if seen_digit || frac_end > frac_start {
            seen_digit = true;
            end = frac_end;
        }
    }
    if seen_digit { &s[..end] } else { "" }
}

pub struct RowNormalizer {
    config: PipelineConfig,
    cleaner: MerchantCleaner,
    categorizer: Categorizer,
}

impl RowNormalizer {
    /// Normalizer with the built-in merchant and category rules.
    pub fn new(config: &PipelineConfig) -> PipelineResult<Self> {
        Ok(Self::with_rules(
            config,
            MerchantCleaner::new()?,
            Categorizer::reference()?,
        ))
    }

    pub fn with_rules(
        config: &PipelineConfig,
        cleaner: MerchantCleaner,
        categorizer: Categorizer,
    ) -> Self {
        Self {
            config: config.clone(),
            cleaner,
            categorizer,
        }
    }

    /// Normalize one row, or say why it was rejected.
    pub fn normalize_row(&self, row: &RawRow) -> Result<TransactionRecord, RowRejection> {
        let columns = &self.config.columns;

        let date = parse_date(row.get(&columns.date)).ok_or(RowRejection::MissingDate)?;

        let mut amount = parse_amount(row.get(&columns.amount))?;
        if self.config.flip_signs {
            amount = -amount;
        }
        if self.config.abs_amounts {
            amount = amount.abs();
        }

        let category_text = columns
            .category
            .as_deref()
            .map(|c| row.get(c).trim())
            .unwrap_or("");
        let raw_category = if category_text.is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            category_text.to_string()
        };

        let raw_description = row.get(&columns.description).trim().to_string();
        let description = self.cleaner.clean(&raw_description);

        let bucket = if category_text.is_empty() && self.config.categorize_description_fallback {
            self.categorizer.categorize(&raw_description)
        } else {
            self.categorizer.categorize(&raw_category)
        };

        Ok(TransactionRecord {
            date,
            description,
            raw_description,
            amount,
            raw_category,
            bucket,
        })
    }

    /// Normalize a whole batch. Row failures are counted, never fatal; the
    /// surviving records come back sorted ascending by date (stable).
    pub fn normalize(&self, rows: &[RawRow]) -> NormalizedBatch {
        let mut report = IngestReport {
            rows_seen: rows.len(),
            ..IngestReport::default()
        };

        let skip = self.config.ignore_rows.min(rows.len());
        report.rows_ignored = skip;

        let mut records = Vec::with_capacity(rows.len() - skip);
        for (index, row) in rows.iter().enumerate().skip(skip) {
            if row.is_blank() {
                report.rows_blank += 1;
                continue;
            }
            match self.normalize_row(row) {
                Ok(record) => records.push(record),
                Err(rejection) => {
                    debug!(row = index, reason = rejection.as_str(), "row rejected");
                    report.count(rejection);
                }
            }
        }

        records.sort_by_key(|r| r.date);
        report.rows_kept = records.len();

        info!(
            seen = report.rows_seen,
            kept = report.rows_kept,
            rejected = report.rows_rejected(),
            "normalized batch"
        );

        NormalizedBatch { records, report }
    }
}
