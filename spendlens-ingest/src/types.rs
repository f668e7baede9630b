use serde::{Deserialize, Serialize};
use spendlens_core::{RowRejection, TransactionRecord};
use std::collections::HashMap;

/// One untyped row of the export: column name -> cell text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell text for `column`, or `""` when the column is absent
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    /// True when every cell is blank (papered-over spacer lines in exports)
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Counts describing what happened to one ingestion batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub rows_seen: usize,
    pub rows_ignored: usize,
    /// Rows with every cell blank; not data, not rejections
    pub rows_blank: usize,
    pub rows_kept: usize,
    pub missing_date: usize,
    pub missing_amount: usize,
    pub invalid_amount: usize,
}

impl IngestReport {
    pub fn rows_rejected(&self) -> usize {
        self.missing_date + self.missing_amount + self.invalid_amount
    }

    pub(crate) fn count(&mut self, rejection: RowRejection) {
        match rejection {
            RowRejection::MissingDate => self.missing_date += 1,
            RowRejection::MissingAmount => self.missing_amount += 1,
            RowRejection::InvalidAmount => self.invalid_amount += 1,
        }
    }
}

/// Normalizer output: records in ascending date order plus the batch report
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    pub records: Vec<TransactionRecord>,
    pub report: IngestReport,
}
