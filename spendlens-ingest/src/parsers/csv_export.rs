//! CSV statement exports -> `RawRow`s.
//!
//! The first non-blank record is the header; every later record becomes one
//! row keyed by header name. Spacer lines (all cells blank) are skipped and
//! short rows are tolerated, as bank exports often pad or truncate trailing
//! columns.

use spendlens_core::{PipelineError, PipelineResult};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::types::RawRow;

/// Read every data row of a CSV export.
///
/// Fails with `MalformedInput` when the CSV itself cannot be read and with
/// `EmptyBatch` when it holds no data rows.
pub fn read_csv<R: Read>(input: R) -> PipelineResult<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| PipelineError::malformed(e.to_string()))?;
        if record.iter().all(|cell| strip_bom(cell).is_empty()) {
            continue;
        }

        if headers.is_none() {
            headers = Some(record.iter().map(|h| strip_bom(h).to_string()).collect());
            continue;
        }
        let names = headers.as_deref().unwrap_or_default();

        let row: RawRow = names
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| (name.as_str(), cell))
            .collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(PipelineError::empty_batch("no rows found in the CSV"));
    }

    debug!(rows = rows.len(), "read csv export");
    Ok(rows)
}

fn strip_bom(cell: &str) -> &str {
    cell.trim_start_matches('\u{feff}').trim()
}

pub fn read_csv_path(path: impl AsRef<Path>) -> PipelineResult<Vec<RawRow>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| PipelineError::malformed(format!("opening {}: {e}", path.display())))?;
    read_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_rows_keyed_by_header() {
        let data = "\
Date,Description,Amount,Category
03/05/2024,STARBUCKS STORE 12345,4.50,Restaurant-Bar & Café

03/06/2024,\"SHELL OIL, 57444\",30.00
";
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Description"), "STARBUCKS STORE 12345");
        assert_eq!(rows[0].get("Category"), "Restaurant-Bar & Café");
        assert_eq!(rows[1].get("Description"), "SHELL OIL, 57444");
        // short row: missing trailing column reads as blank
        assert_eq!(rows[1].get("Category"), "");
    }

    #[test]
    fn test_leading_blank_lines_and_bom() {
        let data = "\u{feff}\n,,\nDate,Amount\n2024-01-01,5\n";
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Date"), "2024-01-01");
    }

    #[test]
    fn test_header_only_is_empty_batch() {
        let err = read_csv("Date,Description,Amount\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyBatch { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let bytes: &[u8] = b"Date,Amount\n2024-01-01,\xff\xfe\n";
        let err = read_csv(bytes).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput { .. }));
    }

    #[test]
    fn test_missing_file_is_malformed() {
        let err = read_csv_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput { .. }));
    }
}
