//! spendlens-ingest: statement exports -> normalized, date-sorted transaction records.

pub mod date;
pub mod merchant;
pub mod normalize;
pub mod parsers;
pub mod types;

pub use date::parse_date;
pub use merchant::MerchantCleaner;
pub use normalize::{RowNormalizer, parse_amount};
pub use parsers::{read_csv, read_csv_path};
pub use types::{IngestReport, NormalizedBatch, RawRow};
