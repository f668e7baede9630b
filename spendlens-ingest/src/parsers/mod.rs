//! Tabular sources that produce `RawRow`s.

pub mod csv_export;

pub use csv_export::{read_csv, read_csv_path};
