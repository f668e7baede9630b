//! spendlens-core: record types, bucket taxonomy, categorization rules and configuration

pub mod categorizer;
pub mod config;
pub mod error;
pub mod record;
pub mod time;

pub use categorizer::{AnyOf, Categorizer, Keywords, Matcher, Pattern, Rule};
pub use config::{
    CategoryPieConfig, ColumnMap, MerchantConfig, PipelineConfig, RefundConfig, TimeSeriesConfig,
};
pub use error::{PipelineError, PipelineResult, RowRejection};
pub use record::{Bucket, NO_DESCRIPTION, TransactionRecord, UNCATEGORIZED};
