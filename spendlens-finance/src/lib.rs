//! spendlens-finance: refund reconciliation, aggregations, KPIs and the filter session

pub mod categories;
pub mod dashboard;
pub mod kpi;
pub mod merchants;
pub mod refunds;
pub mod session;
pub mod time_series;
pub mod types;

pub use categories::{CategoryBreakdown, build_category_breakdown};
pub use dashboard::Dashboard;
pub use kpi::{Kpis, compute_kpis};
pub use merchants::{MerchantEntry, MerchantRanking, build_merchant_ranking};
pub use refunds::{RefundSplit, split_refund_aware, split_without_refunds};
pub use session::{DateRange, Session, resolve_category};
pub use time_series::{Granularity, TimeSeries, build_time_series};
pub use types::AggregateEntry;
