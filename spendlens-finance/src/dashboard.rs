//! Everything a report needs for one filtered view, in one serializable value.

use serde::{Deserialize, Serialize};
use spendlens_core::{PipelineConfig, TransactionRecord};

use crate::categories::{CategoryBreakdown, build_category_breakdown};
use crate::kpi::{Kpis, compute_kpis};
use crate::merchants::{MerchantRanking, build_merchant_ranking};
use crate::refunds::{split_refund_aware, split_without_refunds};
use crate::time_series::{TimeSeries, build_time_series};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub kpis: Kpis,
    pub time_series: TimeSeries,
    pub categories: CategoryBreakdown,
    pub merchants: MerchantRanking,
    /// Every bucket label present in the session, sorted
    pub category_options: Vec<String>,
    /// Merchant labels, scoped to the selected category
    pub merchant_options: Vec<String>,
}

impl Dashboard {
    /// Build the aggregates for already-filtered records (ascending date).
    /// Filter options are left empty; the session fills them in.
    pub fn from_records<'a, I>(records: I, config: &PipelineConfig) -> Self
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        let split = if config.refunds.enabled {
            split_refund_aware(records)
        } else {
            split_without_refunds(records)
        };
        let charts = split.for_aggregation.iter().copied();

        Self {
            kpis: compute_kpis(split.for_totals.iter().copied()),
            time_series: build_time_series(charts.clone(), &config.time_series),
            categories: build_category_breakdown(charts.clone(), &config.category_pie),
            merchants: build_merchant_ranking(charts, config.merchants.effective_top_n()),
            category_options: Vec::new(),
            merchant_options: Vec::new(),
        }
    }
}
