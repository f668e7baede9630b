//! Pipeline configuration: column mapping, sign policy and aggregation knobs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of leading data rows to drop before normalization
    pub ignore_rows: usize,
    /// Negate every amount (for exports where charges are negative)
    pub flip_signs: bool,
    /// Take the absolute value of every amount (applied after `flip_signs`)
    pub abs_amounts: bool,
    /// Categorize from the description when the category column is blank
    pub categorize_description_fallback: bool,
    pub columns: ColumnMap,
    pub category_pie: CategoryPieConfig,
    pub time_series: TimeSeriesConfig,
    pub refunds: RefundConfig,
    pub merchants: MerchantConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub date: String,
    pub description: String,
    pub amount: String,
    /// `category = ""` turns the column off; leaving it out keeps `"Category"`
    #[serde(with = "blank_as_none")]
    pub category: Option<String>,
}

/// An empty column name stands for "no such column" on both sides of TOML,
/// which has no null.
mod blank_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Some(name).filter(|n| !n.trim().is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryPieConfig {
    pub min_share: f64,
    pub max_slices: usize,
    pub other_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSeriesConfig {
    /// Spans up to this many days are bucketed daily
    pub daily_max_span_days: i64,
    /// Spans up to this many days are bucketed weekly, longer ones monthly
    pub weekly_max_span_days: i64,
    /// Daily buckets only count charges
    pub daily_positive_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefundConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantConfig {
    pub top_n: usize,
}

pub const MIN_TOP_N: usize = 5;
pub const MAX_TOP_N: usize = 50;
pub const MIN_SLICES: usize = 3;

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ignore_rows: 0,
            flip_signs: false,
            abs_amounts: false,
            categorize_description_fallback: false,
            columns: ColumnMap::default(),
            category_pie: CategoryPieConfig::default(),
            time_series: TimeSeriesConfig::default(),
            refunds: RefundConfig::default(),
            merchants: MerchantConfig::default(),
        }
    }
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            description: "Description".to_string(),
            amount: "Amount".to_string(),
            category: Some("Category".to_string()),
        }
    }
}

impl Default for CategoryPieConfig {
    fn default() -> Self {
        Self {
            min_share: 0.05,
            max_slices: 8,
            other_label: "Other".to_string(),
        }
    }
}

impl CategoryPieConfig {
    /// `min_share` clamped into [0, 1]
    pub fn effective_min_share(&self) -> f64 {
        if self.min_share.is_nan() {
            return 0.0;
        }
        self.min_share.clamp(0.0, 1.0)
    }

    /// `max_slices`, never fewer than three
    pub fn effective_max_slices(&self) -> usize {
        self.max_slices.max(MIN_SLICES)
    }
}

impl Default for TimeSeriesConfig {
    fn default() -> Self {
        Self {
            daily_max_span_days: 60,
            weekly_max_span_days: 180,
            daily_positive_only: true,
        }
    }
}

impl Default for RefundConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for MerchantConfig {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

/// Clamp a requested merchant count into the supported range.
pub fn clamp_top_n(n: usize) -> usize {
    n.clamp(MIN_TOP_N, MAX_TOP_N)
}

impl MerchantConfig {
    pub fn effective_top_n(&self) -> usize {
        clamp_top_n(self.top_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.columns.date, "Date");
        assert_eq!(cfg.columns.category.as_deref(), Some("Category"));
        assert_eq!(cfg.category_pie.max_slices, 8);
        assert_eq!(cfg.time_series.daily_max_span_days, 60);
        assert!(cfg.refunds.enabled);
        assert_eq!(cfg.merchants.top_n, 10);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let cfg: PipelineConfig = toml::from_str(
            r#"
flip_signs = true

[columns]
amount = "Debit"

[time_series]
daily_max_span_days = 45
"#,
        )
        .unwrap();
        assert!(cfg.flip_signs);
        assert_eq!(cfg.columns.amount, "Debit");
        assert_eq!(cfg.columns.date, "Date");
        assert_eq!(cfg.time_series.daily_max_span_days, 45);
        assert_eq!(cfg.time_series.weekly_max_span_days, 180);
        assert_eq!(cfg.category_pie.other_label, "Other");
        assert_eq!(cfg.columns.category.as_deref(), Some("Category"));
    }

    #[test]
    fn test_empty_category_column_disables_it() {
        let cfg: PipelineConfig = toml::from_str(
            r#"
[columns]
category = ""
"#,
        )
        .unwrap();
        assert_eq!(cfg.columns.category, None);
        assert_eq!(cfg.columns.date, "Date");
    }

    #[test]
    fn test_disabled_category_column_survives_toml() {
        let mut cfg = PipelineConfig::default();
        cfg.columns.category = None;
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains(r#"category = """#));

        let back: PipelineConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_clamps() {
        let pie = CategoryPieConfig {
            min_share: 1.7,
            max_slices: 1,
            other_label: "Rest".to_string(),
        };
        assert_eq!(pie.effective_min_share(), 1.0);
        assert_eq!(pie.effective_max_slices(), 3);
        assert_eq!(clamp_top_n(2), 5);
        assert_eq!(clamp_top_n(500), 50);
        assert_eq!(clamp_top_n(12), 12);
    }
}
