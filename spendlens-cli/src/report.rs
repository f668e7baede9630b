//! Plain-text rendering for `spendlens report` and `spendlens records`.

use spendlens_core::TransactionRecord;
use spendlens_finance::{Dashboard, DateRange, Session};
use std::fmt::Write;

const BAR_WIDTH: usize = 30;
const MAX_OPTIONS_SHOWN: usize = 12;

pub fn money(v: f64) -> String {
    if v < 0.0 {
        format!("-${:.2}", v.abs())
    } else {
        format!("${v:.2}")
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let n = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(n.clamp(1, BAR_WIDTH))
}

fn describe_range(range: Option<DateRange>) -> String {
    let side = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "…".to_string());
    match range {
        Some(r) => format!("{} → {}", side(r.from), side(r.to)),
        None => "All".to_string(),
    }
}

fn describe_filters(session: &Session) -> String {
    format!(
        "Date: {} | Category: {} | Merchant: {}",
        describe_range(session.date_range()),
        session.category().map(|b| b.label()).unwrap_or("All"),
        session.merchant().unwrap_or("All"),
    )
}

fn list_options(options: &[String]) -> String {
    if options.is_empty() {
        return "(none)".to_string();
    }
    let shown: Vec<&str> = options.iter().take(MAX_OPTIONS_SHOWN).map(String::as_str).collect();
    let mut out = shown.join(", ");
    if options.len() > MAX_OPTIONS_SHOWN {
        let _ = write!(out, ", … (+{} more)", options.len() - MAX_OPTIONS_SHOWN);
    }
    out
}

pub fn render_dashboard(session: &Session, dash: &Dashboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", describe_filters(session));

    let k = &dash.kpis;
    let _ = writeln!(out, "Total spend    {}", money(k.total));
    let _ = writeln!(out, "Transactions   {}", k.count);
    let _ = writeln!(out, "Average        {}", money(k.average_abs));
    match &k.top_merchant {
        Some(top) => {
            let _ = writeln!(out, "Top merchant   {} ({})", top.label, money(top.total));
        }
        None => {
            let _ = writeln!(out, "Top merchant   —");
        }
    }

    let ts = &dash.time_series;
    let _ = writeln!(out, "\nSpend over time ({})", ts.granularity);
    let max = ts.amounts.iter().copied().fold(0.0, f64::max);
    for (label, amount) in ts.points() {
        let _ = writeln!(out, "  {label:<10}  {:>12}  {}", money(amount), bar(amount, max));
    }

    let _ = writeln!(out, "\nCategories");
    for entry in &dash.categories.entries {
        let _ = writeln!(
            out,
            "  {:<18}  {:>12}  {:>5.1}%",
            entry.label,
            money(entry.total),
            dash.categories.share_of(entry) * 100.0
        );
    }

    let _ = writeln!(out, "\nMerchants (top {})", dash.merchants.len());
    for entry in &dash.merchants.entries {
        let _ = writeln!(
            out,
            "  {:<28}  {:>12}  {}",
            entry.label,
            money(entry.total),
            entry.dominant_bucket
        );
    }

    let _ = writeln!(out, "\nCategory options: {}", list_options(&dash.category_options));
    let _ = writeln!(out, "Merchant options: {}", list_options(&dash.merchant_options));
    out
}

pub fn render_records(records: &[&TransactionRecord], limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}  {:<28}  {:<16}  {:>12}  Raw description",
        "Date", "Merchant", "Category", "Amount"
    );
    for r in records.iter().take(limit) {
        let _ = writeln!(
            out,
            "{:<10}  {:<28}  {:<16}  {:>12}  {}",
            r.date,
            r.description,
            r.bucket,
            money(r.amount),
            r.raw_description
        );
    }
    if records.len() > limit {
        let _ = writeln!(out, "… {} more", records.len() - limit);
    }
    out
}
