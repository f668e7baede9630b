use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use spendlens_core::PipelineConfig;
use spendlens_finance::{DateRange, Session, resolve_category};
use spendlens_ingest::read_csv_path;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod report;
mod state;

#[derive(Parser, Debug)]
#[command(name = "spendlens", version, about = "Spending analytics for bank and card CSV exports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest a statement and print KPIs, spend over time, categories and merchants
    Report {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Number of merchants to rank (clamped to 5..=50)
        #[arg(long)]
        top: Option<usize>,

        /// Print the dashboard as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the filtered, normalized records
    Records {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Limit number of records printed (default: 50)
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Write the default config to ~/.spendlens/config.toml (never overwrites)
    InitConfig,

    /// Print the effective configuration as TOML
    ShowConfig {
        /// Config file (default: ~/.spendlens/config.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Path to the CSV export
    #[arg(long)]
    csv: PathBuf,

    /// Config file (default: ~/.spendlens/config.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Category label; the rollup label (default "Other") selects the Other bucket
    #[arg(long)]
    category: Option<String>,

    /// Merchant label as shown in reports
    #[arg(long)]
    merchant: Option<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Report {
            input,
            filters,
            top,
            json,
        } => {
            let mut cfg = config::load_config(input.config.as_deref())?;
            if let Some(n) = top {
                cfg.merchants.top_n = n;
            }
            let session = load_session(&input, &cfg)?;
            let session = apply_filters(session, &filters, &cfg)?;
            let dash = session.dashboard(&cfg);

            if json {
                println!("{}", serde_json::to_string_pretty(&dash).context("serialize dashboard")?);
            } else {
                print!("{}", report::render_dashboard(&session, &dash));
            }
        }

        Command::Records {
            input,
            filters,
            limit,
        } => {
            let cfg = config::load_config(input.config.as_deref())?;
            let session = load_session(&input, &cfg)?;
            let session = apply_filters(session, &filters, &cfg)?;
            print!("{}", report::render_records(&session.filtered(), limit));
        }

        Command::InitConfig => {
            config::init_config()?;
        }

        Command::ShowConfig { config: path } => {
            let cfg = config::load_config(path.as_deref())?;
            print!("{}", config::render_config(&cfg)?);
        }
    }

    Ok(())
}

/// Logs go to stderr; `RUST_LOG` sets the filter (default `warn`) and
/// `SPENDLENS_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let log_format = std::env::var("SPENDLENS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn load_session(input: &InputArgs, cfg: &PipelineConfig) -> Result<Session> {
    let rows = read_csv_path(&input.csv).with_context(|| format!("reading {}", input.csv.display()))?;
    let (session, report) = Session::ingest(&rows, cfg)
        .with_context(|| format!("normalizing {}", input.csv.display()))?;

    if report.rows_rejected() > 0 {
        warn!(
            rejected = report.rows_rejected(),
            missing_date = report.missing_date,
            missing_amount = report.missing_amount,
            invalid_amount = report.invalid_amount,
            "some rows were skipped"
        );
    }
    Ok(session)
}

fn apply_filters(session: Session, filters: &FilterArgs, cfg: &PipelineConfig) -> Result<Session> {
    let mut session = session;
    if filters.from.is_some() || filters.to.is_some() {
        session = session.with_date_range(DateRange::new(filters.from, filters.to));
    }
    if let Some(label) = &filters.category {
        let bucket = resolve_category(label, &cfg.category_pie.other_label).with_context(|| {
            format!("unknown category {label:?} (try one of: {})", session.category_options().join(", "))
        })?;
        session = session.with_category(Some(bucket));
    }
    if let Some(merchant) = &filters.merchant {
        session = session.with_merchant(Some(merchant.clone()));
    }
    Ok(session)
}
