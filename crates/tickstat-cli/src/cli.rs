//! CLI argument definitions for tickstat.
//!
//! The monthly average report always runs. Each report flag adds one more
//! report after it, in command-line order; a repeated flag repeats its
//! report.
//!
//! # Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--max-daily-profit` | off | Widest high-low day per security |
//! | `--busy-day` | off | Days above 110% of average volume |
//! | `--biggest-loser` | off | Security with the most losing days |
//! | `--tickers` | `COF,GOOGL,MSFT` | Comma separated ticker list |
//! | `--start` / `--end` | `2017-01-01` / `2017-06-30` | Date range |
//! | `--csv-dir` | unset | Read `<TICKER>.csv` files instead of Quandl |
//! | `--format` | `text` | Output format (text, json) |
//!
//! Arguments clap does not know are dropped before parsing, so
//! `tickstat --max-daily-profit --verbose` behaves like
//! `tickstat --max-daily-profit`.
//!
//! # Examples
//!
//! ```bash
//! tickstat
//! tickstat --max-daily-profit --busy-day --biggest-loser
//! tickstat --tickers AAPL,IBM --start 2017-03-01 --end 2017-03-31 --format json
//! ```

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tickstat_core::{AnalyzerConfig, ConfigError, Ticker, TradeDate};

/// Flags that take no value.
const SWITCHES: &[&str] = &[
    "--max-daily-profit",
    "--busy-day",
    "--biggest-loser",
    "--pretty",
    "--help",
    "-h",
    "--version",
    "-V",
];

/// Options followed by a value.
const VALUE_OPTIONS: &[&str] = &[
    "--tickers",
    "--start",
    "--end",
    "--endpoint",
    "--csv-dir",
    "--timeout-ms",
    "--format",
    "--log-level",
];

/// Historical price statistics for a small portfolio
#[derive(Debug, Parser)]
#[command(
    name = "tickstat",
    author,
    version,
    args_override_self = true,
    about = "Historical daily price statistics for a fixed portfolio",
    long_about = "Fetches daily OHLCV rows for each configured ticker and prints monthly \
average open/close prices. Optional flags add the maximum daily profit, busy days \
and biggest loser reports."
)]
pub struct Cli {
    /// Report the day with the widest high-low range for each security.
    #[arg(long, default_value_t = false)]
    pub max_daily_profit: bool,

    /// Report days whose volume exceeds 110% of the security's average.
    #[arg(long, default_value_t = false)]
    pub busy_day: bool,

    /// Report the security with the most days closing below the open.
    #[arg(long, default_value_t = false)]
    pub biggest_loser: bool,

    /// Comma separated tickers (overrides TICKSTAT_TICKERS).
    #[arg(long)]
    pub tickers: Option<String>,

    /// First date, YYYY-MM-DD (overrides TICKSTAT_START).
    #[arg(long)]
    pub start: Option<String>,

    /// Last date, YYYY-MM-DD (overrides TICKSTAT_END).
    #[arg(long)]
    pub end: Option<String>,

    /// Provider endpoint URL (overrides TICKSTAT_ENDPOINT).
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Read `<TICKER>.csv` files from this directory instead of the provider.
    #[arg(long)]
    pub csv_dir: Option<PathBuf>,

    /// Per-request timeout in milliseconds. No timeout when unset.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Output format for results.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text sections framed by asterisks.
    Text,
    /// Single JSON object.
    Json,
}

/// Reports that run after the monthly averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraReport {
    MaxDailyProfit,
    BusyDays,
    BiggestLoser,
}

impl ExtraReport {
    fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "--max-daily-profit" => Some(Self::MaxDailyProfit),
            "--busy-day" => Some(Self::BusyDays),
            "--biggest-loser" => Some(Self::BiggestLoser),
            _ => None,
        }
    }
}

/// Report flags in the order they appear in `args`, repeats included.
///
/// `args` is the kept half of [`partition_args`]; option values are skipped
/// so `--tickers --busy-day` style input never counts as a flag.
pub fn extra_reports(args: &[OsString]) -> Vec<ExtraReport> {
    let mut reports = Vec::new();
    let mut args = args.iter().skip(1).filter_map(|arg| arg.to_str());

    while let Some(arg) = args.next() {
        if let Some(report) = ExtraReport::from_flag(arg) {
            reports.push(report);
        } else if VALUE_OPTIONS.contains(&arg) {
            args.next();
        }
    }

    reports
}

impl Cli {
    /// Layer command-line options over `base`.
    pub fn apply_to(&self, mut base: AnalyzerConfig) -> Result<AnalyzerConfig, ConfigError> {
        if let Some(raw) = &self.tickers {
            base = base.with_tickers(Ticker::parse_list(raw)?)?;
        }

        let start = self.start.as_deref().map(TradeDate::parse).transpose()?;
        let end = self.end.as_deref().map(TradeDate::parse).transpose()?;
        base = base.with_dates(start, end)?;

        if let Some(endpoint) = &self.endpoint {
            base.provider.endpoint = endpoint.clone();
        }
        if self.timeout_ms.is_some() {
            base.provider.timeout_ms = self.timeout_ms;
        }

        Ok(base)
    }
}

/// Split raw arguments into those clap understands and those it would
/// reject. The program name is always kept.
pub fn partition_args<I>(args: I) -> (Vec<OsString>, Vec<OsString>)
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let mut kept: Vec<OsString> = args.next().into_iter().collect();
    let mut dropped = Vec::new();

    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str() else {
            dropped.push(arg);
            continue;
        };

        let name = text.split_once('=').map_or(text, |(name, _)| name);
        if SWITCHES.contains(&text) {
            kept.push(arg);
        } else if VALUE_OPTIONS.contains(&name) {
            let inline_value = name.len() != text.len();
            kept.push(arg);
            if !inline_value {
                if let Some(value) = args.next() {
                    kept.push(value);
                }
            }
        } else {
            dropped.push(arg);
        }
    }

    (kept, dropped)
}
