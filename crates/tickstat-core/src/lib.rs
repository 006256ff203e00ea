//! # Tickstat Core
//!
//! Daily price model, data sources and per-security statistics for the
//! `tickstat` analyzer.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Data sources (Quandl datatable, local CSV files) |
//! | [`config`] | Analyzer configuration and environment overrides |
//! | [`data_source`] | Data source trait and raw row batches |
//! | [`domain`] | Records, series, portfolio and their reports |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`loader`] | Fetch-and-parse pipeline feeding the portfolio |
//! | [`retry`] | Backoff and retry policy |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tickstat_core::{load_portfolio, AnalyzerConfig, QuandlSource};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalyzerConfig::from_env()?;
//!     let source = QuandlSource::with_reqwest(config.provider.clone(), config.retry.clone());
//!     let load = load_portfolio(&source, &config).await;
//!
//!     if let Some(loser) = load.portfolio.biggest_loser() {
//!         println!("{} lost on {} days", loser.ticker, loser.losing_days);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Data Source     │────▶│ HTTP Client      │
//! │ (Quandl / CSV)  │     │ (reqwest/static) │
//! └────────┬────────┘     └──────────────────┘
//!          │ raw rows
//!          ▼
//! ┌─────────────────┐
//! │ Loader          │  per-row Result, per-ticker SeriesLoad
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │ Portfolio       │  SecuritySeries reports, biggest loser
//! └─────────────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod loader;
pub mod retry;

pub use adapters::{CsvFileSource, QuandlSource};

pub use config::{AnalyzerConfig, ProviderConfig, DEFAULT_ENDPOINT};

pub use data_source::{DailyRowsRequest, DataSource, RowBatch, SourceError, SourceErrorKind};

pub use domain::{
    BiggestLoser, BusyDay, BusyDays, DailyProfit, DailyRecord, DateRange, MonthlyOpenClose,
    Portfolio, SecuritySeries, Ticker, TradeDate, BUSY_DAY_FACTOR, ROW_COLUMNS,
};

pub use error::{AnalysisError, ConfigError, CoreError, RowParseError, ValidationError};

pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
    StaticHttpClient,
};

pub use loader::{
    load_portfolio, load_series, parse_rows, PortfolioLoad, RowRejection, SeriesLoad,
    TickerFailure,
};

pub use retry::{Backoff, RetryConfig};
