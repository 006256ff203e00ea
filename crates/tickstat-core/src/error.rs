use thiserror::Error;

use crate::data_source::SourceError;
use crate::Ticker;

/// Validation errors for tickers, dates and date ranges.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker must start with an ASCII letter: '{ch}'")]
    TickerInvalidStart { ch: char },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("date range start {start} is after end {end}")]
    InvertedDateRange { start: String, end: String },
}

/// Reasons a raw provider row is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RowParseError {
    #[error("expected 7 comma-separated fields, found {found}")]
    FieldCount { found: usize },
    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    Date { value: String },
    #[error("field '{field}' is not a number: '{value}'")]
    Number { field: &'static str, value: String },
}

/// Aggregations that need at least one record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("no data for {ticker}")]
    EmptySeries { ticker: Ticker },
}

/// Invalid environment or command-line configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("configuration must name at least one ticker")]
    NoTickers,
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Row(#[from] RowParseError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),
}
