//! Data source trait and request/response types.
//!
//! A [`DataSource`] hands back the raw CSV rows for one ticker and date
//! range. Turning rows into records is the loader's job, so a single bad
//! row never fails a whole fetch.
//!
//! # Example
//!
//! ```rust,ignore
//! use tickstat_core::{DailyRowsRequest, DataSource, QuandlSource};
//!
//! async fn count_rows(source: &QuandlSource, request: DailyRowsRequest) {
//!     match source.daily_rows(request).await {
//!         Ok(batch) => println!("{} rows", batch.rows.len()),
//!         Err(error) => eprintln!("fetch failed: {error}"),
//!     }
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{DateRange, Ticker};

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    Io,
    Internal,
}

/// Structured fetch failure for one ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Io,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Io => "source.io",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request for the daily rows of one ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRowsRequest {
    pub ticker: Ticker,
    pub range: DateRange,
}

impl DailyRowsRequest {
    pub fn new(ticker: Ticker, range: DateRange) -> Self {
        Self { ticker, range }
    }
}

/// Raw data rows, header already removed.
///
/// A batch with `interrupted` set holds the rows received before the
/// transfer failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowBatch {
    pub rows: Vec<String>,
    pub interrupted: Option<SourceError>,
}

impl RowBatch {
    /// Split a CSV body into data rows, dropping the header and blank lines.
    pub fn from_csv_body(body: &str) -> Self {
        let rows = body
            .lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .map(str::to_owned)
            .collect();
        Self {
            rows,
            interrupted: None,
        }
    }

    /// Rows of a body cut short by `error`; a trailing partial line is dropped.
    pub fn from_partial_csv_body(body: &str, error: SourceError) -> Self {
        let complete = body.rfind('\n').map_or("", |end| &body[..=end]);
        Self {
            interrupted: Some(error),
            ..Self::from_csv_body(complete)
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Provider of raw daily rows.
///
/// Implementations must be `Send + Sync`; the loader awaits one ticker at a
/// time but the trait does not rely on that.
pub trait DataSource: Send + Sync {
    /// Short identifier used in logs.
    fn id(&self) -> &'static str;

    /// Fetches every row for `req.ticker` within `req.range`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the rows cannot be retrieved at all.
    /// A transfer that fails midway is not an error here: the batch carries
    /// the rows read so far and [`RowBatch::interrupted`]. Malformed rows
    /// are not an error either.
    fn daily_rows<'a>(
        &'a self,
        req: DailyRowsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RowBatch, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_body_skips_header_and_blank_lines() {
        let body = "ticker,date,open,high,low,close,volume\nCOF,2017-01-03,1,2,0.5,1.5,10\n\nCOF,2017-01-04,1,2,0.5,1.5,10\n";
        let batch = RowBatch::from_csv_body(body);
        assert_eq!(batch.len(), 2);
        assert!(batch.rows[0].starts_with("COF,2017-01-03"));
    }

    #[test]
    fn header_only_body_is_empty() {
        assert!(RowBatch::from_csv_body("ticker,date,open,high,low,close,volume\n").is_empty());
        assert!(RowBatch::from_csv_body("").is_empty());
    }

    #[test]
    fn partial_body_keeps_only_complete_rows() {
        let body = "ticker,date,open,high,low,close,volume\nCOF,2017-01-03,1,2,0.5,1.5,10\nCOF,2017-01-04,1,2,0.5,1.5,10\nCOF,2017-01-05,1,2";
        let batch = RowBatch::from_partial_csv_body(body, SourceError::unavailable("reset"));
        assert_eq!(batch.len(), 2);
        assert!(batch.rows[1].starts_with("COF,2017-01-04"));
        assert_eq!(batch.interrupted.map(|e| e.kind()), Some(SourceErrorKind::Unavailable));
    }

    #[test]
    fn body_cut_inside_header_has_no_rows() {
        let batch = RowBatch::from_partial_csv_body("ticker,da", SourceError::unavailable("reset"));
        assert!(batch.is_empty());
        assert!(batch.interrupted.is_some());
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(SourceError::unavailable("down").code(), "source.unavailable");
        assert_eq!(SourceError::io("missing").code(), "source.io");
        assert!(SourceError::rate_limited("slow down").retryable());
        assert!(!SourceError::invalid_request("bad").retryable());
        assert_eq!(
            SourceError::internal("boom").to_string(),
            "boom (source.internal)"
        );
    }
}
