//! Populates series and portfolios from a [`DataSource`].
//!
//! Tickers are fetched strictly one after another. Row and fetch failures
//! are logged and collected; they never abort the load.

use tracing::{info, warn};

use crate::config::AnalyzerConfig;
use crate::data_source::{DailyRowsRequest, DataSource, RowBatch, SourceError};
use crate::{DailyRecord, DateRange, Portfolio, RowParseError, SecuritySeries, Ticker};

/// A raw row that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    pub ticker: Ticker,
    /// 1-based position among data rows (header excluded).
    pub line_no: usize,
    pub row: String,
    pub error: RowParseError,
}

/// Outcome of loading one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLoad {
    pub series: SecuritySeries,
    pub rejected: Vec<RowRejection>,
    pub fetch_error: Option<SourceError>,
}

/// Ticker whose rows could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerFailure {
    pub ticker: Ticker,
    pub error: SourceError,
}

/// Outcome of loading every configured ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioLoad {
    pub portfolio: Portfolio,
    pub rejected_rows: Vec<RowRejection>,
    pub failed_tickers: Vec<TickerFailure>,
}

/// Parse every row, keeping good records in order and collecting the rest.
pub fn parse_rows<I, S>(ticker: &Ticker, rows: I) -> (SecuritySeries, Vec<RowRejection>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut series = SecuritySeries::new(ticker.clone());
    let mut rejected = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        let row = row.as_ref();
        match DailyRecord::parse_row(row) {
            Ok(record) => series.push(record),
            Err(error) => {
                warn!(ticker = %ticker, line = index + 1, error = %error, "skipping malformed row");
                rejected.push(RowRejection {
                    ticker: ticker.clone(),
                    line_no: index + 1,
                    row: row.to_owned(),
                    error,
                });
            }
        }
    }

    (series, rejected)
}

/// Fetch and parse one ticker.
///
/// Rows read before a fetch failure are kept; a failure before any row
/// arrives leaves the series empty.
pub async fn load_series(
    source: &dyn DataSource,
    ticker: &Ticker,
    range: DateRange,
) -> SeriesLoad {
    let request = DailyRowsRequest::new(ticker.clone(), range);

    match source.daily_rows(request).await {
        Ok(RowBatch { rows, interrupted }) => {
            let (series, rejected) = parse_rows(ticker, &rows);
            info!(
                source = source.id(),
                ticker = %ticker,
                records = series.len(),
                rejected = rejected.len(),
                complete = interrupted.is_none(),
                "loaded daily records"
            );
            if let Some(error) = &interrupted {
                warn!(
                    source = source.id(),
                    ticker = %ticker,
                    error = %error,
                    "fetch stopped early, keeping rows read so far"
                );
            }
            SeriesLoad {
                series,
                rejected,
                fetch_error: interrupted,
            }
        }
        Err(error) => {
            warn!(source = source.id(), ticker = %ticker, error = %error, "failed to fetch daily rows");
            SeriesLoad {
                series: SecuritySeries::new(ticker.clone()),
                rejected: Vec::new(),
                fetch_error: Some(error),
            }
        }
    }
}

/// Load every configured ticker, in configuration order.
pub async fn load_portfolio(source: &dyn DataSource, config: &AnalyzerConfig) -> PortfolioLoad {
    let mut securities = Vec::with_capacity(config.tickers.len());
    let mut rejected_rows = Vec::new();
    let mut failed_tickers = Vec::new();

    for ticker in &config.tickers {
        let load = load_series(source, ticker, config.range).await;
        securities.push(load.series);
        rejected_rows.extend(load.rejected);
        if let Some(error) = load.fetch_error {
            failed_tickers.push(TickerFailure {
                ticker: ticker.clone(),
                error,
            });
        }
    }

    PortfolioLoad {
        portfolio: Portfolio::new(securities),
        rejected_rows,
        failed_tickers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_good_rows_and_reports_bad_ones() {
        let ticker = Ticker::parse("COF").expect("valid");
        let rows = [
            "COF,2017-01-03,88.55,89.6,87.79,88.87,3441067.0",
            "COF,2017-01-04",
            "COF,2017-01-05,88.2,88.9,87.0,87.5,x",
            "COF,2017-01-06,87.9,88.4,87.1,88.0,2000000.0",
        ];

        let (series, rejected) = parse_rows(&ticker, rows);
        assert_eq!(series.len(), 2);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].line_no, 2);
        assert_eq!(rejected[0].error, RowParseError::FieldCount { found: 2 });
        assert!(matches!(rejected[1].error, RowParseError::Number { field: "volume", .. }));
    }
}
