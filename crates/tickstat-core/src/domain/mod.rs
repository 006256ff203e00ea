//! # Domain Models
//!
//! Daily price data and the statistics computed over it.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Validated ticker symbol |
//! | [`TradeDate`] | `YYYY-MM-DD` calendar date |
//! | [`DateRange`] | Inclusive date window |
//! | [`DailyRecord`] | One day of OHLCV data |
//! | [`SecuritySeries`] | Ordered records of one ticker plus per-security reports |
//! | [`Portfolio`] | All configured series plus cross-security reports |
//!
//! Aggregations that need data return [`AnalysisError::EmptySeries`]
//! instead of panicking on an empty series.
//!
//! [`AnalysisError::EmptySeries`]: crate::AnalysisError::EmptySeries

mod portfolio;
mod record;
mod series;
mod ticker;
mod trade_date;

pub use portfolio::{BiggestLoser, Portfolio};
pub use record::{DailyRecord, ROW_COLUMNS};
pub use series::{BusyDay, BusyDays, DailyProfit, MonthlyOpenClose, SecuritySeries, BUSY_DAY_FACTOR};
pub use ticker::Ticker;
pub use trade_date::{DateRange, TradeDate};
