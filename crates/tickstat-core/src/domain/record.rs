use serde::{Deserialize, Serialize};

use crate::{RowParseError, TradeDate};

/// Column layout requested from providers.
pub const ROW_COLUMNS: &str = "ticker,date,open,high,low,close,volume";

const ROW_FIELD_COUNT: usize = 7;

/// One trading day of OHLCV data for a single security.
///
/// OHLC ordering (`low <= open, close <= high`) is not checked; provider
/// data is taken as delivered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: TradeDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl DailyRecord {
    pub const fn new(
        date: TradeDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Parse a `ticker,date,open,high,low,close,volume` row.
    ///
    /// The ticker column is required for the field count but not kept; the
    /// owning series carries the ticker.
    pub fn parse_row(row: &str) -> Result<Self, RowParseError> {
        let mut fields: Vec<&str> = row.trim().split(',').map(str::trim).collect();
        // Trailing empty fields (`...,10,`) do not count.
        while fields.len() > 1 && fields.last().is_some_and(|field| field.is_empty()) {
            fields.pop();
        }
        if fields.len() != ROW_FIELD_COUNT {
            return Err(RowParseError::FieldCount {
                found: fields.len(),
            });
        }

        let date = TradeDate::parse(fields[1]).map_err(|_| RowParseError::Date {
            value: fields[1].to_owned(),
        })?;

        Ok(Self {
            date,
            open: parse_number("open", fields[2])?,
            high: parse_number("high", fields[3])?,
            low: parse_number("low", fields[4])?,
            close: parse_number("close", fields[5])?,
            volume: parse_number("volume", fields[6])?,
        })
    }

    /// Intraday range, i.e. buying at the low and selling at the high.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn is_losing_day(&self) -> bool {
        self.close < self.open
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, RowParseError> {
    value.parse::<f64>().map_err(|_| RowParseError::Number {
        field,
        value: value.to_owned(),
    })
}
