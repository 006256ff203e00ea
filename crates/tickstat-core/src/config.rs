//! Environment-driven analyzer configuration.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `TICKSTAT_TICKERS` | `COF,GOOGL,MSFT` |
//! | `TICKSTAT_START` | `2017-01-01` |
//! | `TICKSTAT_END` | `2017-06-30` |
//! | `TICKSTAT_ENDPOINT` | Quandl `WIKI/PRICES.csv` |
//! | `TICKSTAT_API_KEY` | unset |
//! | `TICKSTAT_TIMEOUT_MS` | unset (no timeout) |

use std::fmt::{Debug, Formatter};

use time::macros::date;

use crate::retry::RetryConfig;
use crate::{ConfigError, DateRange, Ticker, TradeDate};

pub const DEFAULT_ENDPOINT: &str = "https://www.quandl.com/api/v3/datatables/WIKI/PRICES.csv";
pub const DEFAULT_TICKERS: [&str; 3] = ["COF", "GOOGL", "MSFT"];

/// Remote provider settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from(DEFAULT_ENDPOINT),
            api_key: None,
            timeout_ms: None,
        }
    }
}

impl Debug for ProviderConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Everything needed to fetch and analyze a portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub tickers: Vec<Ticker>,
    pub range: DateRange,
    pub provider: ProviderConfig,
    pub retry: RetryConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS
                .iter()
                .filter_map(|raw| Ticker::parse(raw).ok())
                .collect(),
            range: default_range(),
            provider: ProviderConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

fn default_range() -> DateRange {
    let start = TradeDate::from_date(date!(2017 - 01 - 01));
    let end = TradeDate::from_date(date!(2017 - 06 - 30));
    DateRange::from_ordered(start, end)
}

impl AnalyzerConfig {
    /// Defaults overlaid with `TICKSTAT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (environment, tests).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("TICKSTAT_TICKERS") {
            self = self.with_tickers(Ticker::parse_list(&raw)?)?;
        }

        let start = lookup("TICKSTAT_START")
            .map(|raw| TradeDate::parse(raw.trim()))
            .transpose()?;
        let end = lookup("TICKSTAT_END")
            .map(|raw| TradeDate::parse(raw.trim()))
            .transpose()?;
        self = self.with_dates(start, end)?;

        if let Some(endpoint) = lookup("TICKSTAT_ENDPOINT") {
            self.provider.endpoint = endpoint.trim().to_owned();
        }
        if let Some(api_key) = lookup("TICKSTAT_API_KEY").filter(|key| !key.trim().is_empty()) {
            self.provider.api_key = Some(api_key.trim().to_owned());
        }
        if let Some(raw) = lookup("TICKSTAT_TIMEOUT_MS") {
            let timeout_ms = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "TICKSTAT_TIMEOUT_MS",
                    value: raw.clone(),
                })?;
            self.provider.timeout_ms = Some(timeout_ms);
        }

        Ok(self)
    }

    pub fn with_tickers(mut self, tickers: Vec<Ticker>) -> Result<Self, ConfigError> {
        if tickers.is_empty() {
            return Err(ConfigError::NoTickers);
        }
        self.tickers = tickers;
        Ok(self)
    }

    /// Replace either bound of the date range, keeping the other.
    pub fn with_dates(
        mut self,
        start: Option<TradeDate>,
        end: Option<TradeDate>,
    ) -> Result<Self, ConfigError> {
        let start = start.unwrap_or(self.range.start());
        let end = end.unwrap_or(self.range.end());
        self.range = DateRange::new(start, end)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::ValidationError;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_cover_first_half_of_2017() {
        let config = AnalyzerConfig::default();
        let tickers: Vec<&str> = config.tickers.iter().map(Ticker::as_str).collect();
        assert_eq!(tickers, vec!["COF", "GOOGL", "MSFT"]);
        assert_eq!(config.range.start().to_string(), "2017-01-01");
        assert_eq!(config.range.end().to_string(), "2017-06-30");
        assert_eq!(config.provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.provider.timeout_ms, None);
    }

    #[test]
    fn applies_overrides() {
        let config = AnalyzerConfig::default()
            .with_overrides(lookup(&[
                ("TICKSTAT_TICKERS", "aapl,ibm"),
                ("TICKSTAT_END", "2017-03-31"),
                ("TICKSTAT_API_KEY", "k"),
                ("TICKSTAT_TIMEOUT_MS", "2500"),
            ]))
            .expect("valid overrides");

        assert_eq!(config.tickers.len(), 2);
        assert_eq!(config.range.start().to_string(), "2017-01-01");
        assert_eq!(config.range.end().to_string(), "2017-03-31");
        assert_eq!(config.provider.api_key.as_deref(), Some("k"));
        assert_eq!(config.provider.timeout_ms, Some(2500));
    }

    #[test]
    fn rejects_bad_values() {
        let err = AnalyzerConfig::default()
            .with_overrides(lookup(&[("TICKSTAT_START", "01/01/2017")]))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::Validation(ValidationError::InvalidDate { .. })));

        let err = AnalyzerConfig::default()
            .with_overrides(lookup(&[("TICKSTAT_TIMEOUT_MS", "soon")]))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidValue { key: "TICKSTAT_TIMEOUT_MS", .. }));

        let err = AnalyzerConfig::default()
            .with_overrides(lookup(&[("TICKSTAT_TICKERS", " , ")]))
            .expect_err("must fail");
        assert_eq!(err, ConfigError::NoTickers);
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let provider = ProviderConfig {
            api_key: Some(String::from("super-secret")),
            ..ProviderConfig::default()
        };
        assert!(!format!("{provider:?}").contains("super-secret"));
    }
}
