//! Assembles the requested reports from a loaded portfolio.

use tickstat_core::{
    AnalysisError, BiggestLoser, BusyDays, DailyProfit, MonthlyOpenClose, PortfolioLoad, Ticker,
};

use crate::cli::ExtraReport;

/// Monthly buckets of one security; empty means no data.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySection {
    pub ticker: Ticker,
    pub months: Vec<MonthlyOpenClose>,
}

/// One report section; sections follow the monthly averages in request order.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtraSection {
    MaxDailyProfit(Vec<Result<DailyProfit, AnalysisError>>),
    BusyDays(Vec<Result<BusyDays, AnalysisError>>),
    BiggestLoser(Option<BiggestLoser>),
}

/// Everything the renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSet {
    pub monthly: Vec<MonthlySection>,
    pub extras: Vec<ExtraSection>,
    pub rejected_rows: usize,
    pub failed_tickers: Vec<Ticker>,
}

impl ReportSet {
    pub fn build(load: &PortfolioLoad, extras: &[ExtraReport]) -> Self {
        let portfolio = &load.portfolio;

        let monthly = portfolio
            .iter()
            .map(|series| MonthlySection {
                ticker: series.ticker().clone(),
                months: series.monthly_open_close(),
            })
            .collect();

        let extras = extras
            .iter()
            .map(|report| match report {
                ExtraReport::MaxDailyProfit => ExtraSection::MaxDailyProfit(
                    portfolio.iter().map(|series| series.max_daily_profit()).collect(),
                ),
                ExtraReport::BusyDays => ExtraSection::BusyDays(
                    portfolio.iter().map(|series| series.busy_days()).collect(),
                ),
                ExtraReport::BiggestLoser => ExtraSection::BiggestLoser(portfolio.biggest_loser()),
            })
            .collect();

        Self {
            monthly,
            extras,
            rejected_rows: load.rejected_rows.len(),
            failed_tickers: load
                .failed_tickers
                .iter()
                .map(|failure| failure.ticker.clone())
                .collect(),
        }
    }
}
