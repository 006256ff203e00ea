use std::fmt::{self, Display, Formatter};
use std::io::Write;

use serde_json::{json, Value};
use tickstat_core::{AnalysisError, BiggestLoser, BusyDays, DailyProfit};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::report::{ExtraSection, MonthlySection, ReportSet};

const SEPARATOR: &str = "****************************************";

pub fn render<W: Write>(
    out: &mut W,
    report: &ReportSet,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => write!(out, "{}", TextReport(report))?,
        OutputFormat::Json => {
            let value = render_json(report);
            if pretty {
                serde_json::to_writer_pretty(&mut *out, &value)?;
            } else {
                serde_json::to_writer(&mut *out, &value)?;
            }
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Plain text rendering of a [`ReportSet`].
pub struct TextReport<'a>(pub &'a ReportSet);

impl Display for TextReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let report = self.0;

        section(f, "Monthly average open and close prices", |f| {
            for monthly in &report.monthly {
                monthly_text(f, monthly)?;
                writeln!(f)?;
            }
            Ok(())
        })?;

        for extra in &report.extras {
            match extra {
                ExtraSection::MaxDailyProfit(profits) => {
                    section(f, "Maximum daily profit", |f| {
                        profits.iter().try_for_each(|profit| profit_text(f, profit))
                    })?;
                }
                ExtraSection::BusyDays(busy) => {
                    section(f, "Busy days", |f| {
                        for days in busy {
                            busy_text(f, days)?;
                            writeln!(f)?;
                        }
                        Ok(())
                    })?;
                }
                ExtraSection::BiggestLoser(loser) => {
                    section(f, "Biggest loser", |f| match loser {
                        Some(BiggestLoser {
                            ticker,
                            losing_days,
                        }) => writeln!(f, "{ticker} Number of losing days: {losing_days}"),
                        None => Ok(()),
                    })?;
                }
            }
        }

        Ok(())
    }
}

pub fn render_text(report: &ReportSet) -> String {
    TextReport(report).to_string()
}

fn section(
    f: &mut Formatter<'_>,
    title: &str,
    body: impl FnOnce(&mut Formatter<'_>) -> fmt::Result,
) -> fmt::Result {
    writeln!(f, "{SEPARATOR}")?;
    writeln!(f, "{title}")?;
    writeln!(f)?;
    body(f)?;
    writeln!(f, "{SEPARATOR}")
}

fn monthly_text(f: &mut Formatter<'_>, monthly: &MonthlySection) -> fmt::Result {
    writeln!(f, "{}:", monthly.ticker)?;
    if monthly.months.is_empty() {
        return writeln!(f, "no data");
    }
    for month in &monthly.months {
        writeln!(
            f,
            "month: {}-{:02}, avg-open: {:.2}, avg-close: {:.2}",
            month.year, month.month, month.avg_open, month.avg_close
        )?;
    }
    Ok(())
}

fn profit_text(f: &mut Formatter<'_>, profit: &Result<DailyProfit, AnalysisError>) -> fmt::Result {
    match profit {
        Ok(DailyProfit {
            ticker,
            date,
            profit,
        }) => writeln!(f, "{ticker:<5} {date} {profit:.2}"),
        Err(AnalysisError::EmptySeries { ticker }) => writeln!(f, "{ticker:<5} no data"),
    }
}

fn busy_text(f: &mut Formatter<'_>, busy: &Result<BusyDays, AnalysisError>) -> fmt::Result {
    match busy {
        Ok(busy) => {
            writeln!(f, "{}", busy.ticker)?;
            writeln!(f, "Average volume: {:.1}", busy.average_volume)?;
            writeln!(f, "Busy days:")?;
            for day in &busy.days {
                writeln!(f, "{} {} {:.1}", busy.ticker, day.date, day.volume)?;
            }
            Ok(())
        }
        Err(AnalysisError::EmptySeries { ticker }) => {
            writeln!(f, "{ticker}")?;
            writeln!(f, "no data")
        }
    }
}

/// Round through the same decimal text the text report prints.
fn rounded(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

pub fn render_json(report: &ReportSet) -> Value {
    let monthly: Vec<Value> = report
        .monthly
        .iter()
        .flat_map(|section| {
            if section.months.is_empty() {
                return vec![no_data_json(&section.ticker)];
            }
            section
                .months
                .iter()
                .map(|month| {
                    json!({
                        "ticker": section.ticker,
                        "year": month.year,
                        "month": month.month,
                        "avg_open": rounded(month.avg_open, 2),
                        "avg_close": rounded(month.avg_close, 2),
                    })
                })
                .collect()
        })
        .collect();

    let mut root = json!({
        "monthly_averages": monthly,
        "rejected_rows": report.rejected_rows,
        "failed_tickers": report.failed_tickers,
    });

    for extra in &report.extras {
        let (key, value): (&str, Value) = match extra {
            ExtraSection::MaxDailyProfit(profits) => (
                "max_daily_profit",
                profits.iter().map(profit_json).collect::<Vec<_>>().into(),
            ),
            ExtraSection::BusyDays(busy) => (
                "busy_days",
                busy.iter().map(busy_json).collect::<Vec<_>>().into(),
            ),
            ExtraSection::BiggestLoser(loser) => (
                "biggest_loser",
                loser
                    .as_ref()
                    .map_or(Value::Null, |loser| {
                        json!({ "ticker": loser.ticker, "losing_days": loser.losing_days })
                    }),
            ),
        };
        root[key] = value;
    }

    root
}

fn profit_json(profit: &Result<DailyProfit, AnalysisError>) -> Value {
    match profit {
        Ok(profit) => json!({
            "ticker": profit.ticker,
            "date": profit.date,
            "profit": rounded(profit.profit, 2),
        }),
        Err(AnalysisError::EmptySeries { ticker }) => no_data_json(ticker),
    }
}

fn busy_json(busy: &Result<BusyDays, AnalysisError>) -> Value {
    match busy {
        Ok(busy) => json!({
            "ticker": busy.ticker,
            "average_volume": rounded(busy.average_volume, 1),
            "days": busy
                .days
                .iter()
                .map(|day| json!({ "date": day.date, "volume": rounded(day.volume, 1) }))
                .collect::<Vec<_>>(),
        }),
        Err(AnalysisError::EmptySeries { ticker }) => no_data_json(ticker),
    }
}

fn no_data_json(ticker: &tickstat_core::Ticker) -> Value {
    json!({ "ticker": ticker, "no_data": true })
}
