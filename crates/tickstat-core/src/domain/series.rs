use serde::Serialize;

use crate::{AnalysisError, DailyRecord, Ticker, TradeDate};

/// Volume multiple a day must strictly exceed to count as busy.
pub const BUSY_DAY_FACTOR: f64 = 1.1;

/// Average open and close over one run of same-month records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyOpenClose {
    pub year: i32,
    pub month: u8,
    pub avg_open: f64,
    pub avg_close: f64,
    pub days: usize,
}

/// Day with the widest high-low range for a security.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyProfit {
    pub ticker: Ticker,
    pub date: TradeDate,
    pub profit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BusyDay {
    pub date: TradeDate,
    pub volume: f64,
}

/// Days trading above 110% of the security's average volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusyDays {
    pub ticker: Ticker,
    pub average_volume: f64,
    pub days: Vec<BusyDay>,
}

/// Scan state for [`SecuritySeries::monthly_open_close`].
enum MonthState {
    NoBucketYet,
    InBucket {
        year: i32,
        month: u8,
        open_sum: f64,
        close_sum: f64,
        count: usize,
    },
}

impl MonthState {
    fn start(record: &DailyRecord) -> Self {
        Self::InBucket {
            year: record.date.year(),
            month: record.date.month(),
            open_sum: record.open,
            close_sum: record.close,
            count: 1,
        }
    }

    fn close(self) -> Option<MonthlyOpenClose> {
        match self {
            Self::NoBucketYet => None,
            Self::InBucket {
                year,
                month,
                open_sum,
                close_sum,
                count,
            } => Some(MonthlyOpenClose {
                year,
                month,
                avg_open: open_sum / count as f64,
                avg_close: close_sum / count as f64,
                days: count,
            }),
        }
    }
}

/// Price history of one ticker, in the order it was delivered.
///
/// Records are expected in ascending date order. That order is not checked
/// and the monthly report depends on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecuritySeries {
    ticker: Ticker,
    records: Vec<DailyRecord>,
}

impl SecuritySeries {
    pub fn new(ticker: Ticker) -> Self {
        Self {
            ticker,
            records: Vec::new(),
        }
    }

    pub fn with_records(ticker: Ticker, records: Vec<DailyRecord>) -> Self {
        Self { ticker, records }
    }

    pub fn push(&mut self, record: DailyRecord) {
        self.records.push(record);
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Average open/close per run of consecutive records sharing a month.
    ///
    /// A run ends as soon as a record's month differs from the previous
    /// record's month. Same-month records separated by another month land
    /// in separate buckets. Each bucket reports the year of its first record.
    pub fn monthly_open_close(&self) -> Vec<MonthlyOpenClose> {
        let mut buckets = Vec::new();
        let mut state = MonthState::NoBucketYet;

        for record in &self.records {
            state = match state {
                MonthState::InBucket {
                    year,
                    month,
                    open_sum,
                    close_sum,
                    count,
                } if month == record.date.month() => MonthState::InBucket {
                    year,
                    month,
                    open_sum: open_sum + record.open,
                    close_sum: close_sum + record.close,
                    count: count + 1,
                },
                previous => {
                    buckets.extend(previous.close());
                    MonthState::start(record)
                }
            };
        }
        buckets.extend(state.close());

        buckets
    }

    /// Record with the largest `high - low`; the earliest wins ties.
    pub fn max_daily_profit(&self) -> Result<DailyProfit, AnalysisError> {
        let best = self
            .records
            .iter()
            .fold(None::<&DailyRecord>, |best, record| match best {
                Some(current) if record.range() > current.range() => Some(record),
                Some(current) => Some(current),
                None => Some(record),
            })
            .ok_or_else(|| self.empty())?;

        Ok(DailyProfit {
            ticker: self.ticker.clone(),
            date: best.date,
            profit: best.range(),
        })
    }

    pub fn num_losing_days(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.is_losing_day())
            .count()
    }

    pub fn average_volume(&self) -> Result<f64, AnalysisError> {
        if self.records.is_empty() {
            return Err(self.empty());
        }
        let total: f64 = self.records.iter().map(|record| record.volume).sum();
        Ok(total / self.records.len() as f64)
    }

    /// Records whose volume is strictly above 110% of the average.
    pub fn busy_days(&self) -> Result<BusyDays, AnalysisError> {
        let average_volume = self.average_volume()?;
        let threshold = BUSY_DAY_FACTOR * average_volume;

        let days = self
            .records
            .iter()
            .filter(|record| record.volume > threshold)
            .map(|record| BusyDay {
                date: record.date,
                volume: record.volume,
            })
            .collect();

        Ok(BusyDays {
            ticker: self.ticker.clone(),
            average_volume,
            days,
        })
    }

    fn empty(&self) -> AnalysisError {
        AnalysisError::EmptySeries {
            ticker: self.ticker.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, open: f64, high: f64, low: f64, close: f64, volume: f64) -> DailyRecord {
        let date = TradeDate::parse(date).expect("valid date");
        DailyRecord::new(date, open, high, low, close, volume)
    }

    fn series(records: Vec<DailyRecord>) -> SecuritySeries {
        SecuritySeries::with_records(Ticker::parse("COF").expect("valid"), records)
    }

    #[test]
    fn month_change_opens_new_bucket() {
        let series = series(vec![
            record("2017-01-15", 10.0, 12.0, 9.0, 11.0, 100.0),
            record("2017-02-01", 11.0, 13.0, 10.0, 12.0, 200.0),
        ]);

        let buckets = series.monthly_open_close();
        assert_eq!(
            buckets,
            vec![
                MonthlyOpenClose { year: 2017, month: 1, avg_open: 10.0, avg_close: 11.0, days: 1 },
                MonthlyOpenClose { year: 2017, month: 2, avg_open: 11.0, avg_close: 12.0, days: 1 },
            ]
        );
    }

    #[test]
    fn averages_every_record_of_a_run() {
        let series = series(vec![
            record("2017-03-01", 10.0, 11.0, 9.0, 10.5, 1.0),
            record("2017-03-02", 12.0, 13.0, 11.0, 11.5, 1.0),
            record("2017-03-03", 14.0, 15.0, 13.0, 15.5, 1.0),
        ]);

        let buckets = series.monthly_open_close();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].avg_open, 12.0);
        assert_eq!(buckets[0].avg_close, 12.5);
        assert_eq!(buckets[0].days, 3);
    }

    #[test]
    fn non_contiguous_month_yields_separate_buckets() {
        let series = series(vec![
            record("2017-01-03", 1.0, 1.0, 1.0, 1.0, 1.0),
            record("2017-02-01", 2.0, 2.0, 2.0, 2.0, 1.0),
            record("2017-01-04", 3.0, 3.0, 3.0, 3.0, 1.0),
        ]);

        let months: Vec<u8> = series.monthly_open_close().iter().map(|b| b.month).collect();
        assert_eq!(months, vec![1, 2, 1]);
    }

    #[test]
    fn empty_series_has_no_buckets() {
        assert!(series(Vec::new()).monthly_open_close().is_empty());
    }

    #[test]
    fn first_widest_range_wins() {
        let series = series(vec![
            record("2017-01-03", 10.0, 12.0, 10.0, 11.0, 1.0),
            record("2017-01-04", 10.0, 13.0, 10.0, 11.0, 1.0),
            record("2017-01-05", 10.0, 11.0, 10.0, 11.0, 1.0),
            record("2017-01-06", 10.0, 13.0, 10.0, 11.0, 1.0),
        ]);

        let best = series.max_daily_profit().expect("non-empty");
        assert_eq!(best.date.to_string(), "2017-01-04");
        assert_eq!(best.profit, 3.0);
    }

    #[test]
    fn zero_range_day_is_still_reported() {
        let series = series(vec![record("2017-01-03", 10.0, 10.0, 10.0, 10.0, 1.0)]);
        let best = series.max_daily_profit().expect("non-empty");
        assert_eq!(best.profit, 0.0);
    }

    #[test]
    fn empty_series_has_no_max_profit() {
        let err = series(Vec::new()).max_daily_profit().expect_err("must fail");
        assert!(matches!(err, AnalysisError::EmptySeries { .. }));
    }

    #[test]
    fn counts_strict_losing_days() {
        let series = series(vec![
            record("2017-01-03", 10.0, 11.0, 9.0, 9.0, 1.0),
            record("2017-01-04", 10.0, 11.0, 9.0, 10.0, 1.0),
            record("2017-01-05", 10.0, 11.0, 9.0, 10.5, 1.0),
            record("2017-01-06", 10.0, 11.0, 9.0, 9.99, 1.0),
        ]);
        assert_eq!(series.num_losing_days(), 2);
        assert_eq!(SecuritySeries::new(Ticker::parse("X").expect("valid")).num_losing_days(), 0);
    }

    #[test]
    fn busy_day_threshold_is_strict() {
        // Average 100.0, so the threshold is 1.1 * 100.0.
        let at_threshold = series(vec![
            record("2017-01-03", 1.0, 1.0, 1.0, 1.0, 90.0),
            record("2017-01-04", 1.0, 1.0, 1.0, 1.0, 110.0),
        ]);
        let busy = at_threshold.busy_days().expect("non-empty");
        assert_eq!(busy.average_volume, 100.0);
        assert!(busy.days.is_empty());

        let above = series(vec![
            record("2017-01-03", 1.0, 1.0, 1.0, 1.0, 90.0),
            record("2017-01-04", 1.0, 1.0, 1.0, 1.0, 111.0),
        ]);
        let busy = above.busy_days().expect("non-empty");
        assert_eq!(busy.days.len(), 1);
        assert_eq!(busy.days[0].volume, 111.0);
    }

    #[test]
    fn busy_days_keep_record_order() {
        let series = series(vec![
            record("2017-01-03", 1.0, 1.0, 1.0, 1.0, 500.0),
            record("2017-01-04", 1.0, 1.0, 1.0, 1.0, 10.0),
            record("2017-01-05", 1.0, 1.0, 1.0, 1.0, 10.0),
            record("2017-01-06", 1.0, 1.0, 1.0, 1.0, 400.0),
        ]);
        let dates: Vec<String> = series
            .busy_days()
            .expect("non-empty")
            .days
            .iter()
            .map(|day| day.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2017-01-03", "2017-01-06"]);
    }

    #[test]
    fn empty_series_has_no_average_volume() {
        assert!(series(Vec::new()).average_volume().is_err());
        assert!(series(Vec::new()).busy_days().is_err());
    }
}
