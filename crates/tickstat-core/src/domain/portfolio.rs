use serde::Serialize;

use crate::{SecuritySeries, Ticker};

/// Security with the most losing days across a portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BiggestLoser {
    pub ticker: Ticker,
    pub losing_days: usize,
}

/// Series for every configured ticker, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Portfolio {
    securities: Vec<SecuritySeries>,
}

impl Portfolio {
    pub fn new(securities: Vec<SecuritySeries>) -> Self {
        Self { securities }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SecuritySeries> {
        self.securities.iter()
    }

    pub fn get(&self, ticker: &Ticker) -> Option<&SecuritySeries> {
        self.securities
            .iter()
            .find(|series| series.ticker() == ticker)
    }

    pub fn len(&self) -> usize {
        self.securities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }

    /// Security with the strictly highest losing-day count.
    ///
    /// The count must exceed zero to qualify, so a portfolio without any
    /// losing day has no biggest loser. Ties go to the earlier security.
    pub fn biggest_loser(&self) -> Option<BiggestLoser> {
        let mut best: Option<BiggestLoser> = None;
        let mut max_losing_days = 0;

        for series in &self.securities {
            let losing_days = series.num_losing_days();
            if losing_days > max_losing_days {
                max_losing_days = losing_days;
                best = Some(BiggestLoser {
                    ticker: series.ticker().clone(),
                    losing_days,
                });
            }
        }

        best
    }
}

impl<'a> IntoIterator for &'a Portfolio {
    type Item = &'a SecuritySeries;
    type IntoIter = std::slice::Iter<'a, SecuritySeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
