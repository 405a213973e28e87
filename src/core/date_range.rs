use std::fmt::{Display, Formatter};

use chrono::NaiveDate;

use crate::prelude::*;

/// Calendar days from `start` to `end`, both inclusive.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[must_use]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

impl DateRange {
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        ensure!(start <= end, "the range ends ({end}) before it starts ({start})");
        Ok(Self { start, end })
    }

    pub const fn day(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        (self.start <= date) && (date <= self.end)
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take_while(move |date| *date <= self.end)
    }

    /// Cover the dates with ranges of consecutive days, each at most `max_days` long.
    ///
    /// The dates must be sorted.
    pub fn spans(dates: impl IntoIterator<Item = NaiveDate>, max_days: usize) -> Vec<Self> {
        let mut spans: Vec<Self> = Vec::new();
        let mut n_days = 0;
        for date in dates {
            match spans.last_mut() {
                Some(span) if n_days < max_days && span.end.succ_opt() == Some(date) => {
                    span.end = date;
                    n_days += 1;
                }
                _ => {
                    spans.push(Self::day(date));
                    n_days = 1;
                }
            }
        }
        spans
    }
}
