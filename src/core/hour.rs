use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::PortalError;

/// Hour of a day as a source numbers it.
///
/// The chart API counts hours from zero, the CSV export labels the first hour as `1:00`.
/// Both are anchored at midnight of the date, so a 25-hour day overflows into the next date.
///
/// DST transition days are passed through as they come, no attempt is made to fix the hour count.
#[derive(Copy, Clone, Debug)]
pub enum HourIndex {
    ZeroBased(u32),
    OneBased(u32),
}

impl HourIndex {
    /// Longest possible day, the one when the clocks go back.
    const MAX_HOURS: u32 = 25;

    /// Number of hours since midnight.
    pub fn offset(self) -> Result<u32, PortalError> {
        let offset = match self {
            Self::ZeroBased(hour) => hour,
            Self::OneBased(hour) => hour
                .checked_sub(1)
                .ok_or_else(|| PortalError::malformed("one-based hour cannot be zero"))?,
        };
        if offset < Self::MAX_HOURS {
            Ok(offset)
        } else {
            Err(PortalError::malformed(format!("{self:?} is beyond the end of a day")))
        }
    }

    /// Resolve the hour to a local civil timestamp on the given date.
    pub fn on(self, date: NaiveDate) -> Result<NaiveDateTime, PortalError> {
        let offset = self.offset()?;
        date.and_time(NaiveTime::MIN)
            .checked_add_signed(TimeDelta::hours(i64::from(offset)))
            .ok_or_else(|| PortalError::malformed(format!("{self:?} on {date} is out of range")))
    }
}
