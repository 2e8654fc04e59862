use crate::error::AnalyticsError;
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

/// A span of calendar days over which KPIs are aggregated.
///
/// Snapshots belong to the window by date. Posts belong to it by timestamp,
/// from the start of `first_day` up to and including `closes_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KpiWindow {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub closes_at: DateTime<Utc>,
}

impl KpiWindow {
    /// Builds the current window and the window immediately preceding it.
    ///
    /// The current window covers `[as_of - window_days, as_of]`, closing at
    /// `as_of` itself. The previous window covers
    /// `[as_of - 2 * window_days, as_of - window_days - 1]` and closes one
    /// microsecond before the current window opens, so no post can fall into both.
    pub fn trailing(
        as_of: DateTime<Utc>,
        window_days: u32,
    ) -> Result<(KpiWindow, KpiWindow), AnalyticsError> {
        let as_of_day = as_of.date_naive();
        let span = Days::new(u64::from(window_days));

        let current_first = as_of_day
            .checked_sub_days(span)
            .ok_or_else(|| out_of_range(as_of_day, "current window start"))?;
        let previous_first = current_first
            .checked_sub_days(span)
            .ok_or_else(|| out_of_range(as_of_day, "previous window start"))?;
        let previous_last = current_first
            .pred_opt()
            .ok_or_else(|| out_of_range(as_of_day, "previous window end"))?;

        let current = KpiWindow {
            first_day: current_first,
            last_day: as_of_day,
            closes_at: as_of,
        };
        let previous = KpiWindow {
            first_day: previous_first,
            last_day: previous_last,
            closes_at: current
                .opens_at()
                .checked_sub_signed(Duration::microseconds(1))
                .ok_or_else(|| out_of_range(as_of_day, "previous window close"))?,
        };

        Ok((current, previous))
    }

    /// Midnight UTC at the start of `first_day`.
    pub fn opens_at(&self) -> DateTime<Utc> {
        day_start(self.first_day)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.first_day <= date && date <= self.last_day
    }

    pub fn contains_timestamp(&self, timestamp: DateTime<Utc>) -> bool {
        self.opens_at() <= timestamp && timestamp <= self.closes_at
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn out_of_range(as_of: NaiveDate, what: &str) -> AnalyticsError {
    AnalyticsError::DateOutOfRange(format!("{} for as-of date {}", what, as_of))
}
