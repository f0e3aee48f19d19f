//! Primary period presets offered by the date picker
//!
//! All boundaries are computed in UTC. Period presets ("this week", "last
//! month", ...) start at midnight of the period's first day; "this" presets
//! end at the supplied instant, "last" presets at the final millisecond of the
//! period.

use crate::error::CoreError;
use crate::models::config::WeekStart;
use crate::models::duration::{
    checked_shift, end_of_day, start_of_day, DurationSelection, Frequency,
};
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named primary periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRangePreset {
    Now,
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisQuarter,
    LastQuarter,
    #[serde(rename = "last_7_days", alias = "last_7days")]
    Last7Days,
    #[serde(rename = "last_14_days", alias = "last_14days")]
    Last14Days,
    #[serde(rename = "last_28_days", alias = "last_28days")]
    Last28Days,
}

/// Length of the trailing window of the `Now` preset
const NOW_WINDOW_MINUTES: i64 = 30;

impl DateRangePreset {
    pub const ALL: [DateRangePreset; 12] = [
        DateRangePreset::Now,
        DateRangePreset::Today,
        DateRangePreset::Yesterday,
        DateRangePreset::ThisWeek,
        DateRangePreset::LastWeek,
        DateRangePreset::ThisMonth,
        DateRangePreset::LastMonth,
        DateRangePreset::ThisQuarter,
        DateRangePreset::LastQuarter,
        DateRangePreset::Last7Days,
        DateRangePreset::Last14Days,
        DateRangePreset::Last28Days,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateRangePreset::Now => "now",
            DateRangePreset::Today => "today",
            DateRangePreset::Yesterday => "yesterday",
            DateRangePreset::ThisWeek => "this_week",
            DateRangePreset::LastWeek => "last_week",
            DateRangePreset::ThisMonth => "this_month",
            DateRangePreset::LastMonth => "last_month",
            DateRangePreset::ThisQuarter => "this_quarter",
            DateRangePreset::LastQuarter => "last_quarter",
            DateRangePreset::Last7Days => "last_7_days",
            DateRangePreset::Last14Days => "last_14_days",
            DateRangePreset::Last28Days => "last_28_days",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateRangePreset::Now => "Now",
            DateRangePreset::Today => "Today",
            DateRangePreset::Yesterday => "Yesterday",
            DateRangePreset::ThisWeek => "This Week",
            DateRangePreset::LastWeek => "Last Week",
            DateRangePreset::ThisMonth => "This Month",
            DateRangePreset::LastMonth => "Last Month",
            DateRangePreset::ThisQuarter => "This Quarter",
            DateRangePreset::LastQuarter => "Last Quarter",
            DateRangePreset::Last7Days => "Last 7 Days",
            DateRangePreset::Last14Days => "Last 14 Days",
            DateRangePreset::Last28Days => "Last 28 Days",
        }
    }

    /// Period of this preset as seen at `now`
    pub fn range_at(
        &self,
        now: DateTime<Utc>,
        week_start: WeekStart,
    ) -> Result<DurationSelection, CoreError> {
        let today = now.date_naive();
        let (from, to) = match self {
            DateRangePreset::Now => (
                checked_shift(now, -Duration::minutes(NOW_WINDOW_MINUTES))?,
                now,
            ),
            DateRangePreset::Today => (start_of_day(now), now),
            DateRangePreset::Yesterday => {
                let yesterday = checked_shift(now, -Duration::days(1))?;
                (start_of_day(yesterday), end_of_day(yesterday))
            }
            DateRangePreset::ThisWeek => (midnight(week_start_of(today, week_start)?), now),
            DateRangePreset::LastWeek => {
                let this_week = week_start_of(today, week_start)?;
                (
                    midnight(days_before(this_week, 7)?),
                    last_moment_before(this_week)?,
                )
            }
            DateRangePreset::ThisMonth => (midnight(first_of_month(today.year(), today.month())?), now),
            DateRangePreset::LastMonth => {
                let this_month = first_of_month(today.year(), today.month())?;
                let (year, month) = previous_month(today.year(), today.month());
                (
                    midnight(first_of_month(year, month)?),
                    last_moment_before(this_month)?,
                )
            }
            DateRangePreset::ThisQuarter => (midnight(quarter_start(today)?), now),
            DateRangePreset::LastQuarter => {
                let this_quarter = quarter_start(today)?;
                let previous = quarter_start(days_before(this_quarter, 1)?)?;
                (midnight(previous), last_moment_before(this_quarter)?)
            }
            DateRangePreset::Last7Days => trailing_days(now, 7)?,
            DateRangePreset::Last14Days => trailing_days(now, 14)?,
            DateRangePreset::Last28Days => trailing_days(now, 28)?,
        };

        DurationSelection::new(from, to, Frequency::default_for_period(from, to, None))
    }
}

impl fmt::Display for DateRangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRangePreset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = match s {
            "last_7days" => "last_7_days",
            "last_14days" => "last_14_days",
            "last_28days" => "last_28_days",
            other => other,
        };
        DateRangePreset::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| CoreError::UnrecognizedDatePreset { key: s.to_string() })
    }
}

/// Full-day period between two picked dates
pub fn custom_range(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<DurationSelection, CoreError> {
    let from = start_of_day(start);
    let to = end_of_day(end);
    DurationSelection::new(from, to, Frequency::default_for_period(from, to, None))
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// 23:59:59.999 on the day before `date`
fn last_moment_before(date: NaiveDate) -> Result<DateTime<Utc>, CoreError> {
    checked_shift(midnight(date), -Duration::milliseconds(1))
}

fn days_before(date: NaiveDate, days: u64) -> Result<NaiveDate, CoreError> {
    date.checked_sub_days(Days::new(days))
        .ok_or_else(|| CoreError::InvalidDate {
            value: date.to_string(),
            reason: "date out of range".to_string(),
        })
}

fn trailing_days(
    now: DateTime<Utc>,
    days: i64,
) -> Result<(DateTime<Utc>, DateTime<Utc>), CoreError> {
    let today = start_of_day(now);
    Ok((
        checked_shift(today, -Duration::days(days))?,
        checked_shift(today, -Duration::milliseconds(1))?,
    ))
}

fn week_start_of(date: NaiveDate, week_start: WeekStart) -> Result<NaiveDate, CoreError> {
    let day = date.weekday().num_days_from_sunday();
    let first = week_start.weekday().num_days_from_sunday();
    let back = (day + 7 - first) % 7;
    days_before(date, u64::from(back))
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CoreError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| CoreError::InvalidDate {
        value: format!("{:04}-{:02}-01", year, month),
        reason: "date out of range".to_string(),
    })
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn quarter_start(date: NaiveDate) -> Result<NaiveDate, CoreError> {
    let first_month = (date.month0() / 3) * 3 + 1;
    first_of_month(date.year(), first_month)
}
