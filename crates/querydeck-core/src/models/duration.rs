//! Analysis period and comparison period models

use crate::error::CoreError;
use crate::models::query::QueryType;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time-bucketing granularity of a result series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Hour,
    #[default]
    Date,
    Week,
    Month,
    Quarter,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Hour => "hour",
            Frequency::Date => "date",
            Frequency::Week => "week",
            Frequency::Month => "month",
            Frequency::Quarter => "quarter",
        }
    }

    /// Granularities a period may be bucketed by, the default first
    ///
    /// Thresholds are on the number of calendar days the period touches.
    /// Hourly buckets are only offered for single-day periods, and never for
    /// campaign queries. `None` stands for a period not yet tied to a query.
    pub fn valid_options(
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        query_type: Option<QueryType>,
    ) -> Vec<Frequency> {
        let days = inclusive_days(from, to);
        if days > 93 {
            vec![
                Frequency::Date,
                Frequency::Week,
                Frequency::Month,
                Frequency::Quarter,
            ]
        } else if days > 31 {
            vec![Frequency::Date, Frequency::Week, Frequency::Month]
        } else if days > 7 {
            vec![Frequency::Date, Frequency::Week]
        } else if days > 1 || query_type == Some(QueryType::Campaign) {
            vec![Frequency::Date]
        } else {
            vec![Frequency::Hour]
        }
    }

    /// Granularity picked for a freshly chosen period
    pub fn default_for_period(
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        query_type: Option<QueryType>,
    ) -> Self {
        Self::valid_options(from, to, query_type)
            .into_iter()
            .next()
            .unwrap_or_default()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(Frequency::Hour),
            "date" => Ok(Frequency::Date),
            "week" => Ok(Frequency::Week),
            "month" => Ok(Frequency::Month),
            "quarter" => Ok(Frequency::Quarter),
            other => Err(CoreError::UnknownFrequency {
                value: other.to_string(),
            }),
        }
    }
}

/// Midnight at the start of the instant's UTC day
pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Last millisecond (23:59:59.999) of the instant's UTC day
///
/// Saturates at [`DateTime::<Utc>::MAX_UTC`] on the last representable day.
pub fn end_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(at)
        .checked_add_signed(Duration::days(1))
        .map(|next| next - Duration::milliseconds(1))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Calendar days touched by `[from, to]`, counting both ends
pub fn inclusive_days(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (start_of_day(to) - start_of_day(from)).num_days() + 1
}

/// `at` moved by `delta`, failing instead of overflowing chrono's range
pub fn checked_shift(at: DateTime<Utc>, delta: Duration) -> Result<DateTime<Utc>, CoreError> {
    at.checked_add_signed(delta)
        .ok_or_else(|| CoreError::InvalidDate {
            value: at.to_rfc3339(),
            reason: format!(
                "shifting by {} days leaves the supported date range",
                delta.num_days()
            ),
        })
}

/// Primary analysis period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationSelection {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    #[serde(default)]
    pub frequency: Frequency,
}

impl DurationSelection {
    /// Build a period, rejecting `from > to`
    pub fn new(
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        frequency: Frequency,
    ) -> Result<Self, CoreError> {
        if from > to {
            return Err(CoreError::InvalidDuration {
                from: from.to_rfc3339(),
                to: to.to_rfc3339(),
            });
        }
        Ok(Self {
            from,
            to,
            frequency,
        })
    }

    /// Whole days between start-of-day(`from`) and end-of-day(`to`), truncated
    ///
    /// A period inside a single calendar day yields 0, two calendar days 1.
    pub fn span_days(&self) -> i64 {
        inclusive_days(self.from, self.to) - 1
    }

    /// Granularities this period may be bucketed by, the default first
    pub fn valid_frequencies(&self, query_type: Option<QueryType>) -> Vec<Frequency> {
        Frequency::valid_options(self.from, self.to, query_type)
    }
}

/// Fixed-offset comparison presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonPreset {
    PreviousDay,
    #[serde(rename = "previous_7_days")]
    Previous7Days,
    #[serde(rename = "previous_30_days")]
    Previous30Days,
    #[serde(rename = "previous_90_days")]
    Previous90Days,
    #[serde(rename = "previous_365_days")]
    Previous365Days,
}

impl ComparisonPreset {
    pub const ALL: [ComparisonPreset; 5] = [
        ComparisonPreset::PreviousDay,
        ComparisonPreset::Previous7Days,
        ComparisonPreset::Previous30Days,
        ComparisonPreset::Previous90Days,
        ComparisonPreset::Previous365Days,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonPreset::PreviousDay => "previous_day",
            ComparisonPreset::Previous7Days => "previous_7_days",
            ComparisonPreset::Previous30Days => "previous_30_days",
            ComparisonPreset::Previous90Days => "previous_90_days",
            ComparisonPreset::Previous365Days => "previous_365_days",
        }
    }

    /// Days both endpoints are shifted backwards
    pub fn offset_days(&self) -> i64 {
        match self {
            ComparisonPreset::PreviousDay => 1,
            ComparisonPreset::Previous7Days => 7,
            ComparisonPreset::Previous30Days => 30,
            ComparisonPreset::Previous90Days => 90,
            ComparisonPreset::Previous365Days => 365,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComparisonPreset::PreviousDay => "Previous day",
            ComparisonPreset::Previous7Days => "Previous 7 days",
            ComparisonPreset::Previous30Days => "Previous 30 days",
            ComparisonPreset::Previous90Days => "Previous 90 days",
            ComparisonPreset::Previous365Days => "Previous 365 days",
        }
    }
}

impl fmt::Display for ComparisonPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonPreset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComparisonPreset::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::UnrecognizedPreset { key: s.to_string() })
    }
}

/// Literal option key of a user-picked comparison period
pub const CUSTOM_OPTION: &str = "custom";

/// Which comparison option produced a [`ComparisonSelection`]
///
/// Serialized as the preset key or the literal `"custom"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ComparisonOption {
    Preset(ComparisonPreset),
    Custom,
}

impl ComparisonOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOption::Preset(p) => p.as_str(),
            ComparisonOption::Custom => CUSTOM_OPTION,
        }
    }
}

impl fmt::Display for ComparisonOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ComparisonOption {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == CUSTOM_OPTION {
            return Ok(ComparisonOption::Custom);
        }
        value.parse().map(ComparisonOption::Preset)
    }
}

impl From<ComparisonOption> for String {
    fn from(option: ComparisonOption) -> Self {
        option.as_str().to_string()
    }
}

/// Secondary period compared against the primary one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSelection {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub selected_option: ComparisonOption,
}

/// Which endpoint of a custom comparison period the user picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomRangeType {
    Start,
    End,
}
