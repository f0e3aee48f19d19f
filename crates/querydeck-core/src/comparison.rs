//! Comparison period calculation
//!
//! Turns the user's comparison choice (a preset offset or one picked endpoint)
//! into a concrete period relative to the primary [`DurationSelection`].

use crate::error::CoreError;
use crate::models::duration::{
    checked_shift, ComparisonOption, ComparisonPreset, ComparisonSelection, CustomRangeType,
    DurationSelection,
};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// What the user picked in the comparison selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonRequest {
    /// One of the fixed preset keys, unparsed
    Preset { selected_value: String },
    /// A picked start or end date of a custom period
    Custom {
        selected_date: DateTime<Utc>,
        range_type: CustomRangeType,
    },
}

impl ComparisonRequest {
    pub fn preset(key: impl Into<String>) -> Self {
        ComparisonRequest::Preset {
            selected_value: key.into(),
        }
    }

    pub fn custom_start(selected_date: DateTime<Utc>) -> Self {
        ComparisonRequest::Custom {
            selected_date,
            range_type: CustomRangeType::Start,
        }
    }

    pub fn custom_end(selected_date: DateTime<Utc>) -> Self {
        ComparisonRequest::Custom {
            selected_date,
            range_type: CustomRangeType::End,
        }
    }
}

/// Compute the comparison period, clamping custom periods to the current time
pub fn compute_comparison_range(
    request: &ComparisonRequest,
    duration: &DurationSelection,
) -> Result<ComparisonSelection, CoreError> {
    compute_comparison_range_at(request, duration, Some(Utc::now()))
}

/// Compute the comparison period with an explicit clamp instant
///
/// `clamp_at` caps the end of a custom period picked by its start date;
/// `None` disables clamping.
pub fn compute_comparison_range_at(
    request: &ComparisonRequest,
    duration: &DurationSelection,
    clamp_at: Option<DateTime<Utc>>,
) -> Result<ComparisonSelection, CoreError> {
    let selection = match request {
        ComparisonRequest::Preset { selected_value } => {
            let preset: ComparisonPreset = selected_value.parse()?;
            apply_preset(preset, duration)?
        }
        ComparisonRequest::Custom {
            selected_date,
            range_type,
        } => custom_range(*selected_date, *range_type, duration, clamp_at)?,
    };

    debug!(
        option = %selection.selected_option,
        start = %selection.start_date,
        end = %selection.end_date,
        "Computed comparison range"
    );
    Ok(selection)
}

/// Shift both endpoints of the primary period back by the preset's offset
pub fn apply_preset(
    preset: ComparisonPreset,
    duration: &DurationSelection,
) -> Result<ComparisonSelection, CoreError> {
    let offset = -Duration::days(preset.offset_days());
    Ok(ComparisonSelection {
        start_date: checked_shift(duration.from, offset)?,
        end_date: checked_shift(duration.to, offset)?,
        selected_option: ComparisonOption::Preset(preset),
    })
}

fn custom_range(
    selected_date: DateTime<Utc>,
    range_type: CustomRangeType,
    duration: &DurationSelection,
    clamp_at: Option<DateTime<Utc>>,
) -> Result<ComparisonSelection, CoreError> {
    let span = Duration::days(duration.span_days());

    let (start_date, end_date) = match range_type {
        CustomRangeType::Start => {
            let end = checked_shift(selected_date, span)?;
            let end = match clamp_at {
                Some(now) if end > now => now,
                _ => end,
            };
            (selected_date, end)
        }
        CustomRangeType::End => (checked_shift(selected_date, -span)?, selected_date),
    };

    Ok(ComparisonSelection {
        start_date,
        end_date,
        selected_option: ComparisonOption::Custom,
    })
}

/// Recompute an existing comparison after the primary period changed
///
/// Presets are re-applied; custom periods keep their start date and take the
/// new primary span.
pub fn recompute_for_duration(
    current: &ComparisonSelection,
    duration: &DurationSelection,
    clamp_at: Option<DateTime<Utc>>,
) -> Result<ComparisonSelection, CoreError> {
    match current.selected_option {
        ComparisonOption::Preset(preset) => apply_preset(preset, duration),
        ComparisonOption::Custom => custom_range(
            current.start_date,
            CustomRangeType::Start,
            duration,
            clamp_at,
        ),
    }
}
