//! Integration tests for comparison periods

use chrono::{DateTime, Duration, TimeZone, Utc};
use querydeck_core::comparison::{apply_preset, recompute_for_duration};
use querydeck_core::models::{
    ComparisonOption, ComparisonPreset, ComparisonSelection, DurationSelection, Frequency,
};
use querydeck_core::{compute_comparison_range_at, ComparisonRequest, CoreError, DateRangePreset};

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

fn duration(from: i64, to: i64) -> DurationSelection {
    DurationSelection::new(day(from), day(to), Frequency::Date).unwrap()
}

#[test]
fn test_preset_scenario_day_100_to_107() {
    let result = compute_comparison_range_at(
        &ComparisonRequest::preset("previous_7_days"),
        &duration(100, 107),
        None,
    )
    .unwrap();

    assert_eq!(
        result,
        ComparisonSelection {
            start_date: day(93),
            end_date: day(100),
            selected_option: ComparisonOption::Preset(ComparisonPreset::Previous7Days),
        }
    );
}

#[test]
fn test_presets_align_endpoints() {
    for (from, to) in [(0, 0), (10, 11), (200, 230), (365, 729)] {
        let d = duration(from, to);
        for preset in ComparisonPreset::ALL {
            let result = apply_preset(preset, &d).unwrap();
            assert_eq!(result.start_date, day(from - preset.offset_days()));
            assert_eq!(result.end_date, day(to - preset.offset_days()));
            assert_eq!(result.end_date - result.start_date, d.to - d.from);
        }
    }
}

#[test]
fn test_custom_start_span_matches_primary() {
    for span in [0, 1, 6, 29, 90] {
        let primary = duration(500, 500 + span);
        let result = compute_comparison_range_at(
            &ComparisonRequest::custom_start(day(100)),
            &primary,
            Some(day(10_000)),
        )
        .unwrap();
        assert_eq!(result.end_date - result.start_date, Duration::days(span));
        assert_eq!(result.selected_option, ComparisonOption::Custom);
    }
}

#[test]
fn test_custom_end_start_is_span_before() {
    for span in [0, 3, 27] {
        let primary = duration(40, 40 + span);
        let result = compute_comparison_range_at(
            &ComparisonRequest::custom_end(day(20)),
            &primary,
            None,
        )
        .unwrap();
        assert_eq!(result.start_date, day(20 - span));
        assert_eq!(result.end_date, day(20));
    }
}

#[test]
fn test_custom_start_clamp() {
    let now = day(103);
    let result = compute_comparison_range_at(
        &ComparisonRequest::custom_start(day(100)),
        &duration(200, 210),
        Some(now),
    )
    .unwrap();
    assert_eq!(result.end_date, now);
}

#[test]
fn test_unrecognized_preset() {
    let err = compute_comparison_range_at(
        &ComparisonRequest::preset("last_week"),
        &duration(1, 5),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::UnrecognizedPreset { .. }));
}

#[test]
fn test_date_preset_then_comparison() {
    let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
    let primary = DateRangePreset::LastMonth
        .range_at(now, Default::default())
        .unwrap();
    let comparison = apply_preset(ComparisonPreset::Previous30Days, &primary).unwrap();

    assert_eq!(
        comparison.start_date,
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
    );
    assert_eq!(comparison.end_date - comparison.start_date, primary.to - primary.from);
    assert_eq!(primary.frequency, Frequency::Date);
    assert_eq!(
        primary.valid_frequencies(None),
        vec![Frequency::Date, Frequency::Week]
    );
}

#[test]
fn test_recompute_after_primary_change() {
    let current = compute_comparison_range_at(
        &ComparisonRequest::custom_end(day(60)),
        &duration(100, 110),
        None,
    )
    .unwrap();
    assert_eq!(current.start_date, day(50));

    let updated = recompute_for_duration(&current, &duration(100, 105), None).unwrap();
    assert_eq!(updated.start_date, day(50));
    assert_eq!(updated.end_date, day(55));
}
