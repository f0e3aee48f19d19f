//! CLI helpers: argument parsing and output formatting
//!
//! Every formatter renders either a comfy-table (human) or pretty JSON.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use querydeck_core::models::{
    ChartTypePreferences, ComparisonSelection, DurationSelection, QueryShape, QueryType,
};
use querydeck_core::preferences::ChartTypeChange;
use querydeck_core::{DateRangePreset, ReportView};
use serde::Serialize;

// ============================================================================
// Argument Parsing
// ============================================================================

/// Parse a date argument: "YYYY-MM-DD" (midnight UTC) or RFC 3339
pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (expected: YYYY-MM-DD or RFC 3339)", s))?;
    let datetime = date.and_hms_opt(0, 0, 0).context("Invalid time")?.and_utc();
    Ok(datetime)
}

/// Build a query shape from the raw CLI arguments
pub fn build_shape(
    query_type: &str,
    breakdown: Vec<String>,
    group_by: Vec<String>,
    models: Vec<String>,
) -> Result<QueryShape> {
    let query_type: QueryType = query_type
        .parse()
        .context("Expected one of: event, funnel, attribution, campaign, kpi, profile, web")?;
    Ok(QueryShape::from_parts(query_type, breakdown, group_by, models))
}

// ============================================================================
// Formatters
// ============================================================================

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

fn header(table: &mut Table, columns: &[&str], no_color: bool) {
    if no_color {
        table.set_header(columns.to_vec());
    } else {
        table.set_header(
            columns
                .iter()
                .map(|c| Cell::new(c).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
}

fn format_instant(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format a resolved report view (human or JSON)
pub fn format_report_view(view: &ReportView, json: bool) -> String {
    if json {
        return to_json(view);
    }

    let mut lines = vec![];
    lines.push(format!("Query type:       {}", view.descriptor.query_type));
    lines.push(format!("Breakdowns:       {}", view.descriptor.breakdown_count));
    lines.push(format!("Models/group-by:  {}", view.descriptor.model_count));
    lines.push(format!("Slot:             {}", view.slot));
    lines.push(format!(
        "Chart type:       {} ({})",
        view.chart_type, view.presentation_code
    ));
    let options = if view.chart_options.is_empty() {
        "-".to_string()
    } else {
        view.chart_options
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    lines.push(format!("Chart options:    {}", options));
    lines.push(format!(
        "Comparison:       {}",
        if view.comparison_supported {
            "supported"
        } else {
            "not supported"
        }
    ));
    lines.join("\n")
}

#[derive(Serialize)]
struct ComparisonOutput<'a> {
    primary: &'a DurationSelection,
    comparison: &'a ComparisonSelection,
}

/// Format a primary period and its comparison period
pub fn format_comparison(
    primary: &DurationSelection,
    comparison: &ComparisonSelection,
    json: bool,
    no_color: bool,
) -> String {
    if json {
        return to_json(&ComparisonOutput {
            primary,
            comparison,
        });
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    header(&mut table, &["Period", "Start", "End", "Option"], no_color);
    table.add_row(Row::from(vec![
        "primary".to_string(),
        format_instant(&primary.from),
        format_instant(&primary.to),
        primary.frequency.to_string(),
    ]));
    table.add_row(Row::from(vec![
        "comparison".to_string(),
        format_instant(&comparison.start_date),
        format_instant(&comparison.end_date),
        comparison.selected_option.to_string(),
    ]));
    table.to_string()
}

#[derive(Serialize)]
struct RangeOutput<'a> {
    preset: DateRangePreset,
    label: &'static str,
    #[serde(flatten)]
    range: &'a DurationSelection,
}

/// Format the period of a date preset
pub fn format_range(preset: DateRangePreset, range: &DurationSelection, json: bool) -> String {
    if json {
        return to_json(&RangeOutput {
            preset,
            label: preset.label(),
            range,
        });
    }

    format!(
        "{}: {} -> {} (frequency: {})",
        preset.label(),
        format_instant(&range.from),
        format_instant(&range.to),
        range.frequency
    )
}

/// Format the chart-type preference map as a table (human) or JSON
pub fn format_preferences(prefs: &ChartTypePreferences, json: bool, no_color: bool) -> String {
    if json {
        return to_json(prefs);
    }

    if prefs.is_empty() {
        return "No chart type preferences stored.".to_string();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    header(&mut table, &["Query type", "Slot", "Chart type", "Code"], no_color);
    for (query_type, slot, chart) in prefs.iter() {
        table.add_row(Row::from(vec![
            query_type.to_string(),
            slot.to_string(),
            chart.to_string(),
            chart.presentation_code().to_string(),
        ]));
    }
    table.to_string()
}

/// One-line confirmation of a recorded chart-type change
pub fn format_change(change: &ChartTypeChange) -> String {
    format!(
        "Stored {} for {} / {} (saved-report code: {})",
        change.chart, change.query_type, change.slot, change.presentation_code
    )
}
