//! Example: walk a report through chart and comparison decisions
//!
//! Run with: cargo run -p querydeck-core --example report_walkthrough

use chrono::Utc;
use querydeck_core::models::{ChartType, ChartTypePreferences, QueryShape, WeekStart};
use querydeck_core::{compute_comparison_range, ComparisonRequest, DateRangePreset, ReportView};

fn main() -> Result<(), querydeck_core::CoreError> {
    let mut prefs = ChartTypePreferences::default();

    let shape = QueryShape::Event {
        breakdown: vec!["$country".to_string(), "$browser".to_string()],
    };

    println!("=== Default ===");
    let view = ReportView::build(&shape, &prefs, 1);
    println!("Slot: {}  Chart: {}", view.slot, view.chart_type);

    // User switches to a table; the breakdown view shows bars instead
    let change = prefs.record_change(&shape, ChartType::Table);
    println!("\n=== After choosing {} ===", change.chart);
    let view = ReportView::build(&shape, &prefs, 1);
    println!("Slot: {}  Chart: {}", view.slot, view.chart_type);

    println!("\n=== Comparison ===");
    let primary = DateRangePreset::Last28Days.range_at(Utc::now(), WeekStart::Sunday)?;
    let comparison =
        compute_comparison_range(&ComparisonRequest::preset("previous_30_days"), &primary)?;
    println!(
        "Primary:    {} -> {}",
        primary.from.format("%Y-%m-%d"),
        primary.to.format("%Y-%m-%d")
    );
    println!(
        "Comparison: {} -> {} ({})",
        comparison.start_date.format("%Y-%m-%d"),
        comparison.end_date.format("%Y-%m-%d"),
        comparison.selected_option
    );

    Ok(())
}
