//! Chart type resolution for a query shape
//!
//! [`slot_key`] decides where a chart-type preference lives for a shape;
//! [`resolve_chart_type`] reads that slot and corrects choices the shape
//! cannot display. Both go through the same slot function so a preference
//! written under one shape is read back under the same shape.

use crate::models::chart::{ChartType, ChartTypePreferences, SlotKey};
use crate::models::query::QueryShape;

/// Horizontal bars stop being readable past this many breakdown dimensions
pub const MAX_HORIZONTAL_BAR_BREAKDOWNS: usize = 3;

/// Slot of the preference map a shape reads from and writes to
pub fn slot_key(shape: &QueryShape) -> SlotKey {
    match shape {
        QueryShape::Event { breakdown }
        | QueryShape::Funnel { breakdown }
        | QueryShape::Profile { breakdown }
        | QueryShape::Kpi { breakdown } => breakdown_slot(breakdown.len()),
        QueryShape::Campaign { group_by } => breakdown_slot(group_by.len()),
        QueryShape::Attribution { models } => {
            if models.len() > 1 {
                SlotKey::DualTouchPoint
            } else {
                SlotKey::SingleTouchPoint
            }
        }
        QueryShape::Web => SlotKey::NoBreakdown,
    }
}

fn breakdown_slot(count: usize) -> SlotKey {
    if count > 0 {
        SlotKey::Breakdown
    } else {
        SlotKey::NoBreakdown
    }
}

/// Chart type to render for a shape, given the stored preferences
///
/// A stored `table` is never returned for the analysed query types; it is
/// replaced by the chart the shape supports. Web queries always use a line
/// chart.
pub fn resolve_chart_type(shape: &QueryShape, prefs: &ChartTypePreferences) -> ChartType {
    let query_type = shape.query_type();
    let stored = prefs.get(query_type, slot_key(shape));

    let resolved = match shape {
        QueryShape::Funnel { .. } => match stored {
            ChartType::Table => ChartType::BarChart,
            other => other,
        },
        QueryShape::Event { breakdown }
        | QueryShape::Profile { breakdown }
        | QueryShape::Kpi { breakdown } => resolve_breakdown_chart(breakdown.len(), stored),
        QueryShape::Campaign { group_by } => match stored {
            ChartType::Table if !group_by.is_empty() => ChartType::BarChart,
            ChartType::Table => ChartType::Sparkline,
            other => other,
        },
        QueryShape::Attribution { .. } => match stored {
            ChartType::Table => ChartType::BarChart,
            other => other,
        },
        QueryShape::Web => ChartType::LineChart,
    };

    if resolved != stored {
        tracing::debug!(
            %query_type,
            %stored,
            %resolved,
            "Stored chart type not valid for query shape, substituted"
        );
    }
    resolved
}

fn resolve_breakdown_chart(breakdown_count: usize, stored: ChartType) -> ChartType {
    if breakdown_count > MAX_HORIZONTAL_BAR_BREAKDOWNS && stored == ChartType::HorizontalBarChart {
        ChartType::BarChart
    } else if breakdown_count == 1 && stored == ChartType::PivotChart {
        // Pivot needs at least two dimensions
        ChartType::BarChart
    } else if stored == ChartType::Table {
        if breakdown_count > 0 {
            ChartType::BarChart
        } else {
            ChartType::Sparkline
        }
    } else {
        stored
    }
}

/// Chart types offered by the chart switcher for a shape
///
/// Shapes without a switcher (ungrouped funnels, KPI, profile, web) get an
/// empty list.
pub fn chart_type_options(shape: &QueryShape, event_count: usize) -> Vec<ChartType> {
    match shape {
        QueryShape::Event { breakdown } if !breakdown.is_empty() => {
            let mut options = series_breakdown_options();
            // Needs a single series per category
            if event_count == 1 && breakdown.len() <= MAX_HORIZONTAL_BAR_BREAKDOWNS {
                options.push(ChartType::HorizontalBarChart);
            }
            options
        }
        QueryShape::Campaign { group_by } if !group_by.is_empty() => series_breakdown_options(),
        QueryShape::Event { .. } | QueryShape::Campaign { .. } => {
            vec![ChartType::Sparkline, ChartType::LineChart]
        }
        QueryShape::Attribution { .. } => vec![ChartType::BarChart, ChartType::ScatterPlot],
        QueryShape::Funnel { breakdown } if !breakdown.is_empty() => {
            vec![ChartType::BarChart, ChartType::ScatterPlot]
        }
        QueryShape::Funnel { .. }
        | QueryShape::Kpi { .. }
        | QueryShape::Profile { .. }
        | QueryShape::Web => Vec::new(),
    }
}

fn series_breakdown_options() -> Vec<ChartType> {
    vec![
        ChartType::BarChart,
        ChartType::LineChart,
        ChartType::StackedArea,
        ChartType::StackedBar,
    ]
}

/// Whether `chart` may be stored as the choice for a shape
///
/// Besides the switcher options this admits the slot's built-in default, the
/// table view (every shape but web) and the pivot view for event, KPI and
/// profile reports with at least two breakdowns.
pub fn is_selectable_chart_type(
    shape: &QueryShape,
    event_count: usize,
    chart: ChartType,
) -> bool {
    if chart_type_options(shape, event_count).contains(&chart) {
        return true;
    }
    if ChartTypePreferences::default().get(shape.query_type(), slot_key(shape)) == chart {
        return true;
    }
    match (shape, chart) {
        (QueryShape::Web, _) => false,
        (_, ChartType::Table) => true,
        (
            QueryShape::Event { breakdown }
            | QueryShape::Kpi { breakdown }
            | QueryShape::Profile { breakdown },
            ChartType::PivotChart,
        ) => breakdown.len() >= 2,
        _ => false,
    }
}
