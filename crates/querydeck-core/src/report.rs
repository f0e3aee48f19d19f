//! Report content decisions built on top of the resolvers

use crate::chart_type::{chart_type_options, resolve_chart_type, slot_key};
use crate::models::chart::{ChartType, ChartTypePreferences, SlotKey};
use crate::models::query::{QueryShape, QueryShapeDescriptor};
use serde::Serialize;

/// Whether a period comparison can be shown for this query
///
/// Comparison overlays only work on a single series: one event without
/// breakdown, an ungrouped funnel, KPI or campaign, or a single attribution
/// model. Profile and web reports never compare.
pub fn is_comparison_supported(shape: &QueryShape, event_count: usize) -> bool {
    match shape {
        QueryShape::Event { breakdown } => event_count == 1 && breakdown.is_empty(),
        QueryShape::Funnel { breakdown } | QueryShape::Kpi { breakdown } => breakdown.is_empty(),
        QueryShape::Campaign { group_by } => group_by.is_empty(),
        QueryShape::Attribution { models } => models.len() == 1,
        QueryShape::Profile { .. } | QueryShape::Web => false,
    }
}

/// Everything the report surface needs to pick its chart and controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportView {
    pub descriptor: QueryShapeDescriptor,
    pub slot: SlotKey,
    pub chart_type: ChartType,
    pub presentation_code: &'static str,
    /// Choices for the chart switcher, empty when the shape has none
    pub chart_options: Vec<ChartType>,
    pub comparison_supported: bool,
}

impl ReportView {
    pub fn build(shape: &QueryShape, prefs: &ChartTypePreferences, event_count: usize) -> Self {
        let chart_type = resolve_chart_type(shape, prefs);
        Self {
            descriptor: shape.descriptor(),
            slot: slot_key(shape),
            chart_type,
            presentation_code: chart_type.presentation_code(),
            chart_options: chart_type_options(shape, event_count),
            comparison_supported: is_comparison_supported(shape, event_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::query::QueryType;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("p{}", i)).collect()
    }

    #[test]
    fn test_comparison_support() {
        assert!(is_comparison_supported(&QueryShape::Event { breakdown: vec![] }, 1));
        assert!(!is_comparison_supported(&QueryShape::Event { breakdown: vec![] }, 2));
        assert!(!is_comparison_supported(&QueryShape::Event { breakdown: names(1) }, 1));
        assert!(is_comparison_supported(&QueryShape::Funnel { breakdown: vec![] }, 3));
        assert!(!is_comparison_supported(&QueryShape::Kpi { breakdown: names(2) }, 1));
        assert!(is_comparison_supported(&QueryShape::Campaign { group_by: vec![] }, 0));
        assert!(is_comparison_supported(&QueryShape::Attribution { models: names(1) }, 0));
        assert!(!is_comparison_supported(&QueryShape::Attribution { models: names(2) }, 0));
        assert!(!is_comparison_supported(&QueryShape::Profile { breakdown: vec![] }, 1));
        assert!(!is_comparison_supported(&QueryShape::Web, 1));
    }

    #[test]
    fn test_report_view_for_kpi_table() {
        let mut prefs = ChartTypePreferences::default();
        prefs.set(QueryType::Kpi, SlotKey::NoBreakdown, ChartType::Table);

        let view = ReportView::build(&QueryShape::Kpi { breakdown: vec![] }, &prefs, 1);
        assert_eq!(view.slot, SlotKey::NoBreakdown);
        assert_eq!(view.chart_type, ChartType::Sparkline);
        assert_eq!(view.presentation_code, "pc");
        assert!(view.comparison_supported);
        assert!(view.chart_options.is_empty());
        assert_eq!(view.descriptor.query_type, QueryType::Kpi);
    }

    #[test]
    fn test_report_view_offers_event_switcher() {
        let shape = QueryShape::Event {
            breakdown: names(2),
        };
        let single = ReportView::build(&shape, &ChartTypePreferences::default(), 1);
        assert_eq!(single.chart_type, ChartType::BarChart);
        assert!(single.chart_options.contains(&ChartType::HorizontalBarChart));

        let multi = ReportView::build(&shape, &ChartTypePreferences::default(), 2);
        assert!(!multi.chart_options.contains(&ChartType::HorizontalBarChart));
    }
}
