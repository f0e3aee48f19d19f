//! Integration tests for chart type resolution and slot selection

use querydeck_core::models::{ChartType, ChartTypePreferences, QueryShape, QueryType, SlotKey};
use querydeck_core::{resolve_chart_type, restore_saved_chart_type, slot_key};

const ALL_SLOTS: [SlotKey; 4] = [
    SlotKey::Breakdown,
    SlotKey::NoBreakdown,
    SlotKey::SingleTouchPoint,
    SlotKey::DualTouchPoint,
];

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("property_{}", i)).collect()
}

fn shape(query_type: QueryType, n: usize) -> QueryShape {
    QueryShape::from_parts(query_type, names(n), names(n), names(n))
}

/// Preferences where every slot holds `filler` except `slot`, which holds `marker`
fn marked(query_type: QueryType, slot: SlotKey, marker: ChartType) -> ChartTypePreferences {
    let mut prefs = ChartTypePreferences::empty();
    for other in ALL_SLOTS {
        prefs.set(query_type, other, ChartType::ScatterPlot);
    }
    prefs.set(query_type, slot, marker);
    prefs
}

#[test]
fn test_resolver_reads_the_storage_slot() {
    // StackedArea is never substituted, so it only comes back if the
    // resolver read exactly the slot the storage key points at.
    for query_type in QueryType::ALL {
        if query_type == QueryType::Web {
            continue;
        }
        for n in 0..=5 {
            let shape = shape(query_type, n);
            let prefs = marked(query_type, slot_key(&shape), ChartType::StackedArea);
            assert_eq!(
                resolve_chart_type(&shape, &prefs),
                ChartType::StackedArea,
                "{} with cardinality {}",
                query_type,
                n
            );
        }
    }
}

#[test]
fn test_recorded_change_survives_resolution() {
    for query_type in QueryType::ALL {
        if query_type == QueryType::Web {
            continue;
        }
        for n in 0..=5 {
            let shape = shape(query_type, n);
            let mut prefs = ChartTypePreferences::default();
            prefs.record_change(&shape, ChartType::StackedBar);
            assert_eq!(resolve_chart_type(&shape, &prefs), ChartType::StackedBar);
        }
    }
}

#[test]
fn test_table_never_surfaces() {
    for query_type in QueryType::ALL {
        for n in 0..=5 {
            let shape = shape(query_type, n);
            let mut prefs = ChartTypePreferences::empty();
            for slot in ALL_SLOTS {
                prefs.set(query_type, slot, ChartType::Table);
            }
            assert_ne!(resolve_chart_type(&shape, &prefs), ChartType::Table);
        }
    }
}

#[test]
fn test_attribution_two_models_table() {
    let mut prefs = ChartTypePreferences::default();
    prefs.set(QueryType::Attribution, SlotKey::DualTouchPoint, ChartType::Table);
    let shape = QueryShape::Attribution {
        models: vec!["first_touch".to_string(), "last_touch".to_string()],
    };
    assert_eq!(slot_key(&shape), SlotKey::DualTouchPoint);
    assert_eq!(resolve_chart_type(&shape, &prefs), ChartType::BarChart);
}

#[test]
fn test_funnel_without_breakdown_table() {
    let mut prefs = ChartTypePreferences::default();
    prefs.set(QueryType::Funnel, SlotKey::NoBreakdown, ChartType::Table);
    let shape = QueryShape::Funnel { breakdown: vec![] };
    assert_eq!(resolve_chart_type(&shape, &prefs), ChartType::BarChart);
}

#[test]
fn test_campaign_without_group_by_table() {
    let mut prefs = ChartTypePreferences::default();
    prefs.set(QueryType::Campaign, SlotKey::NoBreakdown, ChartType::Table);
    let shape = QueryShape::Campaign { group_by: vec![] };
    assert_eq!(resolve_chart_type(&shape, &prefs), ChartType::Sparkline);
}

#[test]
fn test_breakdown_boundaries() {
    for query_type in [QueryType::Event, QueryType::Profile, QueryType::Kpi] {
        let mut prefs = ChartTypePreferences::default();
        prefs.set(query_type, SlotKey::Breakdown, ChartType::HorizontalBarChart);
        assert_eq!(
            resolve_chart_type(&shape(query_type, 3), &prefs),
            ChartType::HorizontalBarChart
        );
        assert_eq!(
            resolve_chart_type(&shape(query_type, 4), &prefs),
            ChartType::BarChart
        );

        prefs.set(query_type, SlotKey::Breakdown, ChartType::PivotChart);
        assert_eq!(
            resolve_chart_type(&shape(query_type, 1), &prefs),
            ChartType::BarChart
        );
        assert_eq!(
            resolve_chart_type(&shape(query_type, 2), &prefs),
            ChartType::PivotChart
        );
    }
}

#[test]
fn test_saved_report_restores_into_resolved_slot() {
    let shape = QueryShape::Kpi {
        breakdown: names(2),
    };
    let prefs = restore_saved_chart_type(&shape, Some("pi"), &ChartTypePreferences::default());
    assert_eq!(resolve_chart_type(&shape, &prefs), ChartType::PivotChart);

    // The ungrouped slot is untouched
    let ungrouped = QueryShape::Kpi { breakdown: vec![] };
    assert_eq!(resolve_chart_type(&ungrouped, &prefs), ChartType::LineChart);
}
