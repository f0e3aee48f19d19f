//! Chart type, slot key and chart-type preference models

use crate::error::CoreError;
use crate::models::query::QueryType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Presentation used to render a report result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Table,
    BarChart,
    HorizontalBarChart,
    PivotChart,
    Sparkline,
    LineChart,
    StackedArea,
    StackedBar,
    ScatterPlot,
    FunnelChart,
    MetricChart,
}

impl ChartType {
    pub const ALL: [ChartType; 11] = [
        ChartType::Table,
        ChartType::BarChart,
        ChartType::HorizontalBarChart,
        ChartType::PivotChart,
        ChartType::Sparkline,
        ChartType::LineChart,
        ChartType::StackedArea,
        ChartType::StackedBar,
        ChartType::ScatterPlot,
        ChartType::FunnelChart,
        ChartType::MetricChart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Table => "table",
            ChartType::BarChart => "bar_chart",
            ChartType::HorizontalBarChart => "horizontal_bar_chart",
            ChartType::PivotChart => "pivot_chart",
            ChartType::Sparkline => "sparkline",
            ChartType::LineChart => "line_chart",
            ChartType::StackedArea => "stacked_area",
            ChartType::StackedBar => "stacked_bar",
            ChartType::ScatterPlot => "scatter_plot",
            ChartType::FunnelChart => "funnel_chart",
            ChartType::MetricChart => "metric_chart",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CoreError::UnknownChartType {
                value: s.to_string(),
            })
    }
}

/// Key under which a chart-type preference is stored for one query shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKey {
    Breakdown,
    NoBreakdown,
    SingleTouchPoint,
    DualTouchPoint,
}

impl SlotKey {
    pub const ALL: [SlotKey; 4] = [
        SlotKey::Breakdown,
        SlotKey::NoBreakdown,
        SlotKey::SingleTouchPoint,
        SlotKey::DualTouchPoint,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        SlotKey::ALL.into_iter().find(|slot| slot.as_str() == key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKey::Breakdown => "breakdown",
            SlotKey::NoBreakdown => "no_breakdown",
            SlotKey::SingleTouchPoint => "single_touch_point",
            SlotKey::DualTouchPoint => "dual_touch_point",
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chart type used when neither the preferences nor the defaults have a slot
pub const FALLBACK_CHART_TYPE: ChartType = ChartType::LineChart;

/// Per query type, per slot chart-type choices
///
/// Serialized as a nested JSON object:
/// `{"event": {"breakdown": "bar_chart", "no_breakdown": "line_chart"}, ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartTypePreferences {
    slots: BTreeMap<QueryType, BTreeMap<SlotKey, ChartType>>,
}

impl Default for ChartTypePreferences {
    /// Session-start defaults for every query type
    fn default() -> Self {
        let mut prefs = Self::empty();
        for query_type in [
            QueryType::Event,
            QueryType::Profile,
            QueryType::Kpi,
            QueryType::Campaign,
        ] {
            prefs.set(query_type, SlotKey::Breakdown, ChartType::BarChart);
            prefs.set(query_type, SlotKey::NoBreakdown, ChartType::LineChart);
        }
        prefs.set(QueryType::Funnel, SlotKey::Breakdown, ChartType::BarChart);
        prefs.set(QueryType::Funnel, SlotKey::NoBreakdown, ChartType::BarChart);
        prefs.set(
            QueryType::Attribution,
            SlotKey::SingleTouchPoint,
            ChartType::BarChart,
        );
        prefs.set(
            QueryType::Attribution,
            SlotKey::DualTouchPoint,
            ChartType::BarChart,
        );
        prefs.set(QueryType::Web, SlotKey::NoBreakdown, ChartType::LineChart);
        prefs
    }
}

impl ChartTypePreferences {
    /// Map with no slots at all; every lookup hits the defaults
    pub fn empty() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Stored chart type for a slot, falling back to the defaults
    pub fn get(&self, query_type: QueryType, slot: SlotKey) -> ChartType {
        self.stored(query_type, slot)
            .or_else(|| Self::default().stored(query_type, slot))
            .unwrap_or(FALLBACK_CHART_TYPE)
    }

    /// Explicitly stored chart type, without fallback
    pub fn stored(&self, query_type: QueryType, slot: SlotKey) -> Option<ChartType> {
        self.slots
            .get(&query_type)
            .and_then(|by_slot| by_slot.get(&slot))
            .copied()
    }

    pub fn set(&mut self, query_type: QueryType, slot: SlotKey, chart: ChartType) {
        self.slots
            .entry(query_type)
            .or_default()
            .insert(slot, chart);
    }

    /// Fill missing slots from `other`, keeping what is already stored
    pub fn merge_missing(&mut self, other: &ChartTypePreferences) {
        for (query_type, by_slot) in &other.slots {
            let mine = self.slots.entry(*query_type).or_default();
            for (slot, chart) in by_slot {
                mine.entry(*slot).or_insert(*chart);
            }
        }
    }

    /// Iterate over every stored `(query_type, slot, chart)` triple
    pub fn iter(&self) -> impl Iterator<Item = (QueryType, SlotKey, ChartType)> + '_ {
        self.slots.iter().flat_map(|(query_type, by_slot)| {
            by_slot
                .iter()
                .map(move |(slot, chart)| (*query_type, *slot, *chart))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.slots.values().all(|by_slot| by_slot.is_empty())
    }
}
