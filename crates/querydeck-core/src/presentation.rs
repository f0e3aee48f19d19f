//! Presentation codes stored in saved-report settings
//!
//! Saved reports keep their chart as a short code (`"pb"`, `"pl"`, ...).
//! This module converts between those codes and [`ChartType`] and restores a
//! saved report's chart into a preference map.

use crate::chart_type::slot_key;
use crate::error::CoreError;
use crate::models::chart::{ChartType, ChartTypePreferences};
use crate::models::query::{QueryShape, QueryType};
use tracing::{debug, warn};

/// Legacy horizontal bar code, still found in older saved reports
const LEGACY_HORIZONTAL_BAR_CODE: &str = "ph";

impl ChartType {
    /// Code written to a saved report's chart setting
    pub fn presentation_code(&self) -> &'static str {
        match self {
            ChartType::BarChart => "pb",
            ChartType::LineChart => "pl",
            ChartType::Table => "pt",
            ChartType::Sparkline => "pc",
            ChartType::StackedArea => "pa",
            ChartType::StackedBar => "ps",
            ChartType::ScatterPlot => "sp",
            ChartType::HorizontalBarChart => "hb",
            ChartType::PivotChart => "pi",
            ChartType::FunnelChart => "fc",
            ChartType::MetricChart => "mc",
        }
    }

    pub fn from_presentation_code(code: &str) -> Result<Self, CoreError> {
        if code == LEGACY_HORIZONTAL_BAR_CODE {
            return Ok(ChartType::HorizontalBarChart);
        }
        ChartType::ALL
            .into_iter()
            .find(|c| c.presentation_code() == code)
            .ok_or_else(|| CoreError::UnknownPresentation {
                code: code.to_string(),
            })
    }
}

/// Preference map for a freshly opened saved report
///
/// The saved chart is written into the slot the report's shape selects, on
/// top of `base`. Reports saved as a table (older reports could be) and
/// campaign reports keep `base` untouched, as do unknown codes.
pub fn restore_saved_chart_type(
    shape: &QueryShape,
    saved_code: Option<&str>,
    base: &ChartTypePreferences,
) -> ChartTypePreferences {
    let mut prefs = base.clone();
    let query_type = shape.query_type();

    if query_type == QueryType::Campaign {
        return prefs;
    }

    let code = match saved_code {
        Some(code) if code != ChartType::Table.presentation_code() => code,
        _ => return prefs,
    };

    match ChartType::from_presentation_code(code) {
        Ok(chart) => {
            let slot = slot_key(shape);
            debug!(%query_type, %slot, %chart, "Restored saved chart type");
            prefs.set(query_type, slot, chart);
        }
        Err(e) => {
            warn!(%query_type, error = %e, "Ignoring saved chart setting");
        }
    }
    prefs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chart::SlotKey;

    #[test]
    fn test_codes_decode_to_same_chart() {
        for chart in ChartType::ALL {
            let code = chart.presentation_code();
            assert_eq!(ChartType::from_presentation_code(code).unwrap(), chart);
        }
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<&str> = ChartType::ALL.iter().map(|c| c.presentation_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), ChartType::ALL.len());
    }

    #[test]
    fn test_legacy_horizontal_bar_code() {
        assert_eq!(
            ChartType::from_presentation_code("ph").unwrap(),
            ChartType::HorizontalBarChart
        );
        assert!(matches!(
            ChartType::from_presentation_code("zz"),
            Err(CoreError::UnknownPresentation { .. })
        ));
    }

    #[test]
    fn test_restore_writes_shape_slot() {
        let shape = QueryShape::Event {
            breakdown: vec!["$country".to_string()],
        };
        let prefs = restore_saved_chart_type(&shape, Some("ps"), &ChartTypePreferences::default());
        assert_eq!(
            prefs.stored(QueryType::Event, SlotKey::Breakdown),
            Some(ChartType::StackedBar)
        );
        assert_eq!(
            prefs.stored(QueryType::Event, SlotKey::NoBreakdown),
            Some(ChartType::LineChart)
        );
    }

    #[test]
    fn test_restore_skips_table_and_missing() {
        let base = ChartTypePreferences::default();
        let shape = QueryShape::Kpi { breakdown: vec![] };
        assert_eq!(restore_saved_chart_type(&shape, Some("pt"), &base), base);
        assert_eq!(restore_saved_chart_type(&shape, None, &base), base);
        assert_eq!(restore_saved_chart_type(&shape, Some("??"), &base), base);
    }

    #[test]
    fn test_restore_skips_campaign() {
        let base = ChartTypePreferences::default();
        let shape = QueryShape::Campaign {
            group_by: vec!["campaign_name".to_string()],
        };
        assert_eq!(restore_saved_chart_type(&shape, Some("pl"), &base), base);
    }
}
