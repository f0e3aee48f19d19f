//! Chart-type preference edits and persistence
//!
//! Stores the preference map in `<cache_dir>/querydeck-chart-types.json`.

use crate::chart_type::{is_selectable_chart_type, slot_key};
use crate::error::CoreError;
use crate::models::chart::{ChartType, ChartTypePreferences, SlotKey};
use crate::models::query::{QueryShape, QueryType};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const PREFERENCES_FILE: &str = "querydeck-chart-types.json";

/// Outcome of a user's chart-type change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartTypeChange {
    pub query_type: QueryType,
    pub slot: SlotKey,
    pub chart: ChartType,
    /// Code to write into the saved report's chart setting
    pub presentation_code: &'static str,
}

impl ChartTypePreferences {
    /// Record a chart-type choice for the current shape
    ///
    /// The choice is stored under [`slot_key`] of the shape, so that
    /// resolving the same shape later reads it back.
    pub fn record_change(&mut self, shape: &QueryShape, chart: ChartType) -> ChartTypeChange {
        let query_type = shape.query_type();
        let slot = slot_key(shape);
        self.set(query_type, slot, chart);
        tracing::debug!(%query_type, %slot, %chart, "Recorded chart type change");

        ChartTypeChange {
            query_type,
            slot,
            chart,
            presentation_code: chart.presentation_code(),
        }
    }

    /// Record a choice the shape actually offers
    ///
    /// Fails with [`CoreError::UnsupportedChartType`] and leaves the map
    /// untouched when the chart cannot be picked for this shape.
    pub fn record_selection(
        &mut self,
        shape: &QueryShape,
        event_count: usize,
        chart: ChartType,
    ) -> Result<ChartTypeChange, CoreError> {
        if !is_selectable_chart_type(shape, event_count, chart) {
            return Err(CoreError::UnsupportedChartType {
                chart,
                query_type: shape.query_type(),
                slot: slot_key(shape),
            });
        }
        Ok(self.record_change(shape, chart))
    }

    pub fn file_path(cache_dir: &Path) -> PathBuf {
        cache_dir.join(PREFERENCES_FILE)
    }

    /// Load preferences from `<cache_dir>/querydeck-chart-types.json`.
    ///
    /// Missing slots are filled from `defaults`. Returns `defaults` on any I/O
    /// or parse error.
    pub fn load(cache_dir: &Path, defaults: &ChartTypePreferences) -> Self {
        let path = Self::file_path(cache_dir);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return defaults.clone(),
        };

        match serde_json::from_str::<ChartTypePreferences>(&content) {
            Ok(mut prefs) => {
                prefs.merge_missing(defaults);
                prefs
            }
            Err(e) => {
                tracing::warn!(?path, error = %e, "Malformed chart type preferences, using defaults");
                defaults.clone()
            }
        }
    }

    /// Persist preferences to `<cache_dir>/querydeck-chart-types.json`.
    pub fn save(&self, cache_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(cache_dir)
            .context("Failed to create cache directory for preferences")?;
        let path = Self::file_path(cache_dir);
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize preferences")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write preferences to {}", path.display()))
    }

    /// Remove the persisted file; a missing file is not an error
    pub fn clear(cache_dir: &Path) -> Result<()> {
        let path = Self::file_path(cache_dir);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove preferences {}", path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_type::resolve_chart_type;
    use tempfile::TempDir;

    #[test]
    fn test_record_change_reads_back() {
        let mut prefs = ChartTypePreferences::default();
        let shape = QueryShape::Attribution {
            models: vec!["first_touch".to_string(), "linear".to_string()],
        };

        let change = prefs.record_change(&shape, ChartType::ScatterPlot);
        assert_eq!(change.slot, SlotKey::DualTouchPoint);
        assert_eq!(change.presentation_code, "sp");
        assert_eq!(resolve_chart_type(&shape, &prefs), ChartType::ScatterPlot);
    }

    #[test]
    fn test_record_selection_rejects_unoffered_chart() {
        let mut prefs = ChartTypePreferences::default();
        let kpi = QueryShape::Kpi {
            breakdown: (0..5).map(|i| format!("dim_{}", i)).collect(),
        };

        let err = prefs
            .record_selection(&kpi, 1, ChartType::HorizontalBarChart)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnsupportedChartType {
                query_type: QueryType::Kpi,
                slot: SlotKey::Breakdown,
                ..
            }
        ));
        assert_eq!(prefs, ChartTypePreferences::default());

        let change = prefs.record_selection(&kpi, 1, ChartType::PivotChart).unwrap();
        assert_eq!(change.chart, ChartType::PivotChart);
        assert_eq!(resolve_chart_type(&kpi, &prefs), ChartType::PivotChart);
    }

    #[test]
    fn test_record_selection_horizontal_bar_needs_single_event() {
        let mut prefs = ChartTypePreferences::default();
        let shape = QueryShape::Event {
            breakdown: vec!["$country".to_string()],
        };
        assert!(prefs
            .record_selection(&shape, 2, ChartType::HorizontalBarChart)
            .is_err());
        assert!(prefs
            .record_selection(&shape, 1, ChartType::HorizontalBarChart)
            .is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut prefs = ChartTypePreferences::default();
        prefs.record_change(
            &QueryShape::Event {
                breakdown: vec!["$browser".to_string(), "$os".to_string()],
            },
            ChartType::PivotChart,
        );
        prefs.save(dir.path()).unwrap();

        let loaded = ChartTypePreferences::load(dir.path(), &ChartTypePreferences::default());
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn test_load_missing_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = ChartTypePreferences::load(dir.path(), &ChartTypePreferences::default());
        assert_eq!(loaded, ChartTypePreferences::default());
    }

    #[test]
    fn test_load_malformed_returns_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(PREFERENCES_FILE), "{not json").unwrap();
        let loaded = ChartTypePreferences::load(dir.path(), &ChartTypePreferences::default());
        assert_eq!(loaded, ChartTypePreferences::default());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(PREFERENCES_FILE),
            r#"{"funnel": {"breakdown": "table"}}"#,
        )
        .unwrap();
        let loaded = ChartTypePreferences::load(dir.path(), &ChartTypePreferences::default());
        assert_eq!(
            loaded.stored(QueryType::Funnel, SlotKey::Breakdown),
            Some(ChartType::Table)
        );
        assert_eq!(
            loaded.stored(QueryType::Event, SlotKey::NoBreakdown),
            Some(ChartType::LineChart)
        );
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        ChartTypePreferences::default().save(dir.path()).unwrap();
        ChartTypePreferences::clear(dir.path()).unwrap();
        ChartTypePreferences::clear(dir.path()).unwrap();
        assert!(!ChartTypePreferences::file_path(dir.path()).exists());
    }
}
