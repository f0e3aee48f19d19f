//! Configuration models for querydeck settings

use crate::models::chart::ChartTypePreferences;
use crate::models::duration::ComparisonPreset;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// First day of the week for week-based date presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }
}

/// querydeck settings (from settings.json)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Chart-type defaults overriding the built-in ones, per query type and slot
    #[serde(default)]
    pub chart_types: Option<ChartTypePreferences>,

    /// First day of the week
    #[serde(default)]
    pub week_start: Option<WeekStart>,

    /// Comparison preset offered first when comparison is switched on
    #[serde(default)]
    pub default_comparison: Option<ComparisonPreset>,

    /// Clamp custom comparison periods so they never end in the future
    #[serde(default)]
    pub clamp_comparison_to_now: Option<bool>,

    /// Directory holding persisted chart-type preferences
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Additional untyped fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Settings after merging the global and project layers
///
/// Priority: project > global > built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
    pub global: Option<Settings>,
    pub project: Option<Settings>,
    pub merged: Settings,
}

impl MergedConfig {
    pub fn from_layers(global: Option<Settings>, project: Option<Settings>) -> Self {
        let mut merged = global.clone().unwrap_or_default();
        if let Some(project) = &project {
            merged.apply(project);
        }
        Self {
            global,
            project,
            merged,
        }
    }

    /// Built-in chart-type defaults with the configured overrides applied
    pub fn chart_type_defaults(&self) -> ChartTypePreferences {
        let mut prefs = self.merged.chart_types.clone().unwrap_or_else(ChartTypePreferences::empty);
        prefs.merge_missing(&ChartTypePreferences::default());
        prefs
    }

    pub fn week_start(&self) -> WeekStart {
        self.merged.week_start.unwrap_or_default()
    }

    pub fn default_comparison(&self) -> ComparisonPreset {
        self.merged
            .default_comparison
            .unwrap_or(ComparisonPreset::Previous7Days)
    }

    pub fn clamp_comparison_to_now(&self) -> bool {
        self.merged.clamp_comparison_to_now.unwrap_or(true)
    }
}

impl Settings {
    /// Overlay `other` onto `self`: scalar fields are replaced when set,
    /// chart types are merged slot by slot, extra keys are replaced per key.
    pub fn apply(&mut self, other: &Settings) {
        if let Some(theirs) = &other.chart_types {
            let mut combined = theirs.clone();
            if let Some(mine) = &self.chart_types {
                combined.merge_missing(mine);
            }
            self.chart_types = Some(combined);
        }
        if other.week_start.is_some() {
            self.week_start = other.week_start;
        }
        if other.default_comparison.is_some() {
            self.default_comparison = other.default_comparison;
        }
        if other.clamp_comparison_to_now.is_some() {
            self.clamp_comparison_to_now = other.clamp_comparison_to_now;
        }
        if other.cache_dir.is_some() {
            self.cache_dir = other.cache_dir.clone();
        }
        for (key, value) in &other.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}
