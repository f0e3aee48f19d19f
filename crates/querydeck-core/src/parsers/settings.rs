//! Settings parser with layered merge

use crate::error::{CoreError, ErrorSeverity, LoadError, LoadReport};
use crate::models::{ChartType, MergedConfig, QueryType, Settings, SlotKey};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Parser for querydeck settings files
pub struct SettingsParser;

impl Default for SettingsParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsParser {
    pub fn new() -> Self {
        Self
    }

    /// `<config_dir>/querydeck/settings.json`, if the platform has a config dir
    pub fn global_settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("querydeck").join("settings.json"))
    }

    /// `<project>/.querydeck/settings.json`
    pub fn project_settings_path(project: &Path) -> PathBuf {
        project.join(".querydeck").join("settings.json")
    }

    /// Parse a single settings.json file, rejecting any invalid `chartTypes` entry
    pub fn parse(&self, path: &Path) -> Result<Settings, CoreError> {
        let (settings, rejected) = self.parse_lenient(path)?;
        match rejected.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(settings),
        }
    }

    /// Parse a settings.json file, dropping invalid `chartTypes` entries
    ///
    /// Returns the settings built from everything usable plus one error per
    /// dropped entry.
    pub fn parse_lenient(&self, path: &Path) -> Result<(Settings, Vec<CoreError>), CoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CoreError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                CoreError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let json_error = |e: serde_json::Error| CoreError::JsonParse {
            path: path.to_path_buf(),
            message: e.to_string(),
            source: e,
        };

        let mut value: Value = serde_json::from_str(&content).map_err(json_error)?;
        let mut rejected = Vec::new();
        if let Some(chart_types) = value.get_mut("chartTypes") {
            let (kept, errors) = sanitize_chart_types(chart_types.take());
            *chart_types = kept;
            rejected = errors;
        }

        let settings = serde_json::from_value(value).map_err(json_error)?;
        Ok((settings, rejected))
    }

    /// Parse settings file with graceful degradation
    pub fn parse_graceful(
        &self,
        path: &Path,
        source_name: &str,
        report: &mut LoadReport,
    ) -> Option<Settings> {
        match self.parse_lenient(path) {
            Ok((settings, rejected)) => {
                debug!(?path, "Loaded settings");
                report_rejected(path, source_name, rejected, report);
                Some(settings)
            }
            Err(CoreError::FileNotFound { .. }) => {
                // Both layers are optional
                debug!(?path, "Settings file not found (optional)");
                None
            }
            Err(e) => {
                warn!(?path, error = %e, "Failed to parse settings");
                report.add_error(LoadError::from_core_error(source_name, &e));
                None
            }
        }
    }

    /// Parse a settings file the user named explicitly; failing to load it is fatal
    pub fn parse_required(
        &self,
        path: &Path,
        source_name: &str,
        report: &mut LoadReport,
    ) -> Option<Settings> {
        match self.parse_lenient(path) {
            Ok((settings, rejected)) => {
                debug!(?path, "Loaded settings");
                report_rejected(path, source_name, rejected, report);
                Some(settings)
            }
            Err(e) => {
                warn!(?path, error = %e, "Failed to load required settings");
                report.add_error(
                    LoadError::from_core_error(source_name, &e).with_severity(ErrorSeverity::Fatal),
                );
                None
            }
        }
    }

    /// Load and merge the global and project settings files
    ///
    /// Priority: project > global
    pub fn load_merged(
        &self,
        global_path: Option<&Path>,
        project_path: Option<&Path>,
        report: &mut LoadReport,
    ) -> MergedConfig {
        let global = global_path.and_then(|path| {
            self.parse_graceful(path, "settings.global", report)
        });
        let project = project_path.and_then(|path| {
            self.parse_graceful(path, "settings.project", report)
        });

        report.global_settings_loaded = global.is_some();
        report.project_settings_loaded = project.is_some();

        MergedConfig::from_layers(global, project)
    }

    /// Like [`load_merged`](Self::load_merged), with an explicit file taking
    /// the project layer's place
    pub fn load_with_override(
        &self,
        global_path: Option<&Path>,
        override_path: &Path,
        report: &mut LoadReport,
    ) -> MergedConfig {
        let global = global_path.and_then(|path| {
            self.parse_graceful(path, "settings.global", report)
        });
        let project = self.parse_required(override_path, "settings.override", report);

        report.global_settings_loaded = global.is_some();
        report.project_settings_loaded = project.is_some();

        MergedConfig::from_layers(global, project)
    }
}

fn report_rejected(
    path: &Path,
    source_name: &str,
    rejected: Vec<CoreError>,
    report: &mut LoadReport,
) {
    for error in rejected {
        warn!(?path, error = %error, "Skipped chart type entry");
        report.add_error(
            LoadError::from_core_error(source_name, &error).with_severity(ErrorSeverity::Warning),
        );
    }
}

/// Keep the `chartTypes` entries that name a known query type, slot and chart
fn sanitize_chart_types(value: Value) -> (Value, Vec<CoreError>) {
    let by_query_type = match value {
        Value::Null => return (Value::Null, Vec::new()),
        Value::Object(map) => map,
        _ => {
            let error = CoreError::InvalidConfig {
                message: "chartTypes must be an object keyed by query type".to_string(),
            };
            return (Value::Null, vec![error]);
        }
    };

    let mut kept = Map::new();
    let mut errors = Vec::new();
    for (query_key, slots) in by_query_type {
        if let Err(e) = query_key.parse::<QueryType>() {
            errors.push(e);
            continue;
        }
        let Value::Object(slots) = slots else {
            errors.push(CoreError::InvalidConfig {
                message: format!("chartTypes.{}: expected an object keyed by slot", query_key),
            });
            continue;
        };

        let mut kept_slots = Map::new();
        for (slot_name, chart) in slots {
            if SlotKey::from_key(&slot_name).is_none() {
                errors.push(CoreError::InvalidConfig {
                    message: format!("chartTypes.{}: unknown slot '{}'", query_key, slot_name),
                });
                continue;
            }
            match chart.as_str().map(str::parse::<ChartType>) {
                Some(Ok(_)) => {
                    kept_slots.insert(slot_name, chart);
                }
                Some(Err(e)) => errors.push(e),
                None => errors.push(CoreError::InvalidConfig {
                    message: format!(
                        "chartTypes.{}.{}: expected a chart type name",
                        query_key, slot_name
                    ),
                }),
            }
        }
        kept.insert(query_key, Value::Object(kept_slots));
    }

    (Value::Object(kept), errors)
}
