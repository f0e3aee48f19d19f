//! Error types for querydeck-core
//!
//! Decision functions fail only on unparseable input or on dates outside
//! chrono's range. Settings loading reports problems through [`LoadReport`]
//! so callers can keep going with defaults.

use crate::models::chart::{ChartType, SlotKey};
use crate::models::query::QueryType;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for querydeck operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Input Errors
    // ===================
    #[error("Unrecognized comparison preset: '{key}'")]
    UnrecognizedPreset { key: String },

    #[error("Unrecognized date range preset: '{key}'")]
    UnrecognizedDatePreset { key: String },

    #[error("Unknown query type: '{value}'")]
    UnknownQueryType { value: String },

    #[error("Unknown chart type: '{value}'")]
    UnknownChartType { value: String },

    #[error("Chart type {chart} is not offered for {query_type} reports ({slot})")]
    UnsupportedChartType {
        chart: ChartType,
        query_type: QueryType,
        slot: SlotKey,
    },

    #[error("Unknown presentation code: '{code}'")]
    UnknownPresentation { code: String },

    #[error("Unknown frequency: '{value}'")]
    UnknownFrequency { value: String },

    #[error("Invalid duration: from ({from}) is after to ({to})")]
    InvalidDuration { from: String, to: String },

    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    // ===================
    // IO Errors
    // ===================
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    // ===================
    // Parse Errors
    // ===================
    #[error("Failed to parse JSON in {path}: {message}")]
    JsonParse {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    // ===================
    // Config Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Severity level for errors during load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Part of a file was skipped, the rest applies
    Warning,
    /// A whole file was skipped, defaults apply
    Error,
    /// Cannot continue
    Fatal,
}

impl ErrorSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorSeverity::Warning => "warning",
            ErrorSeverity::Error => "error",
            ErrorSeverity::Fatal => "fatal",
        }
    }
}

/// Individual error entry in load report
#[derive(Debug, Clone)]
pub struct LoadError {
    pub source: String,
    pub message: String,
    pub severity: ErrorSeverity,
    /// Actionable suggestion for user (optional)
    pub suggestion: Option<String>,
}

impl LoadError {
    /// Create user-friendly error from CoreError with context-aware suggestions
    pub fn from_core_error(source: impl Into<String>, error: &CoreError) -> Self {
        let source = source.into();
        let (message, suggestion) = match error {
            CoreError::FileRead { path, .. } => (
                format!("Cannot read file: {}", path.display()),
                Some(format!("Check permissions: chmod +r {}", path.display())),
            ),
            CoreError::FileNotFound { path } => (
                format!("Settings file not found: {}", path.display()),
                Some("Create the file or drop --config / QUERYDECK_CONFIG".to_string()),
            ),
            CoreError::JsonParse { path, message, .. } => (
                format!("Invalid JSON in {}: {}", path.display(), message),
                Some("Validate JSON syntax with: jq . <file>".to_string()),
            ),
            CoreError::UnknownChartType { value } => (
                format!("Unknown chart type '{}' in chartTypes", value),
                Some(format!(
                    "Use one of: {}",
                    one_of(ChartType::ALL.iter().map(|c| c.as_str()))
                )),
            ),
            CoreError::UnknownQueryType { value } => (
                format!("Unknown query type '{}' in chartTypes", value),
                Some(format!(
                    "Use one of: {}",
                    one_of(QueryType::ALL.iter().map(|q| q.as_str()))
                )),
            ),
            CoreError::InvalidConfig { message } => {
                (format!("Invalid configuration: {}", message), None)
            }
            _ => (error.to_string(), None),
        };

        Self {
            source,
            message,
            severity: ErrorSeverity::Error,
            suggestion,
        }
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }
}

fn one_of<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

/// Report of errors encountered while loading settings
///
/// Tracks partial failures instead of aborting on the first one.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub errors: Vec<LoadError>,
    pub global_settings_loaded: bool,
    pub project_settings_loaded: bool,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: LoadError) {
        self.errors.push(error);
    }

    /// Returns true if there are any fatal errors
    pub fn has_fatal_errors(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.severity == ErrorSeverity::Fatal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_detection() {
        let mut report = LoadReport::new();
        let missing = CoreError::FileNotFound {
            path: PathBuf::from("/nowhere/settings.json"),
        };
        report.add_error(LoadError::from_core_error("settings.global", &missing));
        assert!(!report.has_fatal_errors());

        report.add_error(
            LoadError::from_core_error("settings.override", &missing)
                .with_severity(ErrorSeverity::Fatal),
        );
        assert!(report.has_fatal_errors());
        assert_eq!(report.errors[1].severity.label(), "fatal");
    }

    #[test]
    fn test_unrecognized_preset_message() {
        let err = CoreError::UnrecognizedPreset {
            key: "previous_2_days".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unrecognized comparison preset: 'previous_2_days'"
        );
    }

    #[test]
    fn test_unsupported_chart_type_message() {
        let err = CoreError::UnsupportedChartType {
            chart: ChartType::HorizontalBarChart,
            query_type: QueryType::Kpi,
            slot: SlotKey::Breakdown,
        };
        assert_eq!(
            err.to_string(),
            "Chart type horizontal_bar_chart is not offered for kpi reports (breakdown)"
        );
    }

    #[test]
    fn test_from_core_error_suggestion() {
        let err = CoreError::UnknownChartType {
            value: "donut".to_string(),
        };
        let load = LoadError::from_core_error("settings", &err);
        assert_eq!(load.severity, ErrorSeverity::Error);
        assert!(load.message.contains("donut"));
        let suggestion = load.suggestion.unwrap();
        assert!(suggestion.contains("stacked_area"));
        assert!(suggestion.contains("metric_chart"));
    }
}
