//! querydeck-core - Core library for querydeck
//!
//! Decides how an analytics report is presented: which chart type a query
//! shape renders with, where chart-type preferences are stored, and which
//! period a comparison covers.

pub mod chart_type;
pub mod comparison;
pub mod date_range;
pub mod error;
pub mod models;
pub mod parsers;
pub mod preferences;
pub mod presentation;
pub mod report;

pub use chart_type::{chart_type_options, is_selectable_chart_type, resolve_chart_type, slot_key};
pub use comparison::{compute_comparison_range, compute_comparison_range_at, ComparisonRequest};
pub use date_range::{custom_range, DateRangePreset};
pub use error::{CoreError, LoadReport};
pub use preferences::ChartTypeChange;
pub use presentation::restore_saved_chart_type;
pub use report::{is_comparison_supported, ReportView};
