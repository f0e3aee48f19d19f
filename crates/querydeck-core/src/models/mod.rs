//! Data models for querydeck

pub mod chart;
pub mod config;
pub mod duration;
pub mod query;

pub use chart::{ChartType, ChartTypePreferences, SlotKey, FALLBACK_CHART_TYPE};
pub use config::{MergedConfig, Settings, WeekStart};
pub use duration::{
    ComparisonOption, ComparisonPreset, ComparisonSelection, CustomRangeType, DurationSelection,
    Frequency,
};
pub use query::{QueryShape, QueryShapeDescriptor, QueryType};
