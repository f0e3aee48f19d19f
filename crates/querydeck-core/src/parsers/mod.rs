//! Parsers for querydeck configuration files

pub mod settings;

pub use settings::SettingsParser;
