// src/models/mod.rs

//! Domain models for the tracker application.

mod config;
mod snapshot;
mod source;
mod strategy;
mod vehicle;

// Re-export all public types
pub use config::{
    Config, FetchConfig, LoggingConfig, NotifyConfig, PollerConfig, TelegramConfig, TrackerConfig,
};
pub use snapshot::Snapshot;
pub use source::Source;
pub use strategy::{Header, Strategy, builtin_catalog};
pub use vehicle::{InventoryPage, Vehicle};
