//! Configuration loading and management.
//!
//! - [`types`]: Core config struct definitions (Config, BridgeConfig, DatabaseConfig)
//! - [`validation`]: Startup validation of a loaded config

mod types;
mod validation;

pub use types::{BridgeConfig, Config, ConfigError, DatabaseConfig, SettingValue};
pub use validation::{ValidationError, validate};
