//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Top-level config struct and file loading
//! - [`bans`]: Ban list configuration (BanConfig)

mod bans;
mod types;

pub use bans::BanConfig;
pub use types::{Config, ConfigError};
