//! voxban - ban list subsystem for a real-time voice server.
//!
//! Decides whether a connecting client is banned, by certificate
//! fingerprint or by source network, and manages the lifecycle of bans:
//! kick-bans, timed expiry, export/import and the ban file.

pub mod client;
pub mod config;
pub mod error;
pub mod security;

pub use client::{BanTarget, ClientIdentity};
pub use config::{BanConfig, Config};
pub use error::{BanError, RecordError};
pub use security::{BanEntry, BanList, BanRecord, BanResult, BanType, Fingerprint};
