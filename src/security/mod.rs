//! Security module for voxban.
//!
//! - **Fingerprint**: 20-byte certificate hash carried through bans
//! - **Ban List**: ordered ban registry with fingerprint and CIDR matching,
//!   timed expiry, transfer encoding and file persistence

pub mod ban_list;
pub mod fingerprint;

// Re-export primary types for convenience
pub use ban_list::{BanEntry, BanList, BanRecord, BanResult, BanType};
pub use fingerprint::Fingerprint;
