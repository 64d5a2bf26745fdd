//! Unified error handling for voxban.
//!
//! Ban matching never fails: a miss is simply `false`. The only recoverable
//! errors come from decoding imported records and from the ban file.

use thiserror::Error;

// ============================================================================
// Record Errors (single transfer record)
// ============================================================================

/// Reasons a single transfer record cannot be turned into a ban entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("invalid fingerprint: {0:?}")]
    InvalidFingerprint(String),

    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("prefix length {0} is outside 96..=128")]
    InvalidPrefix(u32),
}

impl RecordError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidFingerprint(_) => "invalid_fingerprint",
            Self::InvalidTimestamp(_) => "invalid_timestamp",
            Self::InvalidPrefix(_) => "invalid_prefix",
        }
    }
}

// ============================================================================
// Ban List Errors (batch import and persistence)
// ============================================================================

/// Errors raised by batch operations on the ban list.
#[derive(Debug, Error)]
pub enum BanError {
    /// A record in an import batch was rejected. Records before `index`
    /// were imported; nothing at or after it was.
    #[error("ban record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: RecordError,
    },

    #[error("ban file I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("ban file encoding: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported ban file version {0}")]
    UnsupportedVersion(u32),
}

impl BanError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Record { source, .. } => source.error_code(),
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
            Self::UnsupportedVersion(_) => "unsupported_version",
        }
    }
}
