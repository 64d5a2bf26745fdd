//! Client certificate fingerprints.
//!
//! A fingerprint is the 20-byte hash of a client's certificate. The hash
//! itself is computed by the TLS layer; this module only carries it and
//! converts it to and from its 40-character hex form.

use crate::error::RecordError;
use std::fmt;
use std::str::FromStr;

/// Length of a certificate fingerprint in bytes.
pub const FINGERPRINT_LEN: usize = 20;

/// 20-byte certificate fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    pub const fn new(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Lowercase 40-character hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse exactly 40 hex characters (either case).
    pub fn from_hex(s: &str) -> Result<Self, RecordError> {
        let mut bytes = [0u8; FINGERPRINT_LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| RecordError::InvalidFingerprint(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
