//! Transfer encoding for ban lists.
//!
//! A [`BanRecord`] is the unit sent in the administrative ban-list message
//! and written to the ban file. Addresses travel as IPv4-mapped IPv6
//! (`::ffff:a.b.c.d`), fingerprints as hex and creation times as
//! second-precision UTC timestamps.

use super::types::{BanEntry, IPV4_MAPPED_OFFSET, SINGLE_ADDRESS_PREFIX};
use crate::error::RecordError;
use crate::security::Fingerprint;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::time::Instant;

/// Timestamp layout used on the wire.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One ban in transfer form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanRecord {
    /// IPv6 address bytes; IPv4 bans use the mapped form.
    pub address: [u8; 16],
    pub prefix_length: u32,
    pub username: String,
    /// 40 lowercase hex characters.
    pub fingerprint: String,
    pub reason: String,
    /// `YYYY-MM-DDTHH:MM:SS`, UTC.
    pub created_at: String,
    /// Seconds; 0 = permanent.
    pub duration: u32,
}

pub(super) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub(super) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RecordError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| RecordError::InvalidTimestamp(s.to_string()))
}

impl From<&BanEntry> for BanRecord {
    fn from(entry: &BanEntry) -> Self {
        Self {
            address: entry.addr.to_ipv6_mapped().octets(),
            prefix_length: u32::from(entry.prefix_len),
            username: entry.username.clone(),
            fingerprint: entry.fingerprint.to_hex(),
            reason: entry.reason.clone(),
            created_at: format_timestamp(&entry.created_at),
            duration: entry.duration,
        }
    }
}

impl BanRecord {
    /// Decode into an entry whose duration is measured from `started`.
    ///
    /// Only bytes 12..16 of the address are read.
    pub(super) fn decode(&self, started: Instant) -> Result<BanEntry, RecordError> {
        let fingerprint = Fingerprint::from_hex(&self.fingerprint)?;
        let created_at = parse_timestamp(&self.created_at)?;
        let prefix_len = u8::try_from(self.prefix_length)
            .ok()
            .filter(|p| (IPV4_MAPPED_OFFSET..=SINGLE_ADDRESS_PREFIX).contains(p))
            .ok_or(RecordError::InvalidPrefix(self.prefix_length))?;
        let [.., a, b, c, d] = self.address;

        Ok(BanEntry {
            fingerprint,
            addr: Ipv4Addr::new(a, b, c, d),
            prefix_len,
            reason: self.reason.clone(),
            username: self.username.clone(),
            created_at,
            duration: self.duration,
            started,
        })
    }
}
