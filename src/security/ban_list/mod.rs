//! In-memory ban list for connection-time ban checks.
//!
//! # Architecture
//!
//! - Loaded from the ban file on startup, saved on shutdown
//! - Kick-bans append entries with the configured default duration
//! - Checked when a client connects, by fingerprint and by address
//! - Timed bans are removed by [`BanList::prune_expired`], which the host
//!   calls on a timer. Nothing else removes entries except
//!   [`BanList::clear_all`].
//!
//! The list is owned by the server's control thread and does no locking.

mod codec;
mod matching;
mod persistence;
mod types;

pub use codec::{BanRecord, TIMESTAMP_FORMAT};
pub use matching::ipv4_prefix_matches;
pub use persistence::{load_records, quarantine_path, save_records};
pub use types::{BanEntry, BanResult, BanType, IPV4_MAPPED_OFFSET, SINGLE_ADDRESS_PREFIX};

use crate::client::BanTarget;
use crate::config::BanConfig;
use crate::error::{BanError, RecordError};
use crate::security::Fingerprint;
use chrono::Utc;
use std::net::Ipv4Addr;
use std::time::Instant;
use tracing::{debug, info};

/// Ordered collection of active bans.
///
/// Entries keep insertion order. Duplicate fingerprints and overlapping
/// networks are allowed. Entries leave the list only through
/// [`prune_expired`](Self::prune_expired), which drops every expired entry
/// in one pass, or [`clear_all`](Self::clear_all); there is no
/// single-entry removal.
#[derive(Debug, Default)]
pub struct BanList {
    entries: Vec<BanEntry>,
    /// Duration in seconds given to kick-bans. 0 = permanent.
    default_duration: u32,
}

impl BanList {
    /// Create an empty ban list.
    pub fn new(default_duration: u32) -> Self {
        Self {
            entries: Vec::new(),
            default_duration,
        }
    }

    /// Create an empty ban list using the configured default duration.
    pub fn from_config(config: &BanConfig) -> Self {
        Self::new(config.duration)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn default_duration(&self) -> u32 {
        self.default_duration
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BanEntry> {
        self.entries.iter()
    }

    /// Kick-ban a connected client.
    ///
    /// Bans the client's exact address and certificate for the default
    /// duration, and writes an audit line.
    pub fn ban<C: BanTarget + ?Sized>(&mut self, client: &C, reason: &str) -> &BanEntry {
        let entry = BanEntry {
            fingerprint: *client.fingerprint(),
            addr: client.source_addr(),
            prefix_len: SINGLE_ADDRESS_PREFIX,
            reason: reason.to_string(),
            username: client.username().to_string(),
            created_at: Utc::now(),
            duration: self.default_duration,
            started: Instant::now(),
        };

        info!(
            user = %entry.username,
            reason = %entry.reason,
            hash = %entry.fingerprint,
            ip = %entry.addr,
            duration = entry.duration,
            "User kickbanned"
        );

        self.entries.push(entry);
        let last = self.entries.len() - 1;
        &self.entries[last]
    }

    /// Remove every timed ban whose duration has elapsed.
    ///
    /// Returns the number of bans removed.
    pub fn prune_expired(&mut self) -> usize {
        self.prune_expired_at(Instant::now())
    }

    /// Remove every timed ban whose duration has elapsed as of `now`.
    pub fn prune_expired_at(&mut self, now: Instant) -> usize {
        let before = self.entries.len();

        self.entries.retain(|ban| {
            let Some(left) = ban.remaining_at(now) else {
                return true;
            };
            debug!(
                user = %ban.username,
                reason = %ban.reason,
                hash = %ban.fingerprint,
                ip = %ban.addr,
                time_left = left.as_secs(),
                "Ban list entry"
            );
            if ban.is_expired_at(now) {
                debug!(user = %ban.username, hash = %ban.fingerprint, "Ban expired");
                return false;
            }
            true
        });

        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(count = removed, remaining = self.entries.len(), "Pruned expired bans");
        }
        removed
    }

    /// Is any entry's fingerprint byte-identical to `fingerprint`?
    pub fn is_banned_by_fingerprint(&self, fingerprint: &Fingerprint) -> bool {
        self.entries.iter().any(|ban| ban.matches_fingerprint(fingerprint))
    }

    /// Does `addr` fall inside any banned IPv4 network?
    pub fn is_banned_by_address(&self, addr: Ipv4Addr) -> bool {
        self.entries.iter().any(|ban| ban.matches_addr(addr))
    }

    /// Check a client by fingerprint, then by address.
    pub fn check<C: BanTarget + ?Sized>(&self, client: &C) -> Option<BanResult> {
        let fingerprint = client.fingerprint();
        if let Some(ban) = self.entries.iter().find(|b| b.matches_fingerprint(fingerprint)) {
            return Some(BanResult {
                ban_type: BanType::Fingerprint,
                reason: ban.reason.clone(),
            });
        }

        let addr = client.source_addr();
        self.entries
            .iter()
            .find(|b| b.matches_addr(addr))
            .map(|ban| BanResult {
                ban_type: BanType::Address,
                reason: ban.reason.clone(),
            })
    }

    /// Remove every entry. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        if removed > 0 {
            info!(count = removed, "Ban list cleared");
        }
        removed
    }

    /// Encode every entry for transfer, in list order.
    pub fn export_all(&self) -> Vec<BanRecord> {
        self.entries.iter().map(BanRecord::from).collect()
    }

    /// Append one transferred ban. The ban's duration restarts now.
    ///
    /// On error the list is left untouched.
    pub fn import_record(&mut self, record: &BanRecord) -> Result<(), RecordError> {
        let entry = record.decode(Instant::now())?;
        self.entries.push(entry);
        Ok(())
    }

    /// Append a batch of transferred bans.
    ///
    /// Existing entries are kept; call [`clear_all`](Self::clear_all) first
    /// to replace the list. Stops at the first bad record, leaving the
    /// records before it imported.
    pub fn import_all<'a, I>(&mut self, records: I) -> Result<usize, BanError>
    where
        I: IntoIterator<Item = &'a BanRecord>,
    {
        let mut imported = 0;
        for (index, record) in records.into_iter().enumerate() {
            self.import_record(record)
                .map_err(|source| BanError::Record { index, source })?;
            imported += 1;
        }
        debug!(count = imported, total = self.entries.len(), "Imported bans");
        Ok(imported)
    }
}
