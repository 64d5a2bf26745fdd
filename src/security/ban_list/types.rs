//! Type definitions for the ban list.

use crate::security::Fingerprint;
use chrono::{DateTime, Utc};
use ipnet::Ipv4Net;
use std::fmt;
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

/// Prefix length of a single-address ban (an IPv4 /32 embedded in IPv6).
pub const SINGLE_ADDRESS_PREFIX: u8 = 128;

/// Offset of an IPv4 prefix inside an IPv4-mapped IPv6 prefix length.
pub const IPV4_MAPPED_OFFSET: u8 = 96;

/// A single ban.
///
/// Entries are never edited in place: they are appended to the list and
/// later dropped by a prune pass or by clearing the list.
#[derive(Debug, Clone)]
pub struct BanEntry {
    pub(super) fingerprint: Fingerprint,
    pub(super) addr: Ipv4Addr,
    pub(super) prefix_len: u8,
    pub(super) reason: String,
    pub(super) username: String,
    pub(super) created_at: DateTime<Utc>,
    /// Seconds after `started` at which the ban lapses. 0 = permanent.
    pub(super) duration: u32,
    pub(super) started: Instant,
}

impl BanEntry {
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    /// Prefix length in IPv6 terms (96..=128 for IPv4 bans).
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Name the client had when banned. Informational only.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Monotonic instant the duration is measured from.
    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn is_permanent(&self) -> bool {
        self.duration == 0
    }

    /// IPv4 prefix length, or `None` when the stored prefix does not
    /// describe an IPv4-mapped network.
    pub fn ipv4_prefix(&self) -> Option<u8> {
        self.prefix_len
            .checked_sub(IPV4_MAPPED_OFFSET)
            .filter(|p| *p <= 32)
    }

    /// The banned network in CIDR form, if it is an IPv4 ban.
    pub fn network(&self) -> Option<Ipv4Net> {
        self.ipv4_prefix()
            .and_then(|p| Ipv4Net::new(self.addr, p).ok())
    }

    /// Whether the ban has run its full duration as of `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        if self.is_permanent() {
            return false;
        }
        now.saturating_duration_since(self.started) >= Duration::from_secs(u64::from(self.duration))
    }

    /// Time left before the ban lapses. `None` for permanent bans.
    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        if self.is_permanent() {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.started);
        Some(Duration::from_secs(u64::from(self.duration)).saturating_sub(elapsed))
    }
}

impl fmt::Display for BanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.network() {
            Some(net) => write!(f, "{} {} {}", self.username, self.fingerprint, net)?,
            None => write!(f, "{} {} {}/{}", self.username, self.fingerprint, self.addr, self.prefix_len)?,
        }
        write!(f, " '{}'", self.reason)
    }
}

/// Result of a ban check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanResult {
    /// Which rule matched.
    pub ban_type: BanType,
    /// The reason for the ban.
    pub reason: String,
}

/// Type of ban that matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanType {
    /// Certificate fingerprint matched exactly.
    Fingerprint,
    /// Source address fell inside a banned network.
    Address,
}

impl BanType {
    /// Get the display name for this ban type.
    pub fn name(&self) -> &'static str {
        match self {
            BanType::Fingerprint => "certificate banned",
            BanType::Address => "address banned",
        }
    }
}

impl fmt::Display for BanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(prefix_len: u8, duration: u32) -> BanEntry {
        BanEntry {
            fingerprint: Fingerprint::new([7; 20]),
            addr: Ipv4Addr::new(198, 51, 100, 0),
            prefix_len,
            reason: "flooding".to_string(),
            username: "mallory".to_string(),
            created_at: Utc::now(),
            duration,
            started: Instant::now(),
        }
    }

    #[test]
    fn permanent_ban_never_expires() {
        let ban = entry(128, 0);
        let later = ban.started() + Duration::from_secs(365 * 24 * 3600);
        assert!(!ban.is_expired_at(later));
        assert_eq!(ban.remaining_at(later), None);
    }

    #[test]
    fn timed_ban_expires_at_duration() {
        let ban = entry(128, 60);
        let start = ban.started();
        assert!(!ban.is_expired_at(start));
        assert!(!ban.is_expired_at(start + Duration::from_secs(59)));
        assert!(ban.is_expired_at(start + Duration::from_secs(60)));
        assert_eq!(
            ban.remaining_at(start + Duration::from_secs(45)),
            Some(Duration::from_secs(15))
        );
        assert_eq!(
            ban.remaining_at(start + Duration::from_secs(90)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn ipv4_prefix_derivation() {
        assert_eq!(entry(128, 0).ipv4_prefix(), Some(32));
        assert_eq!(entry(120, 0).ipv4_prefix(), Some(24));
        assert_eq!(entry(96, 0).ipv4_prefix(), Some(0));
        assert_eq!(entry(64, 0).ipv4_prefix(), None);
        assert_eq!(entry(129, 0).ipv4_prefix(), None);
    }

    #[test]
    fn display_uses_cidr_form() {
        let ban = entry(120, 0);
        assert_eq!(
            ban.to_string(),
            format!("mallory {} 198.51.100.0/24 'flooding'", ban.fingerprint())
        );
        assert_eq!(ban.network().map(|n| n.to_string()).as_deref(), Some("198.51.100.0/24"));
    }
}
