//! Fingerprint and address matching.

use super::types::BanEntry;
use crate::security::Fingerprint;
use std::net::Ipv4Addr;

/// Network mask for an IPv4 prefix length. `prefix` must be at most 32.
#[inline]
pub(super) fn prefix_mask(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix))
    }
}

/// CIDR comparison: do the top `prefix` bits of `addr` equal those of `network`?
#[inline]
pub fn ipv4_prefix_matches(network: Ipv4Addr, prefix: u8, addr: Ipv4Addr) -> bool {
    if prefix > 32 {
        return false;
    }
    let mask = prefix_mask(prefix);
    u32::from(network) & mask == u32::from(addr) & mask
}

impl BanEntry {
    /// Byte-for-byte fingerprint comparison.
    #[inline]
    pub fn matches_fingerprint(&self, fingerprint: &Fingerprint) -> bool {
        self.fingerprint == *fingerprint
    }

    /// Whether `addr` falls inside this entry's network. Entries whose
    /// prefix is not an IPv4-mapped prefix never match.
    #[inline]
    pub fn matches_addr(&self, addr: Ipv4Addr) -> bool {
        match self.ipv4_prefix() {
            Some(prefix) => ipv4_prefix_matches(self.addr, prefix, addr),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NET: Ipv4Addr = Ipv4Addr::new(198, 51, 100, 0);

    #[test]
    fn mask_values() {
        assert_eq!(prefix_mask(0), 0);
        assert_eq!(prefix_mask(1), 0x8000_0000);
        assert_eq!(prefix_mask(24), 0xFFFF_FF00);
        assert_eq!(prefix_mask(32), 0xFFFF_FFFF);
    }

    #[test]
    fn prefix_32_is_exact() {
        let host = Ipv4Addr::new(203, 0, 113, 5);
        assert!(ipv4_prefix_matches(host, 32, host));
        assert!(!ipv4_prefix_matches(host, 32, Ipv4Addr::new(203, 0, 113, 6)));
    }

    #[test]
    fn prefix_0_matches_everything() {
        assert!(ipv4_prefix_matches(NET, 0, Ipv4Addr::new(1, 2, 3, 4)));
        assert!(ipv4_prefix_matches(NET, 0, Ipv4Addr::BROADCAST));
        assert!(ipv4_prefix_matches(NET, 0, Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn prefix_24_ignores_last_octet() {
        assert!(ipv4_prefix_matches(NET, 24, Ipv4Addr::new(198, 51, 100, 200)));
        assert!(ipv4_prefix_matches(NET, 24, Ipv4Addr::new(198, 51, 100, 0)));
        assert!(!ipv4_prefix_matches(NET, 24, Ipv4Addr::new(198, 51, 101, 1)));
    }

    #[test]
    fn odd_prefix_splits_octet() {
        // 10.0.0.0/9 covers 10.0.0.0 - 10.127.255.255
        let net = Ipv4Addr::new(10, 0, 0, 0);
        assert!(ipv4_prefix_matches(net, 9, Ipv4Addr::new(10, 127, 255, 255)));
        assert!(!ipv4_prefix_matches(net, 9, Ipv4Addr::new(10, 128, 0, 0)));
    }

    #[test]
    fn oversized_prefix_never_matches() {
        assert!(!ipv4_prefix_matches(NET, 33, NET));
    }
}
