//! The slice of a client session the ban list reads.

use crate::security::Fingerprint;
use std::net::Ipv4Addr;

/// Read-only view of a connected client, as seen by the ban list.
///
/// Implemented by the server's session type. The ban list never mutates
/// or retains the client.
pub trait BanTarget {
    /// Certificate fingerprint presented by the client.
    fn fingerprint(&self) -> &Fingerprint;
    /// Remote IPv4 address of the client's TCP connection.
    fn source_addr(&self) -> Ipv4Addr;
    /// Current display name.
    fn username(&self) -> &str;
}

/// Owned client identity for admin tooling and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub fingerprint: Fingerprint,
    pub addr: Ipv4Addr,
    pub username: String,
}

impl ClientIdentity {
    pub fn new(fingerprint: Fingerprint, addr: Ipv4Addr, username: impl Into<String>) -> Self {
        Self {
            fingerprint,
            addr,
            username: username.into(),
        }
    }
}

impl BanTarget for ClientIdentity {
    fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    fn source_addr(&self) -> Ipv4Addr {
        self.addr
    }

    fn username(&self) -> &str {
        &self.username
    }
}
