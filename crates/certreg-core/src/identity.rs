//! # Identity Newtypes
//!
//! Newtype wrappers for the two identifier namespaces of the registry.
//! A `Principal` is an opaque account address (issuer, learner, admin).
//! A `CertificateId` is the monotonically assigned certificate number.
//!
//! Principals are compared byte-for-byte. The registry never interprets
//! their shape; account representation belongs to the identity layer.

use serde::{Deserialize, Serialize};

/// Opaque, comparable account identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Wrap an account address.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Access the underlying address.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the address is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Principal {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Principal {
    fn from(address: String) -> Self {
        Self(address)
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a certificate.
///
/// Assigned from the registry's counter at mint time, starting at 0.
/// Identifiers are never reused, even after the certificate is burned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CertificateId(u64);

impl CertificateId {
    /// Create an identifier from its numeric value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The numeric value.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The identifier that follows this one, or `None` on counter overflow.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl From<u64> for CertificateId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for CertificateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cert:{}", self.0)
    }
}
