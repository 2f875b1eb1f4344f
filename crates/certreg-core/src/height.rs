//! # Logical Time — Block Heights
//!
//! The registry measures issuance, expiry, and renewal in block heights
//! supplied by the environment. Heights are plain unsigned counters: there is
//! no timezone, no sub-unit precision, and no wall clock.

use serde::{Deserialize, Serialize};

/// A logical block height.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockHeight(u64);

impl BlockHeight {
    /// Height zero, the genesis height.
    pub const GENESIS: Self = Self(0);

    /// Create a height from its numeric value.
    pub const fn new(height: u64) -> Self {
        Self(height)
    }

    /// The numeric value.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Advance by `units`, saturating at `u64::MAX`.
    ///
    /// Renewal adds a certificate's duration to the current height. A
    /// saturated expiry still lies in the future of every reachable height.
    pub fn saturating_add(self, units: u64) -> Self {
        Self(self.0.saturating_add(units))
    }
}

impl From<u64> for BlockHeight {
    fn from(height: u64) -> Self {
        Self(height)
    }
}

impl std::fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
