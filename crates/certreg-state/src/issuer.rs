//! # Issuer Registry
//!
//! Allow-list of principals that may mint, verify, update, and endorse
//! certificates. Each record carries a reputation and an active flag.
//!
//! ## Lifecycle
//!
//! ```text
//! (absent) ──add──▶ Active ──remove──▶ Inactive
//!                     ▲ │                 │
//!                     └─┘ update rep      └──remove──▶ Inactive (no-op on count)
//! ```
//!
//! Removal is a soft-disable: the record stays, with reputation reset to 0.
//! An inactive record blocks re-adding the same principal.
//!
//! The active-issuer count is derived from the records on every read, so it
//! always equals the number of records with `active == true`: removing an
//! inactive issuer again cannot undercount, and a registry resumed from
//! deserialized state cannot carry a count that disagrees with its records.
//!
//! Authorization (admin-only) is enforced by the engine before these methods
//! run; this module owns record validation and bookkeeping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use certreg_core::{Principal, RegistryError};

/// Reputation and status of one issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssuerRecord {
    /// Admin-assigned reputation.
    pub reputation: u64,
    /// Whether the issuer may currently act.
    pub active: bool,
}

/// Mapping from issuer principal to its record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerRegistry {
    records: BTreeMap<Principal, IssuerRecord>,
}

/// Convert a caller-supplied reputation, rejecting negatives.
pub(crate) fn checked_reputation(reputation: i64) -> Result<u64, RegistryError> {
    u64::try_from(reputation).map_err(|_| RegistryError::InvalidReputation)
}

impl IssuerRegistry {
    /// An empty allow-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a new issuer as active.
    ///
    /// Fails with `InvalidReputation` for a negative reputation, then with
    /// `IssuerAlreadyExists` if any record (active or not) exists.
    pub fn add(&mut self, issuer: Principal, reputation: i64) -> Result<(), RegistryError> {
        let reputation = checked_reputation(reputation)?;
        if self.records.contains_key(&issuer) {
            return Err(RegistryError::IssuerAlreadyExists);
        }
        self.records.insert(
            issuer,
            IssuerRecord {
                reputation,
                active: true,
            },
        );
        Ok(())
    }

    /// Soft-disable an issuer: `active = false`, `reputation = 0`.
    ///
    /// Returns whether the issuer was active before the call.
    pub fn remove(&mut self, issuer: &Principal) -> Result<bool, RegistryError> {
        let record = self
            .records
            .get_mut(issuer)
            .ok_or(RegistryError::IssuerNotFound)?;
        let was_active = record.active;
        *record = IssuerRecord {
            reputation: 0,
            active: false,
        };
        Ok(was_active)
    }

    /// Replace an issuer's reputation, keeping its active flag.
    pub fn update_reputation(
        &mut self,
        issuer: &Principal,
        reputation: i64,
    ) -> Result<(), RegistryError> {
        let reputation = checked_reputation(reputation)?;
        let record = self
            .records
            .get_mut(issuer)
            .ok_or(RegistryError::IssuerNotFound)?;
        record.reputation = reputation;
        Ok(())
    }

    /// The record for `issuer`, active or not.
    pub fn get(&self, issuer: &Principal) -> Option<IssuerRecord> {
        self.records.get(issuer).copied()
    }

    /// Whether `issuer` has a record and it is active.
    pub fn is_allowed(&self, issuer: &Principal) -> bool {
        self.records.get(issuer).is_some_and(|r| r.active)
    }

    /// Number of active issuers.
    pub fn active_count(&self) -> u64 {
        self.records.values().filter(|r| r.active).count() as u64
    }

    /// Iterate all records in principal order.
    pub fn iter(&self) -> impl Iterator<Item = (&Principal, &IssuerRecord)> {
        self.records.iter()
    }
}
