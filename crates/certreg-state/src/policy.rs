//! # Ownership Transfer Policy
//!
//! Certificates are bound to the learner they were minted for. Every
//! transfer request is evaluated against a [`TransferPolicy`], and the only
//! policy that exists rejects unconditionally, before looking at the
//! certificate, the caller, or the recipient.

use serde::{Deserialize, Serialize};

use certreg_core::{CertificateId, Principal, RegistryError};

/// Decision rule for ownership transfers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferPolicy {
    /// Certificates never change owner.
    #[default]
    Disabled,
}

impl TransferPolicy {
    /// The rejection this policy returns for a transfer of `id` from
    /// `caller` to `recipient`.
    pub fn rejection(
        &self,
        _id: CertificateId,
        _caller: &Principal,
        _recipient: &Principal,
    ) -> RegistryError {
        match self {
            Self::Disabled => RegistryError::TransferNotAllowed,
        }
    }
}
