//! # Certificates, Certificate Store, and Index Layer
//!
//! A [`Certificate`] is the metadata of one issued credential. The
//! [`CertificateStore`] owns three structures that change together:
//!
//! - metadata: `CertificateId → Certificate`
//! - ownership: `CertificateId → Principal`
//! - indices: `learner → [CertificateId]` and `issuer → [CertificateId]`
//!
//! ## Invariant
//!
//! A certificate has metadata iff it has exactly one owner. `insert` and
//! `remove` are the only methods that touch either map, and each writes both.
//!
//! Under [`IndexPolicy::Advisory`] a burned identifier stays in both index
//! lists; readers re-check existence through [`CertificateStore::get`].
//! Under [`IndexPolicy::PruneOnBurn`] it is removed from both lists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use certreg_core::{BlockHeight, CertificateId, IndexPolicy, Principal, RegistryError};

/// Maximum number of skills on a certificate.
pub const MAX_SKILLS: usize = 10;
/// Maximum level length, in characters.
pub const MAX_LEVEL_LEN: usize = 20;
/// Maximum score.
pub const MAX_SCORE: i64 = 100;
/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;
/// Maximum certificate type length, in characters.
pub const MAX_CERT_TYPE_LEN: usize = 50;
/// Maximum number of prerequisite certificates.
pub const MAX_PREREQS: usize = 5;
/// Maximum number of endorsements.
pub const MAX_ENDORSEMENTS: usize = 5;

/// Metadata of an issued certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Issuer that minted the certificate.
    pub issuer: Principal,
    /// Recipient and permanent owner.
    pub learner: Principal,
    /// Certified skills, 1 to 10 entries.
    pub skills: Vec<String>,
    /// Height at mint time.
    pub issuance_date: BlockHeight,
    /// Height after which the certificate lapses, if any.
    pub expiry_date: Option<BlockHeight>,
    /// Proficiency level.
    pub level: String,
    /// Assessment score, 0 to 100.
    pub score: u8,
    /// Set by the issuer; never reset.
    pub verification_status: bool,
    /// Issuer-assigned reputation of this certificate.
    pub reputation: u64,
    /// Free-form description.
    pub description: String,
    /// Certificate category.
    pub cert_type: String,
    /// Height units added to the current height on renewal.
    pub duration: u64,
    /// Prerequisite certificates. Existence is not checked.
    pub prereqs: Vec<CertificateId>,
    /// Endorsing issuers, in endorsement order.
    pub endorsements: Vec<Principal>,
    /// Fee the owner pays the issuer on renewal.
    pub renewal_fee: u64,
}

impl Certificate {
    /// Whether another endorsement fits.
    pub fn can_accept_endorsement(&self) -> bool {
        self.endorsements.len() < MAX_ENDORSEMENTS
    }

    /// Whether the certificate has lapsed at `height`.
    ///
    /// A certificate without an expiry never lapses.
    pub fn is_expired_at(&self, height: BlockHeight) -> bool {
        self.expiry_date.is_some_and(|expiry| height >= expiry)
    }
}

/// Caller-supplied fields of a mint.
///
/// Numeric fields are signed so that out-of-range input is rejected with the
/// matching error kind instead of being unrepresentable at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    /// Recipient of the certificate.
    pub learner: Principal,
    /// Certified skills.
    pub skills: Vec<String>,
    /// Optional expiry height.
    pub expiry: Option<BlockHeight>,
    /// Proficiency level.
    pub level: String,
    /// Assessment score.
    pub score: i64,
    /// Free-form description.
    pub description: String,
    /// Certificate category.
    pub cert_type: String,
    /// Renewal duration in height units.
    pub duration: i64,
    /// Prerequisite certificates.
    pub prereqs: Vec<CertificateId>,
    /// Initial endorsements.
    pub endorsements: Vec<Principal>,
    /// Renewal fee.
    pub renewal_fee: i64,
}

fn char_len_within(s: &str, min: usize, max: usize) -> bool {
    let len = s.chars().count();
    (min..=max).contains(&len)
}

impl MintRequest {
    /// Validate the request and build the certificate `issuer` would mint
    /// at `height`.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// learner, skills, expiry, level, score, description, certificate type,
    /// duration, prerequisites, endorsements, renewal fee.
    pub fn into_certificate(
        self,
        issuer: &Principal,
        height: BlockHeight,
    ) -> Result<Certificate, RegistryError> {
        if &self.learner == issuer {
            return Err(RegistryError::InvalidLearner);
        }
        if self.skills.is_empty() || self.skills.len() > MAX_SKILLS {
            return Err(RegistryError::InvalidSkills);
        }
        if self.expiry.is_some_and(|expiry| expiry <= height) {
            return Err(RegistryError::InvalidExpiry);
        }
        if !char_len_within(&self.level, 1, MAX_LEVEL_LEN) {
            return Err(RegistryError::InvalidLevel);
        }
        let score = u8::try_from(self.score)
            .ok()
            .filter(|s| i64::from(*s) <= MAX_SCORE)
            .ok_or(RegistryError::InvalidScore)?;
        if !char_len_within(&self.description, 0, MAX_DESCRIPTION_LEN) {
            return Err(RegistryError::InvalidDescription);
        }
        if !char_len_within(&self.cert_type, 1, MAX_CERT_TYPE_LEN) {
            return Err(RegistryError::InvalidCertType);
        }
        let duration = u64::try_from(self.duration)
            .ok()
            .filter(|d| *d > 0)
            .ok_or(RegistryError::InvalidDuration)?;
        if self.prereqs.len() > MAX_PREREQS {
            return Err(RegistryError::InvalidPrereqs);
        }
        if self.endorsements.len() > MAX_ENDORSEMENTS {
            return Err(RegistryError::InvalidEndorsements);
        }
        let renewal_fee =
            u64::try_from(self.renewal_fee).map_err(|_| RegistryError::InvalidRenewalFee)?;

        Ok(Certificate {
            issuer: issuer.clone(),
            learner: self.learner,
            skills: self.skills,
            issuance_date: height,
            expiry_date: self.expiry,
            level: self.level,
            score,
            verification_status: false,
            reputation: 0,
            description: self.description,
            cert_type: self.cert_type,
            duration,
            prereqs: self.prereqs,
            endorsements: self.endorsements,
            renewal_fee,
        })
    }
}

/// Certificate metadata, ownership, and the derived indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateStore {
    metadata: BTreeMap<CertificateId, Certificate>,
    owners: BTreeMap<CertificateId, Principal>,
    by_learner: BTreeMap<Principal, Vec<CertificateId>>,
    by_issuer: BTreeMap<Principal, Vec<CertificateId>>,
}

impl CertificateStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `NftAlreadyExists` if `id` is occupied.
    pub fn ensure_vacant(&self, id: CertificateId) -> Result<(), RegistryError> {
        if self.metadata.contains_key(&id) || self.owners.contains_key(&id) {
            return Err(RegistryError::NftAlreadyExists);
        }
        Ok(())
    }

    /// Store a freshly minted certificate owned by its learner and append
    /// `id` to the learner's and issuer's index lists.
    ///
    /// The caller must have checked [`ensure_vacant`](Self::ensure_vacant).
    pub fn insert(&mut self, id: CertificateId, certificate: Certificate) {
        self.by_learner
            .entry(certificate.learner.clone())
            .or_default()
            .push(id);
        self.by_issuer
            .entry(certificate.issuer.clone())
            .or_default()
            .push(id);
        self.owners.insert(id, certificate.learner.clone());
        self.metadata.insert(id, certificate);
    }

    /// Delete a certificate and its owner entry.
    pub fn remove(&mut self, id: CertificateId, policy: IndexPolicy) -> Option<Certificate> {
        let certificate = self.metadata.remove(&id)?;
        self.owners.remove(&id);
        if policy == IndexPolicy::PruneOnBurn {
            prune(&mut self.by_learner, &certificate.learner, id);
            prune(&mut self.by_issuer, &certificate.issuer, id);
        }
        Some(certificate)
    }

    /// Metadata of `id`.
    pub fn get(&self, id: CertificateId) -> Option<&Certificate> {
        self.metadata.get(&id)
    }

    /// Mutable metadata of `id`. Ownership is not reachable through this.
    pub fn get_mut(&mut self, id: CertificateId) -> Option<&mut Certificate> {
        self.metadata.get_mut(&id)
    }

    /// Current owner of `id`.
    pub fn owner(&self, id: CertificateId) -> Option<&Principal> {
        self.owners.get(&id)
    }

    /// Identifiers minted for `learner`, in mint order.
    pub fn ids_for_learner(&self, learner: &Principal) -> &[CertificateId] {
        self.by_learner.get(learner).map(Vec::as_slice).unwrap_or_default()
    }

    /// Identifiers minted by `issuer`, in mint order.
    pub fn ids_for_issuer(&self, issuer: &Principal) -> &[CertificateId] {
        self.by_issuer.get(issuer).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of live certificates.
    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    /// Whether no certificate is live.
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }
}

fn prune(
    index: &mut BTreeMap<Principal, Vec<CertificateId>>,
    key: &Principal,
    id: CertificateId,
) {
    if let Some(ids) = index.get_mut(key) {
        ids.retain(|existing| *existing != id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}
