//! # Registry Engine
//!
//! The single authority over registry state. Every mutating operation takes
//! the caller's principal, validates its preconditions in a fixed order, and
//! either returns the first violated precondition without touching state or
//! commits all of its effects together.
//!
//! ## Operations
//!
//! | Operation | Caller | Effect |
//! |-----------|--------|--------|
//! | `set_admin` | admin | replace the admin principal |
//! | `add_issuer` / `remove_issuer` / `update_issuer_reputation` | admin | issuer allow-list |
//! | `mint` | active issuer | new certificate, mint fee issuer → admin |
//! | `burn` | owner | delete certificate and owner |
//! | `verify` | certificate issuer | `verification_status = true` |
//! | `update_reputation` | certificate issuer | overwrite certificate reputation |
//! | `renew` | owner | renewal fee owner → issuer, expiry = height + duration |
//! | `endorse` | active issuer | append caller to endorsements |
//! | `transfer` | anyone | always `TransferNotAllowed` |
//!
//! ## Atomicity
//!
//! Validation never writes. Fee transfers are requested from the injected
//! [`ValueTransferRail`] after the last check and before the first write, so
//! a refused transfer rejects the operation with state unchanged. Writes
//! that follow a successful transfer cannot fail.

use serde::{Deserialize, Serialize};

use certreg_core::{
    sha256_digest, BlockHeight, CanonicalBytes, CertificateId, ContentDigest, CoreError,
    IndexPolicy, Principal, RegistryConfig, RegistryError,
};

use crate::certificate::{Certificate, CertificateStore, MintRequest};
use crate::clock::HeightSource;
use crate::issuer::{checked_reputation, IssuerRecord, IssuerRegistry};
use crate::policy::TransferPolicy;
use crate::rail::{TransferInstruction, TransferReason, ValueTransferRail};

/// The complete, serializable state of one registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    /// Principal authorized for administrative operations.
    pub admin: Principal,
    /// Fee charged to the issuer per mint.
    pub mint_fee: u64,
    /// Capacity ceiling on assigned identifiers.
    pub max_certificates: u64,
    /// Index behaviour on burn.
    pub index_policy: IndexPolicy,
    /// Ownership transfer rule.
    pub transfer_policy: TransferPolicy,
    /// Identifier the next mint will assign.
    pub next_certificate_id: CertificateId,
    /// Issuer allow-list.
    pub issuers: IssuerRegistry,
    /// Certificates, owners, and indices.
    pub certificates: CertificateStore,
}

impl RegistryState {
    /// Empty state for a freshly deployed registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            admin: config.admin,
            mint_fee: config.mint_fee,
            max_certificates: config.max_certificates,
            index_policy: config.index_policy,
            transfer_policy: TransferPolicy::default(),
            next_certificate_id: CertificateId::new(0),
            issuers: IssuerRegistry::new(),
            certificates: CertificateStore::new(),
        }
    }
}

/// Registry engine over injected rail `R` and height source `H`.
#[derive(Debug)]
pub struct Registry<R, H> {
    state: RegistryState,
    rail: R,
    clock: H,
}

fn logged<T>(
    operation: &'static str,
    caller: &Principal,
    result: Result<T, RegistryError>,
) -> Result<T, RegistryError> {
    if let Err(err) = &result {
        tracing::debug!(
            operation,
            caller = %caller,
            kind = err.kind_name(),
            code = ?err.code(),
            error = %err,
            "registry operation rejected"
        );
    }
    result
}

impl<R: ValueTransferRail, H: HeightSource> Registry<R, H> {
    /// Deploy an empty registry.
    pub fn new(config: RegistryConfig, rail: R, clock: H) -> Self {
        Self::from_state(RegistryState::new(config), rail, clock)
    }

    /// Resume a registry from previously captured state.
    pub fn from_state(state: RegistryState, rail: R, clock: H) -> Self {
        Self { state, rail, clock }
    }

    // ── Administration ──────────────────────────────────────────────

    /// Replace the admin. Only the current admin may call this.
    pub fn set_admin(
        &mut self,
        caller: &Principal,
        new_admin: Principal,
    ) -> Result<(), RegistryError> {
        let result = self.require_admin(caller).map(|()| {
            tracing::info!(previous = %self.state.admin, admin = %new_admin, "admin changed");
            self.state.admin = new_admin;
        });
        logged("set_admin", caller, result)
    }

    /// Admit `issuer` as an active issuer with `reputation`.
    pub fn add_issuer(
        &mut self,
        caller: &Principal,
        issuer: Principal,
        reputation: i64,
    ) -> Result<(), RegistryError> {
        let result = self.require_admin(caller).and_then(|()| {
            self.state.issuers.add(issuer.clone(), reputation)?;
            tracing::info!(issuer = %issuer, reputation, "issuer added");
            Ok(())
        });
        logged("add_issuer", caller, result)
    }

    /// Soft-disable `issuer`.
    pub fn remove_issuer(
        &mut self,
        caller: &Principal,
        issuer: &Principal,
    ) -> Result<(), RegistryError> {
        let result = self.require_admin(caller).and_then(|()| {
            let was_active = self.state.issuers.remove(issuer)?;
            tracing::info!(issuer = %issuer, was_active, "issuer removed");
            Ok(())
        });
        logged("remove_issuer", caller, result)
    }

    /// Replace `issuer`'s reputation, keeping its active flag.
    pub fn update_issuer_reputation(
        &mut self,
        caller: &Principal,
        issuer: &Principal,
        reputation: i64,
    ) -> Result<(), RegistryError> {
        let result = self.require_admin(caller).and_then(|()| {
            self.state.issuers.update_reputation(issuer, reputation)?;
            tracing::info!(issuer = %issuer, reputation, "issuer reputation updated");
            Ok(())
        });
        logged("update_issuer_reputation", caller, result)
    }

    // ── Certificate lifecycle ───────────────────────────────────────

    /// Mint a certificate issued by `caller`. Returns the assigned identifier.
    pub fn mint(
        &mut self,
        caller: &Principal,
        request: MintRequest,
    ) -> Result<CertificateId, RegistryError> {
        let result = self.try_mint(caller, request);
        logged("mint", caller, result)
    }

    fn try_mint(
        &mut self,
        caller: &Principal,
        request: MintRequest,
    ) -> Result<CertificateId, RegistryError> {
        let id = self.state.next_certificate_id;
        if id.value() >= self.state.max_certificates {
            return Err(RegistryError::MaxExceeded);
        }
        if !self.state.issuers.is_allowed(caller) {
            return Err(RegistryError::InvalidIssuer);
        }
        let height = self.clock.current_height();
        let certificate = request.into_certificate(caller, height)?;
        let next_id = id.next().ok_or(RegistryError::MaxExceeded)?;
        self.state.certificates.ensure_vacant(id)?;

        self.request_transfer(TransferInstruction {
            amount: self.state.mint_fee,
            from: caller.clone(),
            to: self.state.admin.clone(),
            reason: TransferReason::MintFee,
        })?;

        tracing::info!(
            id = %id,
            issuer = %caller,
            learner = %certificate.learner,
            height = height.value(),
            "certificate minted"
        );
        self.state.certificates.insert(id, certificate);
        self.state.next_certificate_id = next_id;
        Ok(id)
    }

    /// Delete a certificate. Only its owner may burn it.
    pub fn burn(&mut self, caller: &Principal, id: CertificateId) -> Result<(), RegistryError> {
        let result = self.try_burn(caller, id);
        logged("burn", caller, result)
    }

    fn try_burn(&mut self, caller: &Principal, id: CertificateId) -> Result<(), RegistryError> {
        let owner = self
            .state
            .certificates
            .owner(id)
            .ok_or(RegistryError::NftNotFound)?;
        if owner != caller {
            return Err(RegistryError::NotAuthorized);
        }
        self.state.certificates.remove(id, self.state.index_policy);
        tracing::info!(id = %id, owner = %caller, "certificate burned");
        Ok(())
    }

    /// Mark a certificate verified. Only its issuer may verify; repeating
    /// the call succeeds without further effect.
    pub fn verify(&mut self, caller: &Principal, id: CertificateId) -> Result<(), RegistryError> {
        let result = self.issued_by(caller, id).map(|certificate| {
            certificate.verification_status = true;
            tracing::info!(id = %id, issuer = %caller, "certificate verified");
        });
        logged("verify", caller, result)
    }

    /// Overwrite a certificate's reputation. Only its issuer may do this.
    pub fn update_reputation(
        &mut self,
        caller: &Principal,
        id: CertificateId,
        reputation: i64,
    ) -> Result<(), RegistryError> {
        let result = self.issued_by(caller, id).and_then(|certificate| {
            certificate.reputation = checked_reputation(reputation)?;
            tracing::info!(
                id = %id,
                issuer = %caller,
                reputation,
                "certificate reputation updated"
            );
            Ok(())
        });
        logged("update_reputation", caller, result)
    }

    /// Renew a certificate from the current height. Only its owner may
    /// renew; the owner pays the renewal fee to the issuer.
    ///
    /// The new expiry is `current height + duration`, regardless of the
    /// previous expiry. Returns the new expiry.
    pub fn renew(
        &mut self,
        caller: &Principal,
        id: CertificateId,
    ) -> Result<BlockHeight, RegistryError> {
        let result = self.try_renew(caller, id);
        logged("renew", caller, result)
    }

    fn try_renew(
        &mut self,
        caller: &Principal,
        id: CertificateId,
    ) -> Result<BlockHeight, RegistryError> {
        let certificate = self
            .state
            .certificates
            .get(id)
            .ok_or(RegistryError::NftNotFound)?;
        let owner = self
            .state
            .certificates
            .owner(id)
            .ok_or(RegistryError::NftNotFound)?;
        if owner != caller {
            return Err(RegistryError::NotAuthorized);
        }
        let expiry = self
            .clock
            .current_height()
            .saturating_add(certificate.duration);
        let fee = TransferInstruction {
            amount: certificate.renewal_fee,
            from: owner.clone(),
            to: certificate.issuer.clone(),
            reason: TransferReason::RenewalFee,
        };

        self.request_transfer(fee)?;

        if let Some(certificate) = self.state.certificates.get_mut(id) {
            certificate.expiry_date = Some(expiry);
        }
        tracing::info!(id = %id, owner = %caller, expiry = expiry.value(), "certificate renewed");
        Ok(expiry)
    }

    /// Append `caller` to a certificate's endorsements.
    ///
    /// A full certificate is rejected before the caller is checked, so a
    /// sixth endorsement fails with `InvalidEndorsements` whoever asks.
    /// The same issuer may endorse more than once, including the
    /// certificate's own issuer.
    pub fn endorse(&mut self, caller: &Principal, id: CertificateId) -> Result<(), RegistryError> {
        let result = self.try_endorse(caller, id);
        logged("endorse", caller, result)
    }

    fn try_endorse(&mut self, caller: &Principal, id: CertificateId) -> Result<(), RegistryError> {
        let allowed = self.state.issuers.is_allowed(caller);
        let certificate = self
            .state
            .certificates
            .get_mut(id)
            .ok_or(RegistryError::NftNotFound)?;
        if !certificate.can_accept_endorsement() {
            return Err(RegistryError::InvalidEndorsements);
        }
        if !allowed {
            return Err(RegistryError::NotAuthorized);
        }
        certificate.endorsements.push(caller.clone());
        tracing::info!(
            id = %id,
            endorser = %caller,
            endorsements = certificate.endorsements.len(),
            "certificate endorsed"
        );
        Ok(())
    }

    /// Request an ownership transfer. Always rejected.
    pub fn transfer(
        &self,
        caller: &Principal,
        id: CertificateId,
        recipient: &Principal,
    ) -> Result<(), RegistryError> {
        let rejection = self.state.transfer_policy.rejection(id, caller, recipient);
        logged("transfer", caller, Err(rejection))
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Metadata of a live certificate.
    pub fn certificate(&self, id: CertificateId) -> Option<&Certificate> {
        self.state.certificates.get(id)
    }

    /// Owner of a live certificate.
    pub fn owner(&self, id: CertificateId) -> Option<&Principal> {
        self.state.certificates.owner(id)
    }

    /// Issuer record, active or not.
    pub fn issuer(&self, issuer: &Principal) -> Option<IssuerRecord> {
        self.state.issuers.get(issuer)
    }

    /// Whether `issuer` is an active issuer.
    pub fn is_issuer_allowed(&self, issuer: &Principal) -> bool {
        self.state.issuers.is_allowed(issuer)
    }

    /// Identifiers minted for `learner`. See [`IndexPolicy`] for burned ids.
    pub fn certificates_for_learner(&self, learner: &Principal) -> &[CertificateId] {
        self.state.certificates.ids_for_learner(learner)
    }

    /// Identifiers minted by `issuer`. See [`IndexPolicy`] for burned ids.
    pub fn certificates_for_issuer(&self, issuer: &Principal) -> &[CertificateId] {
        self.state.certificates.ids_for_issuer(issuer)
    }

    /// Identifier the next successful mint will assign.
    pub fn next_certificate_id(&self) -> CertificateId {
        self.state.next_certificate_id
    }

    /// Capacity ceiling.
    pub fn max_certificates(&self) -> u64 {
        self.state.max_certificates
    }

    /// Current admin.
    pub fn admin(&self) -> &Principal {
        &self.state.admin
    }

    /// Fee per mint.
    pub fn mint_fee(&self) -> u64 {
        self.state.mint_fee
    }

    /// Number of active issuers.
    pub fn issuer_count(&self) -> u64 {
        self.state.issuers.active_count()
    }

    /// The injected rail.
    pub fn rail(&self) -> &R {
        &self.rail
    }

    /// The injected height source.
    pub fn clock(&self) -> &H {
        &self.clock
    }

    /// Copy of the full state.
    pub fn snapshot(&self) -> RegistryState {
        self.state.clone()
    }

    /// SHA-256 commitment over the canonical serialization of the state.
    pub fn state_digest(&self) -> Result<ContentDigest, CoreError> {
        let canonical = CanonicalBytes::new(&self.state)?;
        Ok(sha256_digest(&canonical))
    }

    // ── Internals ───────────────────────────────────────────────────

    fn require_admin(&self, caller: &Principal) -> Result<(), RegistryError> {
        if caller != &self.state.admin {
            return Err(RegistryError::InvalidAdmin);
        }
        Ok(())
    }

    fn issued_by(
        &mut self,
        caller: &Principal,
        id: CertificateId,
    ) -> Result<&mut Certificate, RegistryError> {
        let certificate = self
            .state
            .certificates
            .get_mut(id)
            .ok_or(RegistryError::NftNotFound)?;
        if &certificate.issuer != caller {
            return Err(RegistryError::NotAuthorized);
        }
        Ok(certificate)
    }

    fn request_transfer(&self, instruction: TransferInstruction) -> Result<(), RegistryError> {
        self.rail.transfer(&instruction).map_err(|err| {
            tracing::warn!(
                rail = self.rail.rail_name(),
                amount = instruction.amount,
                from = %instruction.from,
                to = %instruction.to,
                reason = ?instruction.reason,
                error = %err,
                "fee transfer refused"
            );
            RegistryError::from(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualHeight;
    use crate::rail::RecordingRail;
    use certreg_core::TransferError;

    const ADMIN: &str = "ST1ADMIN";
    const ISSUER: &str = "ST2ISSUER";
    const LEARNER: &str = "ST3LEARNER";
    const ENDORSER: &str = "ST4ENDORSE";

    fn p(s: &str) -> Principal {
        Principal::from(s)
    }

    struct Fixture {
        registry: Registry<RecordingRail, ManualHeight>,
        rail: RecordingRail,
        clock: ManualHeight,
    }

    fn fixture(config: RegistryConfig) -> Fixture {
        let rail = RecordingRail::new();
        let clock = ManualHeight::default();
        let registry = Registry::new(config, rail.clone(), clock.clone());
        Fixture {
            registry,
            rail,
            clock,
        }
    }

    fn with_issuer() -> Fixture {
        let mut f = fixture(RegistryConfig::default());
        f.registry.add_issuer(&p(ADMIN), p(ISSUER), 100).unwrap();
        f
    }

    fn request() -> MintRequest {
        MintRequest {
            learner: p(LEARNER),
            skills: vec!["skill1".into()],
            expiry: None,
            level: "advanced".into(),
            score: 85,
            description: "description".into(),
            cert_type: "vocational".into(),
            duration: 365,
            prereqs: vec![],
            endorsements: vec![],
            renewal_fee: 100,
        }
    }

    fn minted() -> (Fixture, CertificateId) {
        let mut f = with_issuer();
        let id = f.registry.mint(&p(ISSUER), request()).unwrap();
        (f, id)
    }

    // ── Administration ──────────────────────────────────────────────

    #[test]
    fn add_issuer_by_admin() {
        let f = with_issuer();
        assert_eq!(
            f.registry.issuer(&p(ISSUER)),
            Some(IssuerRecord {
                reputation: 100,
                active: true
            })
        );
        assert_eq!(f.registry.issuer_count(), 1);
    }

    #[test]
    fn admin_operations_reject_non_admin() {
        let mut f = with_issuer();
        let fake = p("ST3FAKE");
        assert_eq!(
            f.registry.add_issuer(&fake, p("X"), 1),
            Err(RegistryError::InvalidAdmin)
        );
        assert_eq!(
            f.registry.remove_issuer(&fake, &p(ISSUER)),
            Err(RegistryError::InvalidAdmin)
        );
        assert_eq!(
            f.registry.update_issuer_reputation(&fake, &p(ISSUER), 1),
            Err(RegistryError::InvalidAdmin)
        );
        assert_eq!(
            f.registry.set_admin(&fake, fake.clone()),
            Err(RegistryError::InvalidAdmin)
        );
        assert_eq!(f.registry.admin(), &p(ADMIN));
    }

    #[test]
    fn admin_check_precedes_argument_checks() {
        let mut f = fixture(RegistryConfig::default());
        assert_eq!(
            f.registry.add_issuer(&p(ISSUER), p(ISSUER), -1),
            Err(RegistryError::InvalidAdmin)
        );
    }

    #[test]
    fn remove_issuer_soft_disables() {
        let mut f = with_issuer();
        f.registry.remove_issuer(&p(ADMIN), &p(ISSUER)).unwrap();
        let record = f.registry.issuer(&p(ISSUER)).unwrap();
        assert!(!record.active);
        assert_eq!(record.reputation, 0);
        assert_eq!(f.registry.issuer_count(), 0);
        assert!(!f.registry.is_issuer_allowed(&p(ISSUER)));
    }

    #[test]
    fn set_admin_hands_over_authority() {
        let mut f = fixture(RegistryConfig::default());
        f.registry.set_admin(&p(ADMIN), p("ST2NEWADMIN")).unwrap();
        assert_eq!(f.registry.admin(), &p("ST2NEWADMIN"));
        assert_eq!(
            f.registry.add_issuer(&p(ADMIN), p(ISSUER), 1),
            Err(RegistryError::InvalidAdmin)
        );
        f.registry.add_issuer(&p("ST2NEWADMIN"), p(ISSUER), 1).unwrap();
    }

    // ── Mint ────────────────────────────────────────────────────────

    #[test]
    fn mint_assigns_id_charges_fee_and_indexes() {
        let (f, id) = minted();
        assert_eq!(id, CertificateId::new(0));
        let cert = f.registry.certificate(id).unwrap();
        assert_eq!(cert.learner, p(LEARNER));
        assert_eq!(cert.skills, vec!["skill1".to_string()]);
        assert!(!cert.verification_status);
        assert_eq!(f.registry.owner(id), Some(&p(LEARNER)));
        assert_eq!(
            f.rail.records(),
            vec![TransferInstruction {
                amount: 500,
                from: p(ISSUER),
                to: p(ADMIN),
                reason: TransferReason::MintFee,
            }]
        );
        assert_eq!(f.registry.certificates_for_learner(&p(LEARNER)), &[id]);
        assert_eq!(f.registry.certificates_for_issuer(&p(ISSUER)), &[id]);
        assert_eq!(f.registry.next_certificate_id(), CertificateId::new(1));
    }

    #[test]
    fn mint_by_unknown_issuer_rejected() {
        let mut f = fixture(RegistryConfig::default());
        assert_eq!(
            f.registry.mint(&p(ISSUER), request()),
            Err(RegistryError::InvalidIssuer)
        );
        assert!(f.rail.is_empty());
        assert_eq!(f.registry.next_certificate_id(), CertificateId::new(0));
    }

    #[test]
    fn mint_by_removed_issuer_rejected() {
        let mut f = with_issuer();
        f.registry.remove_issuer(&p(ADMIN), &p(ISSUER)).unwrap();
        assert_eq!(
            f.registry.mint(&p(ISSUER), request()),
            Err(RegistryError::InvalidIssuer)
        );
    }

    #[test]
    fn capacity_checked_before_issuer() {
        let mut f = fixture(RegistryConfig::default().with_max_certificates(1));
        f.registry.add_issuer(&p(ADMIN), p(ISSUER), 1).unwrap();
        f.registry.mint(&p(ISSUER), request()).unwrap();
        assert_eq!(
            f.registry.mint(&p(ISSUER), request()),
            Err(RegistryError::MaxExceeded)
        );
        assert_eq!(
            f.registry.mint(&p("NOBODY"), request()),
            Err(RegistryError::MaxExceeded)
        );
    }

    #[test]
    fn expiry_relative_to_current_height() {
        let mut f = with_issuer();
        f.clock.set(BlockHeight::new(100));
        let mut req = request();
        req.expiry = Some(BlockHeight::new(50));
        assert_eq!(
            f.registry.mint(&p(ISSUER), req),
            Err(RegistryError::InvalidExpiry)
        );
        let mut req = request();
        req.expiry = Some(BlockHeight::new(101));
        let id = f.registry.mint(&p(ISSUER), req).unwrap();
        let cert = f.registry.certificate(id).unwrap();
        assert_eq!(cert.issuance_date, BlockHeight::new(100));
        assert_eq!(cert.expiry_date, Some(BlockHeight::new(101)));
    }

    #[test]
    fn refused_mint_fee_leaves_state_untouched() {
        let mut f = with_issuer();
        let before = f.registry.state_digest().unwrap();
        f.rail.reject_with(TransferError::InsufficientFunds {
            account: p(ISSUER),
            requested: 500,
        });
        let err = f.registry.mint(&p(ISSUER), request()).unwrap_err();
        assert!(matches!(err, RegistryError::TransferFailed(_)), "got: {err:?}");
        assert_eq!(f.registry.state_digest().unwrap(), before);
        assert!(f.registry.certificates_for_learner(&p(LEARNER)).is_empty());

        f.rail.accept();
        assert_eq!(f.registry.mint(&p(ISSUER), request()), Ok(CertificateId::new(0)));
    }

    #[test]
    fn occupied_slot_reported_as_already_exists() {
        let (f, _) = minted();
        let mut state = f.registry.snapshot();
        state.next_certificate_id = CertificateId::new(0);
        let mut resumed = Registry::from_state(state, f.rail.clone(), f.clock.clone());
        assert_eq!(
            resumed.mint(&p(ISSUER), request()),
            Err(RegistryError::NftAlreadyExists)
        );
        assert_eq!(f.rail.len(), 1);
    }

    #[test]
    fn resumed_state_with_stale_issuer_count_removes_cleanly() {
        let f = fixture(RegistryConfig::default());
        let mut json = serde_json::to_value(f.registry.snapshot()).unwrap();
        json["issuers"] = serde_json::json!({
            "active_count": 0,
            "records": { "ST2ISSUER": { "active": true, "reputation": 1 } }
        });
        let state: RegistryState = serde_json::from_value(json).unwrap();
        let mut resumed = Registry::from_state(state, f.rail.clone(), f.clock.clone());
        assert!(resumed.is_issuer_allowed(&p(ISSUER)));
        assert_eq!(resumed.issuer_count(), 1);

        resumed.remove_issuer(&p(ADMIN), &p(ISSUER)).unwrap();
        assert_eq!(resumed.issuer_count(), 0);
        resumed.remove_issuer(&p(ADMIN), &p(ISSUER)).unwrap();
        assert_eq!(resumed.issuer_count(), 0);
    }

    // ── Burn ────────────────────────────────────────────────────────

    #[test]
    fn burn_by_owner_deletes() {
        let (mut f, id) = minted();
        f.registry.burn(&p(LEARNER), id).unwrap();
        assert!(f.registry.certificate(id).is_none());
        assert!(f.registry.owner(id).is_none());
        assert_eq!(f.registry.certificates_for_learner(&p(LEARNER)), &[id]);
    }

    #[test]
    fn burn_prunes_indices_when_configured() {
        let mut f = fixture(RegistryConfig::default().with_index_policy(IndexPolicy::PruneOnBurn));
        f.registry.add_issuer(&p(ADMIN), p(ISSUER), 1).unwrap();
        let id = f.registry.mint(&p(ISSUER), request()).unwrap();
        f.registry.burn(&p(LEARNER), id).unwrap();
        assert!(f.registry.certificates_for_learner(&p(LEARNER)).is_empty());
        assert!(f.registry.certificates_for_issuer(&p(ISSUER)).is_empty());
    }

    #[test]
    fn burn_by_other_rejected() {
        let (mut f, id) = minted();
        assert_eq!(f.registry.burn(&p(ISSUER), id), Err(RegistryError::NotAuthorized));
        assert!(f.registry.certificate(id).is_some());
        assert_eq!(
            f.registry.burn(&p(LEARNER), CertificateId::new(9)),
            Err(RegistryError::NftNotFound)
        );
    }

    #[test]
    fn ids_not_reused_after_burn() {
        let (mut f, id) = minted();
        f.registry.burn(&p(LEARNER), id).unwrap();
        assert_eq!(f.registry.mint(&p(ISSUER), request()), Ok(CertificateId::new(1)));
    }

    // ── Verify / reputation ─────────────────────────────────────────

    #[test]
    fn verify_is_issuer_only_and_idempotent() {
        let (mut f, id) = minted();
        assert_eq!(f.registry.verify(&p(LEARNER), id), Err(RegistryError::NotAuthorized));
        f.registry.verify(&p(ISSUER), id).unwrap();
        f.registry.verify(&p(ISSUER), id).unwrap();
        assert!(f.registry.certificate(id).unwrap().verification_status);
        assert_eq!(
            f.registry.verify(&p(ISSUER), CertificateId::new(5)),
            Err(RegistryError::NftNotFound)
        );
    }

    #[test]
    fn update_reputation_checks_issuer_then_value() {
        let (mut f, id) = minted();
        assert_eq!(
            f.registry.update_reputation(&p(LEARNER), id, -1),
            Err(RegistryError::NotAuthorized)
        );
        assert_eq!(
            f.registry.update_reputation(&p(ISSUER), id, -1),
            Err(RegistryError::InvalidReputation)
        );
        f.registry.update_reputation(&p(ISSUER), id, 50).unwrap();
        assert_eq!(f.registry.certificate(id).unwrap().reputation, 50);
    }

    // ── Renew ───────────────────────────────────────────────────────

    #[test]
    fn renew_extends_from_current_height_and_pays_issuer() {
        let (mut f, id) = minted();
        assert_eq!(f.registry.renew(&p(LEARNER), id), Ok(BlockHeight::new(365)));
        assert_eq!(
            f.rail.records()[1],
            TransferInstruction {
                amount: 100,
                from: p(LEARNER),
                to: p(ISSUER),
                reason: TransferReason::RenewalFee,
            }
        );

        f.clock.set(BlockHeight::new(1000));
        assert_eq!(f.registry.renew(&p(LEARNER), id), Ok(BlockHeight::new(1365)));
        assert_eq!(
            f.registry.certificate(id).unwrap().expiry_date,
            Some(BlockHeight::new(1365))
        );
    }

    #[test]
    fn renew_by_non_owner_rejected() {
        let (mut f, id) = minted();
        assert_eq!(f.registry.renew(&p(ISSUER), id), Err(RegistryError::NotAuthorized));
        assert_eq!(f.rail.len(), 1);
        assert_eq!(
            f.registry.renew(&p(LEARNER), CertificateId::new(3)),
            Err(RegistryError::NftNotFound)
        );
    }

    #[test]
    fn refused_renewal_fee_keeps_expiry() {
        let (mut f, id) = minted();
        f.rail.reject_with(TransferError::Rejected {
            rail: "recording".into(),
            reason: "account frozen".into(),
        });
        assert!(matches!(
            f.registry.renew(&p(LEARNER), id),
            Err(RegistryError::TransferFailed(_))
        ));
        assert_eq!(f.registry.certificate(id).unwrap().expiry_date, None);
    }

    // ── Endorse ─────────────────────────────────────────────────────

    #[test]
    fn endorse_by_active_issuer() {
        let (mut f, id) = minted();
        f.registry.add_issuer(&p(ADMIN), p(ENDORSER), 50).unwrap();
        f.registry.endorse(&p(ENDORSER), id).unwrap();
        assert_eq!(f.registry.certificate(id).unwrap().endorsements, vec![p(ENDORSER)]);
    }

    #[test]
    fn endorse_by_non_issuer_rejected() {
        let (mut f, id) = minted();
        assert_eq!(f.registry.endorse(&p(LEARNER), id), Err(RegistryError::NotAuthorized));
        assert_eq!(
            f.registry.endorse(&p(ISSUER), CertificateId::new(8)),
            Err(RegistryError::NftNotFound)
        );
    }

    #[test]
    fn sixth_endorsement_rejected_for_any_caller() {
        let (mut f, id) = minted();
        for _ in 0..5 {
            f.registry.endorse(&p(ISSUER), id).unwrap();
        }
        assert_eq!(f.registry.certificate(id).unwrap().endorsements.len(), 5);
        assert_eq!(
            f.registry.endorse(&p(ISSUER), id),
            Err(RegistryError::InvalidEndorsements)
        );
        assert_eq!(
            f.registry.endorse(&p("NOT_AN_ISSUER"), id),
            Err(RegistryError::InvalidEndorsements)
        );
    }

    // ── Transfer ────────────────────────────────────────────────────

    #[test]
    fn transfer_always_rejected() {
        let (f, id) = minted();
        assert_eq!(
            f.registry.transfer(&p(LEARNER), id, &p("ST5RECIPIENT")),
            Err(RegistryError::TransferNotAllowed)
        );
        assert_eq!(
            f.registry
                .transfer(&p(ADMIN), CertificateId::new(0xdead), &p(LEARNER)),
            Err(RegistryError::TransferNotAllowed)
        );
        assert_eq!(f.registry.owner(id), Some(&p(LEARNER)));
    }

    // ── Snapshot ────────────────────────────────────────────────────

    #[test]
    fn snapshot_round_trips_through_json() {
        let (f, _) = minted();
        let snapshot = f.registry.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: RegistryState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn digest_tracks_state_changes() {
        let (mut f, id) = minted();
        let before = f.registry.state_digest().unwrap();
        f.registry.verify(&p(ISSUER), id).unwrap();
        assert_ne!(f.registry.state_digest().unwrap(), before);
    }
}
