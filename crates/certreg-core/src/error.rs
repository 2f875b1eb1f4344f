//! # Error Types — Registry Error Taxonomy
//!
//! Defines the error types used throughout the registry. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - `RegistryError` is the closed set of rejections the engine produces.
//!   Each precondition maps to exactly one variant, and each variant carries
//!   the numeric code of the on-chain contract.
//! - A failure of the injected value transfer rail surfaces as
//!   `RegistryError::TransferFailed`; the operation that requested the
//!   transfer is rejected as a whole.
//! - `CoreError` covers failures outside the state machine: configuration
//!   parsing and canonicalization.

use thiserror::Error;

use crate::identity::Principal;

/// Rejection returned by a registry operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller is not the principal the operation requires.
    #[error("caller is not authorized for this operation")]
    NotAuthorized,

    /// Caller of an administrative operation is not the admin.
    #[error("caller is not the registry admin")]
    InvalidAdmin,

    /// Minting caller is not an active issuer.
    #[error("caller is not an active issuer")]
    InvalidIssuer,

    /// Learner is the issuer itself.
    #[error("learner must differ from issuer")]
    InvalidLearner,

    /// Skills list is empty or longer than 10.
    #[error("skills must contain between 1 and 10 entries")]
    InvalidSkills,

    /// Expiry does not lie strictly after the current height.
    #[error("expiry must be after the current block height")]
    InvalidExpiry,

    /// Level is empty or longer than 20 characters.
    #[error("level must be between 1 and 20 characters")]
    InvalidLevel,

    /// Score outside `[0, 100]`.
    #[error("score must be between 0 and 100")]
    InvalidScore,

    /// Description longer than 500 characters.
    #[error("description must be at most 500 characters")]
    InvalidDescription,

    /// Certificate type is empty or longer than 50 characters.
    #[error("certificate type must be between 1 and 50 characters")]
    InvalidCertType,

    /// Renewal duration is not positive.
    #[error("duration must be positive")]
    InvalidDuration,

    /// More than 5 prerequisites.
    #[error("at most 5 prerequisites are allowed")]
    InvalidPrereqs,

    /// More than 5 endorsements, or an endorsement on a full certificate.
    #[error("at most 5 endorsements are allowed")]
    InvalidEndorsements,

    /// Negative renewal fee.
    #[error("renewal fee must not be negative")]
    InvalidRenewalFee,

    /// A certificate already occupies the identifier being assigned.
    #[error("certificate already exists")]
    NftAlreadyExists,

    /// No certificate with the given identifier.
    #[error("certificate not found")]
    NftNotFound,

    /// Ownership transfer is disabled.
    #[error("certificate transfer is not allowed")]
    TransferNotAllowed,

    /// The registry has issued its maximum number of certificates.
    #[error("maximum number of certificates exceeded")]
    MaxExceeded,

    /// Negative reputation.
    #[error("reputation must not be negative")]
    InvalidReputation,

    /// An issuer record already exists for this principal.
    #[error("issuer already exists")]
    IssuerAlreadyExists,

    /// No issuer record for this principal.
    #[error("issuer not found")]
    IssuerNotFound,

    /// The value transfer rail refused a fee transfer.
    #[error("fee transfer failed: {0}")]
    TransferFailed(#[from] TransferError),
}

impl RegistryError {
    /// The numeric error code of the on-chain contract.
    ///
    /// `TransferFailed` has no contract code: on chain, a failed transfer
    /// aborts the whole call instead.
    pub fn code(&self) -> Option<u32> {
        let code = match self {
            Self::NotAuthorized => 100,
            Self::InvalidIssuer => 101,
            Self::InvalidLearner => 102,
            Self::InvalidSkills => 103,
            Self::NftAlreadyExists => 106,
            Self::NftNotFound => 107,
            Self::TransferNotAllowed => 108,
            Self::InvalidExpiry => 111,
            Self::InvalidLevel => 112,
            Self::InvalidScore => 113,
            Self::MaxExceeded => 115,
            Self::InvalidAdmin => 116,
            Self::IssuerAlreadyExists => 117,
            Self::IssuerNotFound => 118,
            Self::InvalidReputation => 119,
            Self::InvalidDescription => 120,
            Self::InvalidCertType => 121,
            Self::InvalidDuration => 122,
            Self::InvalidPrereqs => 123,
            Self::InvalidEndorsements => 124,
            Self::InvalidRenewalFee => 125,
            Self::TransferFailed(_) => return None,
        };
        Some(code)
    }

    /// Symbolic name of the error kind, stable across releases.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::NotAuthorized => "NotAuthorized",
            Self::InvalidAdmin => "InvalidAdmin",
            Self::InvalidIssuer => "InvalidIssuer",
            Self::InvalidLearner => "InvalidLearner",
            Self::InvalidSkills => "InvalidSkills",
            Self::InvalidExpiry => "InvalidExpiry",
            Self::InvalidLevel => "InvalidLevel",
            Self::InvalidScore => "InvalidScore",
            Self::InvalidDescription => "InvalidDescription",
            Self::InvalidCertType => "InvalidCertType",
            Self::InvalidDuration => "InvalidDuration",
            Self::InvalidPrereqs => "InvalidPrereqs",
            Self::InvalidEndorsements => "InvalidEndorsements",
            Self::InvalidRenewalFee => "InvalidRenewalFee",
            Self::NftAlreadyExists => "NftAlreadyExists",
            Self::NftNotFound => "NftNotFound",
            Self::TransferNotAllowed => "TransferNotAllowed",
            Self::MaxExceeded => "MaxExceeded",
            Self::InvalidReputation => "InvalidReputation",
            Self::IssuerAlreadyExists => "IssuerAlreadyExists",
            Self::IssuerNotFound => "IssuerNotFound",
            Self::TransferFailed(_) => "TransferFailed",
        }
    }
}

/// Failure reported by a value transfer rail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The rail rejected the instruction.
    #[error("transfer rejected by {rail}: {reason}")]
    Rejected {
        /// Which rail rejected the instruction.
        rail: String,
        /// Human-readable rejection reason.
        reason: String,
    },

    /// The debited account cannot cover the amount.
    #[error("account {account} cannot cover {requested}")]
    InsufficientFunds {
        /// The account that would have been debited.
        account: Principal,
        /// The requested amount.
        requested: u64,
    },

    /// The rail has not been configured for this environment.
    #[error("transfer rail not configured: {0}")]
    NotConfigured(String),
}

/// Failures outside the registry state machine.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Configuration could not be parsed or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
