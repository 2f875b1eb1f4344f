//! # certreg-core — Foundational Types for the Certificate Registry
//!
//! Defines the primitives every other crate in the workspace builds on.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identities.** `Principal` and `CertificateId`
//!    are distinct types. An issuer address cannot be passed where a
//!    certificate identifier is expected.
//!
//! 2. **Logical time only.** `BlockHeight` is a monotone counter supplied by
//!    the caller's environment. Nothing in the registry reads a wall clock.
//!
//! 3. **One error taxonomy.** `RegistryError` enumerates every rejection the
//!    engine can produce, each with the stable numeric code of the on-chain
//!    contract.
//!
//! 4. **Canonical commitments.** State digests flow through
//!    `CanonicalBytes::new()` and `sha256_digest()`, so equal registry states
//!    always commit to equal digests.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod config;
pub mod digest;
pub mod error;
pub mod height;
pub mod identity;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use config::{IndexPolicy, RegistryConfig};
pub use digest::{sha256_digest, ContentDigest};
pub use error::{CanonicalizationError, CoreError, RegistryError, TransferError};
pub use height::BlockHeight;
pub use identity::{CertificateId, Principal};
