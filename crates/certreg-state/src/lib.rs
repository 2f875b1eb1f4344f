//! # certreg-state — Certificate Registry Engine
//!
//! Holds the registry state and the operations that change it: the issuer
//! allow-list, certificate minting and burning, verification, reputation
//! updates, renewal, and endorsement. Certificates are soulbound; every
//! ownership transfer is rejected.
//!
//! ## Architecture
//!
//! - [`Registry`] owns a [`RegistryState`] plus two injected collaborators:
//!   a [`HeightSource`] for the current block height and a
//!   [`ValueTransferRail`] that settles mint and renewal fees.
//! - Each operation validates in a fixed order and returns the first
//!   failing [`RegistryError`](certreg_core::RegistryError) with no state
//!   change. A refused fee transfer rejects the operation the same way.
//! - [`SharedRegistry`] serializes operations from concurrent callers
//!   behind one lock.
//!
//! ## Logging
//!
//! Committed operations emit `tracing` events at `info`, rejected ones at
//! `debug` with the error code, and refused fee transfers at `warn`.

pub mod certificate;
pub mod clock;
pub mod issuer;
pub mod policy;
pub mod rail;
pub mod registry;
pub mod shared;

pub use certificate::{
    Certificate, CertificateStore, MintRequest, MAX_CERT_TYPE_LEN, MAX_DESCRIPTION_LEN,
    MAX_ENDORSEMENTS, MAX_LEVEL_LEN, MAX_PREREQS, MAX_SCORE, MAX_SKILLS,
};
pub use clock::{HeightSource, ManualHeight};
pub use issuer::{IssuerRecord, IssuerRegistry};
pub use policy::TransferPolicy;
pub use rail::{
    RecordingRail, TransferInstruction, TransferReason, UnconfiguredRail, ValueTransferRail,
};
pub use registry::{Registry, RegistryState};
pub use shared::SharedRegistry;
