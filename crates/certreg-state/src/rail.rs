//! # Value Transfer Rail
//!
//! The registry charges two fees: the mint fee (issuer → admin) and the
//! renewal fee (owner → issuer). It does not settle them. Each fee becomes a
//! [`TransferInstruction`] handed to an injected [`ValueTransferRail`].
//!
//! A rail call is synchronous and all-or-nothing. The engine issues it after
//! every precondition has passed and before any state is written; a rail
//! error rejects the whole operation.
//!
//! ## Implementations
//!
//! | Rail | Description |
//! |------|-------------|
//! | [`RecordingRail`] | Accepts every instruction and keeps an ordered log. Can be armed to reject. |
//! | [`UnconfiguredRail`] | Rejects every instruction with `NotConfigured`. |

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use certreg_core::{Principal, TransferError};

/// Why a transfer was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferReason {
    /// Issuer pays the admin for a mint.
    MintFee,
    /// Owner pays the issuer for a renewal.
    RenewalFee,
}

/// A single debit/credit requested by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInstruction {
    /// Amount in the rail's smallest unit. May be zero.
    pub amount: u64,
    /// Debited account.
    pub from: Principal,
    /// Credited account.
    pub to: Principal,
    /// Fee that triggered the transfer.
    pub reason: TransferReason,
}

/// Executes fee transfers on behalf of the registry.
///
/// Object-safe and `Send + Sync` so a rail can be shared with a
/// [`crate::SharedRegistry`] and boxed as `Box<dyn ValueTransferRail>`.
pub trait ValueTransferRail: Send + Sync {
    /// Human-readable rail name, used in logs and error context.
    fn rail_name(&self) -> &str;

    /// Execute the transfer, or refuse it without side effects.
    fn transfer(&self, instruction: &TransferInstruction) -> Result<(), TransferError>;
}

impl<T: ValueTransferRail + ?Sized> ValueTransferRail for Box<T> {
    fn rail_name(&self) -> &str {
        (**self).rail_name()
    }

    fn transfer(&self, instruction: &TransferInstruction) -> Result<(), TransferError> {
        (**self).transfer(instruction)
    }
}

/// In-memory rail that records every accepted instruction.
///
/// Clones share the log, so a test can inspect transfers made by a registry
/// that owns another clone.
#[derive(Debug, Clone, Default)]
pub struct RecordingRail {
    records: Arc<Mutex<Vec<TransferInstruction>>>,
    rejection: Arc<Mutex<Option<TransferError>>>,
}

impl RecordingRail {
    /// Create an empty rail that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted instructions, oldest first.
    pub fn records(&self) -> Vec<TransferInstruction> {
        self.records.lock().clone()
    }

    /// Number of accepted instructions.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether no instruction has been accepted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Refuse every subsequent instruction with `error`.
    pub fn reject_with(&self, error: TransferError) {
        *self.rejection.lock() = Some(error);
    }

    /// Accept instructions again.
    pub fn accept(&self) {
        *self.rejection.lock() = None;
    }
}

impl ValueTransferRail for RecordingRail {
    fn rail_name(&self) -> &str {
        "recording"
    }

    fn transfer(&self, instruction: &TransferInstruction) -> Result<(), TransferError> {
        if let Some(error) = self.rejection.lock().clone() {
            return Err(error);
        }
        self.records.lock().push(instruction.clone());
        Ok(())
    }
}

/// Rail for environments without settlement; refuses every transfer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredRail;

impl ValueTransferRail for UnconfiguredRail {
    fn rail_name(&self) -> &str {
        "unconfigured"
    }

    fn transfer(&self, _instruction: &TransferInstruction) -> Result<(), TransferError> {
        Err(TransferError::NotConfigured(
            "no value transfer rail has been configured for this registry".into(),
        ))
    }
}
