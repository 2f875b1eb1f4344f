//! # Height Source
//!
//! The registry never reads a clock. The current block height is supplied
//! by an injected [`HeightSource`], so the engine can be driven
//! deterministically in tests and by whatever chain or sequencer hosts it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use certreg_core::BlockHeight;

/// Supplies the current logical block height.
pub trait HeightSource: Send + Sync {
    /// The height at which the current operation executes.
    fn current_height(&self) -> BlockHeight;
}

impl HeightSource for BlockHeight {
    fn current_height(&self) -> BlockHeight {
        *self
    }
}

/// A settable height source.
///
/// Clones share the same counter, so a test can keep a handle and advance
/// the height of a registry that owns another clone.
#[derive(Debug, Clone, Default)]
pub struct ManualHeight {
    height: Arc<AtomicU64>,
}

impl ManualHeight {
    /// Start at the given height.
    pub fn starting_at(height: BlockHeight) -> Self {
        Self {
            height: Arc::new(AtomicU64::new(height.value())),
        }
    }

    /// Jump to an absolute height.
    pub fn set(&self, height: BlockHeight) {
        self.height.store(height.value(), Ordering::SeqCst);
    }

    /// Advance by `blocks`, saturating.
    pub fn advance(&self, blocks: u64) -> BlockHeight {
        let mut current = self.height.load(Ordering::SeqCst);
        loop {
            let next = current.saturating_add(blocks);
            match self.height.compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst) {
                Ok(_) => return BlockHeight::new(next),
                Err(actual) => current = actual,
            }
        }
    }
}

impl HeightSource for ManualHeight {
    fn current_height(&self) -> BlockHeight {
        BlockHeight::new(self.height.load(Ordering::SeqCst))
    }
}
