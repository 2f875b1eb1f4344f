//! # Shared Registry Handle
//!
//! Cloneable, thread-safe handle over one [`Registry`]. Every mutation runs
//! under a single exclusive lock, so operations from concurrent callers are
//! applied one at a time in the order they acquire it, and no reader ever
//! observes a half-applied operation.
//!
//! Uses `parking_lot::Mutex`: no lock poisoning, and an engine operation
//! that returns an error leaves state untouched, so there is nothing to
//! recover after a failed call.

use std::sync::Arc;

use parking_lot::Mutex;

use certreg_core::RegistryConfig;

use crate::clock::HeightSource;
use crate::rail::ValueTransferRail;
use crate::registry::Registry;

/// Thread-safe handle to a registry instance.
#[derive(Debug)]
pub struct SharedRegistry<R, H> {
    inner: Arc<Mutex<Registry<R, H>>>,
}

impl<R, H> Clone for SharedRegistry<R, H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: ValueTransferRail, H: HeightSource> SharedRegistry<R, H> {
    /// Deploy an empty registry behind a shared handle.
    pub fn new(config: RegistryConfig, rail: R, clock: H) -> Self {
        Self::from_registry(Registry::new(config, rail, clock))
    }

    /// Wrap an existing registry.
    pub fn from_registry(registry: Registry<R, H>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Run `f` with exclusive access to the registry.
    ///
    /// The lock is held for the whole closure, so a sequence of operations
    /// inside one call is applied without interleaving.
    pub fn execute<T>(&self, f: impl FnOnce(&mut Registry<R, H>) -> T) -> T {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Run `f` with read access to the registry.
    pub fn query<T>(&self, f: impl FnOnce(&Registry<R, H>) -> T) -> T {
        let guard = self.inner.lock();
        f(&guard)
    }
}
