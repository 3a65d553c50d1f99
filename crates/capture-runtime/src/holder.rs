//! The `Work` value holder and the deferred tasks it produces.

use crate::deferred::{Deferred, Launch};
use capture_common::Result;
use std::sync::Arc;

/// Value a holder is constructed with.
pub const DEFAULT_VALUE: i32 = 42;

/// A holder for a single integer.
///
/// Dropping the holder resets the value to 0. No task produced by the holder
/// can observe that reset: every task owns either a copy of the data or a
/// strong reference that keeps the holder alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Work {
    value: i32,
}

impl Work {
    pub fn new() -> Self {
        Self::with_value(DEFAULT_VALUE)
    }

    pub fn with_value(value: i32) -> Self {
        log::trace!("holder created with {}", value);
        Self { value }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Spawn a task that returns a copy of the value taken now.
    pub fn spawn(&self) -> Result<Deferred<i32>> {
        self.spawn_with(Launch::Eager)
    }

    pub fn spawn_with(&self, launch: Launch) -> Result<Deferred<i32>> {
        let value = self.value;
        Deferred::spawn(launch, move || value)
    }

    /// Spawn a task that owns a clone of the whole holder and reads it
    /// through the accessor when it runs.
    pub fn spawn_self(&self) -> Result<Deferred<i32>> {
        self.spawn_self_with(Launch::Eager)
    }

    pub fn spawn_self_with(&self, launch: Launch) -> Result<Deferred<i32>> {
        let this = self.clone();
        Deferred::spawn(launch, move || this.value())
    }

    /// Spawn a task that shares ownership of the holder.
    ///
    /// The task keeps one strong reference until it finishes, so the holder
    /// outlives every caller-side handle that is dropped first.
    pub fn spawn_shared(self: &Arc<Self>, launch: Launch) -> Result<Deferred<i32>> {
        let this = Arc::clone(self);
        Deferred::spawn(launch, move || this.value())
    }
}

impl Default for Work {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Work {
    fn drop(&mut self) {
        log::trace!("holder dropped (value {})", self.value);
        self.value = 0;
    }
}
