//! State shared between the coordinator and the worker pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// One-way stop flag. Cloning yields another handle to the same flag.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag. Returns `true` only for the call that flipped it.
    pub fn set(&self) -> bool {
        !self.0.swap(true, Ordering::Release)
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Tally of successful request cycles. Writers go through the mutex; the
/// value only ever grows by one.
#[derive(Debug, Default)]
pub struct SuccessCounter {
    count: Mutex<u64>,
}

impl SuccessCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one and hands the new total to `observe` while the guard is
    /// still held, so observers see totals in increment order. Every other
    /// worker waits on the lock while `observe` runs, so it must not block.
    pub fn increment<F: FnOnce(u64)>(&self, observe: F) -> u64 {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count += 1;
        observe(*count);
        *count
    }

    pub fn get(&self) -> u64 {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
