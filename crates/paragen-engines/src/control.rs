use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cloneable halt flag for cooperative cancellation.
///
/// The driver polls it once per generation; in-flight evaluations are
/// allowed to complete. Any clone can request the halt, e.g. from a signal
/// handler or another thread.
#[derive(Clone, Debug, Default)]
pub struct HaltHandle {
    halted: Arc<AtomicBool>,
}

impl HaltHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn halt(&self) {
        self.halted.store(true, Ordering::Relaxed);
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Relaxed)
    }
}
