//! Collector liveness flag.
//!
//! A single advisory bit: set when the collector announces readiness on the
//! control path, cleared if it says goodbye. Read far more often than
//! written, so plain atomic load/store with no locking. Dispatch never
//! gates on it; the multicast primitive already discards when nobody
//! listens.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct DaemonLiveness {
    ready: AtomicBool,
}

impl DaemonLiveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    pub fn mark_lost(&self) {
        self.ready.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}
