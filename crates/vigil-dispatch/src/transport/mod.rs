//! Delivery abstraction for outbound reports.
//!
//! The dispatcher talks to a [`Transport`], not to a socket: delivery is
//! capability-abstracted so policy and rate-limit logic stay decoupled from
//! the actual multicast machinery, and tests can swap in an in-memory
//! implementation. `transmit` must not block and must complete in bounded
//! time; callers may be in contexts where blocking is unacceptable.

pub mod multicast;

use std::sync::Mutex;

use vigil_core::error::TransportError;
use vigil_core::protocol::report::Report;

pub use multicast::MulticastTransport;

pub trait Transport: Send + Sync {
    /// Hand one report to the delivery primitive. The report is fully
    /// copied before the call returns; no aliasing survives it. Failures
    /// are surfaced, never retried here.
    fn transmit(&self, report: &Report) -> Result<(), TransportError>;
}

/// Recording transport for tests and tooling: keeps every transmitted
/// report instead of delivering it.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<Report>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Report> {
        match self.sent.lock() {
            Ok(g) => g.clone(),
            Err(_) => Vec::new(),
        }
    }
}

impl Transport for MemoryTransport {
    fn transmit(&self, report: &Report) -> Result<(), TransportError> {
        if let Ok(mut g) = self.sent.lock() {
            g.push(report.clone());
        }
        Ok(())
    }
}

/// Transport that fails every transmit. Exercises the no-rollback rule on
/// the rate budget.
#[derive(Debug, Default)]
pub struct FailingTransport;

impl Transport for FailingTransport {
    fn transmit(&self, _report: &Report) -> Result<(), TransportError> {
        Err(TransportError::Delivery("injected failure".into()))
    }
}
