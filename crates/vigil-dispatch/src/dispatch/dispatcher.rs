//! Dispatch entry point: validation, policy, rate budget, transmit.
//!
//! The pipeline order is load-bearing: validation before policy before the
//! rate check means malformed input and policy-denied codes never consume a
//! rate-limit slot; only genuinely eligible messages count against the
//! budget. A transport failure after the slot was taken does NOT give the
//! slot back; re-attempting an already-rejected send is the caller's
//! business, not ours.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use vigil_core::error::{DispatchError, STATUS_OK};
use vigil_core::protocol::report::Report;

use crate::obs::metrics::DispatchMetrics;
use crate::policy::AllowlistPolicy;
use crate::rate::RateWindow;
use crate::transport::Transport;

/// Orchestrates one send: validate, check policy, take a rate slot,
/// encode and hand off. Constructed once at startup and shared via `Arc`;
/// safe to call from arbitrary concurrent contexts, never blocks beyond the
/// rate window's CAS.
pub struct Dispatcher {
    policy: AllowlistPolicy,
    rate: Arc<RateWindow>,
    transport: Arc<dyn Transport>,
    metrics: Arc<DispatchMetrics>,
    active: AtomicBool,
}

impl Dispatcher {
    /// Build an un-activated dispatcher: every send fails `NotInitialized`
    /// until [`activate`](Self::activate) runs at the end of startup.
    pub fn new(
        policy: AllowlistPolicy,
        rate: Arc<RateWindow>,
        transport: Arc<dyn Transport>,
        metrics: Arc<DispatchMetrics>,
    ) -> Self {
        Self {
            policy,
            rate,
            transport,
            metrics,
            active: AtomicBool::new(false),
        }
    }

    pub fn activate(&self) {
        self.active.store(true, Ordering::Release);
    }

    pub fn shutdown(&self) {
        self.active.store(false, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn policy(&self) -> &AllowlistPolicy {
        &self.policy
    }

    /// Send one diagnostic message toward the collector.
    ///
    /// `None` for either field is caller error; an empty detail string is
    /// acceptable. Policy and rate refusals both surface as
    /// [`DispatchError::Denied`]; transport problems keep their own variant
    /// so they stay distinguishable.
    pub fn send_message(
        &self,
        feature_code: Option<&str>,
        detail: Option<&str>,
        value: i64,
    ) -> Result<(), DispatchError> {
        let started = Instant::now();
        let res = self.dispatch(feature_code, detail, value);
        self.metrics.dispatch_duration.observe(started.elapsed());
        res
    }

    /// [`send_message`](Self::send_message) mapped to the embedding
    /// boundary's integer convention: `0`, `-EINVAL`, the deny sentinel, or
    /// a negative transport errno.
    pub fn send_message_status(&self, feature_code: Option<&str>, detail: Option<&str>, value: i64) -> i32 {
        match self.send_message(feature_code, detail, value) {
            Ok(()) => STATUS_OK,
            Err(e) => e.status(),
        }
    }

    fn dispatch(
        &self,
        feature_code: Option<&str>,
        detail: Option<&str>,
        value: i64,
    ) -> Result<(), DispatchError> {
        if !self.is_active() {
            self.metrics.denied.inc("not_initialized");
            return Err(DispatchError::NotInitialized);
        }

        let Some(feature_code) = feature_code else {
            self.metrics.invalid_arguments.inc();
            return Err(DispatchError::InvalidArgument("feature_code"));
        };
        let Some(detail) = detail else {
            self.metrics.invalid_arguments.inc();
            return Err(DispatchError::InvalidArgument("detail"));
        };

        if !self.policy.is_allowed(feature_code) {
            // Expected and frequent; a metric, not an error log.
            self.metrics.denied.inc("policy");
            tracing::debug!(feature_code, "dispatch denied by allowlist");
            return Err(DispatchError::Denied);
        }

        if !self.rate.check_and_increment() {
            self.metrics.denied.inc("rate");
            tracing::debug!(feature_code, "dispatch denied by rate budget");
            return Err(DispatchError::Denied);
        }

        // The slot above is consumed from here on, success or not.
        let report = Report::new(feature_code, detail, value);
        if let Err(e) = self.transport.transmit(&report) {
            self.metrics.transport_errors.inc(e.code());
            tracing::warn!(feature_code, error = %e, "report transmit failed");
            return Err(e.into());
        }

        self.metrics.sent.inc();
        tracing::trace!(feature_code, value, "report dispatched");
        Ok(())
    }
}
