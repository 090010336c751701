//! Shared application state for the vigil dispatch service.
//!
//! `AppState::new` wires the allowlist policy, rate window, liveness flag,
//! multicast transport, and metrics from a validated config, and activates
//! the dispatcher last so `send_message` only succeeds once everything it
//! relies on exists. Startup errors are explicit (Result instead of panic).

use std::sync::Arc;

use crate::config::DispatchConfig;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::liveness::DaemonLiveness;
use crate::obs::metrics::DispatchMetrics;
use crate::policy::AllowlistPolicy;
use crate::rate::RateWindow;
use crate::transport::MulticastTransport;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: DispatchConfig,
    dispatcher: Arc<Dispatcher>,
    rate: Arc<RateWindow>,
    liveness: Arc<DaemonLiveness>,
    transport: Arc<MulticastTransport>,
    metrics: Arc<DispatchMetrics>,
}

impl AppState {
    pub fn new(cfg: DispatchConfig) -> Result<Self> {
        cfg.validate()?;

        let policy = AllowlistPolicy::new(cfg.profile);
        tracing::info!(
            profile = ?policy.profile(),
            entries = policy.len(),
            "allowlist policy compiled"
        );

        let rate = Arc::new(RateWindow::new(cfg.limits.max_messages_per_round));
        let liveness = Arc::new(DaemonLiveness::new());
        let metrics = Arc::new(DispatchMetrics::default());
        let transport = Arc::new(MulticastTransport::new(
            cfg.transport.group_name.clone(),
            cfg.limits.queue_depth,
        ));

        let transport_for_dispatch: Arc<dyn crate::transport::Transport> = transport.clone();
        let dispatcher = Arc::new(Dispatcher::new(
            policy,
            Arc::clone(&rate),
            transport_for_dispatch,
            Arc::clone(&metrics),
        ));
        dispatcher.activate();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                dispatcher,
                rate,
                liveness,
                transport,
                metrics,
            }),
        })
    }

    pub fn cfg(&self) -> &DispatchConfig {
        &self.inner.cfg
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.inner.dispatcher)
    }

    pub fn rate(&self) -> Arc<RateWindow> {
        Arc::clone(&self.inner.rate)
    }

    pub fn liveness(&self) -> Arc<DaemonLiveness> {
        Arc::clone(&self.inner.liveness)
    }

    pub fn transport(&self) -> Arc<MulticastTransport> {
        Arc::clone(&self.inner.transport)
    }

    pub fn metrics(&self) -> Arc<DispatchMetrics> {
        Arc::clone(&self.inner.metrics)
    }

    /// Readiness for ops: the dispatcher finished startup and has not been
    /// shut down. Collector liveness stays advisory and is reported
    /// separately.
    pub fn is_ready(&self) -> bool {
        self.inner.dispatcher.is_active()
    }
}
