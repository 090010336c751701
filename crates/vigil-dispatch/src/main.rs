//! vigil dispatch service.
//!
//! - Loads and validates `vigil.yaml` (strict parsing)
//! - Builds the subsystem state and activates the dispatcher
//! - Binds the multicast group sockets, spawns sender + control listener
//! - Owns the round-boundary timer that resets the rate window
//! - Serves the ops endpoints

use std::net::SocketAddr;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use vigil_dispatch::{app_state, config, router, transport};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_from_file("vigil.yaml").expect("config load failed");
    let ops_listen: SocketAddr = cfg
        .ops
        .listen
        .parse()
        .expect("ops.listen must be a valid SocketAddr");
    let group_addr = cfg.transport.group_addr().expect("transport.group_addr must be valid");
    let round_interval = Duration::from_millis(cfg.limits.round_interval_ms);

    let state = app_state::AppState::new(cfg).expect("state build failed");

    transport::multicast::spawn(state.transport(), group_addr, state.liveness(), state.metrics())
        .await
        .expect("multicast transport spawn failed");

    // Round-boundary trigger. The rate window itself never resets; this
    // timer is the only caller of reset().
    {
        let rate = state.rate();
        let metrics = state.metrics();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(round_interval);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            tick.tick().await; // first tick is immediate; skip it
            loop {
                tick.tick().await;
                rate.reset();
                metrics.round_resets.inc();
                tracing::debug!("round boundary: rate window reset");
            }
        });
    }

    let app = router::build_router(state);

    tracing::info!(%ops_listen, "vigil-dispatch starting");
    let listener = tokio::net::TcpListener::bind(ops_listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
