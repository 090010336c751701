//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness
//! - `/readyz`  : readiness (503 until the dispatcher is activated)
//! - `/metrics` : Prometheus text format
//! - `/statusz` : JSON snapshot of the subsystem state

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::app_state::AppState;
use crate::config::Profile;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_ready() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "starting")
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let rate = state.rate();
    let extra = [
        ("vigil_daemon_ready", u64::from(state.liveness().is_ready())),
        ("vigil_rate_window_count", u64::from(rate.count())),
        ("vigil_rate_window_max", u64::from(rate.max_per_round())),
    ];
    let body = state.metrics().render(&extra);

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}

pub async fn statusz(State(state): State<AppState>) -> Response {
    let rate = state.rate();
    let body = json!({
        "profile": profile_str(state.cfg().profile),
        "group": state.transport().group_name(),
        "daemon_ready": state.liveness().is_ready(),
        "allowlist_entries": state.dispatcher().policy().len(),
        "rate": {
            "count": rate.count(),
            "max_per_round": rate.max_per_round(),
        },
    });

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

fn profile_str(profile: Profile) -> &'static str {
    match profile {
        Profile::Production => "production",
        Profile::Engineering => "engineering",
    }
}
