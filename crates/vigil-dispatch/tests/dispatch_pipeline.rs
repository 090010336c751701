//! End-to-end pipeline behavior against isolated component instances.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use vigil_core::error::{DispatchError, STATUS_DENY, STATUS_INVALID, STATUS_OK};
use vigil_dispatch::app_state::AppState;
use vigil_dispatch::config;
use vigil_dispatch::dispatch::Dispatcher;
use vigil_dispatch::obs::metrics::DispatchMetrics;
use vigil_dispatch::policy::AllowlistPolicy;
use vigil_dispatch::rate::RateWindow;
use vigil_dispatch::transport::{FailingTransport, MemoryTransport, Transport};

use vigil_dispatch::config::Profile;

fn build(max_per_round: u32, transport: Arc<dyn Transport>) -> (Dispatcher, Arc<RateWindow>) {
    let rate = Arc::new(RateWindow::new(max_per_round));
    let dispatcher = Dispatcher::new(
        AllowlistPolicy::new(Profile::Engineering),
        Arc::clone(&rate),
        transport,
        Arc::new(DispatchMetrics::default()),
    );
    dispatcher.activate();
    (dispatcher, rate)
}

#[test]
fn allowlisted_code_dispatches_and_consumes_one_slot() {
    let transport = Arc::new(MemoryTransport::new());
    let (dispatcher, rate) = build(10, transport.clone());

    assert_eq!(dispatcher.send_message_status(Some("KATS"), Some("self test"), 0), STATUS_OK);
    assert_eq!(rate.count(), 1);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].feature_code, "KATS");
    assert_eq!(sent[0].detail, "self test");
    assert_eq!(sent[0].value, 0);
}

#[test]
fn unlisted_code_is_denied_without_consuming_a_slot() {
    let transport = Arc::new(MemoryTransport::new());
    let (dispatcher, rate) = build(10, transport.clone());

    let err = dispatcher.send_message(Some("KATB"), Some("self test"), 0).expect_err("must deny");
    assert!(matches!(err, DispatchError::Denied));
    assert_eq!(err.status(), STATUS_DENY);
    assert_eq!(rate.count(), 0);
    assert!(transport.sent().is_empty());
}

#[test]
fn absent_fields_are_invalid_and_never_touch_the_rate_counter() {
    let (dispatcher, rate) = build(10, Arc::new(MemoryTransport::new()));

    for (code, detail) in [(None, Some("x")), (Some("KATS"), None), (None, None)] {
        let err = dispatcher.send_message(code, detail, 0).expect_err("must reject");
        assert!(matches!(err, DispatchError::InvalidArgument(_)));
        assert_eq!(err.status(), STATUS_INVALID);
    }
    assert_eq!(rate.count(), 0);

    // Empty detail is fine; absence is what gets rejected.
    assert!(dispatcher.send_message(Some("KATS"), Some(""), 0).is_ok());
}

#[test]
fn exhausted_budget_denies_and_leaves_count_unchanged() {
    let (dispatcher, rate) = build(5, Arc::new(MemoryTransport::new()));

    let old_count = rate.count();
    rate.set_count(rate.max_per_round());

    let err = dispatcher.send_message(Some("KATR"), Some("self test"), 0).expect_err("must deny");
    assert!(matches!(err, DispatchError::Denied));
    assert_eq!(rate.count(), rate.max_per_round());

    // Restoring the counter makes the same call succeed.
    rate.set_count(old_count);
    assert!(dispatcher.send_message(Some("KATR"), Some("self test"), 0).is_ok());
}

#[test]
fn round_reset_reopens_a_rate_denied_code() {
    let (dispatcher, rate) = build(2, Arc::new(MemoryTransport::new()));

    assert!(dispatcher.send_message(Some("KATS"), Some("a"), 1).is_ok());
    assert!(dispatcher.send_message(Some("KATS"), Some("b"), 2).is_ok());
    assert!(matches!(
        dispatcher.send_message(Some("KATS"), Some("c"), 3),
        Err(DispatchError::Denied)
    ));

    rate.reset();
    assert!(dispatcher.send_message(Some("KATS"), Some("c"), 3).is_ok());
}

#[test]
fn unactivated_dispatcher_denies_everything() {
    let rate = Arc::new(RateWindow::new(10));
    let dispatcher = Dispatcher::new(
        AllowlistPolicy::new(Profile::Engineering),
        Arc::clone(&rate),
        Arc::new(MemoryTransport::new()),
        Arc::new(DispatchMetrics::default()),
    );

    let err = dispatcher.send_message(Some("KATS"), Some("x"), 0).expect_err("must fail");
    assert!(matches!(err, DispatchError::NotInitialized));
    assert_eq!(err.status(), STATUS_DENY);
    assert_eq!(rate.count(), 0);

    dispatcher.activate();
    assert!(dispatcher.send_message(Some("KATS"), Some("x"), 0).is_ok());

    dispatcher.shutdown();
    assert!(matches!(
        dispatcher.send_message(Some("KATS"), Some("x"), 0),
        Err(DispatchError::NotInitialized)
    ));
}

#[test]
fn transport_failure_still_consumes_the_slot() {
    let (dispatcher, rate) = build(10, Arc::new(FailingTransport));

    let err = dispatcher.send_message(Some("KATS"), Some("x"), 0).expect_err("must fail");
    assert!(matches!(err, DispatchError::Transport(_)));
    assert!(err.status() < 0);
    assert_ne!(err.status(), STATUS_DENY);
    assert_ne!(err.status(), STATUS_INVALID);

    // Deliberate: no rollback after a failed transmit.
    assert_eq!(rate.count(), 1);
}

#[test]
fn denied_sends_do_not_move_the_liveness_flag() {
    let cfg = config::load_from_str(
        r#"
version: 1
profile: engineering
"#,
    )
    .unwrap();
    let state = AppState::new(cfg).unwrap();

    assert!(!state.liveness().is_ready());
    let _ = state.dispatcher().send_message(Some("KATB"), Some("x"), 0);
    let _ = state.dispatcher().send_message(Some("KATS"), Some("x"), 0);
    assert!(!state.liveness().is_ready());
}
