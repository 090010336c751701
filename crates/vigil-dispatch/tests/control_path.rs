//! Control-path behavior: liveness transitions and outbound backpressure.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use vigil_core::protocol::control::ControlFrame;
use vigil_core::protocol::report::Report;

use vigil_dispatch::liveness::DaemonLiveness;
use vigil_dispatch::transport::multicast::apply_control;
use vigil_dispatch::transport::{MulticastTransport, Transport};

#[test]
fn ready_then_bye_drives_the_liveness_flag() {
    let liveness = DaemonLiveness::new();
    assert!(!liveness.is_ready());

    apply_control(ControlFrame::Ready, &liveness);
    assert!(liveness.is_ready());

    // Readiness is advisory and may regress when the collector leaves.
    apply_control(ControlFrame::Bye, &liveness);
    assert!(!liveness.is_ready());

    apply_control(ControlFrame::Ready, &liveness);
    assert!(liveness.is_ready());
}

#[test]
fn full_outbound_queue_drops_the_frame_with_queue_full() {
    let depth = 16;
    let transport = MulticastTransport::new("vigil-events", depth);
    let report = Report::new("SELF", "queue probe", 1);

    // Nothing drains the queue: no sender task was spawned.
    for _ in 0..depth {
        transport.transmit(&report).unwrap();
    }

    let err = transport.transmit(&report).expect_err("queue must be full");
    assert_eq!(err.code(), "QUEUE_FULL");
    assert_eq!(err.status(), -11);
}
