//! UDP multicast delivery and the control-path listener.
//!
//! Outbound: `transmit` encodes the report and `try_send`s the frame into a
//! bounded queue; a spawned sender task drains the queue to the configured
//! multicast group. Delivery with no listener discards silently: that is
//! the fire-and-forget contract, not an error. A full queue drops the frame
//! (`QueueFull`); message loss on backpressure is an accepted outcome.
//!
//! Inbound: a listener joined to the same group watches the control path.
//! `Ready` marks the collector live, `Bye` marks it lost. Report frames
//! looped back from ourselves are ignored.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

use vigil_core::error::TransportError;
use vigil_core::protocol::control::{decode_control, ControlFrame};
use vigil_core::protocol::report::{encode_report, Report, MAX_REPORT_FRAME_LEN};
use vigil_core::protocol::{frame_kind, KIND_REPORT};

use crate::liveness::DaemonLiveness;
use crate::obs::metrics::DispatchMetrics;

use super::Transport;

/// Multicast-backed transport addressed to a single named listener group.
#[derive(Debug)]
pub struct MulticastTransport {
    group_name: String,
    frame_tx: mpsc::Sender<Bytes>,
    frame_rx: Mutex<Option<mpsc::Receiver<Bytes>>>,
}

impl MulticastTransport {
    pub fn new(group_name: impl Into<String>, queue_depth: usize) -> Self {
        let (frame_tx, frame_rx) = mpsc::channel(queue_depth);
        Self {
            group_name: group_name.into(),
            frame_tx,
            frame_rx: Mutex::new(Some(frame_rx)),
        }
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    fn take_frame_rx(&self) -> Option<mpsc::Receiver<Bytes>> {
        self.frame_rx.lock().ok().and_then(|mut g| g.take())
    }
}

impl Transport for MulticastTransport {
    fn transmit(&self, report: &Report) -> Result<(), TransportError> {
        let frame = encode_report(report)?;
        self.frame_tx.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => TransportError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => TransportError::Closed,
        })
    }
}

/// Bind the group sockets and spawn the sender and control-listener tasks.
///
/// Call once after [`MulticastTransport::new`]; a second call finds the
/// frame queue already claimed and fails.
pub async fn spawn(
    transport: Arc<MulticastTransport>,
    group_addr: SocketAddr,
    liveness: Arc<DaemonLiveness>,
    metrics: Arc<DispatchMetrics>,
) -> std::io::Result<()> {
    let frame_rx = transport.take_frame_rx().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::AlreadyExists, "transport already spawned")
    })?;

    let send_sock = match group_addr {
        SocketAddr::V4(_) => {
            let s = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
            s.set_multicast_loop_v4(false)?;
            s
        }
        SocketAddr::V6(_) => {
            let s = UdpSocket::bind((Ipv6Addr::UNSPECIFIED, 0)).await?;
            s.set_multicast_loop_v6(false)?;
            s
        }
    };

    let ctrl_sock = match group_addr.ip() {
        IpAddr::V4(group) => {
            let s = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, group_addr.port())).await?;
            s.join_multicast_v4(group, Ipv4Addr::UNSPECIFIED)?;
            s
        }
        IpAddr::V6(group) => {
            let s = UdpSocket::bind((Ipv6Addr::UNSPECIFIED, group_addr.port())).await?;
            s.join_multicast_v6(&group, 0)?;
            s
        }
    };

    tracing::info!(group = %transport.group_name(), %group_addr, "multicast transport up");

    tokio::spawn(sender_loop(send_sock, frame_rx, group_addr, metrics.clone()));
    tokio::spawn(control_loop(ctrl_sock, liveness, metrics));

    Ok(())
}

async fn sender_loop(
    sock: UdpSocket,
    mut frame_rx: mpsc::Receiver<Bytes>,
    group_addr: SocketAddr,
    metrics: Arc<DispatchMetrics>,
) {
    while let Some(frame) = frame_rx.recv().await {
        if let Err(e) = sock.send_to(&frame, group_addr).await {
            metrics.transport_errors.inc("DELIVERY");
            tracing::warn!(error = %e, "multicast send failed, frame dropped");
        }
    }
    tracing::debug!("sender loop finished: frame queue closed");
}

async fn control_loop(sock: UdpSocket, liveness: Arc<DaemonLiveness>, metrics: Arc<DispatchMetrics>) {
    let mut buf = [0u8; MAX_REPORT_FRAME_LEN];
    loop {
        let (n, from) = match sock.recv_from(&mut buf).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "control socket recv failed");
                continue;
            }
        };

        // Our own report frames come back when loopback suppression is not
        // honored; they are not control traffic.
        if frame_kind(&buf[..n]) == Some(KIND_REPORT) {
            continue;
        }

        match decode_control(Bytes::copy_from_slice(&buf[..n])) {
            Ok(frame) => {
                metrics.control_frames.inc(control_label(frame));
                apply_control(frame, &liveness);
                tracing::info!(?frame, %from, "control frame");
            }
            Err(e) => {
                metrics.control_frames.inc("invalid");
                tracing::debug!(error = %e, %from, "ignoring bad control frame");
            }
        }
    }
}

fn control_label(frame: ControlFrame) -> &'static str {
    match frame {
        ControlFrame::Ready => "ready",
        ControlFrame::Bye => "bye",
    }
}

/// Route one control frame into the liveness flag.
pub fn apply_control(frame: ControlFrame, liveness: &DaemonLiveness) {
    match frame {
        ControlFrame::Ready => liveness.mark_ready(),
        ControlFrame::Bye => liveness.mark_lost(),
    }
}
