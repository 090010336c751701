//! Control frames on the channel's control path.
//!
//! The collector announces readiness (`Ready`) after it has joined the
//! listener group, and may announce departure (`Bye`). Both are header-only
//! frames; the dispatch side treats them as advisory liveness signals.

use bytes::{Buf, Bytes};

use crate::error::TransportError;
use crate::protocol::{FRAME_VERSION, KIND_BYE, KIND_READY};

/// Parsed control frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFrame {
    /// Collector has joined the group and is consuming reports.
    Ready,
    /// Collector is going away.
    Bye,
}

/// Encode a control frame. Infallible: the frame is two bytes.
pub fn encode_control(frame: ControlFrame) -> [u8; 2] {
    let kind = match frame {
        ControlFrame::Ready => KIND_READY,
        ControlFrame::Bye => KIND_BYE,
    };
    [FRAME_VERSION, kind]
}

/// Decode a control frame.
pub fn decode_control(mut buf: Bytes) -> Result<ControlFrame, TransportError> {
    if buf.remaining() < 2 {
        return Err(TransportError::Malformed("control frame too short".into()));
    }
    let v = buf.get_u8();
    if v != FRAME_VERSION {
        return Err(TransportError::UnsupportedVersion);
    }
    match buf.get_u8() {
        KIND_READY => Ok(ControlFrame::Ready),
        KIND_BYE => Ok(ControlFrame::Bye),
        other => Err(TransportError::Malformed(format!("unknown control kind {other:#04x}"))),
    }
}
