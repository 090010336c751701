//! Report frame encoding/decoding (panic-free).
//!
//! A report carries three typed attributes in a fixed order: the signed
//! 64-bit value, the feature code, and the detail string. Each attribute is
//! `type (u8) | len (u16 LE) | payload`. Attribute maxima are hard limits:
//! an over-long field is an encode error, never a silent truncation.
//!
//! Parsing rules:
//! - Never index (`buf[0]`) — always use `Buf` and `remaining()` checks.
//! - Never `unwrap()` / `expect()` / `panic!()` in production paths.

use bytes::{Buf, BufMut, Bytes};

use crate::error::TransportError;
use crate::protocol::{FRAME_VERSION, KIND_REPORT};

/// Attribute type: signed 64-bit value (8 bytes, little endian).
pub const ATTR_VALUE: u8 = 0x01;
/// Attribute type: feature code (UTF-8, 1..=MAX_FEATURE_CODE_LEN bytes).
pub const ATTR_FEATURE_CODE: u8 = 0x02;
/// Attribute type: detail string (UTF-8, 0..=MAX_DETAIL_LEN bytes).
pub const ATTR_DETAIL: u8 = 0x03;

/// Maximum feature-code length on the wire, in bytes.
pub const MAX_FEATURE_CODE_LEN: usize = 32;
/// Maximum detail length on the wire, in bytes.
pub const MAX_DETAIL_LEN: usize = 1024;

const ATTR_HEADER_LEN: usize = 3;

/// Largest possible encoded report frame.
pub const MAX_REPORT_FRAME_LEN: usize =
    2 + (ATTR_HEADER_LEN + 8) + (ATTR_HEADER_LEN + MAX_FEATURE_CODE_LEN) + (ATTR_HEADER_LEN + MAX_DETAIL_LEN);

/// Diagnostic report. Value object; never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Short identifier naming the calling subsystem/use case. Uppercase by
    /// convention (documented, not enforced).
    pub feature_code: String,
    /// Free-form descriptive string; may be empty.
    pub detail: String,
    /// Signed 64-bit payload; semantics are caller-defined.
    pub value: i64,
}

impl Report {
    pub fn new(feature_code: impl Into<String>, detail: impl Into<String>, value: i64) -> Self {
        Self {
            feature_code: feature_code.into(),
            detail: detail.into(),
            value,
        }
    }
}

/// Encode a report into a wire frame.
///
/// Fails with `AttributeTooLong` when a field exceeds its wire maximum and
/// with `Alloc` when the buffer reservation fails. The returned frame is
/// fully self-contained; no aliasing of the input survives the call.
pub fn encode_report(report: &Report) -> Result<Bytes, TransportError> {
    let code = report.feature_code.as_bytes();
    let detail = report.detail.as_bytes();

    if code.len() > MAX_FEATURE_CODE_LEN {
        return Err(TransportError::AttributeTooLong { field: "feature_code" });
    }
    if detail.len() > MAX_DETAIL_LEN {
        return Err(TransportError::AttributeTooLong { field: "detail" });
    }

    let total = 2 + (ATTR_HEADER_LEN + 8) + (ATTR_HEADER_LEN + code.len()) + (ATTR_HEADER_LEN + detail.len());

    let mut buf = Vec::new();
    buf.try_reserve_exact(total).map_err(|_| TransportError::Alloc)?;

    buf.put_u8(FRAME_VERSION);
    buf.put_u8(KIND_REPORT);

    buf.put_u8(ATTR_VALUE);
    buf.put_u16_le(8);
    buf.put_i64_le(report.value);

    buf.put_u8(ATTR_FEATURE_CODE);
    buf.put_u16_le(code.len() as u16);
    buf.put_slice(code);

    buf.put_u8(ATTR_DETAIL);
    buf.put_u16_le(detail.len() as u16);
    buf.put_slice(detail);

    Ok(Bytes::from(buf))
}

fn read_attr(buf: &mut Bytes, want: u8, max_len: usize) -> Result<Bytes, TransportError> {
    if buf.remaining() < ATTR_HEADER_LEN {
        return Err(TransportError::Malformed("truncated attribute header".into()));
    }
    let ty = buf.get_u8();
    if ty != want {
        return Err(TransportError::Malformed(format!(
            "attribute out of order: got {ty:#04x}, want {want:#04x}"
        )));
    }
    let len = buf.get_u16_le() as usize;
    if len > max_len {
        return Err(TransportError::Malformed(format!("attribute {want:#04x} exceeds max")));
    }
    if buf.remaining() < len {
        return Err(TransportError::Malformed("truncated attribute payload".into()));
    }
    Ok(buf.copy_to_bytes(len))
}

/// Decode a report frame.
///
/// Used by the collector side and by tooling; enforces the same version,
/// order, and length rules the encoder guarantees.
pub fn decode_report(mut buf: Bytes) -> Result<Report, TransportError> {
    if buf.remaining() < 2 {
        return Err(TransportError::Malformed("frame too short".into()));
    }
    let v = buf.get_u8();
    if v != FRAME_VERSION {
        return Err(TransportError::UnsupportedVersion);
    }
    let kind = buf.get_u8();
    if kind != KIND_REPORT {
        return Err(TransportError::Malformed(format!("not a report frame: kind {kind:#04x}")));
    }

    let value_attr = read_attr(&mut buf, ATTR_VALUE, 8)?;
    if value_attr.len() != 8 {
        return Err(TransportError::Malformed("value attribute must be 8 bytes".into()));
    }
    let mut value_buf = value_attr;
    let value = value_buf.get_i64_le();

    let code = read_attr(&mut buf, ATTR_FEATURE_CODE, MAX_FEATURE_CODE_LEN)?;
    if code.is_empty() {
        return Err(TransportError::Malformed("empty feature code".into()));
    }
    let feature_code = std::str::from_utf8(&code)
        .map_err(|_| TransportError::Malformed("feature code not utf-8".into()))?
        .to_string();

    let detail_bytes = read_attr(&mut buf, ATTR_DETAIL, MAX_DETAIL_LEN)?;
    let detail = std::str::from_utf8(&detail_bytes)
        .map_err(|_| TransportError::Malformed("detail not utf-8".into()))?
        .to_string();

    if buf.has_remaining() {
        return Err(TransportError::Malformed("trailing bytes after detail".into()));
    }

    Ok(Report { feature_code, detail, value })
}
