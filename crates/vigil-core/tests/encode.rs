//! Encoder-side contract tests: hard attribute bounds and fixed field order.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use bytes::Bytes;

use vigil_core::protocol::control::{decode_control, encode_control, ControlFrame};
use vigil_core::protocol::report::{
    decode_report, encode_report, Report, MAX_DETAIL_LEN, MAX_FEATURE_CODE_LEN,
};
use vigil_core::protocol::{frame_kind, KIND_READY, KIND_REPORT};

#[test]
fn oversize_feature_code_is_an_error_not_a_truncation() {
    let report = Report::new("X".repeat(MAX_FEATURE_CODE_LEN + 1), "detail", 0);
    let err = encode_report(&report).expect_err("must fail");
    assert_eq!(err.code(), "ATTR_TOO_LONG");
    assert_eq!(err.status(), -90);
}

#[test]
fn oversize_detail_is_an_error_not_a_truncation() {
    let report = Report::new("SELF", "d".repeat(MAX_DETAIL_LEN + 1), 0);
    let err = encode_report(&report).expect_err("must fail");
    assert_eq!(err.code(), "ATTR_TOO_LONG");
}

#[test]
fn detail_at_exact_maximum_encodes() {
    let report = Report::new("SELF", "d".repeat(MAX_DETAIL_LEN), 0);
    assert!(encode_report(&report).is_ok());
}

#[test]
fn encoded_frame_layout_is_fixed() {
    let report = Report::new("BOOT", "up", 2);
    let frame = encode_report(&report).unwrap();

    // header, then value / feature code / detail in that order
    assert_eq!(frame[0], 1);
    assert_eq!(frame[1], KIND_REPORT);
    assert_eq!(frame[2], 0x01, "value attribute first");
    assert_eq!(frame[13], 0x02, "feature code attribute second");
    assert_eq!(frame[20], 0x03, "detail attribute last");
    assert_eq!(frame_kind(&frame), Some(KIND_REPORT));

    let decoded = decode_report(frame).unwrap();
    assert_eq!(decoded, report);
}

#[test]
fn control_frames_carry_version_and_kind_only() {
    let ready = encode_control(ControlFrame::Ready);
    assert_eq!(ready, [1, KIND_READY]);
    assert_eq!(decode_control(Bytes::copy_from_slice(&ready)).unwrap(), ControlFrame::Ready);

    let bye = encode_control(ControlFrame::Bye);
    assert_eq!(decode_control(Bytes::copy_from_slice(&bye)).unwrap(), ControlFrame::Bye);

    let err = decode_control(Bytes::from_static(&[1, 0x7f])).expect_err("unknown kind");
    assert_eq!(err.code(), "MALFORMED");
}
