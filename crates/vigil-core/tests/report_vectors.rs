//! Report frame vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use bytes::Bytes;

use vigil_core::protocol::report::decode_report;

mod vector_loader;
use vector_loader::TestVector;

fn load(name: &str) -> TestVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}

#[test]
fn report_vectors() {
    let files = [
        "report_basic.json",
        "report_negative_value_empty_detail.json",
        "report_bad_version.json",
        "report_truncated_value.json",
        "report_wrong_order.json",
        "report_oversize_code.json",
        "report_bad_utf8_code.json",
        "report_empty_code.json",
        "report_trailing_bytes.json",
    ];

    for f in files {
        let v = load(f);
        let raw = v.frame.decode();
        let res = decode_report(Bytes::from(raw));

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.code(), err.code, "vector={}", v.description);
            continue;
        }

        let report = res.expect("expected ok report");
        let ex = v.expect.expect("missing expect block");

        assert_eq!(report.value, ex["value"].as_i64().unwrap(), "vector={}", v.description);
        assert_eq!(report.feature_code, ex["feature_code"].as_str().unwrap(), "vector={}", v.description);
        assert_eq!(report.detail, ex["detail"].as_str().unwrap(), "vector={}", v.description);
    }
}
