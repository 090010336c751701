#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use vigil_dispatch::config::{self, Profile};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
limitz: { max_messages_per_round: 5 } # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("invalid yaml"));
}

#[test]
fn ok_minimal_config_applies_defaults() {
    let ok = r#"
version: 1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.profile, Profile::Production);
    assert_eq!(cfg.limits.max_messages_per_round, 50);
    assert_eq!(cfg.transport.group_name, "vigil-events");
}

#[test]
fn out_of_range_budget_is_rejected() {
    let bad = r#"
version: 1
limits:
  max_messages_per_round: 0
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("max_messages_per_round"));
}

#[test]
fn non_multicast_group_addr_is_rejected() {
    let bad = r#"
version: 1
transport:
  group_addr: "127.0.0.1:6417"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("multicast"));
}

#[test]
fn engineering_profile_parses() {
    let ok = r#"
version: 1
profile: engineering
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.profile, Profile::Engineering);
}
