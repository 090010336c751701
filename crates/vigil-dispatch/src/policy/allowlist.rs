//! Compiled-in allowlist table.
//!
//! Every feature code that may reach the collector is enumerated here;
//! anything not in the table is denied. Entries flagged `engineering_only`
//! are live only when the service runs under the engineering profile.

/// One allowlist entry.
#[derive(Debug, Clone, Copy)]
pub struct AllowlistEntry {
    /// Feature code, uppercase by convention.
    pub feature_code: &'static str,
    /// Live only under [`Profile::Engineering`](crate::config::Profile).
    pub engineering_only: bool,
}

const fn entry(feature_code: &'static str) -> AllowlistEntry {
    AllowlistEntry { feature_code, engineering_only: false }
}

const fn eng_entry(feature_code: &'static str) -> AllowlistEntry {
    AllowlistEntry { feature_code, engineering_only: true }
}

/// The full table. Unknown codes are denied by default; there is no
/// wildcard entry.
pub const ALLOWLIST: &[AllowlistEntry] = &[
    // production reporters
    entry("AUTH"),
    entry("BOOT"),
    entry("INTG"),
    entry("KEYS"),
    entry("NETP"),
    entry("SELF"),
    // self-test codes, engineering builds only
    eng_entry("KATR"),
    eng_entry("KATS"),
    eng_entry("KNIT"),
];
