//! Allowlist policy evaluation.
//!
//! The active subset of the compiled-in table is selected once at startup
//! from the build profile; evaluation afterwards is a read-only lookup with
//! no I/O and no locking, safe from any calling context.

pub mod allowlist;

use crate::config::Profile;

use allowlist::{AllowlistEntry, ALLOWLIST};

/// Immutable policy runtime. Construct once at startup, then share.
#[derive(Debug)]
pub struct AllowlistPolicy {
    profile: Profile,
    entries: Vec<AllowlistEntry>,
}

impl AllowlistPolicy {
    pub fn new(profile: Profile) -> Self {
        let entries = ALLOWLIST
            .iter()
            .filter(|e| !e.engineering_only || profile == Profile::Engineering)
            .copied()
            .collect();
        Self { profile, entries }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Fail-closed lookup: unknown feature codes are denied.
    pub fn is_allowed(&self, feature_code: &str) -> bool {
        self.entries.iter().any(|e| e.feature_code == feature_code)
    }

    /// Number of live entries (exported via statusz).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_denies_engineering_codes() {
        let policy = AllowlistPolicy::new(Profile::Production);
        assert!(policy.is_allowed("INTG"));
        assert!(!policy.is_allowed("KATS"));
    }

    #[test]
    fn engineering_is_a_superset() {
        let policy = AllowlistPolicy::new(Profile::Engineering);
        assert!(policy.is_allowed("INTG"));
        assert!(policy.is_allowed("KATS"));
        assert!(policy.is_allowed("KATR"));
    }

    #[test]
    fn unknown_codes_fail_closed() {
        let policy = AllowlistPolicy::new(Profile::Engineering);
        assert!(!policy.is_allowed("KATB"));
        assert!(!policy.is_allowed(""));
        assert!(!policy.is_allowed("intg"));
    }
}
