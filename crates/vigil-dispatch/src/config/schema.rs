use std::net::SocketAddr;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    pub version: u32,

    #[serde(default)]
    pub profile: Profile,

    #[serde(default)]
    pub limits: LimitsSection,

    #[serde(default)]
    pub transport: TransportSection,

    #[serde(default)]
    pub ops: OpsSection,
}

impl DispatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ConfigError::Invalid("version must be 1".into()));
        }
        self.limits.validate()?;
        self.transport.validate()?;
        self.ops.validate()?;
        Ok(())
    }
}

/// Build profile selecting the active allowlist subset.
///
/// Engineering builds additionally permit the self-test feature codes;
/// production is the narrow default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Production,
    Engineering,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsSection {
    #[serde(default = "default_max_messages_per_round")]
    pub max_messages_per_round: u32,

    #[serde(default = "default_round_interval_ms")]
    pub round_interval_ms: u64,

    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            max_messages_per_round: default_max_messages_per_round(),
            round_interval_ms: default_round_interval_ms(),
            queue_depth: default_queue_depth(),
        }
    }
}

impl LimitsSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=10_000).contains(&self.max_messages_per_round) {
            return Err(ConfigError::Invalid(
                "limits.max_messages_per_round must be between 1 and 10000".into(),
            ));
        }
        if !(1_000..=3_600_000).contains(&self.round_interval_ms) {
            return Err(ConfigError::Invalid(
                "limits.round_interval_ms must be between 1000 and 3600000".into(),
            ));
        }
        if !(16..=65_536).contains(&self.queue_depth) {
            return Err(ConfigError::Invalid(
                "limits.queue_depth must be between 16 and 65536".into(),
            ));
        }
        Ok(())
    }
}

fn default_max_messages_per_round() -> u32 {
    50
}
fn default_round_interval_ms() -> u64 {
    60_000
}
fn default_queue_depth() -> usize {
    1024
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransportSection {
    #[serde(default = "default_group_name")]
    pub group_name: String,

    #[serde(default = "default_group_addr")]
    pub group_addr: String,
}

impl Default for TransportSection {
    fn default() -> Self {
        Self {
            group_name: default_group_name(),
            group_addr: default_group_addr(),
        }
    }
}

impl TransportSection {
    pub fn validate(&self) -> Result<()> {
        if self.group_name.is_empty() {
            return Err(ConfigError::Invalid("transport.group_name must not be empty".into()));
        }
        let addr = self.group_addr()?;
        if !addr.ip().is_multicast() {
            return Err(ConfigError::Invalid(
                "transport.group_addr must be a multicast address".into(),
            ));
        }
        Ok(())
    }

    pub fn group_addr(&self) -> Result<SocketAddr> {
        self.group_addr
            .parse()
            .map_err(|_| ConfigError::Invalid("transport.group_addr must be a socket address".into()))
    }
}

fn default_group_name() -> String {
    "vigil-events".into()
}
fn default_group_addr() -> String {
    "239.103.212.79:6417".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpsSection {
    #[serde(default = "default_ops_listen")]
    pub listen: String,
}

impl Default for OpsSection {
    fn default() -> Self {
        Self {
            listen: default_ops_listen(),
        }
    }
}

impl OpsSection {
    pub fn validate(&self) -> Result<()> {
        self.listen
            .parse::<SocketAddr>()
            .map(|_| ())
            .map_err(|_| ConfigError::Invalid("ops.listen must be a socket address".into()))
    }
}

fn default_ops_listen() -> String {
    "127.0.0.1:9095".into()
}
