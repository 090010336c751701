//! Dispatch config loader (strict parsing).

pub mod schema;

use std::fs;

use crate::error::{ConfigError, Result};

pub use schema::{DispatchConfig, LimitsSection, OpsSection, Profile, TransportSection};

pub fn load_from_file(path: &str) -> Result<DispatchConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<DispatchConfig> {
    let cfg: DispatchConfig = serde_yaml::from_str(s)
        .map_err(|e| ConfigError::Invalid(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
