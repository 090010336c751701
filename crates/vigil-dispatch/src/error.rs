//! Startup-time errors for the dispatch service.
//!
//! Pipeline errors live in `vigil-core`; this covers config loading and
//! service wiring, which fail the boot instead of a dispatch call.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(String),
    #[error("config invalid: {0}")]
    Invalid(String),
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
