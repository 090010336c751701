//! vigil core: wire-level report/control frames and the error surface.
//!
//! This crate defines the bounded attribute encoding used between the
//! in-process dispatch subsystem and the collector daemon, plus the error
//! taxonomy shared by both sides. It intentionally carries no transport or
//! runtime dependencies so it can be reused by the collector and by tooling.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `DispatchError`/`TransportError` so a
//! buggy or adversarial caller can never bring down the host process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{DispatchError, Result, TransportError};
