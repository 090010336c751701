//! Top-level facade crate for vigil.
//!
//! Re-exports the wire protocol and the dispatch subsystem so embedders can
//! depend on a single crate.

pub mod core {
    pub use vigil_core::*;
}

pub mod dispatch {
    pub use vigil_dispatch::*;
}
