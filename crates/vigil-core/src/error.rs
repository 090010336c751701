//! Shared error types across vigil crates.

use thiserror::Error;

/// Status value returned across the embedding boundary on success.
pub const STATUS_OK: i32 = 0;

/// Distinguished sentinel for policy refusal, rate refusal, and calls made
/// before the subsystem finished startup. Deliberately distinct from every
/// negative errno used by [`TransportError::status`].
pub const STATUS_DENY: i32 = -1;

/// Status value for a missing/absent caller field (`-EINVAL`).
pub const STATUS_INVALID: i32 = -22;

/// Shared result type.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Failures inside the encoder/transport layer.
///
/// None of these are retried by the transport; retry policy, if any,
/// belongs to the caller.
#[derive(Debug, Error)]
pub enum TransportError {
    /// An attribute exceeds its wire maximum. Never silently truncated.
    #[error("attribute too long: {field}")]
    AttributeTooLong { field: &'static str },
    /// Wire buffer reservation failed.
    #[error("wire buffer allocation failed")]
    Alloc,
    /// Outbound queue is full (backpressure); the frame is dropped.
    #[error("outbound queue full")]
    QueueFull,
    /// Outbound queue receiver is gone (transport shut down).
    #[error("transport closed")]
    Closed,
    /// Frame carries an unknown protocol version.
    #[error("unsupported frame version")]
    UnsupportedVersion,
    /// Frame violates the wire contract (length, order, encoding).
    #[error("malformed frame: {0}")]
    Malformed(String),
    /// Delivery primitive reported an error.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl TransportError {
    /// Stable string code used by metrics labels and test vectors.
    pub fn code(&self) -> &'static str {
        match self {
            TransportError::AttributeTooLong { .. } => "ATTR_TOO_LONG",
            TransportError::Alloc => "ALLOC",
            TransportError::QueueFull => "QUEUE_FULL",
            TransportError::Closed => "CLOSED",
            TransportError::UnsupportedVersion => "UNSUPPORTED_VERSION",
            TransportError::Malformed(_) => "MALFORMED",
            TransportError::Delivery(_) => "DELIVERY",
        }
    }

    /// Negative errno-style status for the embedding boundary.
    pub fn status(&self) -> i32 {
        match self {
            TransportError::AttributeTooLong { .. } => -90, // EMSGSIZE
            TransportError::Alloc => -12,                   // ENOMEM
            TransportError::QueueFull => -11,               // EAGAIN
            TransportError::Closed => -32,                  // EPIPE
            TransportError::UnsupportedVersion => -71,      // EPROTO
            TransportError::Malformed(_) => -74,            // EBADMSG
            TransportError::Delivery(_) => -5,              // EIO
        }
    }
}

/// Failures surfaced by the dispatch pipeline.
///
/// Nothing here is fatal to the calling subsystem: every path returns a
/// value and the host keeps running.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Subsystem has not completed startup (or has been shut down).
    #[error("dispatch subsystem not initialized")]
    NotInitialized,
    /// A required caller field is absent.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// Policy or rate-limit refusal. Expected and frequent; counted, not
    /// logged as an error.
    #[error("dispatch denied")]
    Denied,
    /// Encoder/transport failure, distinguishable from a policy denial.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl DispatchError {
    /// Stable string code used by metrics labels and test vectors.
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::NotInitialized => "NOT_INITIALIZED",
            DispatchError::InvalidArgument(_) => "INVALID_ARGUMENT",
            DispatchError::Denied => "DENY",
            DispatchError::Transport(e) => e.code(),
        }
    }

    /// Map to the integer convention of the embedding boundary:
    /// `-EINVAL` for absent fields, [`STATUS_DENY`] for policy/rate refusal
    /// and un-initialized state, negative errno for transport failures.
    pub fn status(&self) -> i32 {
        match self {
            DispatchError::NotInitialized => STATUS_DENY,
            DispatchError::InvalidArgument(_) => STATUS_INVALID,
            DispatchError::Denied => STATUS_DENY,
            DispatchError::Transport(e) => e.status(),
        }
    }
}
