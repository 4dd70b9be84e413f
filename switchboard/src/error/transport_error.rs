//! Errors raised while a transport handles a request.

use thiserror::Error;

use super::{CodecError, DispatchError};
use crate::context::Interruption;

/// Errors from a [`Transport`](crate::Transport).
///
/// Fake transports surface configuration defects through
/// [`TransportError::Dispatch`]; the network transport surfaces
/// connection-level failures. Both honour caller cancellation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A fake server was misconfigured. Never retriable.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The request body did not match the operation's schema.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The caller's context was cancelled before a response arrived.
    #[error("context canceled")]
    Cancelled,

    /// The caller's context deadline elapsed before a response arrived.
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// HTTP request failed due to a network or protocol error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to establish a connection to the server.
    #[error("Connection failed: {0}")]
    Connection(String),
}

impl TransportError {
    /// Returns `true` if a retry policy may resend the request.
    ///
    /// Only connection-level failures qualify. Dispatch and codec errors
    /// describe defects that a retry cannot fix, and an interrupted caller
    /// has already given up.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            Self::Dispatch(_) | Self::Codec(_) | Self::Cancelled | Self::DeadlineExceeded => false,
        }
    }

    /// Returns `true` if the caller's context ended the request.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

impl From<Interruption> for TransportError {
    fn from(interruption: Interruption) -> Self {
        match interruption {
            Interruption::Cancelled => Self::Cancelled,
            Interruption::DeadlineExceeded => Self::DeadlineExceeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_is_retriable() {
        let err = TransportError::Connection("connection refused".to_string());
        assert!(err.is_retriable());
    }

    #[test]
    fn test_dispatch_is_not_retriable() {
        let err = TransportError::from(DispatchError::MissingOperationName);
        assert!(!err.is_retriable());
    }

    #[test]
    fn test_codec_is_not_retriable() {
        let err = TransportError::from(CodecError::EmptyBody);
        assert!(!err.is_retriable());
    }

    #[test]
    fn test_interruptions() {
        let cancelled = TransportError::from(Interruption::Cancelled);
        assert!(matches!(cancelled, TransportError::Cancelled));
        assert!(cancelled.is_interrupted());
        assert!(!cancelled.is_retriable());

        let deadline = TransportError::from(Interruption::DeadlineExceeded);
        assert_eq!(deadline.to_string(), "context deadline exceeded");
    }
}
