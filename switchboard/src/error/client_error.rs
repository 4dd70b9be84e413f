//! Top-level client error type.

use super::{CodecError, ConfigError, ResponseError, TransportError};
use thiserror::Error;

/// Error returned by every generated client method.
///
/// ## Examples
///
/// ```rust,ignore
/// use switchboard::ClientError;
///
/// match client.get_utc_min_date_time(&ctx).await {
///     Ok(resp) => println!("{}", resp.value),
///     Err(ClientError::Response(e)) => eprintln!("service said no: {}", e.status()),
///     Err(ClientError::Transport(e)) => eprintln!("never reached the service: {e}"),
///     Err(other) => eprintln!("{other}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be completed by the transport.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered with a status outside the declared success codes.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// A request or response body could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The client or request was misconfigured.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Returns `true` if a retry policy may attempt the operation again.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retriable(),
            Self::Response(e) => e.is_retriable(),
            Self::Codec(_) | Self::Config(_) => false,
        }
    }

    /// Returns the structured response error, if this is one.
    pub fn as_response_error(&self) -> Option<&ResponseError> {
        match self {
            Self::Response(e) => Some(e),
            _ => None,
        }
    }
}
