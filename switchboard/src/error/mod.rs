//! Layered error types.
//!
//! - [`ClientError`] - Top-level error returned by generated client methods
//! - [`TransportError`] - Failures while sending a request through a transport
//! - [`DispatchError`] - Fake server misconfiguration (never retriable)
//! - [`ResponseError`] - A response whose status is not a declared success
//! - [`CodecError`] - Body encoding and decoding failures
//! - [`ConfigError`] - Client, transport and operation configuration errors

mod client_error;
mod codec_error;
mod config_error;
mod dispatch_error;
mod response_error;
mod transport_error;

pub use client_error::ClientError;
pub use codec_error::CodecError;
pub use config_error::ConfigError;
pub use dispatch_error::DispatchError;
pub use response_error::{ResponseError, ERROR_CODE_HEADER};
pub use transport_error::TransportError;
