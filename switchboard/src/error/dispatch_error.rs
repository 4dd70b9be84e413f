//! Fake server configuration errors.

use std::time::Duration;

use thiserror::Error;

/// A fake server could not dispatch a request.
///
/// Every variant indicates a defect in test wiring or a version skew between
/// a client and its fake, so none of them is ever retriable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The request did not carry an operation name.
    #[error("unable to dispatch request, missing value for operation name")]
    MissingOperationName,

    /// No dispatch function is registered for the operation.
    #[error("unhandled API {operation}")]
    UnhandledOperation { operation: String },

    /// No fake is registered for the operation's client.
    #[error("unhandled client {client}")]
    UnhandledClient { client: String },

    /// The fake server left the operation's responder unset.
    #[error("fake for method {method} not implemented")]
    NotImplemented { method: String },

    /// The responder returned a status outside the declared success codes.
    #[error("unexpected status code {status}. acceptable values are {acceptable:?}")]
    UnexpectedStatus { status: u16, acceptable: Vec<u16> },

    /// The responder returned a declared error whose status is not an error
    /// status for the operation.
    #[error("fake returned an error with non-error status code {status}")]
    ErrorWithNonErrorStatus { status: u16 },

    /// The responder set a response header that is not valid HTTP.
    #[error("fake set an invalid response header {name}: {value:?}")]
    InvalidResponseHeader { name: String, value: String },

    /// A request header could not be parsed into its option field.
    #[error("invalid value {value:?} for header {name}: {message}")]
    InvalidHeader {
        name: String,
        value: String,
        message: String,
    },

    /// The responder did not finish within the configured dispatch timeout.
    #[error("fake for API {operation} did not respond within {after:?}")]
    TimedOut { operation: String, after: Duration },
}

impl DispatchError {
    pub fn not_implemented(method: impl Into<String>) -> Self {
        Self::NotImplemented {
            method: method.into(),
        }
    }

    pub fn unhandled(operation: impl Into<String>) -> Self {
        Self::UnhandledOperation {
            operation: operation.into(),
        }
    }
}
