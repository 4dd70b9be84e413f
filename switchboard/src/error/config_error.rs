//! Client, transport and operation configuration errors.

use thiserror::Error;

use crate::operation_name::OperationNameError;

/// Errors in client or transport configuration.
///
/// These indicate programmer errors or invalid settings and are never
/// retriable.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Operation name validation failed.
    #[error("Invalid operation name: {0}")]
    InvalidOperationName(#[from] OperationNameError),

    /// A header name or value could not be represented.
    #[error("Invalid header {name}: {message}")]
    InvalidHeader {
        /// The offending header name.
        name: String,
        /// Why it was rejected.
        message: String,
    },

    /// An environment variable held an unusable value.
    #[error("Invalid value {value:?} for {var}: {message}")]
    InvalidEnv {
        /// The variable name.
        var: &'static str,
        /// The raw value found.
        value: String,
        /// Why it was rejected.
        message: String,
    },

    /// A path template placeholder had no value.
    #[error("Missing path parameter: {name}")]
    MissingPathParam {
        /// The placeholder name.
        name: String,
    },
}

impl ConfigError {
    /// Creates an invalid header error.
    pub fn invalid_header(name: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.to_string(),
        }
    }
}
