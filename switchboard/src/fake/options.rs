//! Settings for a [`ServerTransport`](super::ServerTransport).

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable holding a dispatch timeout in milliseconds.
pub const DISPATCH_TIMEOUT_ENV: &str = "SWITCHBOARD_DISPATCH_TIMEOUT_MS";

/// Options applied to every dispatch.
///
/// By default a responder may take as long as it likes; the caller's
/// [`RequestContext`](crate::RequestContext) is the only bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    timeout: Option<Duration>,
}

impl DispatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails any dispatch that has not finished after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Reads options from the environment.
    ///
    /// An unset or empty `SWITCHBOARD_DISPATCH_TIMEOUT_MS` leaves the timeout
    /// off.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if the variable is not a positive
    /// integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = match env::var(DISPATCH_TIMEOUT_ENV) {
            Ok(raw) => raw,
            Err(env::VarError::NotPresent) => return Ok(Self::default()),
            Err(env::VarError::NotUnicode(raw)) => {
                return Err(ConfigError::InvalidEnv {
                    var: DISPATCH_TIMEOUT_ENV,
                    value: raw.to_string_lossy().into_owned(),
                    message: "not valid unicode".to_string(),
                })
            }
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let invalid = |message: String| ConfigError::InvalidEnv {
            var: DISPATCH_TIMEOUT_ENV,
            value: raw.clone(),
            message,
        };
        let millis: u64 = trimmed.parse().map_err(|e| invalid(format!("{e}")))?;
        if millis == 0 {
            return Err(invalid("must be greater than zero".to_string()));
        }

        Ok(Self::default().with_timeout(Duration::from_millis(millis)))
    }
}
