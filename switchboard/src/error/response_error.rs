//! Structured error for responses outside an operation's success codes.

use std::fmt;

use bytes::Bytes;
use reqwest::StatusCode;
use url::Url;

use crate::exchange::Response;
use crate::method::RestMethod;

/// Header carrying a service-specific error code.
pub const ERROR_CODE_HEADER: &str = "x-ms-error-code";

const SEPARATOR: &str =
    "--------------------------------------------------------------------------------";

/// A response whose status was not one of the operation's declared success
/// codes.
///
/// Built the same way for real and fake transports, so calling code cannot
/// tell a faked service failure from a real one.
#[derive(Debug, Clone)]
pub struct ResponseError {
    method: RestMethod,
    url: Url,
    status: StatusCode,
    error_code: Option<String>,
    body: Bytes,
}

impl ResponseError {
    /// Builds the error from the request line and the offending response.
    ///
    /// The error code is taken from the `x-ms-error-code` header, falling
    /// back to `error.code` or `code` in a JSON body.
    pub fn new(method: RestMethod, url: Url, response: &Response) -> Self {
        let error_code = response
            .header(ERROR_CODE_HEADER)
            .map(str::to_string)
            .or_else(|| error_code_from_body(response.body()));

        Self {
            method,
            url,
            status: response.status(),
            error_code,
            body: response.body().clone(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> RestMethod {
        self.method
    }

    /// Returns `true` for throttling and transient server statuses.
    pub fn is_retriable(&self) -> bool {
        crate::pipeline::is_retriable_status(self.status)
    }
}

fn error_code_from_body(body: &Bytes) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let code = value
        .get("error")
        .and_then(|e| e.get("code"))
        .or_else(|| value.get("code"))?;
    match code {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.method, self.url)?;
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "RESPONSE {}: {}", self.status.as_u16(), self.status)?;
        match &self.error_code {
            Some(code) => writeln!(f, "ERROR CODE: {code}")?,
            None => writeln!(f, "ERROR CODE UNAVAILABLE")?,
        }
        writeln!(f, "{SEPARATOR}")?;
        if self.body.is_empty() {
            writeln!(f, "Response contained no body")?;
        } else {
            match serde_json::from_slice::<serde_json::Value>(&self.body)
                .ok()
                .and_then(|v| serde_json::to_string_pretty(&v).ok())
            {
                Some(pretty) => writeln!(f, "{pretty}")?,
                None => writeln!(f, "{}", String::from_utf8_lossy(&self.body))?,
            }
        }
        writeln!(f, "{SEPARATOR}")
    }
}

impl std::error::Error for ResponseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("http://localhost:3000/http/payloads/400/valid").unwrap()
    }

    #[test]
    fn test_display_without_code() {
        let response = Response::new(StatusCode::BAD_REQUEST)
            .with_body("application/json", r#"{"message":"client error","status":400}"#);
        let err = ResponseError::new(RestMethod::Get, url(), &response);

        let want = "GET http://localhost:3000/http/payloads/400/valid
--------------------------------------------------------------------------------
RESPONSE 400: 400 Bad Request
ERROR CODE UNAVAILABLE
--------------------------------------------------------------------------------
{
  \"message\": \"client error\",
  \"status\": 400
}
--------------------------------------------------------------------------------
";
        assert_eq!(err.to_string(), want);
        assert_eq!(err.error_code(), None);
    }

    #[test]
    fn test_code_from_header_wins() {
        let response = Response::new(StatusCode::NOT_FOUND)
            .with_header(ERROR_CODE_HEADER, "ResourceNotFound")
            .with_body("application/json", r#"{"error":{"code":"Other"}}"#);
        let err = ResponseError::new(RestMethod::Get, url(), &response);
        assert_eq!(err.error_code(), Some("ResourceNotFound"));
        assert!(err.to_string().contains("ERROR CODE: ResourceNotFound"));
    }

    #[test]
    fn test_code_from_body() {
        let response = Response::new(StatusCode::CONFLICT)
            .with_body("application/json", r#"{"error":{"code":"Conflict","message":"busy"}}"#);
        let err = ResponseError::new(RestMethod::Put, url(), &response);
        assert_eq!(err.error_code(), Some("Conflict"));
    }

    #[test]
    fn test_empty_body() {
        let response = Response::new(StatusCode::SERVICE_UNAVAILABLE);
        let err = ResponseError::new(RestMethod::Get, url(), &response);
        assert!(err.to_string().contains("Response contained no body"));
        assert!(err.is_retriable());
    }
}
