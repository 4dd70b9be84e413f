//! What a fake operation returns.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde_json::json;
use tracing::warn;

use crate::context::RequestContext;
use crate::error::{DispatchError, ERROR_CODE_HEADER};
use crate::exchange::Response;

/// A successful fake result: a status, a payload and extra headers.
///
/// The status is checked against the operation's Declared Success Codes
/// before anything is written to the response.
#[derive(Debug, Clone)]
pub struct Responded<T> {
    status: u16,
    value: T,
    headers: HeaderMap,
    invalid_header: Option<(String, String)>,
}

impl<T> Responded<T> {
    pub fn new(status: u16, value: T) -> Self {
        Self {
            status,
            value,
            headers: HeaderMap::new(),
            invalid_header: None,
        }
    }

    /// A `200 OK` result.
    pub fn ok(value: T) -> Self {
        Self::new(200, value)
    }

    /// Adds a response header.
    ///
    /// An invalid name or value is remembered and fails the dispatch with
    /// [`DispatchError::InvalidResponseHeader`].
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(header), Ok(header_value)) => {
                self.headers.insert(header, header_value);
            }
            _ => {
                warn!(name, value, "fake set an invalid response header");
                self.invalid_header
                    .get_or_insert_with(|| (name.to_string(), value.to_string()));
            }
        }
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Splits the result, failing if an invalid header was set.
    pub fn into_parts(self) -> Result<(u16, T, HeaderMap), DispatchError> {
        if let Some((name, value)) = self.invalid_header {
            return Err(DispatchError::InvalidResponseHeader { name, value });
        }
        Ok((self.status, self.value, self.headers))
    }
}

impl Responded<()> {
    /// A result that carries only a status.
    pub fn empty(status: u16) -> Self {
        Self::new(status, ())
    }
}

/// A declared service error returned by a fake.
///
/// Dispatch turns it into the same kind of HTTP error response a real
/// service would send, so the client's error handling is exercised end to
/// end. The status must be an error status (400 or above, outside the
/// operation's success codes); anything else fails the dispatch with
/// [`DispatchError::ErrorWithNonErrorStatus`].
///
/// The rendered response goes through the client's pipeline like any other.
/// A retriable status (408, 429, 500, 502, 503 or 504) is therefore retried,
/// and the responder runs once per attempt: four times under the default
/// [`RetryOptions`](crate::RetryOptions), with 0.8 s, 1.6 s and 3.2 s of
/// backoff in between. Use [`RetryOptions::disabled`](crate::RetryOptions::disabled)
/// to see the error after a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    status: u16,
    code: Option<String>,
    message: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            code: None,
            message: None,
        }
    }

    /// Sets the service error code, sent as `x-ms-error-code` and in the body.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Renders the error as an HTTP response.
    ///
    /// A status outside `100..=999` is rendered as `500`.
    pub fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = Response::new(status);
        if let Some(code) = &self.code {
            response = response.with_header(ERROR_CODE_HEADER, code);
        }
        let body = json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        });
        response.with_body("application/json", body.to_string())
    }
}

/// Exactly one of a success result or a declared error.
pub type Outcome<T> = Result<Responded<T>, ErrorResponse>;

type ResponderFn<A, T> = dyn Fn(RequestContext, A) -> BoxFuture<'static, Outcome<T>> + Send + Sync;

/// The user-supplied behavior behind one fake operation.
///
/// `A` is the operation's decoded arguments (`()` when it has none) and `T`
/// the success payload. Responders are cheap to clone.
///
/// ## Examples
///
/// ```rust
/// use switchboard::fake::{Responded, Responder};
///
/// let get_null: Responder<(), Option<String>> = Responder::from_fn(|()| Ok(Responded::ok(None)));
///
/// let slow: Responder<(), u32> = Responder::new(|ctx, ()| async move {
///     let _ = ctx.is_done();
///     Ok(Responded::ok(42))
/// });
/// # let _ = (get_null, slow);
/// ```
pub struct Responder<A, T> {
    inner: Arc<ResponderFn<A, T>>,
}

impl<A, T> Clone for Responder<A, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, T> fmt::Debug for Responder<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Responder")
    }
}

impl<A: Send + 'static, T: Send + 'static> Responder<A, T> {
    /// Wraps an async closure.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(RequestContext, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome<T>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |context, args| f(context, args).boxed()),
        }
    }

    /// Wraps a synchronous closure that ignores the request context.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(A) -> Outcome<T> + Send + Sync + 'static,
    {
        Self::new(move |_context, args| std::future::ready(f(args)))
    }

    pub fn respond(&self, context: RequestContext, args: A) -> BoxFuture<'static, Outcome<T>> {
        (self.inner)(context, args)
    }
}
