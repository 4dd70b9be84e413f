//! Building blocks for per-operation dispatch functions.
//!
//! A generated dispatch function for an operation with a body looks like:
//!
//! ```rust,ignore
//! fn dispatch_put_utc_min_date_time(
//!     server: Arc<DatetimeServer>,
//!     request: Request,
//! ) -> BoxFuture<'static, Result<Response, TransportError>> {
//!     async move {
//!         let responder = implemented(server.put_utc_min_date_time.as_ref(), &PUT_UTC_MIN_DATE_TIME)?;
//!         let body: Rfc3339 = decode_request(&request, &PUT_UTC_MIN_DATE_TIME)?;
//!         serve(&PUT_UTC_MIN_DATE_TIME, responder, &request, body.into(), |()| ()).await
//!     }
//!     .boxed()
//! }
//! ```
//!
//! The order matters: an unset responder is reported before the body is
//! looked at, so a missing fake is never mistaken for a malformed request.

use std::fmt::Display;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::responder::Responder;
use crate::error::{DispatchError, TransportError};
use crate::exchange::{Request, Response};
use crate::operation::OperationSpec;

/// Returns the responder, or a "not implemented" error if it is unset.
pub fn implemented<'a, A, T>(
    responder: Option<&'a Responder<A, T>>,
    spec: &OperationSpec,
) -> Result<&'a Responder<A, T>, TransportError> {
    responder.ok_or_else(|| {
        warn!(operation = %spec.name(), "fake responder not set");
        DispatchError::not_implemented(spec.name().method()).into()
    })
}

/// Decodes the request body with the operation's request format.
///
/// ## Errors
///
/// Returns [`TransportError::Codec`] if the body is missing, has the wrong
/// content type, or does not match `T`.
pub fn decode_request<T: DeserializeOwned>(
    request: &Request,
    spec: &OperationSpec,
) -> Result<T, TransportError> {
    let format = spec.request_format();
    format.check_content_type(request.header(CONTENT_TYPE.as_str()))?;
    let body = request.body().map(|b| b.as_ref()).unwrap_or_default();
    Ok(format.decode(body)?)
}

/// Returns a trimmed, non-empty header value.
pub fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .header(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parses an optional header with `parse`.
///
/// ## Errors
///
/// Returns [`DispatchError::InvalidHeader`] if the header is present but
/// `parse` rejects it.
pub fn parse_optional_header<T, E, F>(
    request: &Request,
    name: &str,
    parse: F,
) -> Result<Option<T>, TransportError>
where
    F: FnOnce(&str) -> Result<T, E>,
    E: Display,
{
    let Some(value) = header_value(request, name) else {
        return Ok(None);
    };
    parse(&value).map(Some).map_err(|e| {
        DispatchError::InvalidHeader {
            name: name.to_string(),
            value: value.clone(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Runs the responder and turns its outcome into a response.
///
/// A declared error becomes an HTTP error response and must carry an error
/// status: 400 or above and not one of the operation's Declared Success
/// Codes. A success must carry one of the Declared Success Codes; its payload
/// is passed through `project` and encoded with the operation's response
/// format. `HEAD` and `204 No Content` responses never carry a body.
pub async fn serve<A, T, P, F>(
    spec: &OperationSpec,
    responder: &Responder<A, T>,
    request: &Request,
    args: A,
    project: F,
) -> Result<Response, TransportError>
where
    A: Send + 'static,
    T: Send + 'static,
    P: Serialize,
    F: FnOnce(T) -> P,
{
    let outcome = responder.respond(request.context().clone(), args).await;
    let responded = match outcome {
        Ok(responded) => responded,
        Err(error) => {
            let status = error.status();
            if status < 400 || spec.is_success(status) {
                warn!(operation = %spec.name(), status, "fake returned an error with a non-error status");
                return Err(DispatchError::ErrorWithNonErrorStatus { status }.into());
            }
            debug!(operation = %spec.name(), status, "fake returned a declared error");
            return Ok(error.into_response());
        }
    };

    let (status, value, headers) = responded.into_parts().map_err(|e| {
        warn!(operation = %spec.name(), error = %e, "fake result rejected");
        e
    })?;
    let unexpected = || DispatchError::UnexpectedStatus {
        status,
        acceptable: spec.success_codes().to_vec(),
    };
    if !spec.is_success(status) {
        warn!(operation = %spec.name(), status, "fake returned an undeclared status");
        return Err(unexpected().into());
    }
    let status = StatusCode::from_u16(status).map_err(|_| unexpected())?;

    let mut response = Response::new(status);
    for (name, value) in &headers {
        response.headers_mut().append(name.clone(), value.clone());
    }

    let payload = project(value);
    if request.method().returns_body() && status != StatusCode::NO_CONTENT {
        let format = spec.response_format();
        if let (Some(content_type), Some(body)) = (format.content_type(), format.encode(&payload)?) {
            response = response.with_body(content_type, body);
        }
    }

    Ok(response)
}
