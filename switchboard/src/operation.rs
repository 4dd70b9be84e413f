//! Compile-time descriptions of generated operations.
//!
//! An [`OperationSpec`] captures everything the API description fixes for
//! one client method: its name, verb, path template, Declared Success Codes
//! and body formats. Generated clients use it to build requests and check
//! responses; fake servers use the same value to validate what a responder
//! returns, so the two sides cannot drift apart.

use url::Url;

use crate::codec::BodyFormat;
use crate::error::ConfigError;
use crate::exchange::{builder_state::Present, Request, RequestBuilder};
use crate::method::RestMethod;
use crate::operation_name::OperationName;

/// One generated operation.
///
/// ## Examples
///
/// ```rust
/// use switchboard::{BodyFormat, OperationSpec, RestMethod};
///
/// const GET_UTC_MIN_DATE_TIME: OperationSpec = OperationSpec::new(
///     "DatetimeClient.GetUTCMinDateTime",
///     RestMethod::Get,
///     "/datetime/min/utc",
/// )
/// .success(&[200])
/// .returns(BodyFormat::Json);
///
/// assert!(GET_UTC_MIN_DATE_TIME.is_success(200));
/// assert!(!GET_UTC_MIN_DATE_TIME.is_success(201));
/// ```
#[derive(Debug, Clone)]
pub struct OperationSpec {
    name: OperationName,
    method: RestMethod,
    path: &'static str,
    success: &'static [u16],
    request_format: BodyFormat,
    response_format: BodyFormat,
}

impl OperationSpec {
    /// Declares an operation that succeeds with `200` and has no bodies.
    pub const fn new(name: &'static str, method: RestMethod, path: &'static str) -> Self {
        Self {
            name: OperationName::from_static(name),
            method,
            path,
            success: &[200],
            request_format: BodyFormat::None,
            response_format: BodyFormat::None,
        }
    }

    /// Sets the Declared Success Codes.
    pub const fn success(mut self, codes: &'static [u16]) -> Self {
        self.success = codes;
        self
    }

    /// Sets the request body format.
    pub const fn accepts(mut self, format: BodyFormat) -> Self {
        self.request_format = format;
        self
    }

    /// Sets the response body format.
    pub const fn returns(mut self, format: BodyFormat) -> Self {
        self.response_format = format;
        self
    }

    pub fn name(&self) -> &OperationName {
        &self.name
    }

    pub fn method(&self) -> RestMethod {
        self.method
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn success_codes(&self) -> &'static [u16] {
        self.success
    }

    pub fn request_format(&self) -> BodyFormat {
        self.request_format
    }

    pub fn response_format(&self) -> BodyFormat {
        self.response_format
    }

    /// Returns `true` if `status` is one of the Declared Success Codes.
    pub fn is_success(&self, status: u16) -> bool {
        self.success.contains(&status)
    }

    /// Extracts path parameter names in the order they appear.
    pub fn path_params(&self) -> Vec<&'static str> {
        let mut params = Vec::new();
        let mut rest = self.path;
        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else { break };
            if end > 0 {
                params.push(&after[..end]);
            }
            rest = &after[end + 1..];
        }
        params
    }

    /// Substitutes path parameters, percent-encoding each value.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::MissingPathParam`] if a placeholder has no value.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use switchboard::{OperationSpec, RestMethod};
    ///
    /// let spec = OperationSpec::new("ItemsClient.Get", RestMethod::Get, "/items/{name}");
    /// assert_eq!(spec.render_path(&[("name", "a b")]).unwrap(), "/items/a%20b");
    /// ```
    pub fn render_path(&self, params: &[(&str, &str)]) -> Result<String, ConfigError> {
        let mut path = self.path.to_string();
        for name in self.path_params() {
            let value = params
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| *v)
                .ok_or_else(|| ConfigError::MissingPathParam {
                    name: name.to_string(),
                })?;
            path = path.replace(&format!("{{{name}}}"), &encode_path_segment(value));
        }
        Ok(path)
    }

    /// Starts a request for this operation against `endpoint`.
    ///
    /// The returned builder is already tagged with the operation name and
    /// method; callers add headers, query parameters, a body and a context.
    pub fn request(
        &self,
        endpoint: &Url,
        params: &[(&str, &str)],
    ) -> Result<RequestBuilder<Present<RestMethod>, Present<Url>>, ConfigError> {
        let path = self.render_path(params)?;
        let url = join_path(endpoint, &path)?;
        Ok(Request::builder()
            .operation(self.name.clone())
            .method(self.method)
            .url(url))
    }
}

/// Appends `path` to the endpoint's existing path.
///
/// Unlike [`Url::join`], an endpoint such as `http://host/api` keeps its
/// `/api` prefix.
fn join_path(endpoint: &Url, path: &str) -> Result<Url, ConfigError> {
    let base = endpoint.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Ok(Url::parse(&format!("{base}/{path}"))?)
}

fn encode_path_segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
