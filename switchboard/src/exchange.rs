//! The request/response exchange passed through transports.
//!
//! A [`Request`] names the operation it belongs to explicitly, so transports
//! never have to dig routing information out of a side channel. The
//! [`RequestBuilder`] uses a type-state pattern so a request cannot be built
//! without a method and a URL.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::codec::{BodyFormat, Codec, JsonCodec, XmlCodec};
use crate::context::RequestContext;
use crate::error::{CodecError, ConfigError};
use crate::method::RestMethod;
use crate::operation_name::OperationName;

/// Marker types for builder state tracking.
pub mod builder_state {
    /// Marker for a field that has not been set.
    pub struct Missing;
    /// A field that has been set, holding its value.
    pub struct Present<T>(pub(crate) T);
}

use builder_state::{Missing, Present};

/// An outgoing HTTP request tagged with the operation that produced it.
#[derive(Debug, Clone)]
pub struct Request {
    operation: Option<OperationName>,
    method: RestMethod,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
    context: RequestContext,
}

impl Request {
    /// Creates a new request builder.
    pub fn builder() -> RequestBuilder<Missing, Missing> {
        RequestBuilder::new()
    }

    /// The operation name, if the request came from a generated client.
    pub fn operation(&self) -> Option<&OperationName> {
        self.operation.as_ref()
    }

    pub fn method(&self) -> RestMethod {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns a header value if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the first value of a query parameter.
    pub fn query(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Replaces the request's context.
    pub fn set_context(&mut self, context: RequestContext) {
        self.context = context;
    }
}

/// Type-state builder for [`Request`].
///
/// ## Type Parameters
///
/// - `M`: State of the method field (`Missing` or `Present<RestMethod>`).
/// - `U`: State of the URL field (`Missing` or `Present<Url>`).
pub struct RequestBuilder<M, U> {
    operation: Option<OperationName>,
    method: M,
    url: U,
    headers: HeaderMap,
    body: Option<Bytes>,
    context: RequestContext,
}

impl RequestBuilder<Missing, Missing> {
    pub fn new() -> Self {
        Self {
            operation: None,
            method: Missing,
            url: Missing,
            headers: HeaderMap::new(),
            body: None,
            context: RequestContext::background(),
        }
    }
}

impl Default for RequestBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> RequestBuilder<Missing, U> {
    /// Sets the HTTP method.
    pub fn method(self, method: RestMethod) -> RequestBuilder<Present<RestMethod>, U> {
        RequestBuilder {
            operation: self.operation,
            method: Present(method),
            url: self.url,
            headers: self.headers,
            body: self.body,
            context: self.context,
        }
    }
}

impl<M> RequestBuilder<M, Missing> {
    /// Sets the absolute request URL.
    pub fn url(self, url: Url) -> RequestBuilder<M, Present<Url>> {
        RequestBuilder {
            operation: self.operation,
            method: self.method,
            url: Present(url),
            headers: self.headers,
            body: self.body,
            context: self.context,
        }
    }
}

impl<M, U> RequestBuilder<M, U> {
    /// Tags the request with the operation that produced it.
    pub fn operation(mut self, operation: OperationName) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Sets the cancellation scope.
    pub fn context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    /// Adds a header, replacing any previous value.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn header(mut self, name: &str, value: impl AsRef<str>) -> Result<Self, ConfigError> {
        let header_name =
            HeaderName::try_from(name).map_err(|e| ConfigError::invalid_header(name, e))?;
        let header_value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ConfigError::invalid_header(name, e))?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Adds a header only when a value is supplied.
    pub fn optional_header(
        self,
        name: &str,
        value: Option<impl AsRef<str>>,
    ) -> Result<Self, ConfigError> {
        match value {
            Some(value) => self.header(name, value),
            None => Ok(self),
        }
    }

    /// Sets a raw body along with its content type.
    pub fn body(mut self, content_type: &'static str, body: impl Into<Bytes>) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` with `format` and sets it as the body.
    ///
    /// [`BodyFormat::None`] leaves the request without a body.
    pub fn encoded_body<T: serde::Serialize>(
        self,
        format: BodyFormat,
        value: &T,
    ) -> Result<Self, CodecError> {
        match (format.content_type(), format.encode(value)?) {
            (Some(content_type), Some(bytes)) => Ok(self.body(content_type, bytes)),
            _ => Ok(self),
        }
    }
}

impl<M> RequestBuilder<M, Present<Url>> {
    /// Appends a query parameter to the URL.
    pub fn query(mut self, name: &str, value: impl AsRef<str>) -> Self {
        self.url.0.query_pairs_mut().append_pair(name, value.as_ref());
        self
    }
}

impl RequestBuilder<Present<RestMethod>, Present<Url>> {
    /// Builds the request.
    ///
    /// Only available once both the method and the URL are set.
    pub fn build(self) -> Request {
        Request {
            operation: self.operation,
            method: self.method.0,
            url: self.url.0,
            headers: self.headers,
            body: self.body,
            context: self.context,
        }
    }
}

/// An HTTP response as seen by a client pipeline.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Creates an empty response with the given status.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Creates a response from its parts.
    pub fn from_parts(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Adds a header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the body and its content type.
    pub fn with_body(mut self, content_type: &'static str, body: impl Into<Bytes>) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns a header value if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Decodes the body with the given format.
    ///
    /// ## Errors
    ///
    /// Returns [`CodecError::EmptyBody`] for an empty body or when `format`
    /// is [`BodyFormat::None`], otherwise any decoding failure.
    pub fn decode<T: DeserializeOwned>(&self, format: BodyFormat) -> Result<T, CodecError> {
        format.decode(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, CodecError> {
        JsonCodec::decode(&self.body)
    }

    pub fn xml<T: DeserializeOwned>(&self) -> Result<T, CodecError> {
        XmlCodec::decode(&self.body)
    }

    /// Returns the body as UTF-8 text.
    pub fn text(&self) -> Result<String, CodecError> {
        Ok(String::from_utf8(self.body.to_vec())?)
    }
}
