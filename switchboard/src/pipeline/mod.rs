//! Execution of generated operations.
//!
//! Every generated client method follows the same shape: build a request from
//! its [`OperationSpec`], hand it to [`Pipeline::execute`], and decode the
//! returned [`Response`]. The pipeline owns the configured [`Transport`] and
//! the retry policy, and turns any status outside the operation's Declared
//! Success Codes into a [`ResponseError`].

mod retry;

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use tracing::{debug, instrument, Span};

use crate::error::{ClientError, ConfigError, ResponseError, TransportError};
use crate::exchange::{Request, Response};
use crate::operation::OperationSpec;
use crate::transport::{HttpTransport, Transport};

pub use retry::{is_retriable_status, RetryOptions};

/// Builder for configuring a [`Pipeline`].
pub struct PipelineBuilder {
    transport: Option<Arc<dyn Transport>>,
    retry: RetryOptions,
    default_headers: HeaderMap,
}

impl PipelineBuilder {
    fn new() -> Self {
        Self {
            transport: None,
            retry: RetryOptions::default(),
            default_headers: HeaderMap::new(),
        }
    }

    /// Sets the transport every request is sent through.
    ///
    /// Defaults to an [`HttpTransport`]. Pass a
    /// [`ServerTransport`](crate::fake::ServerTransport) to answer requests
    /// from a fake server instead.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Sets a shared transport.
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn retry(mut self, retry: RetryOptions) -> Self {
        self.retry = retry;
        self
    }

    /// Adds a header to every request that does not already set it.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let name = name.as_ref();
        let header_name =
            HeaderName::try_from(name).map_err(|e| ConfigError::invalid_header(name, e))?;
        let header_value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ConfigError::invalid_header(name, e))?;
        self.default_headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Builds the [`Pipeline`].
    ///
    /// ## Errors
    ///
    /// Returns an error if no transport was set and the default
    /// [`HttpTransport`] cannot be constructed.
    pub fn build(self) -> Result<Pipeline, ClientError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };

        Ok(Pipeline {
            transport,
            retry: self.retry,
            default_headers: self.default_headers,
        })
    }
}

/// Sends operation requests and enforces Declared Success Codes.
///
/// ## Examples
///
/// ```rust,ignore
/// use switchboard::{Pipeline, RequestContext};
///
/// let pipeline = Pipeline::builder().transport(fake_transport).build()?;
/// let request = GET_UTC_MIN_DATE_TIME
///     .request(&endpoint, &[])?
///     .context(RequestContext::background())
///     .build();
/// let response = pipeline.execute(&GET_UTC_MIN_DATE_TIME, request).await?;
/// ```
#[derive(Clone)]
pub struct Pipeline {
    transport: Arc<dyn Transport>,
    retry: RetryOptions,
    default_headers: HeaderMap,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("retry", &self.retry)
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn retry_options(&self) -> RetryOptions {
        self.retry
    }

    /// Executes one operation.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The transport fails (after retries, where retrying is allowed)
    /// - The response status is not one of the operation's success codes
    #[instrument(
        name = "operation",
        skip(self, spec, request),
        fields(
            operation = %spec.name(),
            http.method = %spec.method(),
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub async fn execute(
        &self,
        spec: &OperationSpec,
        mut request: Request,
    ) -> Result<Response, ClientError> {
        Span::current().record("http.url", request.url().as_str());

        for (name, value) in &self.default_headers {
            if !request.headers().contains_key(name) {
                request.headers_mut().insert(name.clone(), value.clone());
            }
        }
        if let Some(accept) = spec.response_format().content_type() {
            if !request.headers().contains_key(ACCEPT) {
                request
                    .headers_mut()
                    .insert(ACCEPT, HeaderValue::from_static(accept));
            }
        }

        let response = match self.send_with_retry(&request).await {
            Ok(response) => response,
            Err(e) => {
                Span::current().record("otel.status_code", "ERROR");
                return Err(e.into());
            }
        };

        let status = response.status();
        Span::current().record("http.status_code", status.as_u16());

        if !spec.is_success(status.as_u16()) {
            let otel_status = if status.is_server_error() {
                "ERROR"
            } else {
                "UNSET"
            };
            Span::current().record("otel.status_code", otel_status);
            return Err(ResponseError::new(request.method(), request.url().clone(), &response).into());
        }

        Span::current().record("otel.status_code", "OK");
        debug!(status = status.as_u16(), "operation completed");
        Ok(response)
    }

    async fn send_with_retry(&self, request: &Request) -> Result<Response, TransportError> {
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 1;

        loop {
            let result = self.transport.send(request.clone()).await;
            let retriable = match &result {
                Ok(response) => is_retriable_status(response.status()),
                Err(e) => e.is_retriable(),
            };
            if !retriable || attempt >= max_attempts {
                return result;
            }

            let delay = self.retry.delay_for(attempt);
            debug!(attempt, ?delay, "retrying request");
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                interruption = request.context().done() => return Err(interruption.into()),
            }
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use futures::future::BoxFuture;
    use futures::FutureExt;
    use reqwest::StatusCode;
    use url::Url;

    use crate::codec::BodyFormat;
    use crate::error::DispatchError;
    use crate::method::RestMethod;

    static GET_THING: OperationSpec =
        OperationSpec::new("ThingsClient.Get", RestMethod::Get, "/things")
            .success(&[200])
            .returns(BodyFormat::Json);

    /// Replays a fixed script of outcomes and counts calls.
    struct Scripted {
        calls: AtomicU32,
        script: fn(u32) -> Result<Response, TransportError>,
    }

    impl Scripted {
        fn new(script: fn(u32) -> Result<Response, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                script,
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Transport for Scripted {
        fn send(&self, _request: Request) -> BoxFuture<'_, Result<Response, TransportError>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let outcome = (self.script)(n);
            async move { outcome }.boxed()
        }
    }

    fn request() -> Request {
        GET_THING
            .request(&Url::parse("http://localhost:3000").unwrap(), &[])
            .unwrap()
            .build()
    }

    fn fast_retry() -> RetryOptions {
        RetryOptions::default().retry_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let transport = Scripted::new(|_| {
            Ok(Response::new(StatusCode::OK).with_body("application/json", "[]"))
        });
        let pipeline = Pipeline::builder()
            .shared_transport(transport.clone())
            .build()
            .unwrap();

        let response = pipeline.execute(&GET_THING, request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_undeclared_status_becomes_response_error() {
        let transport = Scripted::new(|_| Ok(Response::new(StatusCode::CREATED)));
        let pipeline = Pipeline::builder().shared_transport(transport).build().unwrap();

        let err = pipeline.execute(&GET_THING, request()).await.unwrap_err();
        let response_error = err.as_response_error().unwrap();
        assert_eq!(response_error.status(), StatusCode::CREATED);
        assert_eq!(response_error.url().path(), "/things");
    }

    #[tokio::test]
    async fn test_retriable_status_is_retried() {
        let transport = Scripted::new(|n| {
            if n < 3 {
                Ok(Response::new(StatusCode::SERVICE_UNAVAILABLE))
            } else {
                Ok(Response::new(StatusCode::OK))
            }
        });
        let pipeline = Pipeline::builder()
            .shared_transport(transport.clone())
            .retry(fast_retry())
            .build()
            .unwrap();

        let response = pipeline.execute(&GET_THING, request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let transport = Scripted::new(|_| Ok(Response::new(StatusCode::INTERNAL_SERVER_ERROR)));
        let pipeline = Pipeline::builder()
            .shared_transport(transport.clone())
            .retry(fast_retry().max_retries(2))
            .build()
            .unwrap();

        let err = pipeline.execute(&GET_THING, request()).await.unwrap_err();
        assert_eq!(err.as_response_error().unwrap().status().as_u16(), 500);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_dispatch_error_is_never_retried() {
        let transport = Scripted::new(|_| Err(DispatchError::not_implemented("Get").into()));
        let pipeline = Pipeline::builder()
            .shared_transport(transport.clone())
            .retry(fast_retry())
            .build()
            .unwrap();

        let err = pipeline.execute(&GET_THING, request()).await.unwrap_err();
        assert!(err.to_string().contains("not implemented"));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_connection_error_is_retried() {
        let transport = Scripted::new(|n| {
            if n == 1 {
                Err(TransportError::Connection("reset".to_string()))
            } else {
                Ok(Response::new(StatusCode::OK))
            }
        });
        let pipeline = Pipeline::builder()
            .shared_transport(transport.clone())
            .retry(fast_retry())
            .build()
            .unwrap();

        pipeline.execute(&GET_THING, request()).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_cancellation_stops_retry_wait() {
        let transport = Scripted::new(|_| Ok(Response::new(StatusCode::TOO_MANY_REQUESTS)));
        let pipeline = Pipeline::builder()
            .shared_transport(transport.clone())
            .retry(RetryOptions::default().retry_delay(Duration::from_secs(30)))
            .build()
            .unwrap();

        let context = crate::RequestContext::background();
        let mut req = request();
        req.set_context(context.clone());
        context.cancel();

        let err = pipeline.execute(&GET_THING, req).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(TransportError::Cancelled)));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_accept_and_default_headers() {
        struct Echo;
        impl Transport for Echo {
            fn send(&self, request: Request) -> BoxFuture<'_, Result<Response, TransportError>> {
                let accept = request.header("accept").unwrap_or_default().to_string();
                let agent = request.header("user-agent").unwrap_or_default().to_string();
                async move {
                    Ok(Response::new(StatusCode::OK)
                        .with_header("echo-accept", &accept)
                        .with_header("echo-agent", &agent))
                }
                .boxed()
            }
        }

        let pipeline = Pipeline::builder()
            .transport(Echo)
            .default_header("User-Agent", "switchboard-tests")
            .unwrap()
            .build()
            .unwrap();

        let response = pipeline.execute(&GET_THING, request()).await.unwrap();
        assert_eq!(response.header("echo-accept"), Some("application/json"));
        assert_eq!(response.header("echo-agent"), Some("switchboard-tests"));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_execution_is_traced() {
        let transport = Scripted::new(|_| Ok(Response::new(StatusCode::OK)));
        let pipeline = Pipeline::builder().shared_transport(transport).build().unwrap();

        pipeline.execute(&GET_THING, request()).await.unwrap();
        assert!(logs_contain("ThingsClient.Get"));
        assert!(logs_contain("operation completed"));
    }
}
