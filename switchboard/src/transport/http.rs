//! Network transport backed by `reqwest`.

use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use super::Transport;
use crate::error::{ConfigError, TransportError};
use crate::exchange::{Request, Response};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring an [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    timeout: Duration,
    default_headers: HeaderMap,
    pool_max_idle_per_host: usize,
}

impl HttpTransportBuilder {
    fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: HeaderMap::new(),
            pool_max_idle_per_host: 10,
        }
    }

    /// Sets the per-request network timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a header sent with every request.
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

    /// Caps idle pooled connections per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Builds the [`HttpTransport`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(self.default_headers)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .build()?;

        Ok(HttpTransport { client })
    }
}

/// Sends requests over the network.
///
/// The operation name on a request is ignored; routing is entirely by URL.
///
/// ## Examples
///
/// ```rust,ignore
/// use switchboard::{HttpTransport, Pipeline};
///
/// let transport = HttpTransport::builder()
///     .timeout(std::time::Duration::from_secs(10))
///     .build()?;
/// let pipeline = Pipeline::builder().transport(transport).build()?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }

    /// Creates a transport with default settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        let mut builder = self
            .client
            .request(request.method().to_reqwest(), request.url().clone())
            .headers(request.headers().clone());
        if let Some(body) = request.body() {
            builder = builder.body(body.clone());
        }

        let context = request.context().clone();
        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok::<_, TransportError>(Response::from_parts(status, headers, body))
        };

        tokio::select! {
            result = exchange => {
                if let Ok(response) = &result {
                    debug!(status = response.status().as_u16(), url = %request.url(), "network response");
                }
                result
            }
            interruption = context.done() => Err(interruption.into()),
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response, TransportError>> {
        self.execute(request).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RequestContext;
    use crate::method::RestMethod;
    use url::Url;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn url(server: &MockServer, p: &str) -> Url {
        Url::parse(&server.uri()).unwrap().join(p).unwrap()
    }

    #[tokio::test]
    async fn test_get_returns_status_headers_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/datetime/null"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-ms-request-id", "abc")
                    .set_body_string("null"),
            )
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let request = Request::builder()
            .method(RestMethod::Get)
            .url(url(&mock_server, "/datetime/null"))
            .build();

        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.header("x-ms-request-id"), Some("abc"));
        assert_eq!(response.body().as_ref(), b"null");
    }

    #[tokio::test]
    async fn test_put_sends_body_and_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/datetime/max/utc"))
            .and(header("content-type", "application/json"))
            .and(body_string("\"9999-12-31T23:59:59.999Z\""))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let request = Request::builder()
            .method(RestMethod::Put)
            .url(url(&mock_server, "/datetime/max/utc"))
            .body("application/json", "\"9999-12-31T23:59:59.999Z\"")
            .build();

        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn test_default_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/with-header"))
            .and(header("x-custom-header", "custom-value"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::builder()
            .default_header("X-Custom-Header", "custom-value")
            .unwrap()
            .build()
            .unwrap();
        let request = Request::builder()
            .method(RestMethod::Get)
            .url(url(&mock_server, "/with-header"))
            .build();

        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status().as_u16(), 204);
    }

    #[tokio::test]
    async fn test_cancelled_context_interrupts_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let context = RequestContext::background().with_timeout(Duration::from_millis(50));
        let request = Request::builder()
            .method(RestMethod::Get)
            .url(url(&mock_server, "/slow"))
            .context(context)
            .build();

        let result = transport.send(request).await;
        assert!(matches!(result, Err(TransportError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_retriable() {
        let transport = HttpTransport::new().unwrap();
        let request = Request::builder()
            .method(RestMethod::Get)
            .url(Url::parse("http://127.0.0.1:1/unreachable").unwrap())
            .build();

        let err = transport.send(request).await.unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
        assert!(err.is_retriable());
    }
}
