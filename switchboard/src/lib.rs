//! Switchboard
//!
//! Runtime for generated REST clients whose transport can be swapped for an
//! in-process fake server.
//!
//! ## Core Types
//!
//! - [`OperationSpec`] - Compile-time description of one generated operation
//! - [`OperationName`] - The `"<Client>.<Method>"` identifier routing a request
//! - [`Request`] / [`Response`] - The exchange passed through a transport
//! - [`RequestContext`] - Cancellation scope carried on every request
//! - [`Transport`] - Sends one request, returns one response
//! - [`HttpTransport`] - Network transport over `reqwest`
//! - [`Pipeline`] - Executes operations with retries and status checks
//! - [`fake::ServerTransport`] - Dispatches requests to a fake server
//!
//! ## Examples
//!
//! ```rust,ignore
//! use switchboard::fake::{Responded, Responder, ServerTransport};
//! use switchboard::{Pipeline, RequestContext};
//!
//! let server = DatetimeServer {
//!     get_null: Some(Responder::from_fn(|()| Ok(Responded::ok(None)))),
//!     ..Default::default()
//! };
//! let pipeline = Pipeline::builder()
//!     .transport(ServerTransport::new(server))
//!     .build()?;
//! let client = DatetimeClient::new(endpoint, pipeline);
//!
//! let value = client.get_null(&RequestContext::background()).await?;
//! assert_eq!(value.value, None);
//! ```

pub mod codec;
pub mod context;
pub mod error;
pub mod exchange;
pub mod fake;
pub mod method;
pub mod operation;
pub mod operation_name;
pub mod pipeline;
pub mod transport;

pub use codec::{BodyFormat, Codec, JsonCodec, XmlCodec};
pub use context::{Interruption, RequestContext};
pub use error::{
    ClientError, CodecError, ConfigError, DispatchError, ResponseError, TransportError,
};
pub use exchange::{Request, RequestBuilder, Response};
pub use method::RestMethod;
pub use operation::OperationSpec;
pub use operation_name::{OperationName, OperationNameError};
pub use pipeline::{Pipeline, PipelineBuilder, RetryOptions};
pub use reqwest::StatusCode;
pub use transport::{HttpTransport, HttpTransportBuilder, Transport};
