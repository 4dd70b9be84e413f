//! In-process fake servers for generated clients.
//!
//! A fake server is a struct of optional [`Responder`]s, one per operation
//! of the client it stands in for. Wrapping it in a [`ServerTransport`] and
//! handing that to a [`Pipeline`](crate::Pipeline) makes the generated client
//! talk to the fake instead of the network:
//!
//! 1. The client tags each [`Request`](crate::Request) with its
//!    [`OperationName`](crate::OperationName).
//! 2. [`ServerTransport`] offers the request to its [`Interceptor`], if any,
//!    then looks the name up in the server's [`DispatchTable`].
//! 3. The dispatch function checks that the responder is set, decodes the
//!    arguments, calls the responder and serializes its [`Outcome`].
//!
//! A [`ClientRouter`] combines the fakes for several clients of one package
//! into a single transport.

mod dispatch;
mod interceptor;
mod options;
mod responder;
mod router;
mod server;

pub use dispatch::{decode_request, header_value, implemented, parse_optional_header, serve};
pub use interceptor::{Interception, Interceptor, InterceptorChain};
pub use options::{DispatchOptions, DISPATCH_TIMEOUT_ENV};
pub use responder::{ErrorResponse, Outcome, Responded, Responder};
pub use router::ClientRouter;
pub use server::{DispatchFn, DispatchTable, FakeServer, ServerTransport, ServerTransportBuilder};
