//! The "send a request, get a response" contract.
//!
//! A [`Pipeline`](crate::Pipeline) is handed exactly one [`Transport`] when it
//! is built. [`HttpTransport`] talks to a real service; a
//! [`ServerTransport`](crate::fake::ServerTransport) answers from a fake
//! server without touching the network. Both are interchangeable.

mod http;

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::TransportError;
use crate::exchange::{Request, Response};

pub use http::{HttpTransport, HttpTransportBuilder};

/// Sends one request and produces one response.
///
/// Implementations must honour the request's
/// [`RequestContext`](crate::RequestContext): once it is done the returned
/// future should resolve to [`TransportError::Cancelled`] or
/// [`TransportError::DeadlineExceeded`].
pub trait Transport: Send + Sync {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response, TransportError>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response, TransportError>> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response, TransportError>> {
        (**self).send(request)
    }
}
