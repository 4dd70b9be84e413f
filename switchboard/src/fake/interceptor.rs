//! Request interception ahead of the dispatch table.

use std::sync::Arc;

use crate::error::TransportError;
use crate::exchange::{Request, Response};

/// The decision an [`Interceptor`] makes about one request.
#[derive(Debug)]
pub enum Interception {
    /// Use this result verbatim; the dispatch table is not consulted.
    Handled(Result<Response, TransportError>),
    /// Continue with normal dispatch.
    Pass,
}

impl Interception {
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

/// Gets the first look at every request a
/// [`ServerTransport`](super::ServerTransport) receives.
///
/// Interceptors are supplied when the transport is built, so two transports
/// for the same fake server can intercept differently.
///
/// ## Examples
///
/// ```rust
/// use switchboard::fake::{Interception, Interceptor};
/// use switchboard::{Request, Response, StatusCode};
///
/// let teapot = |request: &Request| match request.header("x-brew") {
///     Some(_) => Interception::Handled(Ok(Response::new(StatusCode::IM_A_TEAPOT))),
///     None => Interception::Pass,
/// };
/// # fn assert_interceptor(_: impl Interceptor) {}
/// # assert_interceptor(teapot);
/// ```
pub trait Interceptor: Send + Sync {
    fn intercept(&self, request: &Request) -> Interception;
}

impl<F> Interceptor for F
where
    F: Fn(&Request) -> Interception + Send + Sync,
{
    fn intercept(&self, request: &Request) -> Interception {
        self(request)
    }
}

/// Several interceptors tried in order; the first to handle a request wins.
#[derive(Default, Clone)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an interceptor.
    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

impl Interceptor for InterceptorChain {
    fn intercept(&self, request: &Request) -> Interception {
        for interceptor in &self.interceptors {
            if let Interception::Handled(result) = interceptor.intercept(request) {
                return Interception::Handled(result);
            }
        }
        Interception::Pass
    }
}
