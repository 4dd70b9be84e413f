//! Fake servers and the transport that dispatches to them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn, Instrument};

use super::interceptor::{Interception, Interceptor};
use super::options::DispatchOptions;
use crate::error::{DispatchError, TransportError};
use crate::exchange::{Request, Response};
use crate::operation::OperationSpec;
use crate::transport::Transport;

/// Handles one operation for a fake server of type `S`.
pub type DispatchFn<S> = fn(Arc<S>, Request) -> BoxFuture<'static, Result<Response, TransportError>>;

/// Maps operation names to the functions that serve them.
pub struct DispatchTable<S> {
    entries: HashMap<&'static str, DispatchFn<S>>,
}

impl<S> DispatchTable<S> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers `dispatch` for `spec`'s operation name.
    ///
    /// A second registration for the same name replaces the first and is
    /// logged as a warning.
    pub fn route(mut self, spec: &'static OperationSpec, dispatch: DispatchFn<S>) -> Self {
        let operation = spec.name().as_str();
        if self.entries.insert(operation, dispatch).is_some() {
            warn!(operation, "operation registered twice; keeping the later dispatch");
        }
        self
    }

    pub fn get(&self, operation: &str) -> Option<DispatchFn<S>> {
        self.entries.get(operation).copied()
    }

    pub fn contains(&self, operation: &str) -> bool {
        self.entries.contains_key(operation)
    }

    /// Registered operation names, in no particular order.
    pub fn operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S> Default for DispatchTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for DispatchTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// A struct of optional responders, one per operation of a client.
///
/// Implementations are normally generated next to the client they fake.
pub trait FakeServer: Send + Sync + Sized + 'static {
    fn dispatch_table() -> DispatchTable<Self>;
}

/// Aborts the spawned dispatch when the caller stops waiting for it.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Builder for a [`ServerTransport`].
pub struct ServerTransportBuilder<S> {
    server: Arc<S>,
    interceptor: Option<Arc<dyn Interceptor>>,
    options: DispatchOptions,
}

impl<S: FakeServer> ServerTransportBuilder<S> {
    /// Offers every request to `interceptor` before the dispatch table.
    pub fn interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptor = Some(Arc::new(interceptor));
        self
    }

    pub fn options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> ServerTransport<S> {
        ServerTransport {
            server: self.server,
            table: Arc::new(S::dispatch_table()),
            interceptor: self.interceptor,
            options: self.options,
        }
    }
}

/// Connects a generated client to a [`FakeServer`].
///
/// Requests are routed by their operation name. Each dispatch runs on its
/// own task, which is aborted as soon as the caller's
/// [`RequestContext`](crate::RequestContext) is done or the caller drops the
/// returned future.
///
/// ## Examples
///
/// ```rust,ignore
/// let server = DatetimeServer {
///     get_utc_min_date_time: Some(Responder::from_fn(|()| Ok(Responded::ok(min_utc())))),
///     ..Default::default()
/// };
/// let pipeline = Pipeline::builder()
///     .transport(ServerTransport::new(server))
///     .build()?;
/// let client = DatetimeClient::new(endpoint, pipeline);
/// ```
pub struct ServerTransport<S> {
    server: Arc<S>,
    table: Arc<DispatchTable<S>>,
    interceptor: Option<Arc<dyn Interceptor>>,
    options: DispatchOptions,
}

impl<S> Clone for ServerTransport<S> {
    fn clone(&self) -> Self {
        Self {
            server: Arc::clone(&self.server),
            table: Arc::clone(&self.table),
            interceptor: self.interceptor.clone(),
            options: self.options,
        }
    }
}

impl<S> fmt::Debug for ServerTransport<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerTransport")
            .field("table", &self.table)
            .field("intercepted", &self.interceptor.is_some())
            .field("options", &self.options)
            .finish()
    }
}

impl<S: FakeServer> ServerTransport<S> {
    pub fn new(server: impl Into<Arc<S>>) -> Self {
        Self::builder(server).build()
    }

    pub fn builder(server: impl Into<Arc<S>>) -> ServerTransportBuilder<S> {
        ServerTransportBuilder {
            server: server.into(),
            interceptor: None,
            options: DispatchOptions::default(),
        }
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    pub fn options(&self) -> DispatchOptions {
        self.options
    }

    async fn dispatch(&self, request: Request) -> Result<Response, TransportError> {
        let Some(operation) = request.operation().cloned() else {
            warn!(url = %request.url(), "request reached a fake server without an operation name");
            return Err(DispatchError::MissingOperationName.into());
        };

        let context = request.context().clone();
        if let Some(interruption) = context.interruption() {
            return Err(interruption.into());
        }

        debug!(operation = %operation, "dispatching to fake");

        let server = Arc::clone(&self.server);
        let table = Arc::clone(&self.table);
        let interceptor = self.interceptor.clone();
        let name = operation.clone();
        let mut task = AbortOnDrop(tokio::spawn(async move {
            if let Some(interceptor) = interceptor {
                if let Interception::Handled(result) = interceptor.intercept(&request) {
                    debug!(operation = %name, "request intercepted");
                    return result;
                }
            }
            match table.get(name.as_str()) {
                Some(dispatch) => dispatch(server, request).await,
                None => {
                    warn!(operation = %name, "no fake registered for operation");
                    Err(DispatchError::unhandled(name.as_str()).into())
                }
            }
        }
        .in_current_span()));

        let limit = self.options.timeout();
        let timed_out = async move {
            match limit {
                Some(after) => {
                    tokio::time::sleep(after).await;
                    after
                }
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            joined = &mut task.0 => match joined {
                Ok(result) => result,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(_) => Err(TransportError::Cancelled),
            },
            interruption = context.done() => {
                debug!(operation = %operation, ?interruption, "caller stopped waiting for fake");
                Err(interruption.into())
            }
            after = timed_out => {
                warn!(operation = %operation, ?after, "fake did not respond in time");
                Err(DispatchError::TimedOut {
                    operation: operation.to_string(),
                    after,
                }
                .into())
            }
        }
    }
}

impl<S: FakeServer> Transport for ServerTransport<S> {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response, TransportError>> {
        self.dispatch(request).boxed()
    }
}
