//! Routing across the clients of one package.

use std::collections::HashMap;
use std::fmt;
use std::future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, warn};

use crate::error::{DispatchError, TransportError};
use crate::exchange::{Request, Response};
use crate::transport::Transport;

/// One transport for a group of clients.
///
/// Requests are forwarded by the client half of their operation name, so a
/// single pipeline can drive every client of a package against its fakes.
///
/// ## Examples
///
/// ```rust,ignore
/// let router = ClientRouter::new()
///     .route("XMLSimpleModelValueClient", ServerTransport::new(simple))
///     .route("XMLModelWithAttributesValueClient", ServerTransport::new(attributes));
/// let pipeline = Pipeline::builder().transport(router).build()?;
/// ```
#[derive(Default, Clone)]
pub struct ClientRouter {
    clients: HashMap<String, Arc<dyn Transport>>,
}

impl ClientRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends requests for `client` to `transport`.
    pub fn route(mut self, client: impl Into<String>, transport: impl Transport + 'static) -> Self {
        self.clients.insert(client.into(), Arc::new(transport));
        self
    }

    pub fn handles(&self, client: &str) -> bool {
        self.clients.contains_key(client)
    }
}

impl fmt::Debug for ClientRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.clients.keys()).finish()
    }
}

impl Transport for ClientRouter {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response, TransportError>> {
        let Some(operation) = request.operation() else {
            return future::ready(Err(DispatchError::MissingOperationName.into())).boxed();
        };
        let client = operation.client().to_string();

        match self.clients.get(&client) {
            Some(transport) => {
                debug!(client = %client, "routing to client fake");
                transport.send(request)
            }
            None => {
                warn!(client = %client, "no fake registered for client");
                future::ready(Err(DispatchError::UnhandledClient { client }.into())).boxed()
            }
        }
    }
}
