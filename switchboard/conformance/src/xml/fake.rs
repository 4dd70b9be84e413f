use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use switchboard::fake::{
    decode_request, implemented, serve, ClientRouter, DispatchOptions, DispatchTable, FakeServer,
    Responder, ServerTransport,
};
use switchboard::{OperationSpec, Request, Response, TransportError};

use super::client::*;
use super::models::{ModelWithAttributes, SimpleModel};

type DispatchResult = BoxFuture<'static, Result<Response, TransportError>>;

/// Fake for [`XmlSimpleModelValueClient`].
#[derive(Debug, Default, Clone)]
pub struct XmlSimpleModelValueServer {
    /// Fake for `XMLSimpleModelValueClient.Get`. Succeeds with 200.
    pub get: Option<Responder<(), SimpleModel>>,

    /// Fake for `XMLSimpleModelValueClient.Put`. Succeeds with 204.
    pub put: Option<Responder<SimpleModel, ()>>,
}

impl FakeServer for XmlSimpleModelValueServer {
    fn dispatch_table() -> DispatchTable<Self> {
        DispatchTable::<Self>::new()
            .route(&GET_SIMPLE_MODEL, |srv, req| {
                dispatch_get(srv.get.clone(), &GET_SIMPLE_MODEL, req)
            })
            .route(&PUT_SIMPLE_MODEL, |srv, req| {
                dispatch_put(srv.put.clone(), &PUT_SIMPLE_MODEL, req)
            })
    }
}

/// Fake for [`XmlModelWithAttributesValueClient`].
#[derive(Debug, Default, Clone)]
pub struct XmlModelWithAttributesValueServer {
    /// Fake for `XMLModelWithAttributesValueClient.Get`. Succeeds with 200.
    pub get: Option<Responder<(), ModelWithAttributes>>,

    /// Fake for `XMLModelWithAttributesValueClient.Put`. Succeeds with 204.
    pub put: Option<Responder<ModelWithAttributes, ()>>,
}

impl FakeServer for XmlModelWithAttributesValueServer {
    fn dispatch_table() -> DispatchTable<Self> {
        DispatchTable::<Self>::new()
            .route(&GET_MODEL_WITH_ATTRIBUTES, |srv, req| {
                dispatch_get(srv.get.clone(), &GET_MODEL_WITH_ATTRIBUTES, req)
            })
            .route(&PUT_MODEL_WITH_ATTRIBUTES, |srv, req| {
                dispatch_put(srv.put.clone(), &PUT_MODEL_WITH_ATTRIBUTES, req)
            })
    }
}

/// Fakes for every XML client, served through one transport.
#[derive(Debug, Default, Clone)]
pub struct XmlServer {
    pub simple_model_value: XmlSimpleModelValueServer,
    pub model_with_attributes_value: XmlModelWithAttributesValueServer,
}

impl XmlServer {
    /// Builds a transport that routes each request to its client's fake.
    pub fn into_transport(self, options: DispatchOptions) -> ClientRouter {
        ClientRouter::new()
            .route(
                GET_SIMPLE_MODEL.name().client(),
                ServerTransport::<XmlSimpleModelValueServer>::builder(self.simple_model_value)
                    .options(options)
                    .build(),
            )
            .route(
                GET_MODEL_WITH_ATTRIBUTES.name().client(),
                ServerTransport::<XmlModelWithAttributesValueServer>::builder(
                    self.model_with_attributes_value,
                )
                .options(options)
                .build(),
            )
    }
}

fn dispatch_get<T>(
    responder: Option<Responder<(), T>>,
    spec: &'static OperationSpec,
    request: Request,
) -> DispatchResult
where
    T: Serialize + Send + 'static,
{
    async move {
        let responder = implemented(responder.as_ref(), spec)?;
        serve(spec, responder, &request, (), |value| value).await
    }
    .boxed()
}

fn dispatch_put<T>(
    responder: Option<Responder<T, ()>>,
    spec: &'static OperationSpec,
    request: Request,
) -> DispatchResult
where
    T: DeserializeOwned + Send + 'static,
{
    async move {
        let responder = implemented(responder.as_ref(), spec)?;
        let body: T = decode_request(&request, spec)?;
        serve(spec, responder, &request, body, |()| ()).await
    }
    .boxed()
}
