use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use switchboard::fake::{implemented, serve, DispatchTable, FakeServer, Responder};
use switchboard::{OperationSpec, Request, Response, TransportError};

use super::client::*;
use super::models::{MyException, MyExceptionOrB};

/// Fake for [`MultipleResponsesClient`].
///
/// The responder picks the status. For the `Get200Model201Model*` fakes the
/// status should match the variant: 200 for `MyException`, 201 for `B`.
#[derive(Debug, Default, Clone)]
pub struct MultipleResponsesServer {
    /// Fake for `MultipleResponsesClient.Get200Model204NoModelDefaultError200Valid`. Succeeds with 200 or 204.
    pub get200_model204_no_model_default_error200_valid: Option<Responder<(), MyException>>,

    /// Fake for `MultipleResponsesClient.Get200Model204NoModelDefaultError204Valid`. Succeeds with 200 or 204.
    pub get200_model204_no_model_default_error204_valid: Option<Responder<(), MyException>>,

    /// Fake for `MultipleResponsesClient.Get200Model201ModelDefaultError200Valid`. Succeeds with 200 or 201.
    pub get200_model201_model_default_error200_valid: Option<Responder<(), MyExceptionOrB>>,

    /// Fake for `MultipleResponsesClient.Get200Model201ModelDefaultError201Valid`. Succeeds with 200 or 201.
    pub get200_model201_model_default_error201_valid: Option<Responder<(), MyExceptionOrB>>,

    /// Fake for `MultipleResponsesClient.Get200Model201ModelDefaultError400Valid`. Succeeds with 200 or 201.
    pub get200_model201_model_default_error400_valid: Option<Responder<(), MyExceptionOrB>>,
}

impl FakeServer for MultipleResponsesServer {
    fn dispatch_table() -> DispatchTable<Self> {
        DispatchTable::<Self>::new()
            .route(&GET_200_MODEL_204_NO_MODEL_DEFAULT_ERROR_200_VALID, |srv, req| {
                dispatch(
                    srv.get200_model204_no_model_default_error200_valid.clone(),
                    &GET_200_MODEL_204_NO_MODEL_DEFAULT_ERROR_200_VALID,
                    req,
                )
            })
            .route(&GET_200_MODEL_204_NO_MODEL_DEFAULT_ERROR_204_VALID, |srv, req| {
                dispatch(
                    srv.get200_model204_no_model_default_error204_valid.clone(),
                    &GET_200_MODEL_204_NO_MODEL_DEFAULT_ERROR_204_VALID,
                    req,
                )
            })
            .route(&GET_200_MODEL_201_MODEL_DEFAULT_ERROR_200_VALID, |srv, req| {
                dispatch(
                    srv.get200_model201_model_default_error200_valid.clone(),
                    &GET_200_MODEL_201_MODEL_DEFAULT_ERROR_200_VALID,
                    req,
                )
            })
            .route(&GET_200_MODEL_201_MODEL_DEFAULT_ERROR_201_VALID, |srv, req| {
                dispatch(
                    srv.get200_model201_model_default_error201_valid.clone(),
                    &GET_200_MODEL_201_MODEL_DEFAULT_ERROR_201_VALID,
                    req,
                )
            })
            .route(&GET_200_MODEL_201_MODEL_DEFAULT_ERROR_400_VALID, |srv, req| {
                dispatch(
                    srv.get200_model201_model_default_error400_valid.clone(),
                    &GET_200_MODEL_201_MODEL_DEFAULT_ERROR_400_VALID,
                    req,
                )
            })
    }
}

fn dispatch<T>(
    responder: Option<Responder<(), T>>,
    spec: &'static OperationSpec,
    request: Request,
) -> BoxFuture<'static, Result<Response, TransportError>>
where
    T: Serialize + Send + 'static,
{
    async move {
        let responder = implemented(responder.as_ref(), spec)?;
        serve(spec, responder, &request, (), |value| value).await
    }
    .boxed()
}
