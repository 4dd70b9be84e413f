use switchboard::{
    BodyFormat, ClientError, OperationSpec, Pipeline, RequestContext, Response, RestMethod,
};
use url::Url;

use super::models::{MyException, MyExceptionOrB};

pub static GET_200_MODEL_204_NO_MODEL_DEFAULT_ERROR_200_VALID: OperationSpec = OperationSpec::new(
    "MultipleResponsesClient.Get200Model204NoModelDefaultError200Valid",
    RestMethod::Get,
    "/http/payloads/200/A/204/none/default/Error/response/200/valid",
)
.success(&[200, 204])
.returns(BodyFormat::Json);

pub static GET_200_MODEL_204_NO_MODEL_DEFAULT_ERROR_204_VALID: OperationSpec = OperationSpec::new(
    "MultipleResponsesClient.Get200Model204NoModelDefaultError204Valid",
    RestMethod::Get,
    "/http/payloads/200/A/204/none/default/Error/response/204/none",
)
.success(&[200, 204])
.returns(BodyFormat::Json);

pub static GET_200_MODEL_201_MODEL_DEFAULT_ERROR_200_VALID: OperationSpec = OperationSpec::new(
    "MultipleResponsesClient.Get200Model201ModelDefaultError200Valid",
    RestMethod::Get,
    "/http/payloads/200/A/201/B/default/Error/response/200/valid",
)
.success(&[200, 201])
.returns(BodyFormat::Json);

pub static GET_200_MODEL_201_MODEL_DEFAULT_ERROR_201_VALID: OperationSpec = OperationSpec::new(
    "MultipleResponsesClient.Get200Model201ModelDefaultError201Valid",
    RestMethod::Get,
    "/http/payloads/200/A/201/B/default/Error/response/201/valid",
)
.success(&[200, 201])
.returns(BodyFormat::Json);

pub static GET_200_MODEL_201_MODEL_DEFAULT_ERROR_400_VALID: OperationSpec = OperationSpec::new(
    "MultipleResponsesClient.Get200Model201ModelDefaultError400Valid",
    RestMethod::Get,
    "/http/payloads/200/A/201/B/default/Error/response/400/valid",
)
.success(&[200, 201])
.returns(BodyFormat::Json);

/// Every operation of [`MultipleResponsesClient`].
pub static OPERATIONS: [&OperationSpec; 5] = [
    &GET_200_MODEL_204_NO_MODEL_DEFAULT_ERROR_200_VALID,
    &GET_200_MODEL_204_NO_MODEL_DEFAULT_ERROR_204_VALID,
    &GET_200_MODEL_201_MODEL_DEFAULT_ERROR_200_VALID,
    &GET_200_MODEL_201_MODEL_DEFAULT_ERROR_201_VALID,
    &GET_200_MODEL_201_MODEL_DEFAULT_ERROR_400_VALID,
];

/// Result of the `Get200Model204NoModel*` operations.
///
/// A 204 leaves `my_exception` at its default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MyExceptionResponse {
    pub my_exception: MyException,
}

/// Result of the `Get200Model201Model*` operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyExceptionOrBResponse {
    pub value: MyExceptionOrB,
}

/// Client for operations whose payload depends on the response status.
#[derive(Debug, Clone)]
pub struct MultipleResponsesClient {
    endpoint: Url,
    pipeline: Pipeline,
}

impl MultipleResponsesClient {
    pub fn new(endpoint: Url, pipeline: Pipeline) -> Self {
        Self { endpoint, pipeline }
    }

    /// Send a 200 response with valid payload: {'statusCode': '200'}.
    pub async fn get200_model204_no_model_default_error200_valid(
        &self,
        ctx: &RequestContext,
    ) -> Result<MyExceptionResponse, ClientError> {
        self.get_model_or_nothing(&GET_200_MODEL_204_NO_MODEL_DEFAULT_ERROR_200_VALID, ctx)
            .await
    }

    /// Send a 204 response with no payload.
    pub async fn get200_model204_no_model_default_error204_valid(
        &self,
        ctx: &RequestContext,
    ) -> Result<MyExceptionResponse, ClientError> {
        self.get_model_or_nothing(&GET_200_MODEL_204_NO_MODEL_DEFAULT_ERROR_204_VALID, ctx)
            .await
    }

    /// Send a 200 response with valid payload: {'statusCode': '200'}.
    pub async fn get200_model201_model_default_error200_valid(
        &self,
        ctx: &RequestContext,
    ) -> Result<MyExceptionOrBResponse, ClientError> {
        self.get_model_or_b(&GET_200_MODEL_201_MODEL_DEFAULT_ERROR_200_VALID, ctx)
            .await
    }

    /// Send a 201 response with valid payload: {'statusCode': '201', 'textStatusCode': 'Created'}.
    pub async fn get200_model201_model_default_error201_valid(
        &self,
        ctx: &RequestContext,
    ) -> Result<MyExceptionOrBResponse, ClientError> {
        self.get_model_or_b(&GET_200_MODEL_201_MODEL_DEFAULT_ERROR_201_VALID, ctx)
            .await
    }

    /// Send a 400 response with valid payload: {'code': '400', 'message': 'client error'}.
    pub async fn get200_model201_model_default_error400_valid(
        &self,
        ctx: &RequestContext,
    ) -> Result<MyExceptionOrBResponse, ClientError> {
        self.get_model_or_b(&GET_200_MODEL_201_MODEL_DEFAULT_ERROR_400_VALID, ctx)
            .await
    }

    async fn get(&self, spec: &OperationSpec, ctx: &RequestContext) -> Result<Response, ClientError> {
        let request = spec
            .request(&self.endpoint, &[])?
            .context(ctx.clone())
            .build();
        self.pipeline.execute(spec, request).await
    }

    async fn get_model_or_nothing(
        &self,
        spec: &OperationSpec,
        ctx: &RequestContext,
    ) -> Result<MyExceptionResponse, ClientError> {
        let response = self.get(spec, ctx).await?;
        if response.body().is_empty() {
            return Ok(MyExceptionResponse::default());
        }
        Ok(MyExceptionResponse {
            my_exception: response.json()?,
        })
    }

    async fn get_model_or_b(
        &self,
        spec: &OperationSpec,
        ctx: &RequestContext,
    ) -> Result<MyExceptionOrBResponse, ClientError> {
        let response = self.get(spec, ctx).await?;
        let value = match response.status().as_u16() {
            201 => MyExceptionOrB::B(response.json()?),
            _ => MyExceptionOrB::MyException(response.json()?),
        };
        Ok(MyExceptionOrBResponse { value })
    }
}
