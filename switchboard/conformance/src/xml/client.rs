use serde::de::DeserializeOwned;
use serde::Serialize;
use switchboard::{BodyFormat, ClientError, OperationSpec, Pipeline, RequestContext, RestMethod};
use url::Url;

use super::models::{ModelWithAttributes, SimpleModel};

pub static GET_SIMPLE_MODEL: OperationSpec = OperationSpec::new(
    "XMLSimpleModelValueClient.Get",
    RestMethod::Get,
    "/payload/xml/simpleModel",
)
.returns(BodyFormat::Xml);

pub static PUT_SIMPLE_MODEL: OperationSpec = OperationSpec::new(
    "XMLSimpleModelValueClient.Put",
    RestMethod::Put,
    "/payload/xml/simpleModel",
)
.success(&[204])
.accepts(BodyFormat::Xml);

pub static GET_MODEL_WITH_ATTRIBUTES: OperationSpec = OperationSpec::new(
    "XMLModelWithAttributesValueClient.Get",
    RestMethod::Get,
    "/payload/xml/modelWithAttributes",
)
.returns(BodyFormat::Xml);

pub static PUT_MODEL_WITH_ATTRIBUTES: OperationSpec = OperationSpec::new(
    "XMLModelWithAttributesValueClient.Put",
    RestMethod::Put,
    "/payload/xml/modelWithAttributes",
)
.success(&[204])
.accepts(BodyFormat::Xml);

/// Every operation of the XML clients.
pub static OPERATIONS: [&OperationSpec; 4] = [
    &GET_SIMPLE_MODEL,
    &PUT_SIMPLE_MODEL,
    &GET_MODEL_WITH_ATTRIBUTES,
    &PUT_MODEL_WITH_ATTRIBUTES,
];

/// Operations for the `SimpleModel` XML body.
#[derive(Debug, Clone)]
pub struct XmlSimpleModelValueClient {
    endpoint: Url,
    pipeline: Pipeline,
}

impl XmlSimpleModelValueClient {
    pub fn new(endpoint: Url, pipeline: Pipeline) -> Self {
        Self { endpoint, pipeline }
    }

    pub async fn get(&self, ctx: &RequestContext) -> Result<SimpleModel, ClientError> {
        get_xml(&self.pipeline, &self.endpoint, &GET_SIMPLE_MODEL, ctx).await
    }

    pub async fn put(&self, ctx: &RequestContext, input: &SimpleModel) -> Result<(), ClientError> {
        put_xml(&self.pipeline, &self.endpoint, &PUT_SIMPLE_MODEL, ctx, input).await
    }
}

/// Operations for the `ModelWithAttributes` XML body.
#[derive(Debug, Clone)]
pub struct XmlModelWithAttributesValueClient {
    endpoint: Url,
    pipeline: Pipeline,
}

impl XmlModelWithAttributesValueClient {
    pub fn new(endpoint: Url, pipeline: Pipeline) -> Self {
        Self { endpoint, pipeline }
    }

    pub async fn get(&self, ctx: &RequestContext) -> Result<ModelWithAttributes, ClientError> {
        get_xml(&self.pipeline, &self.endpoint, &GET_MODEL_WITH_ATTRIBUTES, ctx).await
    }

    pub async fn put(
        &self,
        ctx: &RequestContext,
        input: &ModelWithAttributes,
    ) -> Result<(), ClientError> {
        put_xml(&self.pipeline, &self.endpoint, &PUT_MODEL_WITH_ATTRIBUTES, ctx, input).await
    }
}

async fn get_xml<T: DeserializeOwned>(
    pipeline: &Pipeline,
    endpoint: &Url,
    spec: &OperationSpec,
    ctx: &RequestContext,
) -> Result<T, ClientError> {
    let request = spec.request(endpoint, &[])?.context(ctx.clone()).build();
    let response = pipeline.execute(spec, request).await?;
    Ok(response.xml()?)
}

async fn put_xml<T: Serialize>(
    pipeline: &Pipeline,
    endpoint: &Url,
    spec: &OperationSpec,
    ctx: &RequestContext,
    input: &T,
) -> Result<(), ClientError> {
    let request = spec
        .request(endpoint, &[])?
        .context(ctx.clone())
        .encoded_body(spec.request_format(), input)?
        .build();
    pipeline.execute(spec, request).await?;
    Ok(())
}
