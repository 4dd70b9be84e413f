use chrono::{DateTime, Utc};
use switchboard::{ClientError, OperationSpec, Pipeline, RequestContext, RestMethod};
use url::Url;

use crate::time::format_rfc1123;

pub const IF_MATCH: &str = "If-Match";
pub const IF_NONE_MATCH: &str = "If-None-Match";
pub const IF_MODIFIED_SINCE: &str = "If-Modified-Since";
pub const IF_UNMODIFIED_SINCE: &str = "If-Unmodified-Since";

pub static HEAD_IF_MODIFIED_SINCE: OperationSpec = OperationSpec::new(
    "ConditionalRequestClient.HeadIfModifiedSince",
    RestMethod::Head,
    "/special-headers/conditional-request/if-modified-since",
)
.success(&[204]);

pub static POST_IF_MATCH: OperationSpec = OperationSpec::new(
    "ConditionalRequestClient.PostIfMatch",
    RestMethod::Post,
    "/special-headers/conditional-request/if-match",
)
.success(&[204]);

pub static POST_IF_NONE_MATCH: OperationSpec = OperationSpec::new(
    "ConditionalRequestClient.PostIfNoneMatch",
    RestMethod::Post,
    "/special-headers/conditional-request/if-none-match",
)
.success(&[204]);

pub static POST_IF_UNMODIFIED_SINCE: OperationSpec = OperationSpec::new(
    "ConditionalRequestClient.PostIfUnmodifiedSince",
    RestMethod::Post,
    "/special-headers/conditional-request/if-unmodified-since",
)
.success(&[204]);

/// Every operation of [`ConditionalRequestClient`].
pub static OPERATIONS: [&OperationSpec; 4] = [
    &HEAD_IF_MODIFIED_SINCE,
    &POST_IF_MATCH,
    &POST_IF_NONE_MATCH,
    &POST_IF_UNMODIFIED_SINCE,
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadIfModifiedSinceOptions {
    /// Only perform the action if the resource changed after this time.
    pub if_modified_since: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostIfMatchOptions {
    /// Only perform the action if the resource's ETag matches.
    pub if_match: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostIfNoneMatchOptions {
    /// Only perform the action if the resource's ETag does not match.
    pub if_none_match: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostIfUnmodifiedSinceOptions {
    /// Only perform the action if the resource has not changed since this time.
    pub if_unmodified_since: Option<DateTime<Utc>>,
}

/// Client for the conditional request headers.
#[derive(Debug, Clone)]
pub struct ConditionalRequestClient {
    endpoint: Url,
    pipeline: Pipeline,
}

impl ConditionalRequestClient {
    pub fn new(endpoint: Url, pipeline: Pipeline) -> Self {
        Self { endpoint, pipeline }
    }

    /// Check when only If-Modified-Since in header is defined.
    pub async fn head_if_modified_since(
        &self,
        ctx: &RequestContext,
        options: &HeadIfModifiedSinceOptions,
    ) -> Result<(), ClientError> {
        let value = options.if_modified_since.as_ref().map(format_rfc1123);
        self.send(&HEAD_IF_MODIFIED_SINCE, ctx, IF_MODIFIED_SINCE, value)
            .await
    }

    /// Check when only If-Match in header is defined.
    pub async fn post_if_match(
        &self,
        ctx: &RequestContext,
        options: &PostIfMatchOptions,
    ) -> Result<(), ClientError> {
        self.send(&POST_IF_MATCH, ctx, IF_MATCH, options.if_match.as_deref())
            .await
    }

    /// Check when only If-None-Match in header is defined.
    pub async fn post_if_none_match(
        &self,
        ctx: &RequestContext,
        options: &PostIfNoneMatchOptions,
    ) -> Result<(), ClientError> {
        self.send(
            &POST_IF_NONE_MATCH,
            ctx,
            IF_NONE_MATCH,
            options.if_none_match.as_deref(),
        )
        .await
    }

    /// Check when only If-Unmodified-Since in header is defined.
    pub async fn post_if_unmodified_since(
        &self,
        ctx: &RequestContext,
        options: &PostIfUnmodifiedSinceOptions,
    ) -> Result<(), ClientError> {
        let value = options.if_unmodified_since.as_ref().map(format_rfc1123);
        self.send(&POST_IF_UNMODIFIED_SINCE, ctx, IF_UNMODIFIED_SINCE, value)
            .await
    }

    async fn send(
        &self,
        spec: &OperationSpec,
        ctx: &RequestContext,
        header: &str,
        value: Option<impl AsRef<str>>,
    ) -> Result<(), ClientError> {
        let request = spec
            .request(&self.endpoint, &[])?
            .context(ctx.clone())
            .optional_header(header, value)?
            .build();
        self.pipeline.execute(spec, request).await?;
        Ok(())
    }
}
