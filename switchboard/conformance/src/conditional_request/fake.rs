use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use switchboard::fake::{
    header_value, implemented, parse_optional_header, serve, DispatchTable, FakeServer, Responder,
};
use switchboard::{Request, Response, TransportError};

use super::client::*;
use crate::time::parse_rfc1123;

type DispatchResult = BoxFuture<'static, Result<Response, TransportError>>;

/// Fake for [`ConditionalRequestClient`].
///
/// Each responder receives the options rebuilt from the request headers.
/// Date headers that are not RFC 1123 fail the request before the responder
/// runs.
#[derive(Debug, Default, Clone)]
pub struct ConditionalRequestServer {
    /// Fake for `ConditionalRequestClient.HeadIfModifiedSince`. Succeeds with 204.
    pub head_if_modified_since: Option<Responder<HeadIfModifiedSinceOptions, ()>>,

    /// Fake for `ConditionalRequestClient.PostIfMatch`. Succeeds with 204.
    pub post_if_match: Option<Responder<PostIfMatchOptions, ()>>,

    /// Fake for `ConditionalRequestClient.PostIfNoneMatch`. Succeeds with 204.
    pub post_if_none_match: Option<Responder<PostIfNoneMatchOptions, ()>>,

    /// Fake for `ConditionalRequestClient.PostIfUnmodifiedSince`. Succeeds with 204.
    pub post_if_unmodified_since: Option<Responder<PostIfUnmodifiedSinceOptions, ()>>,
}

impl FakeServer for ConditionalRequestServer {
    fn dispatch_table() -> DispatchTable<Self> {
        DispatchTable::<Self>::new()
            .route(&HEAD_IF_MODIFIED_SINCE, dispatch_head_if_modified_since)
            .route(&POST_IF_MATCH, dispatch_post_if_match)
            .route(&POST_IF_NONE_MATCH, dispatch_post_if_none_match)
            .route(&POST_IF_UNMODIFIED_SINCE, dispatch_post_if_unmodified_since)
    }
}

fn dispatch_head_if_modified_since(
    server: Arc<ConditionalRequestServer>,
    request: Request,
) -> DispatchResult {
    async move {
        let spec = &HEAD_IF_MODIFIED_SINCE;
        let responder = implemented(server.head_if_modified_since.as_ref(), spec)?;
        let options = HeadIfModifiedSinceOptions {
            if_modified_since: parse_optional_header(&request, IF_MODIFIED_SINCE, parse_rfc1123)?,
        };
        serve(spec, responder, &request, options, |()| ()).await
    }
    .boxed()
}

fn dispatch_post_if_match(server: Arc<ConditionalRequestServer>, request: Request) -> DispatchResult {
    async move {
        let spec = &POST_IF_MATCH;
        let responder = implemented(server.post_if_match.as_ref(), spec)?;
        let options = PostIfMatchOptions {
            if_match: header_value(&request, IF_MATCH),
        };
        serve(spec, responder, &request, options, |()| ()).await
    }
    .boxed()
}

fn dispatch_post_if_none_match(
    server: Arc<ConditionalRequestServer>,
    request: Request,
) -> DispatchResult {
    async move {
        let spec = &POST_IF_NONE_MATCH;
        let responder = implemented(server.post_if_none_match.as_ref(), spec)?;
        let options = PostIfNoneMatchOptions {
            if_none_match: header_value(&request, IF_NONE_MATCH),
        };
        serve(spec, responder, &request, options, |()| ()).await
    }
    .boxed()
}

fn dispatch_post_if_unmodified_since(
    server: Arc<ConditionalRequestServer>,
    request: Request,
) -> DispatchResult {
    async move {
        let spec = &POST_IF_UNMODIFIED_SINCE;
        let responder = implemented(server.post_if_unmodified_since.as_ref(), spec)?;
        let options = PostIfUnmodifiedSinceOptions {
            if_unmodified_since: parse_optional_header(
                &request,
                IF_UNMODIFIED_SINCE,
                parse_rfc1123,
            )?,
        };
        serve(spec, responder, &request, options, |()| ()).await
    }
    .boxed()
}
