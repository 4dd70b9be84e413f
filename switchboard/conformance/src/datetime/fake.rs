use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use futures::future::BoxFuture;
use futures::FutureExt;
use switchboard::fake::{decode_request, implemented, serve, DispatchTable, FakeServer, Responder};
use switchboard::{OperationSpec, Request, Response, TransportError};

use super::client::*;
use crate::time::Rfc3339;

type DispatchResult = BoxFuture<'static, Result<Response, TransportError>>;

/// Fake for [`DatetimeClient`]. Unset fields answer "not implemented".
#[derive(Debug, Default, Clone)]
pub struct DatetimeServer {
    /// Fake for `DatetimeClient.GetNull`. Succeeds with 200.
    pub get_null: Option<Responder<(), Option<DateTime<FixedOffset>>>>,

    /// Fake for `DatetimeClient.GetUTCMinDateTime`. Succeeds with 200.
    pub get_utc_min_date_time: Option<Responder<(), DateTime<FixedOffset>>>,

    /// Fake for `DatetimeClient.PutUTCMinDateTime`. Succeeds with 200.
    pub put_utc_min_date_time: Option<Responder<DateTime<FixedOffset>, ()>>,

    /// Fake for `DatetimeClient.GetUTCLowercaseMaxDateTime`. Succeeds with 200.
    pub get_utc_lowercase_max_date_time: Option<Responder<(), DateTime<FixedOffset>>>,

    /// Fake for `DatetimeClient.PutUTCMaxDateTime`. Succeeds with 200.
    pub put_utc_max_date_time: Option<Responder<DateTime<FixedOffset>, ()>>,

    /// Fake for `DatetimeClient.GetLocalPositiveOffsetMinDateTime`. Succeeds with 200.
    pub get_local_positive_offset_min_date_time: Option<Responder<(), DateTime<FixedOffset>>>,

    /// Fake for `DatetimeClient.GetLocalNegativeOffsetMinDateTime`. Succeeds with 200.
    pub get_local_negative_offset_min_date_time: Option<Responder<(), DateTime<FixedOffset>>>,
}

impl FakeServer for DatetimeServer {
    fn dispatch_table() -> DispatchTable<Self> {
        DispatchTable::<Self>::new()
            .route(&GET_NULL, dispatch_get_null)
            .route(&GET_UTC_MIN_DATE_TIME, |srv, req| {
                dispatch_get(srv.get_utc_min_date_time.clone(), &GET_UTC_MIN_DATE_TIME, req)
            })
            .route(&PUT_UTC_MIN_DATE_TIME, |srv, req| {
                dispatch_put(srv.put_utc_min_date_time.clone(), &PUT_UTC_MIN_DATE_TIME, req)
            })
            .route(&GET_UTC_LOWERCASE_MAX_DATE_TIME, |srv, req| {
                dispatch_get(
                    srv.get_utc_lowercase_max_date_time.clone(),
                    &GET_UTC_LOWERCASE_MAX_DATE_TIME,
                    req,
                )
            })
            .route(&PUT_UTC_MAX_DATE_TIME, |srv, req| {
                dispatch_put(srv.put_utc_max_date_time.clone(), &PUT_UTC_MAX_DATE_TIME, req)
            })
            .route(&GET_LOCAL_POSITIVE_OFFSET_MIN_DATE_TIME, |srv, req| {
                dispatch_get(
                    srv.get_local_positive_offset_min_date_time.clone(),
                    &GET_LOCAL_POSITIVE_OFFSET_MIN_DATE_TIME,
                    req,
                )
            })
            .route(&GET_LOCAL_NEGATIVE_OFFSET_MIN_DATE_TIME, |srv, req| {
                dispatch_get(
                    srv.get_local_negative_offset_min_date_time.clone(),
                    &GET_LOCAL_NEGATIVE_OFFSET_MIN_DATE_TIME,
                    req,
                )
            })
    }
}

fn dispatch_get_null(server: Arc<DatetimeServer>, request: Request) -> DispatchResult {
    async move {
        let responder = implemented(server.get_null.as_ref(), &GET_NULL)?;
        serve(&GET_NULL, responder, &request, (), |value| value.map(Rfc3339)).await
    }
    .boxed()
}

fn dispatch_get(
    responder: Option<Responder<(), DateTime<FixedOffset>>>,
    spec: &'static OperationSpec,
    request: Request,
) -> DispatchResult {
    async move {
        let responder = implemented(responder.as_ref(), spec)?;
        serve(spec, responder, &request, (), Rfc3339).await
    }
    .boxed()
}

fn dispatch_put(
    responder: Option<Responder<DateTime<FixedOffset>, ()>>,
    spec: &'static OperationSpec,
    request: Request,
) -> DispatchResult {
    async move {
        let responder = implemented(responder.as_ref(), spec)?;
        let body: Rfc3339 = decode_request(&request, spec)?;
        serve(spec, responder, &request, body.0, |()| ()).await
    }
    .boxed()
}
