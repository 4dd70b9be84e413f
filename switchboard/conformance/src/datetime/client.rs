use chrono::{DateTime, FixedOffset};
use switchboard::{BodyFormat, ClientError, OperationSpec, Pipeline, RequestContext, RestMethod};
use url::Url;

use crate::time::Rfc3339;

pub static GET_NULL: OperationSpec =
    OperationSpec::new("DatetimeClient.GetNull", RestMethod::Get, "/datetime/null")
        .returns(BodyFormat::Json);

pub static GET_UTC_MIN_DATE_TIME: OperationSpec = OperationSpec::new(
    "DatetimeClient.GetUTCMinDateTime",
    RestMethod::Get,
    "/datetime/min/utc",
)
.returns(BodyFormat::Json);

pub static PUT_UTC_MIN_DATE_TIME: OperationSpec = OperationSpec::new(
    "DatetimeClient.PutUTCMinDateTime",
    RestMethod::Put,
    "/datetime/min/utc",
)
.accepts(BodyFormat::Json);

pub static GET_UTC_LOWERCASE_MAX_DATE_TIME: OperationSpec = OperationSpec::new(
    "DatetimeClient.GetUTCLowercaseMaxDateTime",
    RestMethod::Get,
    "/datetime/max/utc/lowercase",
)
.returns(BodyFormat::Json);

pub static PUT_UTC_MAX_DATE_TIME: OperationSpec = OperationSpec::new(
    "DatetimeClient.PutUTCMaxDateTime",
    RestMethod::Put,
    "/datetime/max/utc",
)
.accepts(BodyFormat::Json);

pub static GET_LOCAL_POSITIVE_OFFSET_MIN_DATE_TIME: OperationSpec = OperationSpec::new(
    "DatetimeClient.GetLocalPositiveOffsetMinDateTime",
    RestMethod::Get,
    "/datetime/min/localpositiveoffset",
)
.returns(BodyFormat::Json);

pub static GET_LOCAL_NEGATIVE_OFFSET_MIN_DATE_TIME: OperationSpec = OperationSpec::new(
    "DatetimeClient.GetLocalNegativeOffsetMinDateTime",
    RestMethod::Get,
    "/datetime/min/localnegativeoffset",
)
.returns(BodyFormat::Json);

/// Every operation of [`DatetimeClient`].
pub static OPERATIONS: [&OperationSpec; 7] = [
    &GET_NULL,
    &GET_UTC_MIN_DATE_TIME,
    &PUT_UTC_MIN_DATE_TIME,
    &GET_UTC_LOWERCASE_MAX_DATE_TIME,
    &PUT_UTC_MAX_DATE_TIME,
    &GET_LOCAL_POSITIVE_OFFSET_MIN_DATE_TIME,
    &GET_LOCAL_NEGATIVE_OFFSET_MIN_DATE_TIME,
];

/// Result of [`DatetimeClient::get_null`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullableDateTimeResponse {
    pub value: Option<DateTime<FixedOffset>>,
}

/// Result of the `DatetimeClient` getters that always return a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeResponse {
    pub value: DateTime<FixedOffset>,
}

/// Client for the datetime operations.
#[derive(Debug, Clone)]
pub struct DatetimeClient {
    endpoint: Url,
    pipeline: Pipeline,
}

impl DatetimeClient {
    pub fn new(endpoint: Url, pipeline: Pipeline) -> Self {
        Self { endpoint, pipeline }
    }

    /// Get null datetime value.
    pub async fn get_null(
        &self,
        ctx: &RequestContext,
    ) -> Result<NullableDateTimeResponse, ClientError> {
        let request = GET_NULL
            .request(&self.endpoint, &[])?
            .context(ctx.clone())
            .build();
        let response = self.pipeline.execute(&GET_NULL, request).await?;
        let value: Option<Rfc3339> = response.json()?;
        Ok(NullableDateTimeResponse {
            value: value.map(Into::into),
        })
    }

    /// Get min datetime value 0001-01-01T00:00:00Z.
    pub async fn get_utc_min_date_time(
        &self,
        ctx: &RequestContext,
    ) -> Result<DateTimeResponse, ClientError> {
        self.get_date_time(&GET_UTC_MIN_DATE_TIME, ctx).await
    }

    /// Put min datetime value 0001-01-01T00:00:00Z.
    pub async fn put_utc_min_date_time(
        &self,
        ctx: &RequestContext,
        datetime_body: DateTime<FixedOffset>,
    ) -> Result<(), ClientError> {
        self.put_date_time(&PUT_UTC_MIN_DATE_TIME, ctx, datetime_body)
            .await
    }

    /// Get max datetime value 9999-12-31t23:59:59.999z.
    pub async fn get_utc_lowercase_max_date_time(
        &self,
        ctx: &RequestContext,
    ) -> Result<DateTimeResponse, ClientError> {
        self.get_date_time(&GET_UTC_LOWERCASE_MAX_DATE_TIME, ctx)
            .await
    }

    /// Put max datetime value 9999-12-31T23:59:59.999Z.
    pub async fn put_utc_max_date_time(
        &self,
        ctx: &RequestContext,
        datetime_body: DateTime<FixedOffset>,
    ) -> Result<(), ClientError> {
        self.put_date_time(&PUT_UTC_MAX_DATE_TIME, ctx, datetime_body)
            .await
    }

    /// Get min datetime value 0001-01-01T00:00:00+14:00.
    pub async fn get_local_positive_offset_min_date_time(
        &self,
        ctx: &RequestContext,
    ) -> Result<DateTimeResponse, ClientError> {
        self.get_date_time(&GET_LOCAL_POSITIVE_OFFSET_MIN_DATE_TIME, ctx)
            .await
    }

    /// Get min datetime value 0001-01-01T00:00:00-14:00.
    pub async fn get_local_negative_offset_min_date_time(
        &self,
        ctx: &RequestContext,
    ) -> Result<DateTimeResponse, ClientError> {
        self.get_date_time(&GET_LOCAL_NEGATIVE_OFFSET_MIN_DATE_TIME, ctx)
            .await
    }

    async fn get_date_time(
        &self,
        spec: &OperationSpec,
        ctx: &RequestContext,
    ) -> Result<DateTimeResponse, ClientError> {
        let request = spec
            .request(&self.endpoint, &[])?
            .context(ctx.clone())
            .build();
        let response = self.pipeline.execute(spec, request).await?;
        let value: Rfc3339 = response.json()?;
        Ok(DateTimeResponse { value: value.0 })
    }

    async fn put_date_time(
        &self,
        spec: &OperationSpec,
        ctx: &RequestContext,
        value: DateTime<FixedOffset>,
    ) -> Result<(), ClientError> {
        let request = spec
            .request(&self.endpoint, &[])?
            .context(ctx.clone())
            .encoded_body(spec.request_format(), &Rfc3339(value))?
            .build();
        self.pipeline.execute(spec, request).await?;
        Ok(())
    }
}
