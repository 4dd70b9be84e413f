//! End-to-end behavior of a pipeline backed by a fake server.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use switchboard::fake::{
    decode_request, implemented, serve, DispatchTable, ErrorResponse, FakeServer, Interception,
    Responded, Responder, ServerTransport,
};
use switchboard::{
    BodyFormat, ClientError, DispatchError, OperationSpec, Pipeline, Request, RequestContext,
    Response, RestMethod, RetryOptions, TransportError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "Widget")]
struct Widget {
    name: String,
    size: u32,
}

static GET_WIDGET: OperationSpec = OperationSpec::new("WidgetsClient.Get", RestMethod::Get, "/widgets/{name}")
    .success(&[200])
    .returns(BodyFormat::Json);

static PUT_WIDGET: OperationSpec = OperationSpec::new("WidgetsClient.Put", RestMethod::Put, "/widgets")
    .success(&[200, 201])
    .accepts(BodyFormat::Json)
    .returns(BodyFormat::Json);

static GET_WIDGET_XML: OperationSpec =
    OperationSpec::new("WidgetsClient.GetXml", RestMethod::Get, "/widgets/xml")
        .returns(BodyFormat::Xml);

static DELETE_WIDGET: OperationSpec =
    OperationSpec::new("WidgetsClient.Delete", RestMethod::Delete, "/widgets/{name}")
        .success(&[204]);

#[derive(Default)]
struct WidgetsServer {
    get: Option<Responder<String, Widget>>,
    put: Option<Responder<Widget, Widget>>,
    get_xml: Option<Responder<(), Widget>>,
    delete: Option<Responder<String, ()>>,
}

impl FakeServer for WidgetsServer {
    fn dispatch_table() -> DispatchTable<Self> {
        DispatchTable::<Self>::new()
            .route(&GET_WIDGET, dispatch_get)
            .route(&PUT_WIDGET, dispatch_put)
            .route(&GET_WIDGET_XML, dispatch_get_xml)
            .route(&DELETE_WIDGET, dispatch_delete)
    }
}

fn widget_name(request: &Request) -> String {
    request
        .url()
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string()
}

fn dispatch_get(
    server: Arc<WidgetsServer>,
    request: Request,
) -> BoxFuture<'static, Result<Response, TransportError>> {
    async move {
        let responder = implemented(server.get.as_ref(), &GET_WIDGET)?;
        let name = widget_name(&request);
        serve(&GET_WIDGET, responder, &request, name, |w| w).await
    }
    .boxed()
}

fn dispatch_put(
    server: Arc<WidgetsServer>,
    request: Request,
) -> BoxFuture<'static, Result<Response, TransportError>> {
    async move {
        let responder = implemented(server.put.as_ref(), &PUT_WIDGET)?;
        let body: Widget = decode_request(&request, &PUT_WIDGET)?;
        serve(&PUT_WIDGET, responder, &request, body, |w| w).await
    }
    .boxed()
}

fn dispatch_get_xml(
    server: Arc<WidgetsServer>,
    request: Request,
) -> BoxFuture<'static, Result<Response, TransportError>> {
    async move {
        let responder = implemented(server.get_xml.as_ref(), &GET_WIDGET_XML)?;
        serve(&GET_WIDGET_XML, responder, &request, (), |w| w).await
    }
    .boxed()
}

fn dispatch_delete(
    server: Arc<WidgetsServer>,
    request: Request,
) -> BoxFuture<'static, Result<Response, TransportError>> {
    async move {
        let responder = implemented(server.delete.as_ref(), &DELETE_WIDGET)?;
        let name = widget_name(&request);
        serve(&DELETE_WIDGET, responder, &request, name, |()| ()).await
    }
    .boxed()
}

fn endpoint() -> Url {
    Url::parse("http://localhost:3000").unwrap()
}

fn pipeline(transport: ServerTransport<WidgetsServer>) -> Pipeline {
    Pipeline::builder()
        .transport(transport)
        .retry(RetryOptions::disabled())
        .build()
        .unwrap()
}

async fn get_widget(pipeline: &Pipeline, name: &str, context: RequestContext) -> Result<Widget, ClientError> {
    let request = GET_WIDGET
        .request(&endpoint(), &[("name", name)])?
        .context(context)
        .build();
    let response = pipeline.execute(&GET_WIDGET, request).await?;
    Ok(response.decode(GET_WIDGET.response_format())?)
}

#[tokio::test]
async fn allowed_status_returns_encoded_payload() {
    let server = WidgetsServer {
        get: Some(Responder::from_fn(|name| Ok(Responded::ok(Widget { name, size: 3 })))),
        ..Default::default()
    };
    let pipeline = pipeline(ServerTransport::new(server));

    let widget = get_widget(&pipeline, "gear", RequestContext::background())
        .await
        .unwrap();
    assert_eq!(widget, Widget { name: "gear".into(), size: 3 });
}

#[tokio::test]
async fn request_body_round_trips_through_dispatcher() {
    let server = WidgetsServer {
        put: Some(Responder::from_fn(|mut widget: Widget| {
            widget.size += 1;
            Ok(Responded::new(201, widget))
        })),
        ..Default::default()
    };
    let pipeline = pipeline(ServerTransport::new(server));

    let request = PUT_WIDGET
        .request(&endpoint(), &[])
        .unwrap()
        .encoded_body(BodyFormat::Json, &Widget { name: "cog".into(), size: 1 })
        .unwrap()
        .build();
    let response = pipeline.execute(&PUT_WIDGET, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.json::<Widget>().unwrap().size, 2);
}

#[tokio::test]
async fn xml_payload_round_trips() {
    let server = WidgetsServer {
        get_xml: Some(Responder::from_fn(|()| {
            Ok(Responded::ok(Widget { name: "xml".into(), size: 9 }))
        })),
        ..Default::default()
    };
    let pipeline = pipeline(ServerTransport::new(server));

    let request = GET_WIDGET_XML.request(&endpoint(), &[]).unwrap().build();
    let response = pipeline.execute(&GET_WIDGET_XML, request).await.unwrap();

    assert_eq!(response.header("content-type"), Some("application/xml"));
    assert_eq!(
        response.xml::<Widget>().unwrap(),
        Widget { name: "xml".into(), size: 9 }
    );
}

#[tokio::test]
async fn bodiless_operation_returns_status_only() {
    let server = WidgetsServer {
        delete: Some(Responder::from_fn(|_name| Ok(Responded::empty(204)))),
        ..Default::default()
    };
    let pipeline = pipeline(ServerTransport::new(server));

    let request = DELETE_WIDGET
        .request(&endpoint(), &[("name", "gear")])
        .unwrap()
        .build();
    let response = pipeline.execute(&DELETE_WIDGET, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.body().is_empty());
}

#[tokio::test]
async fn disallowed_status_is_a_non_retriable_error() {
    let server = WidgetsServer {
        get: Some(Responder::from_fn(|name| {
            Ok(Responded::new(201, Widget { name, size: 0 }))
        })),
        ..Default::default()
    };
    let pipeline = pipeline(ServerTransport::new(server));

    let err = get_widget(&pipeline, "gear", RequestContext::background())
        .await
        .unwrap_err();

    assert!(!err.is_retriable());
    assert_eq!(
        err.to_string(),
        "unexpected status code 201. acceptable values are [200]"
    );
}

#[tokio::test]
async fn unset_responder_is_not_implemented() {
    let pipeline = pipeline(ServerTransport::new(WidgetsServer::default()));

    let err = get_widget(&pipeline, "gear", RequestContext::background())
        .await
        .unwrap_err();
    assert!(!err.is_retriable());
    assert!(err.to_string().contains("not implemented"));
    assert!(err.to_string().contains("Get"));
}

#[tokio::test]
async fn unset_responder_wins_over_malformed_body() {
    let pipeline = pipeline(ServerTransport::new(WidgetsServer::default()));

    let request = PUT_WIDGET
        .request(&endpoint(), &[])
        .unwrap()
        .body("application/json", "this is not json")
        .build();
    let err = pipeline.execute(&PUT_WIDGET, request).await.unwrap_err();

    assert_eq!(err.to_string(), "fake for method Put not implemented");
}

#[tokio::test]
async fn malformed_body_is_a_codec_error() {
    let server = WidgetsServer {
        put: Some(Responder::from_fn(|w| Ok(Responded::ok(w)))),
        ..Default::default()
    };
    let pipeline = pipeline(ServerTransport::new(server));

    let request = PUT_WIDGET
        .request(&endpoint(), &[])
        .unwrap()
        .body("application/json", "{\"name\":")
        .build();
    let err = pipeline.execute(&PUT_WIDGET, request).await.unwrap_err();

    assert!(matches!(err, ClientError::Transport(TransportError::Codec(_))));
    assert!(!err.is_retriable());
}

#[tokio::test]
async fn declared_error_becomes_response_error() {
    let server = WidgetsServer {
        get: Some(Responder::from_fn(|_| {
            Err(ErrorResponse::new(404)
                .with_code("WidgetNotFound")
                .with_message("no such widget"))
        })),
        ..Default::default()
    };
    let pipeline = pipeline(ServerTransport::new(server));

    let err = get_widget(&pipeline, "missing", RequestContext::background())
        .await
        .unwrap_err();

    let response_error = err.as_response_error().unwrap();
    assert_eq!(response_error.status(), StatusCode::NOT_FOUND);
    assert_eq!(response_error.error_code(), Some("WidgetNotFound"));
    let rendered = err.to_string();
    assert!(rendered.starts_with("GET http://localhost:3000/widgets/missing"));
    assert!(rendered.contains("ERROR CODE: WidgetNotFound"));
}

#[tokio::test]
async fn unknown_operation_is_unhandled() {
    static GET_GADGET: OperationSpec =
        OperationSpec::new("WidgetsClient.GetGadget", RestMethod::Get, "/gadgets");

    let pipeline = pipeline(ServerTransport::new(WidgetsServer::default()));
    let request = GET_GADGET.request(&endpoint(), &[]).unwrap().build();

    let err = pipeline.execute(&GET_GADGET, request).await.unwrap_err();
    assert_eq!(err.to_string(), "unhandled API WidgetsClient.GetGadget");
}

#[tokio::test]
async fn interceptor_result_is_returned_verbatim() {
    let called = Arc::new(AtomicBool::new(false));
    let seen = Arc::clone(&called);
    let server = WidgetsServer {
        get: Some(Responder::from_fn(move |_| {
            seen.store(true, Ordering::SeqCst);
            panic!("the dispatch table must not be consulted");
        })),
        ..Default::default()
    };
    let transport = ServerTransport::builder(server)
        .interceptor(|request: &Request| {
            if request.operation().map(|op| op.as_str()) == Some("WidgetsClient.Get") {
                Interception::Handled(Ok(Response::new(StatusCode::OK)
                    .with_body("application/json", r#"{"name":"intercepted","size":1}"#)))
            } else {
                Interception::Pass
            }
        })
        .build();
    let pipeline = pipeline(transport);

    let widget = get_widget(&pipeline, "gear", RequestContext::background())
        .await
        .unwrap();

    assert_eq!(widget.name, "intercepted");
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn interceptor_errors_are_returned_verbatim() {
    let transport = ServerTransport::builder(WidgetsServer::default())
        .interceptor(|_: &Request| {
            Interception::Handled(Err(TransportError::Connection("injected".to_string())))
        })
        .build();
    let pipeline = pipeline(transport);

    let err = get_widget(&pipeline, "gear", RequestContext::background())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Connection(ref m)) if m == "injected"
    ));
}

#[tokio::test(start_paused = true)]
async fn cancellation_aborts_pending_responder() {
    let started = Arc::new(AtomicU32::new(0));
    let finished = Arc::new(AtomicBool::new(false));
    let (started_in, finished_in) = (Arc::clone(&started), Arc::clone(&finished));

    let server = WidgetsServer {
        get: Some(Responder::new(move |_, name| {
            let started = Arc::clone(&started_in);
            let finished = Arc::clone(&finished_in);
            async move {
                started.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(3600)).await;
                finished.store(true, Ordering::SeqCst);
                Ok(Responded::ok(Widget { name, size: 0 }))
            }
        })),
        ..Default::default()
    };
    let pipeline = pipeline(ServerTransport::new(server));

    let context = RequestContext::background();
    let canceller = context.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        canceller.cancel();
    });

    let err = get_widget(&pipeline, "gear", context).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(TransportError::Cancelled)));

    tokio::time::sleep(Duration::from_secs(7200)).await;
    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert!(!finished.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn deadline_is_reported_as_deadline_exceeded() {
    let server = WidgetsServer {
        get: Some(Responder::new(|_, name| async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Responded::ok(Widget { name, size: 0 }))
        })),
        ..Default::default()
    };
    let pipeline = pipeline(ServerTransport::new(server));

    let context = RequestContext::background().with_timeout(Duration::from_secs(1));
    let err = get_widget(&pipeline, "gear", context).await.unwrap_err();
    assert_eq!(err.to_string(), "context deadline exceeded");
}

#[tokio::test]
#[should_panic(expected = "responder blew up")]
async fn responder_panic_reaches_the_caller() {
    let server = WidgetsServer {
        get: Some(Responder::from_fn(|_| panic!("responder blew up"))),
        ..Default::default()
    };
    let pipeline = pipeline(ServerTransport::new(server));

    let _ = get_widget(&pipeline, "gear", RequestContext::background()).await;
}

#[tokio::test]
async fn dispatch_errors_are_sent_once_despite_retry_policy() {
    let pipeline = Pipeline::builder()
        .transport(ServerTransport::new(WidgetsServer::default()))
        .retry(RetryOptions::default().retry_delay(Duration::from_secs(30)))
        .build()
        .unwrap();

    let started = tokio::time::Instant::now();
    let err = get_widget(&pipeline, "gear", RequestContext::background())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Dispatch(DispatchError::NotImplemented { .. }))
    ));
    assert!(started.elapsed() < Duration::from_secs(30));
}
