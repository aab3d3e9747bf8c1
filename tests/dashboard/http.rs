//! HTTP transport integration tests.
//!
//! Starts an axum server that plays the GraphQL API and talks to it through
//! `HttpTransport`.

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use cvp_sync::dashboard::DeviceListPage;
use cvp_sync::domain::CoreColdtag;
use cvp_sync::{AppContext, Phase, Session, SyncConfig, SyncError};
use serde_json::{json, Value};

use crate::support::{core, core_list};

async fn graphql(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("token-123");

    match body["operationName"].as_str() {
        Some("DisplayCoreColdtagAll") if authorized => (
            StatusCode::OK,
            Json(json!({ "data": core_list(vec![core("c1", "Yard")]) })),
        ),
        Some("DisplayCoreColdtagAll") => (
            StatusCode::OK,
            Json(json!({ "data": null, "errors": [{ "message": "401: Unauthorized" }] })),
        ),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": "boom" }))),
    }
}

/// Bind to port 0 and return the GraphQL endpoint.
async fn start_server() -> String {
    let app = Router::new().route("/graphql", post(graphql));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/graphql")
}

#[tokio::test]
async fn authorized_list_load() {
    let endpoint = start_server().await;
    let ctx = AppContext::connect(SyncConfig::default().with_endpoint(endpoint)).unwrap();
    ctx.sign_in(Session::with_access_token("token-123"));

    let page = DeviceListPage::<CoreColdtag>::new(&ctx);
    assert!(page.load().await.is_committed());
    assert_eq!(page.records()[0].id, "c1");
}

#[tokio::test]
async fn graphql_errors_fail_the_load() {
    let endpoint = start_server().await;
    let ctx = AppContext::connect(SyncConfig::default().with_endpoint(endpoint)).unwrap();

    let page = DeviceListPage::<CoreColdtag>::new(&ctx);
    page.load().await;

    assert_eq!(page.phase(), Phase::Error);
    assert!(matches!(page.state().error, Some(SyncError::GraphQL(_))));
    assert_eq!(ctx.toasts().visible()[0].message, "graphql error: 401: Unauthorized");
}

#[tokio::test]
async fn server_error_without_envelope_is_a_transport_error() {
    let endpoint = start_server().await;
    let ctx = AppContext::connect(SyncConfig::default().with_endpoint(endpoint)).unwrap();

    let err = ctx
        .client()
        .run::<cvp_sync::domain::DisplayNodeColdtagAll>(())
        .await
        .unwrap_err();

    assert_eq!(err, SyncError::Transport("HTTP 500 Internal Server Error".into()));
}

#[test]
fn connect_requires_an_endpoint() {
    assert!(AppContext::connect(SyncConfig::default()).is_err());
}
