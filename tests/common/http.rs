#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use issue_api::server;
use issue_api::storage::IssueStore;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const ISSUES: &str = "/api/v1/issues/";

pub fn app(store: Arc<dyn IssueStore>) -> Router {
    server::router(store, false)
}

pub fn issue_uri(id: &str) -> String {
    format!("/api/v1/issues/{id}")
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "response is not JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn error_code(&self) -> String {
        self.json()["error"]["code"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }
}

pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: Body,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(body).expect("build request");

    let response = app.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes()
        .to_vec();

    TestResponse { status, body }
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    match body {
        Some(json) => {
            send_raw(
                app,
                method,
                uri,
                Some("application/json"),
                Body::from(json.to_string()),
            )
            .await
        }
        None => send_raw(app, method, uri, None, Body::empty()).await,
    }
}
