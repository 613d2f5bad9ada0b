//! Shared helpers for driving the router in-process.
#![allow(dead_code)]

use agentgate_gateway::{GatewayConfig, build_gateway, router};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Router over the fallback executor, optionally protected by `api_key`.
pub fn app(api_key: Option<&str>) -> Router {
    let mut config = GatewayConfig::default();
    config.auth.api_key = api_key.map(str::to_owned);
    app_with(&config)
}

pub fn app_with(config: &GatewayConfig) -> Router {
    router(build_gateway(config))
}

pub fn request(method: Method, uri: &str, auth: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

/// Send a request and return the status with the raw body.
pub async fn send_raw(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

/// Send a request and parse the JSON response body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, request(method, uri, auth, body)).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
