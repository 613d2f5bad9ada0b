//! HTTP API: router, authorization layer and JSON handlers.

use crate::gateway::Gateway;
use auth::Token;
use axum::{
    Json, Router,
    extract::{Path, Request, State, rejection::JsonRejection},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use executor::{ChatMessage, Executor, Payload, Role};
use protocol::{
    Detail, HealthResponse, InvokeMetadata, InvokeRequest, InvokeResponse, LoginRequest,
    LoginResponse, ToolRunRequest, ToolRunResponse, ToolSummary, ToolsResponse,
};
use std::borrow::Cow;

pub use error::ApiError;

mod error;
mod stream;

/// Build the axum router serving every endpoint.
///
/// `/v1/*` routes require authorization, checked before the request body
/// is read. `/login`, `/logout` and `/health` are open.
pub fn router<E: Executor>(state: Gateway<E>) -> Router {
    let protected = Router::new()
        .route("/v1/invoke", post(invoke::<E>))
        .route("/v1/invoke/stream", post(stream::invoke_stream::<E>))
        .route("/v1/tools", get(list_tools::<E>))
        .route("/v1/tools/{name}/run", post(run_tool::<E>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<E>,
        ));

    Router::new()
        .route("/login", post(login::<E>))
        .route("/logout", post(logout::<E>))
        .route("/health", get(health))
        .merge(protected)
        .with_state(state)
}

/// The raw `Authorization` header, decoded lossily so that a value with
/// non-ASCII bytes is still rejected as malformed rather than missing.
fn authorization(headers: &HeaderMap) -> Option<Cow<'_, str>> {
    headers
        .get(AUTHORIZATION)
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
}

async fn require_auth<E: Executor>(
    State(state): State<Gateway<E>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let grant = state
        .auth
        .authorize(authorization(request.headers()).as_deref())
        .inspect_err(|e| tracing::warn!("rejected {}: {e}", request.uri().path()))?;
    tracing::debug!("authorized {} via {grant:?}", request.uri().path());
    Ok(next.run(request).await)
}

/// Convert a wire invocation request into an executor payload.
///
/// History entries keep their order and their role text.
pub(crate) fn payload(req: InvokeRequest) -> Payload {
    let history = req
        .chat_history
        .into_iter()
        .map(|entry| ChatMessage::new(Role::from(entry.role), entry.content))
        .collect();
    let mut payload = Payload::new(req.input).with_history(history);
    if let Some(tools) = req.tools {
        payload = payload.with_tools(tools);
    }
    payload
}

async fn login<E: Executor>(
    State(state): State<Gateway<E>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = body?;
    let Token { value, expires_at } = state.login.login(&req.username, &req.password)?;
    Ok(Json(LoginResponse {
        token: value,
        expires_at,
    }))
}

async fn logout<E: Executor>(
    State(state): State<Gateway<E>>,
    headers: HeaderMap,
) -> Result<Json<Detail>, ApiError> {
    let outcome = state.login.logout(authorization(&headers).as_deref())?;
    Ok(Json(Detail::new(outcome.detail())))
}

async fn invoke<E: Executor>(
    State(state): State<Gateway<E>>,
    body: Result<Json<InvokeRequest>, JsonRejection>,
) -> Result<Json<InvokeResponse>, ApiError> {
    let Json(req) = body?;
    let payload = payload(req);
    let executor = state.executor.get().await?;
    let result = state.bridge.invoke(executor, payload).await?;
    tracing::debug!("invocation finished in {}ms", result.duration_ms());
    Ok(Json(InvokeResponse {
        metadata: InvokeMetadata {
            duration_ms: result.duration_ms(),
        },
        output: result.output,
        used_tools: result.used_tools,
    }))
}

async fn list_tools<E: Executor>(
    State(state): State<Gateway<E>>,
) -> Result<Json<ToolsResponse>, ApiError> {
    let executor = state.executor.get().await?;
    let tools = executor
        .tools()
        .iter()
        .map(|tool| ToolSummary {
            name: tool.name().into(),
            description: tool.description().into(),
        })
        .collect();
    Ok(Json(ToolsResponse { tools }))
}

async fn run_tool<E: Executor>(
    State(state): State<Gateway<E>>,
    Path(name): Path<String>,
    body: Result<Json<ToolRunRequest>, JsonRejection>,
) -> Result<Json<ToolRunResponse>, ApiError> {
    let Json(req) = body?;
    let executor = state.executor.get().await?;
    let result = state.bridge.run_tool(executor, &name, req.input).await?;
    Ok(Json(ToolRunResponse {
        tool_name: name.into(),
        result,
    }))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
