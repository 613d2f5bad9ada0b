//! Streamed invocation over an event stream.
//!
//! Each output fragment is one `data: {"output": ...}` frame. A failure
//! before the first fragment is a plain JSON error response; a failure
//! after it ends the stream with an `event: error` frame.

use super::{ApiError, payload};
use crate::gateway::Gateway;
use axum::{
    Json,
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use executor::{BridgeError, Executor, StreamEvent};
use futures_util::{StreamExt, stream};
use protocol::{
    Detail, InvokeRequest, StreamFrame,
    codec::{EVENT_STREAM, FrameError, encode_frame, encode_named_frame},
};

pub(super) async fn invoke_stream<E: Executor>(
    State(state): State<Gateway<E>>,
    body: Result<Json<InvokeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;
    let payload = payload(req);
    let executor = state.executor.get().await?;

    let mut events = Box::pin(state.bridge.stream(executor, payload));
    let first = match events.next().await {
        Some(Err(e)) => return Err(e.into()),
        first => first,
    };

    let frames = stream::iter(first).chain(events).map(frame);
    Ok((
        [(CONTENT_TYPE, EVENT_STREAM), (CACHE_CONTROL, "no-cache")],
        Body::from_stream(frames),
    )
        .into_response())
}

fn frame(event: Result<StreamEvent, BridgeError>) -> Result<Bytes, FrameError> {
    match event {
        Ok(StreamEvent { output }) => encode_frame(&StreamFrame { output }),
        Err(e) => {
            tracing::warn!("stream ended with error: {e}");
            encode_named_frame("error", &Detail::new(e.to_string()))
        }
    }
}
