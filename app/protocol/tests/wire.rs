//! Wire type serialization tests.

use agentgate_protocol::{
    Detail, HealthResponse, InvokeMetadata, InvokeRequest, InvokeResponse, ToolRunRequest,
};
use serde_json::json;

#[test]
fn invoke_request_minimal() {
    let req: InvokeRequest = serde_json::from_value(json!({"input": "hi"})).unwrap();
    assert_eq!(req.input, "hi");
    assert!(req.chat_history.is_empty());
    assert!(req.tools.is_none());
}

#[test]
fn invoke_request_ignores_unknown_history_fields() {
    let req: InvokeRequest = serde_json::from_value(json!({
        "input": "hi",
        "chat_history": [
            {"role": "user", "content": "a", "name": "bob"},
            {"role": "assistant", "content": "b"}
        ],
        "tools": ["echo"]
    }))
    .unwrap();
    assert_eq!(req.chat_history.len(), 2);
    assert_eq!(req.chat_history[0].role, "user");
    assert_eq!(req.chat_history[1].content, "b");
    assert_eq!(req.tools.unwrap(), vec!["echo"]);
}

#[test]
fn invoke_response_shape() {
    let resp = InvokeResponse {
        output: "echo: abc".into(),
        used_tools: vec!["echo".into()],
        metadata: InvokeMetadata { duration_ms: 3 },
    };
    assert_eq!(
        serde_json::to_value(resp).unwrap(),
        json!({"output": "echo: abc", "used_tools": ["echo"], "metadata": {"duration_ms": 3}})
    );
}

#[test]
fn tool_run_request_accepts_any_json() {
    let req: ToolRunRequest = serde_json::from_value(json!({"input": {"q": [1, 2]}})).unwrap();
    assert_eq!(req.input, json!({"q": [1, 2]}));
    let null: ToolRunRequest = serde_json::from_value(json!({"input": null})).unwrap();
    assert!(null.input.is_null());
    let err = serde_json::from_value::<ToolRunRequest>(json!({})).unwrap_err();
    assert!(err.to_string().contains("missing field `input`"), "{err}");
}

#[test]
fn simple_bodies() {
    assert_eq!(
        serde_json::to_value(HealthResponse::ok()).unwrap(),
        json!({"status": "ok"})
    );
    assert_eq!(
        serde_json::to_value(Detail::new("Logged out")).unwrap(),
        json!({"detail": "Logged out"})
    );
}
