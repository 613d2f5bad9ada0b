//! Fallback executor and tool catalogue tests.

use agentgate_executor::{
    ChatMessage, EchoTool, Executor, FallbackExecutor, FnTool, Payload, Role, Tool, ToolSet,
    value_text,
};
use serde_json::{Value, json};

#[test]
fn echo_tool_prefixes_input() {
    let result = EchoTool.call(json!("x")).unwrap();
    assert_eq!(result, json!("echo: x"));
    assert_eq!(EchoTool.name(), "echo");
}

#[test]
fn echo_tool_renders_structured_input() {
    let result = EchoTool.call(json!({"a": 1})).unwrap();
    assert_eq!(result, json!("echo: {\"a\":1}"));
}

#[test]
fn fallback_invokes_first_tool() {
    let executor = FallbackExecutor::default();
    let result = executor.invoke(&Payload::new("abc")).unwrap();
    assert_eq!(result.output, "echo: abc");
    assert_eq!(result.used_tools, vec!["echo"]);
}

#[test]
fn fallback_keeps_history_untouched() {
    let executor = FallbackExecutor::default();
    let payload = Payload::new("abc").with_history(vec![
        ChatMessage::new(Role::User, "hi"),
        ChatMessage::new(Role::Assistant, "hello"),
    ]);
    let result = executor.invoke(&payload).unwrap();
    assert_eq!(result.output, "echo: abc");
    assert_eq!(payload.chat_history[0].role, Role::User);
}

#[test]
fn fallback_respects_tool_allow_list() {
    let executor = FallbackExecutor::default();
    let payload = Payload::new("abc").with_tools(vec!["search".into()]);
    let result = executor.invoke(&payload).unwrap();
    assert_eq!(result.output, "fallback: received 'abc'");
    assert!(result.used_tools.is_empty());
}

#[test]
fn fallback_without_tools() {
    let executor = FallbackExecutor::new(ToolSet::new());
    let result = executor.invoke(&Payload::new("hi")).unwrap();
    assert_eq!(result.output, "fallback: received 'hi'");
    assert!(!executor.supports_streaming());
}

#[test]
fn fallback_survives_failing_tool() {
    let tools = ToolSet::new().with(FnTool::new("broken", "always fails", |_| {
        anyhow::bail!("tool exploded")
    }));
    let executor = FallbackExecutor::new(tools);
    let result = executor.invoke(&Payload::new("hi")).unwrap();
    assert_eq!(result.output, "fallback: received 'hi'");
}

#[test]
fn fallback_picks_first_permitted_tool() {
    let tools = ToolSet::builtin().with(FnTool::new("upper", "uppercases", |input| {
        Ok(Value::String(value_text(&input).to_uppercase()))
    }));
    let executor = FallbackExecutor::new(tools);
    let payload = Payload::new("abc").with_tools(vec!["upper".into()]);
    let result = executor.invoke(&payload).unwrap();
    assert_eq!(result.output, "ABC");
    assert_eq!(result.used_tools, vec!["upper"]);
}

#[test]
fn tool_set_lookup_and_order() {
    let tools = ToolSet::builtin()
        .with(FnTool::new("b", "second", |v| Ok(v)))
        .with(FnTool::new("a", "third", |v| Ok(v)));
    let names: Vec<_> = tools.iter().map(|t| t.name().to_owned()).collect();
    assert_eq!(names, ["echo", "b", "a"]);
    assert_eq!(tools.get("b").unwrap().description(), "second");
    assert!(tools.get("missing").is_none());
    assert_eq!(tools.len(), 3);
}

#[test]
fn tool_set_replaces_same_name() {
    let tools = ToolSet::builtin().with(FnTool::new("echo", "custom echo", |v| Ok(v)));
    assert_eq!(tools.len(), 1);
    assert_eq!(tools.get("echo").unwrap().description(), "custom echo");
}

#[test]
fn payload_deserializes_without_optional_fields() {
    let payload: Payload = serde_json::from_str(r#"{"input":"hi"}"#).unwrap();
    assert_eq!(payload, Payload::new("hi"));
    assert!(payload.allows("anything"));
}

#[test]
fn fallback_quotes_input_for_display() {
    let executor = FallbackExecutor::new(ToolSet::new());
    let cases = [
        ("it's", r#"fallback: received "it's""#),
        (r#"say "hi""#, r#"fallback: received 'say "hi"'"#),
        (r#"it's "x""#, r#"fallback: received 'it\'s "x"'"#),
        ("a\nb\\c", r"fallback: received 'a\nb\\c'"),
    ];
    for (input, expected) in cases {
        let result = executor.invoke(&Payload::new(input)).unwrap();
        assert_eq!(result.output, expected, "{input}");
    }
}

#[test]
fn roles_keep_their_wire_names() {
    assert_eq!(Role::from("assistant"), Role::Assistant);
    assert_eq!(Role::from("tool"), Role::Tool);
    assert_eq!(Role::from("human"), Role::Other("human".into()));
    assert_eq!(Role::from("ai").as_str(), "ai");

    let message: ChatMessage =
        serde_json::from_str(r#"{"role":"function","content":"42"}"#).unwrap();
    assert_eq!(message.role, Role::Other("function".into()));
    let json = serde_json::to_value(&message).unwrap();
    assert_eq!(json["role"], "function");
    assert_eq!(serde_json::to_value(Role::User).unwrap(), "user");
}
