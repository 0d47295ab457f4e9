//! Tests for message and script parsing
//!
//! Tests the parsing of JSON values into typed Message objects and scripts

use kodegen_agent_session::{MessageKind, ScriptedWorker, SessionError, parse_message, parse_script};
use serde_json::json;

#[test]
fn test_parse_goal_message() {
    let message = parse_message(json!({
        "type": "goal",
        "value": "Write a poem"
    }))
    .unwrap();

    assert_eq!(message.kind(), MessageKind::Goal);
    assert_eq!(message.value(), "Write a poem");
    assert!(message.metadata().is_none());
}

#[test]
fn test_parse_message_with_metadata() {
    let message = parse_message(json!({
        "type": "action",
        "value": "Executing \"search\"",
        "metadata": {"tool": "search"}
    }))
    .unwrap();

    assert_eq!(message.kind(), MessageKind::Action);
    assert_eq!(message.metadata(), Some(&json!({"tool": "search"})));
}

#[test]
fn test_parse_invalid_message_keeps_data() {
    let data = json!({
        "type": "invalid_type",
        "value": "some data"
    });

    match parse_message(data.clone()) {
        Err(SessionError::MessageParse { data: Some(raw), .. }) => assert_eq!(raw, data),
        other => panic!("expected MessageParse error, got {other:?}"),
    }
}

#[test]
fn test_parse_missing_value() {
    assert!(parse_message(json!({"type": "task"})).is_err());
}

#[test]
fn test_script_rejects_unknown_fields() {
    let err = parse_script(r#"[{"messages": [], "sleep": 5}]"#).unwrap_err();
    assert!(matches!(err, SessionError::Json(_)));
}

#[test]
fn test_worker_from_json() {
    let worker = ScriptedWorker::from_json(
        r#"[{"messages": [{"type": "thinking", "value": "Thinking..."}], "done": true}]"#,
    )
    .unwrap();
    assert_eq!(worker.units_performed(), 0);

    assert!(ScriptedWorker::from_json("not json").is_err());
}
