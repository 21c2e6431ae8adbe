use super::*;
use crate::error::ErrorCode;

// =============================================================================
// LlmError::error_code
// =============================================================================

#[test]
fn error_code_config_parse() {
    let err = LlmError::ConfigParse("bad".into());
    assert_eq!(err.error_code(), "E_CONFIG_PARSE");
}

#[test]
fn error_code_missing_api_key() {
    let err = LlmError::MissingApiKey { var: "KEY".into() };
    assert_eq!(err.error_code(), "E_MISSING_API_KEY");
}

#[test]
fn error_code_api_response() {
    let err = LlmError::ApiResponse { status: 500, status_text: "Internal Server Error".into(), body: String::new() };
    assert_eq!(err.error_code(), "E_API_RESPONSE");
}

#[test]
fn error_code_api_parse() {
    let err = LlmError::ApiParse("json".into());
    assert_eq!(err.error_code(), "E_API_PARSE");
}

// =============================================================================
// LlmError::retryable
// =============================================================================

#[test]
fn retryable_api_request() {
    assert!(LlmError::ApiRequest("conn refused".into()).retryable());
}

#[test]
fn retryable_api_response_429() {
    let err = LlmError::ApiResponse { status: 429, status_text: "Too Many Requests".into(), body: String::new() };
    assert!(err.retryable());
}

#[test]
fn retryable_api_response_503() {
    let err = LlmError::ApiResponse { status: 503, status_text: "Service Unavailable".into(), body: String::new() };
    assert!(err.retryable());
}

#[test]
fn not_retryable_api_response_401() {
    let err = LlmError::ApiResponse { status: 401, status_text: "Unauthorized".into(), body: String::new() };
    assert!(!err.retryable());
}

#[test]
fn not_retryable_api_parse() {
    assert!(!LlmError::ApiParse("json".into()).retryable());
}

// =============================================================================
// LlmError Display
// =============================================================================

#[test]
fn display_api_response_carries_status_and_text() {
    let err = LlmError::ApiResponse { status: 401, status_text: "Unauthorized".into(), body: "{}".into() };
    assert!(err.to_string().contains("401 Unauthorized"));
}

#[test]
fn display_missing_api_key() {
    let err = LlmError::MissingApiKey { var: "MY_KEY".into() };
    assert!(err.to_string().contains("MY_KEY"));
}

// =============================================================================
// Message
// =============================================================================

#[test]
fn user_message_has_user_role() {
    let msg = Message::user("hi");
    assert_eq!(msg.role(), Role::User);
    assert_eq!(msg.content(), "hi");
}

#[test]
fn tool_calls_message_content_is_empty() {
    let msg = Message::ToolCalls(ToolCallsMessage {
        role: Role::Assistant,
        tool_calls: vec![ToolCall {
            id: "call_1".into(),
            function: ToolCallFunction { name: "lookup".into(), arguments: "{}".into() },
        }],
    });
    assert_eq!(msg.content(), "");
    assert_eq!(msg.role(), Role::Assistant);
}

#[test]
fn tool_result_message_has_tool_role() {
    let msg = Message::tool_result("lookup", "42", "call_1");
    assert_eq!(msg.role(), Role::Tool);
    match msg {
        Message::ToolResult(m) => {
            assert_eq!(m.tool_call_id, "call_1");
            assert_eq!(m.name, "lookup");
        }
        other => panic!("expected ToolResult, got {other:?}"),
    }
}

#[test]
fn message_serializes_with_type_tag() {
    let json = serde_json::to_value(Message::assistant("ok")).unwrap();
    assert_eq!(json["message_type"], "content");
    assert_eq!(json["role"], "assistant");
    assert_eq!(json["content"], "ok");
}

#[test]
fn history_survives_serde() {
    let history = vec![
        Message::user("q"),
        Message::ToolCalls(ToolCallsMessage {
            role: Role::Assistant,
            tool_calls: vec![ToolCall {
                id: "c".into(),
                function: ToolCallFunction { name: "f".into(), arguments: "{\"a\":1}".into() },
            }],
        }),
        Message::tool_result("f", "\"r\"", "c"),
        Message::assistant("a"),
    ];
    let json = serde_json::to_string(&history).unwrap();
    let restored: Vec<Message> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, history);
}

#[test]
fn role_parse_rejects_unknown() {
    assert_eq!(Role::parse("assistant"), Some(Role::Assistant));
    assert_eq!(Role::parse("robot"), None);
}

// =============================================================================
// Tool declarations
// =============================================================================

#[test]
fn property_omits_enum_when_absent() {
    let prop = Property { property_type: PropertyType::Integer, description: "count".into(), allowed: None };
    let json = serde_json::to_value(&prop).unwrap();
    assert_eq!(json["type"], "integer");
    assert!(json.get("enum").is_none());
}

#[test]
fn property_includes_enum_when_present() {
    let prop = Property {
        property_type: PropertyType::String,
        description: "unit".into(),
        allowed: Some(vec!["celsius".into(), "fahrenheit".into()]),
    };
    let json = serde_json::to_value(&prop).unwrap();
    assert_eq!(json["enum"][1], "fahrenheit");
}

#[test]
fn parameters_object_schema_type() {
    let params = Parameters::object(BTreeMap::new());
    assert_eq!(serde_json::to_value(&params).unwrap()["type"], "object");
}

// =============================================================================
// Choice
// =============================================================================

#[test]
fn choice_serializes_finish_reason_tag() {
    let choice = Choice::Stop { index: 0, message: ContentMessage { role: Role::Assistant, content: "x".into() } };
    let json = serde_json::to_value(&choice).unwrap();
    assert_eq!(json["finish_reason"], "stop");
    assert_eq!(choice.index(), 0);
    assert_eq!(choice.to_message(), Message::assistant("x"));
}

#[test]
fn last_choice_picks_final_entry() {
    let resp = CompletionResponse {
        id: "r".into(),
        model: "gpt-4".into(),
        choices: vec![
            Choice::Stop { index: 0, message: ContentMessage { role: Role::Assistant, content: "first".into() } },
            Choice::Stop { index: 1, message: ContentMessage { role: Role::Assistant, content: "second".into() } },
        ],
        usage: Usage::default(),
    };
    assert_eq!(resp.last_choice().map(Choice::index), Some(1));
}
