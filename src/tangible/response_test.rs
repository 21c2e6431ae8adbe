use super::*;

fn success() -> TangibleResponse<u32> {
    TangibleResponse::Success { value: 7, raw_message: "7".into(), history: vec![Message::user("n?")] }
}

fn failure() -> TangibleResponse<u32> {
    TangibleResponse::Failure {
        reason: "Could not parse number".into(),
        raw_message: "seven".into(),
        history: vec![Message::user("n?"), Message::assistant("seven")],
    }
}

#[test]
fn accessors_on_success() {
    let resp = success();
    assert!(resp.is_success());
    assert_eq!(resp.value(), Some(&7));
    assert_eq!(resp.reason(), None);
    assert_eq!(resp.raw_message(), "7");
    assert_eq!(resp.history().len(), 1);
}

#[test]
fn failure_keeps_history() {
    let resp = failure();
    assert!(!resp.is_success());
    assert_eq!(resp.value(), None);
    assert_eq!(resp.reason(), Some("Could not parse number"));
    assert_eq!(resp.raw_message(), "seven");
    assert_eq!(resp.into_history().len(), 2);
}

#[test]
fn map_preserves_context() {
    let mapped = success().map(|n| n * 2);
    assert_eq!(mapped.value(), Some(&14));
    assert_eq!(mapped.raw_message(), "7");
    let failed = failure().map(|n| n * 2);
    assert_eq!(failed.reason(), Some("Could not parse number"));
}

#[test]
fn serializes_with_outcome_tag() {
    let json = serde_json::to_value(success()).unwrap();
    assert_eq!(json["outcome"], "success");
    assert_eq!(json["value"], 7);
    let json = serde_json::to_value(failure()).unwrap();
    assert_eq!(json["outcome"], "failure");
    assert_eq!(json["history"][1]["role"], "assistant");
}

#[test]
fn error_codes() {
    assert_eq!(TangibleError::ToolRoundsExceeded { max: 3 }.error_code(), "E_TOOL_ROUNDS_EXCEEDED");
    assert_eq!(TangibleError::UnexpectedToolCalls.error_code(), "E_UNEXPECTED_TOOL_CALLS");
    let llm = TangibleError::from(LlmError::ApiRequest("reset".into()));
    assert_eq!(llm.error_code(), "E_API_REQUEST");
    assert!(llm.retryable());
    assert!(!TangibleError::UnexpectedToolCalls.retryable());
}

#[test]
fn tool_error_names_function() {
    let err = TangibleError::Tool { name: "weather".into(), source: ToolError::Failed("offline".into()) };
    assert_eq!(err.error_code(), "E_TOOL_FAILED");
    assert!(err.to_string().contains("weather"));
}
