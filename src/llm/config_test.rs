use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn from_lookup_defaults() {
    let cfg = LlmConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
    assert_eq!(cfg.api_key, "sk-test");
    assert_eq!(cfg.model, "gpt-4");
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.timeouts, LlmTimeouts::default());
    assert_eq!(cfg.max_tool_rounds, DEFAULT_MAX_TOOL_ROUNDS);
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = LlmConfig::from_lookup(lookup_from(&[
        ("LLM_API_KEY_ENV", "MY_KEY"),
        ("MY_KEY", "secret"),
        ("LLM_MODEL", "gpt-4o-mini"),
        ("LLM_BASE_URL", "https://example.test/v1/"),
        ("LLM_REQUEST_TIMEOUT_SECS", "30"),
        ("LLM_CONNECT_TIMEOUT_SECS", "5"),
        ("LLM_MAX_TOOL_ROUNDS", "3"),
    ]))
    .unwrap();
    assert_eq!(cfg.api_key, "secret");
    assert_eq!(cfg.model, "gpt-4o-mini");
    assert_eq!(cfg.base_url, "https://example.test/v1");
    assert_eq!(cfg.timeouts, LlmTimeouts { request_secs: Some(30), connect_secs: Some(5) });
    assert_eq!(cfg.max_tool_rounds, 3);
}

#[test]
fn from_lookup_missing_key() {
    let err = LlmConfig::from_lookup(lookup_from(&[("LLM_API_KEY_ENV", "ABSENT")])).unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { var } if var == "ABSENT"));
}

#[test]
fn from_lookup_blank_key_is_missing() {
    let err = LlmConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")])).unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { .. }));
}

#[test]
fn from_lookup_rejects_bad_number() {
    let err = LlmConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "k"), ("LLM_MAX_TOOL_ROUNDS", "many")]))
        .unwrap_err();
    assert!(matches!(err, LlmError::ConfigParse(msg) if msg.contains("LLM_MAX_TOOL_ROUNDS")));
}

#[test]
fn new_uses_default_endpoint() {
    let cfg = LlmConfig::new("k", GptModel::Gpt4o.as_str()).with_base_url("http://localhost:8080/v1/");
    assert_eq!(cfg.model, "gpt-4o");
    assert_eq!(cfg.base_url, "http://localhost:8080/v1");
}

#[test]
fn gpt_model_round_trips_names() {
    for model in [
        GptModel::Gpt4,
        GptModel::Gpt4Turbo,
        GptModel::Gpt4o,
        GptModel::Gpt4oMini,
        GptModel::Gpt35,
        GptModel::Gpt35Turbo,
    ] {
        assert_eq!(model.as_str().parse::<GptModel>().unwrap(), model);
    }
    assert!("claude".parse::<GptModel>().is_err());
}
