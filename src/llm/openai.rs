//! OpenAI-compatible `/chat/completions` client.
//!
//! Thin HTTP wrapper: builds the wire body from history and tool
//! declarations, sends one bearer-authenticated POST, and decodes the reply.
//! Pure parsing in `parse_chat_completions_response` for testability.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::config::LlmTimeouts;
use super::types::{
    Choice, CompletionResponse, ContentMessage, LlmError, Message, Parameters, Role, Tool, ToolCall, ToolCallFunction,
    ToolCallsMessage, Usage,
};

// =============================================================================
// CLIENT
// =============================================================================

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: String, base_url: &str, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeouts.request_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url: base_url.trim_end_matches('/').to_string() })
    }

    /// Perform one chat-completion exchange. No retries.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-2xx status, or an undecodable body.
    pub async fn chat_completion(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[Tool]>,
    ) -> Result<CompletionResponse, LlmError> {
        let msgs = build_chat_completions_messages(messages);
        let tool_defs: Option<Vec<CcToolDef<'_>>> = tools.map(|t| t.iter().map(CcToolDef::from).collect());
        let body = CcRequest { model, messages: &msgs, tools: tool_defs.as_deref() };

        debug!(model, messages = msgs.len(), tools = tools.map_or(0, <[Tool]>::len), "llm: chat completion request");
        let text = self.send_json("/chat/completions", &body).await?;
        parse_chat_completions_response(&text)
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if !status.is_success() {
            return Err(LlmError::ApiResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                body: text,
            });
        }
        Ok(text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    messages: &'a [CcMessage<'a>],
    tools: Option<&'a [CcToolDef<'a>]>,
}

#[derive(Serialize)]
struct CcMessage<'a> {
    role: &'static str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<CcToolCall<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
}

#[derive(Serialize)]
struct CcToolCall<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    call_type: &'static str,
    function: CcFunctionCall<'a>,
}

#[derive(Serialize)]
struct CcFunctionCall<'a> {
    name: &'a str,
    arguments: &'a str,
}

#[derive(Serialize)]
struct CcToolDef<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: CcFunctionDef<'a>,
}

#[derive(Serialize)]
struct CcFunctionDef<'a> {
    name: &'a str,
    description: Option<&'a str>,
    parameters: &'a Parameters,
}

impl<'a> From<&'a Tool> for CcToolDef<'a> {
    fn from(tool: &'a Tool) -> Self {
        Self {
            tool_type: "function",
            function: CcFunctionDef {
                name: &tool.name,
                description: tool.description.as_deref(),
                parameters: &tool.parameters,
            },
        }
    }
}

fn build_chat_completions_messages(messages: &[Message]) -> Vec<CcMessage<'_>> {
    messages
        .iter()
        .map(|message| match message {
            Message::Content(m) => CcMessage {
                role: m.role.as_str(),
                content: &m.content,
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            Message::ToolCalls(m) => CcMessage {
                role: m.role.as_str(),
                content: "",
                name: None,
                tool_calls: Some(
                    m.tool_calls
                        .iter()
                        .map(|call| CcToolCall {
                            id: &call.id,
                            call_type: "function",
                            function: CcFunctionCall { name: &call.function.name, arguments: &call.function.arguments },
                        })
                        .collect(),
                ),
                tool_call_id: None,
            },
            Message::ToolResult(m) => CcMessage {
                role: m.role.as_str(),
                content: &m.content,
                name: Some(&m.name),
                tool_calls: None,
                tool_call_id: Some(&m.tool_call_id),
            },
        })
        .collect()
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

pub(crate) fn parse_chat_completions_response(json_text: &str) -> Result<CompletionResponse, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    let id = str_field(&root, "id");
    let model = str_field(&root, "model");
    let usage = Usage {
        prompt_tokens: usage_field(&root, "prompt_tokens", "promptTokens"),
        completion_tokens: usage_field(&root, "completion_tokens", "completionTokens"),
        total_tokens: usage_field(&root, "total_tokens", "totalTokens"),
    };

    let Some(raw_choices) = root
        .get("choices")
        .and_then(Value::as_array)
        .filter(|arr| !arr.is_empty())
    else {
        return Err(LlmError::ApiParse("chat_completions: missing choices".to_string()));
    };

    let choices = raw_choices
        .iter()
        .enumerate()
        .map(|(position, choice)| parse_choice(position, choice))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        %model,
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        "llm: chat completion response"
    );

    Ok(CompletionResponse { id, model, choices, usage })
}

fn parse_choice(position: usize, choice: &Value) -> Result<Choice, LlmError> {
    let index = choice
        .get("index")
        .and_then(Value::as_u64)
        .and_then(|i| u32::try_from(i).ok())
        .or_else(|| u32::try_from(position).ok())
        .unwrap_or_default();
    let finish_reason = choice
        .get("finish_reason")
        .and_then(Value::as_str)
        .unwrap_or("stop");
    let Some(message) = choice.get("message") else {
        return Err(LlmError::ApiParse(format!("chat_completions: choices[{position}] missing message")));
    };
    let role = message
        .get("role")
        .and_then(Value::as_str)
        .and_then(Role::parse)
        .unwrap_or(Role::Assistant);

    let raw_calls = message
        .get("tool_calls")
        .and_then(Value::as_array)
        .filter(|calls| !calls.is_empty());

    match (finish_reason, raw_calls) {
        ("tool_calls", Some(calls)) => {
            let tool_calls = calls
                .iter()
                .map(parse_tool_call)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Choice::ToolCalls { index, message: ToolCallsMessage { role, tool_calls } })
        }
        ("tool_calls", None) => {
            Err(LlmError::ApiParse(format!("chat_completions: choices[{position}] has no tool calls")))
        }
        ("stop", Some(_)) => Err(LlmError::ApiParse(format!(
            "chat_completions: choices[{position}] stopped with pending tool calls"
        ))),
        ("stop", None) => {
            let content = message
                .get("content")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Ok(Choice::Stop { index, message: ContentMessage { role, content } })
        }
        (other, _) => Err(LlmError::ApiParse(format!(
            "chat_completions: choices[{position}] has unsupported finish_reason {other:?}"
        ))),
    }
}

fn parse_tool_call(call: &Value) -> Result<ToolCall, LlmError> {
    let Some(id) = call.get("id").and_then(Value::as_str) else {
        return Err(LlmError::ApiParse("chat_completions: tool call missing id".to_string()));
    };
    let Some(name) = call
        .get("function")
        .and_then(|f| f.get("name"))
        .and_then(Value::as_str)
    else {
        return Err(LlmError::ApiParse(format!("chat_completions: tool call {id} missing function name")));
    };
    let arguments = call
        .get("function")
        .and_then(|f| f.get("arguments"))
        .and_then(Value::as_str)
        .unwrap_or("{}");
    Ok(ToolCall {
        id: id.to_string(),
        function: ToolCallFunction { name: name.to_string(), arguments: arguments.to_string() },
    })
}

fn str_field(root: &Value, key: &str) -> String {
    root.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default()
}

fn usage_field(root: &Value, key: &str, alt: &str) -> u64 {
    root.get("usage")
        .and_then(|u| u.get(key).or_else(|| u.get(alt)))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
