//! LLM types: conversation messages, tool declarations, completion
//! responses and transport errors.
//!
//! These are the provider-neutral values the typed client threads through a
//! conversation. The chat-completions wire shapes live in `openai.rs`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the LLM provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: {status} {status_text}")]
    ApiResponse { status: u16, status_text: String, body: String },

    /// The LLM provider response body could not be decoded.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
    Function,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
            Self::Function => "function",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw {
            "system" => Some(Self::System),
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            "tool" => Some(Self::Tool),
            "function" => Some(Self::Function),
            _ => None,
        }
    }
}

/// Function name and raw JSON argument text of a requested tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallFunction {
    pub name: String,
    pub arguments: String,
}

/// A model-issued request to run a host function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned identifier, echoed back by the matching tool result.
    pub id: String,
    pub function: ToolCallFunction,
}

/// A plain text turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMessage {
    pub role: Role,
    pub content: String,
}

/// An assistant turn that asks for tool calls instead of answering.
/// Its content is always empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallsMessage {
    pub role: Role,
    pub tool_calls: Vec<ToolCall>,
}

/// The serialized result of one tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResultMessage {
    pub role: Role,
    pub name: String,
    pub content: String,
    /// Matches the `id` of a [`ToolCall`] in the preceding tool-calls message.
    pub tool_call_id: String,
}

/// A single message in a conversation. History is an ordered, append-only
/// `Vec<Message>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message_type", rename_all = "snake_case")]
pub enum Message {
    Content(ContentMessage),
    ToolCalls(ToolCallsMessage),
    ToolResult(ToolResultMessage),
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::Content(ContentMessage { role: Role::User, content: content.into() })
    }

    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::Content(ContentMessage { role: Role::System, content: content.into() })
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Content(ContentMessage { role: Role::Assistant, content: content.into() })
    }

    #[must_use]
    pub fn tool_result(name: impl Into<String>, content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self::ToolResult(ToolResultMessage {
            role: Role::Tool,
            name: name.into(),
            content: content.into(),
            tool_call_id: tool_call_id.into(),
        })
    }

    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::Content(m) => m.role,
            Self::ToolCalls(m) => m.role,
            Self::ToolResult(m) => m.role,
        }
    }

    /// Text content; empty for tool-calls messages.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Content(m) => &m.content,
            Self::ToolCalls(_) => "",
            Self::ToolResult(m) => &m.content,
        }
    }
}

// =============================================================================
// TOOL DECLARATIONS
// =============================================================================

/// Primitive type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Integer,
    Boolean,
    Double,
}

/// Descriptor of one tool parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub description: String,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
}

/// Object schema of a tool's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: BTreeMap<String, Property>,
}

impl Parameters {
    #[must_use]
    pub fn object(properties: BTreeMap<String, Property>) -> Self {
        Self { schema_type: "object".into(), properties }
    }
}

/// A function the model may invoke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Parameters,
}

// =============================================================================
// COMPLETION RESPONSE
// =============================================================================

/// One completion alternative, discriminated on `finish_reason`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "finish_reason", rename_all = "snake_case")]
pub enum Choice {
    Stop { index: u32, message: ContentMessage },
    ToolCalls { index: u32, message: ToolCallsMessage },
}

impl Choice {
    #[must_use]
    pub fn index(&self) -> u32 {
        match self {
            Self::Stop { index, .. } | Self::ToolCalls { index, .. } => *index,
        }
    }

    /// The choice's message as a history entry.
    #[must_use]
    pub fn to_message(&self) -> Message {
        match self {
            Self::Stop { message, .. } => Message::Content(message.clone()),
            Self::ToolCalls { message, .. } => Message::ToolCalls(message.clone()),
        }
    }
}

/// Token usage counts reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Parsed result of one chat-completion exchange. `choices` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

impl CompletionResponse {
    #[must_use]
    pub fn last_choice(&self) -> Option<&Choice> {
        self.choices.last()
    }
}

// =============================================================================
// CHAT COMPLETION TRAIT
// =============================================================================

/// One authenticated chat-completion exchange. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send the conversation (and optional tool declarations) to the model.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, the provider answers with
    /// a non-success status, or the body cannot be decoded.
    async fn chat_completion(
        &self,
        messages: &[Message],
        tools: Option<&[Tool]>,
    ) -> Result<CompletionResponse, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
