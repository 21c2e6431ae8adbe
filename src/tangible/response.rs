//! Typed interaction outcomes and the errors that abort an interaction.

use serde::Serialize;

use crate::error::ErrorCode;
use crate::llm::tools::ToolError;
use crate::llm::types::{LlmError, Message};

/// Outcome of a typed interaction.
///
/// A `Failure` means the model answered but the reply did not parse; its
/// history is still valid for continuing the conversation. Transport and tool
/// errors are returned as [`TangibleError`] instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TangibleResponse<T> {
    Success { value: T, raw_message: String, history: Vec<Message> },
    Failure { reason: String, raw_message: String, history: Vec<Message> },
}

/// Response of an option method: `Success(None)` means the model said it does
/// not know.
pub type TangibleOptionResponse<T> = TangibleResponse<Option<T>>;

impl<T> TangibleResponse<T> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failure { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(reason),
        }
    }

    /// Final reply text the value was parsed from.
    pub fn raw_message(&self) -> &str {
        match self {
            Self::Success { raw_message, .. } | Self::Failure { raw_message, .. } => raw_message,
        }
    }

    pub fn history(&self) -> &[Message] {
        match self {
            Self::Success { history, .. } | Self::Failure { history, .. } => history,
        }
    }

    pub fn into_history(self) -> Vec<Message> {
        match self {
            Self::Success { history, .. } | Self::Failure { history, .. } => history,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failure { .. } => None,
        }
    }

    /// Transform a success value, keeping raw message and history.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> TangibleResponse<U> {
        match self {
            Self::Success { value, raw_message, history } => {
                TangibleResponse::Success { value: f(value), raw_message, history }
            }
            Self::Failure { reason, raw_message, history } => TangibleResponse::Failure { reason, raw_message, history },
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Errors that abort a typed interaction.
#[derive(Debug, thiserror::Error)]
pub enum TangibleError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// A requested host function failed.
    #[error("tool {name} failed: {source}")]
    Tool {
        name: String,
        #[source]
        source: ToolError,
    },

    /// The model kept requesting tool calls past the configured limit.
    #[error("tool call rounds exceeded limit of {max}")]
    ToolRoundsExceeded { max: usize },

    /// The model requested tool calls although none were offered.
    #[error("model requested tool calls but no functions were provided")]
    UnexpectedToolCalls,

    /// The JSON example shown to the model could not be serialized.
    #[error("invalid JSON example: {0}")]
    InvalidExample(#[source] serde_json::Error),
}

impl ErrorCode for TangibleError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Llm(e) => e.error_code(),
            Self::Tool { .. } => "E_TOOL_FAILED",
            Self::ToolRoundsExceeded { .. } => "E_TOOL_ROUNDS_EXCEEDED",
            Self::UnexpectedToolCalls => "E_UNEXPECTED_TOOL_CALLS",
            Self::InvalidExample(_) => "E_INVALID_EXAMPLE",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Llm(e) => e.retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "response_test.rs"]
mod tests;
