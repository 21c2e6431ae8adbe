use std::sync::{Arc, Mutex};

use super::TangibleClient;
use crate::llm::ChatCompletion;
use crate::llm::types::{
    Choice, CompletionResponse, ContentMessage, LlmError, Message, Role, Tool, ToolCall, ToolCallFunction,
    ToolCallsMessage, Usage,
};

// =========================================================================
// MockLlm
// =========================================================================

/// One chat-completion call as the mock saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub tool_names: Option<Vec<String>>,
}

/// Replays queued responses in order and records every request.
/// Once the queue is empty it answers "done".
pub struct MockLlm {
    responses: Mutex<Vec<Result<CompletionResponse, LlmError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockLlm {
    pub fn new(responses: Vec<CompletionResponse>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    pub fn with_results(responses: Vec<Result<CompletionResponse, LlmError>>) -> Self {
        Self { responses: Mutex::new(responses), requests: Mutex::new(Vec::new()) }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChatCompletion for MockLlm {
    async fn chat_completion(
        &self,
        messages: &[Message],
        tools: Option<&[Tool]>,
    ) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            messages: messages.to_vec(),
            tool_names: tools.map(|t| t.iter().map(|tool| tool.name.clone()).collect()),
        });
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(text_response("done"))
        } else {
            responses.remove(0)
        }
    }
}

/// A client over a fresh mock, plus a handle for inspecting requests.
pub fn mock_client(responses: Vec<CompletionResponse>) -> (TangibleClient, Arc<MockLlm>) {
    let mock = Arc::new(MockLlm::new(responses));
    (TangibleClient::new(mock.clone()), mock)
}

// =========================================================================
// Response builders
// =========================================================================

pub fn text_response(text: &str) -> CompletionResponse {
    CompletionResponse {
        id: "chatcmpl-mock".into(),
        model: "mock".into(),
        choices: vec![Choice::Stop {
            index: 0,
            message: ContentMessage { role: Role::Assistant, content: text.into() },
        }],
        usage: Usage::default(),
    }
}

/// A tool-calls response; each call is `(id, function name, arguments)`.
pub fn tool_calls_response(calls: &[(&str, &str, &str)]) -> CompletionResponse {
    CompletionResponse {
        id: "chatcmpl-mock".into(),
        model: "mock".into(),
        choices: vec![Choice::ToolCalls {
            index: 0,
            message: ToolCallsMessage {
                role: Role::Assistant,
                tool_calls: calls
                    .iter()
                    .map(|(id, name, arguments)| ToolCall {
                        id: (*id).into(),
                        function: ToolCallFunction { name: (*name).into(), arguments: (*arguments).into() },
                    })
                    .collect(),
            },
        }],
        usage: Usage::default(),
    }
}
