//! The generic interaction: reasoning turns plus the tool-call loop.
//!
//! ARCHITECTURE
//! ============
//! `interact` sends the strategy's initial prompt (with tools, if any) and
//! resolves tool calls until the model answers in text. Multi-turn strategies
//! then send one more user message demanding the formatted answer, without
//! tools. History grows append-only across every exchange.

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use super::TangibleClient;
use super::prompt::{ReasoningStrategy, follow_up_prompt, initial_prompt};
use super::response::{TangibleError, TangibleResponse};
use crate::llm::tools::{FunctionCall, function_call_tools};
use crate::llm::types::{Choice, LlmError, Message, ToolCall};

/// Per-call options for the typed methods.
#[derive(Debug, Clone, Default)]
pub struct InteractionOptions {
    /// Prior conversation to continue from.
    pub history: Vec<Message>,
    /// Host functions offered to the model on the first turn.
    pub functions: Vec<FunctionCall>,
    pub reasoning: ReasoningStrategy,
}

impl InteractionOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that continue the conversation of an earlier response.
    #[must_use]
    pub fn continuing<T>(response: &TangibleResponse<T>) -> Self {
        Self { history: response.history().to_vec(), ..Self::default() }
    }

    #[must_use]
    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }

    #[must_use]
    pub fn with_function(mut self, function: FunctionCall) -> Self {
        self.functions.push(function);
        self
    }

    #[must_use]
    pub fn with_functions(mut self, functions: Vec<FunctionCall>) -> Self {
        self.functions = functions;
        self
    }

    #[must_use]
    pub fn with_reasoning(mut self, reasoning: ReasoningStrategy) -> Self {
        self.reasoning = reasoning;
        self
    }
}

/// Final reply text and the full conversation that produced it.
#[derive(Debug, Clone)]
pub(crate) struct Interaction {
    pub reply: String,
    pub history: Vec<Message>,
}

impl Interaction {
    pub(crate) fn success<T>(self, value: T) -> TangibleResponse<T> {
        TangibleResponse::Success { value, raw_message: self.reply, history: self.history }
    }

    pub(crate) fn failure<T>(self, reason: impl Into<String>) -> TangibleResponse<T> {
        let reason = reason.into();
        debug!(%reason, reply_len = self.reply.len(), "tangible: reply did not parse");
        TangibleResponse::Failure { reason, raw_message: self.reply, history: self.history }
    }

    /// `Success` if `parsed` is present, otherwise `Failure` with `reason`.
    pub(crate) fn respond<T>(self, parsed: Option<T>, reason: &str) -> TangibleResponse<T> {
        match parsed {
            Some(value) => self.success(value),
            None => self.failure(reason),
        }
    }
}

impl TangibleClient {
    /// Run one typed interaction and return the final reply text.
    ///
    /// # Errors
    ///
    /// Transport failures, host-function failures, and tool loops that exceed
    /// the round limit abort the interaction.
    pub(crate) async fn interact(
        &self,
        prompt: &str,
        format: Option<&str>,
        options: &InteractionOptions,
    ) -> Result<Interaction, TangibleError> {
        let strategy = options.reasoning;
        let first = initial_prompt(strategy, prompt, format);
        let interaction = self
            .exchange(&first, options.history.clone(), &options.functions)
            .await?;

        match follow_up_prompt(strategy, format) {
            None => Ok(interaction),
            Some(follow_up) => {
                debug!(%strategy, "tangible: reasoning follow-up");
                self.exchange(&follow_up, interaction.history, &[]).await
            }
        }
    }

    /// Append `prompt` as a user message and complete, resolving tool calls.
    async fn exchange(
        &self,
        prompt: &str,
        mut history: Vec<Message>,
        functions: &[FunctionCall],
    ) -> Result<Interaction, TangibleError> {
        history.push(Message::user(prompt));
        let tools = (!functions.is_empty()).then(|| function_call_tools(functions));

        for round in 0..=self.max_tool_rounds {
            let response = self
                .llm
                .chat_completion(&history, tools.as_deref())
                .await?;

            info!(
                round,
                model = %response.model,
                prompt_tokens = response.usage.prompt_tokens,
                completion_tokens = response.usage.completion_tokens,
                "tangible: LLM response"
            );

            let choice = response
                .choices
                .into_iter()
                .last()
                .ok_or_else(|| LlmError::ApiParse("response contained no choices".into()))?;

            match choice {
                Choice::Stop { message, .. } => {
                    let reply = message.content.clone();
                    history.push(Message::Content(message));
                    return Ok(Interaction { reply, history });
                }
                Choice::ToolCalls { message, .. } => {
                    if functions.is_empty() {
                        return Err(TangibleError::UnexpectedToolCalls);
                    }
                    if round == self.max_tool_rounds {
                        break;
                    }
                    let results = invoke_tool_calls(round, &message.tool_calls, functions).await?;
                    history.push(Message::ToolCalls(message));
                    history.extend(results);
                }
            }
        }

        warn!(max = self.max_tool_rounds, "tangible: tool call rounds exhausted");
        Err(TangibleError::ToolRoundsExceeded { max: self.max_tool_rounds })
    }
}

/// Run every matched tool call concurrently; results keep call order.
///
/// Calls naming an unknown function are dropped.
async fn invoke_tool_calls(
    round: usize,
    calls: &[ToolCall],
    functions: &[FunctionCall],
) -> Result<Vec<Message>, TangibleError> {
    let pending = calls.iter().filter_map(|call| {
        let name = &call.function.name;
        let Some(function) = functions.iter().find(|f| &f.name == name) else {
            warn!(round, tool = %name, id = %call.id, "tangible: no function matches tool call, dropping");
            return None;
        };
        Some(async move {
            info!(round, tool = %name, "tangible: executing tool");
            match function.function.invoke(&call.function.arguments).await {
                Ok(content) => Ok(Message::tool_result(name, content, &call.id)),
                Err(source) => {
                    warn!(round, tool = %name, error = %source, "tangible: tool error");
                    Err(TangibleError::Tool { name: name.clone(), source })
                }
            }
        })
    });
    try_join_all(pending).await
}

#[cfg(test)]
#[path = "interact_test.rs"]
mod tests;
