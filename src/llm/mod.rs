//! LLM: chat-completion transport.
//!
//! DESIGN
//! ======
//! One authenticated request/response exchange per call, nothing more. No
//! retries, no tool execution, no prompt shaping: those belong to the typed
//! client in `crate::tangible`. `LlmClient` binds the OpenAI-compatible
//! transport to a model name and implements [`ChatCompletion`] so the typed
//! client can be driven by a mock in tests.

pub mod config;
pub mod openai;
pub mod tools;
pub mod types;

use config::LlmConfig;
pub use types::ChatCompletion;
use types::{CompletionResponse, LlmError, Message, Tool};

// =============================================================================
// CLIENT
// =============================================================================

/// Chat-completion client for one model.
pub struct LlmClient {
    inner: openai::OpenAiClient,
    model: String,
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// See [`LlmConfig::from_env`] for the variables read.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(&config)
    }

    /// Build an LLM client from a typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let inner = openai::OpenAiClient::new(config.api_key.clone(), &config.base_url, config.timeouts)?;
        Ok(Self { inner, model: config.model.clone() })
    }

    /// Return the configured model name (e.g. `"gpt-4"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl ChatCompletion for LlmClient {
    async fn chat_completion(
        &self,
        messages: &[Message],
        tools: Option<&[Tool]>,
    ) -> Result<CompletionResponse, LlmError> {
        self.inner
            .chat_completion(&self.model, messages, tools)
            .await
    }
}
