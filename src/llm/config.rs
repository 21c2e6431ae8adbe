//! LLM configuration, built directly or parsed from environment variables.

use std::fmt;
use std::str::FromStr;

use super::types::LlmError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 10;

/// Known chat models. Any other model name is still accepted as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GptModel {
    #[default]
    Gpt4,
    Gpt4Turbo,
    Gpt4o,
    Gpt4oMini,
    Gpt35,
    Gpt35Turbo,
}

impl GptModel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gpt4 => "gpt-4",
            Self::Gpt4Turbo => "gpt-4-turbo",
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::Gpt35 => "gpt-3.5",
            Self::Gpt35Turbo => "gpt-3.5-turbo",
        }
    }
}

impl fmt::Display for GptModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GptModel {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gpt-4" => Ok(Self::Gpt4),
            "gpt-4-turbo" => Ok(Self::Gpt4Turbo),
            "gpt-4o" => Ok(Self::Gpt4o),
            "gpt-4o-mini" => Ok(Self::Gpt4oMini),
            "gpt-3.5" => Ok(Self::Gpt35),
            "gpt-3.5-turbo" => Ok(Self::Gpt35Turbo),
            other => Err(LlmError::ConfigParse(format!("unknown model: {other}"))),
        }
    }
}

/// HTTP timeouts. `None` leaves the exchange unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LlmTimeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeouts: LlmTimeouts,
    /// Upper bound on tool-call round trips within one interaction.
    pub max_tool_rounds: usize,
}

impl LlmConfig {
    /// Config for the default endpoint with the given key and model.
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeouts: LlmTimeouts::default(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `LLM_API_KEY_ENV`: names the env var containing the key (default `OPENAI_API_KEY`)
    /// - `LLM_MODEL`: default `gpt-4`
    /// - `LLM_BASE_URL`: default OpenAI API base URL
    /// - `LLM_REQUEST_TIMEOUT_SECS`, `LLM_CONNECT_TIMEOUT_SECS`: unset means no timeout
    /// - `LLM_MAX_TOOL_ROUNDS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the key variable is unset or a numeric value is malformed.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LlmConfig::from_env`] with a caller-supplied variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the key variable is unset or a numeric value is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LlmError> {
        let key_var = lookup("LLM_API_KEY_ENV").unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());
        let api_key = lookup(&key_var)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey { var: key_var.clone() })?;

        let model = lookup("LLM_MODEL").unwrap_or_else(|| GptModel::default().to_string());
        let base_url = lookup("LLM_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = LlmTimeouts {
            request_secs: parse_optional(&lookup, "LLM_REQUEST_TIMEOUT_SECS")?,
            connect_secs: parse_optional(&lookup, "LLM_CONNECT_TIMEOUT_SECS")?,
        };
        let max_tool_rounds = parse_optional(&lookup, "LLM_MAX_TOOL_ROUNDS")?.unwrap_or(DEFAULT_MAX_TOOL_ROUNDS);

        Ok(Self { api_key, model, base_url, timeouts, max_tool_rounds })
    }
}

fn parse_optional<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, LlmError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| LlmError::ConfigParse(format!("invalid {key}: {raw}"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
