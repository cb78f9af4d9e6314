//! Configuration for the classification service client

use crate::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`ChatCompletionsProvider`](crate::ChatCompletionsProvider)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the chat-completions API (without `/chat/completions`)
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Maximum tokens in the reply
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f64,

    /// Ask the service for a JSON object reply
    pub json_mode: bool,

    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry (milliseconds); doubles per retry
    pub retry_delay_ms: u64,

    /// Per-request HTTP timeout (seconds)
    pub request_timeout_secs: u64,

    /// Secret file holding a `VAR=key` line, relative to the vault root
    pub api_key_file: String,

    /// Variable name looked up in the secret file and the environment
    pub api_key_var: String,
}

impl LlmConfig {
    /// Retry policy described by this configuration
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_delay_ms))
    }

    /// Per-request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Longest a call can take when every attempt times out
    ///
    /// One request timeout per attempt plus all backoff delays. Any outer
    /// deadline should exceed this or the last attempt's error is lost.
    pub fn worst_case_duration(&self) -> Duration {
        self.request_timeout()
            .saturating_mul(self.max_retries.saturating_add(1))
            .saturating_add(self.retry_policy().total_delay())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(format!("endpoint must be an http(s) URL, got '{}'", self.endpoint));
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be between 0.0 and 2.0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.api_key_var.trim().is_empty() {
            return Err("api_key_var must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1".to_string(),
            model: "moonshotai/kimi-k2-instruct-0905".to_string(),
            max_tokens: 1024,
            temperature: 0.0,
            json_mode: true,
            max_retries: 3,
            retry_delay_ms: 1000,
            request_timeout_secs: 30,
            api_key_file: "Scripts/groq-api-key.txt".to_string(),
            api_key_var: "GROQ_API_KEY".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LlmConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_worst_case_duration() {
        let config = LlmConfig::default();
        assert_eq!(config.worst_case_duration(), Duration::from_secs(127));

        let config = LlmConfig {
            max_retries: 0,
            request_timeout_secs: 10,
            ..LlmConfig::default()
        };
        assert_eq!(config.worst_case_duration(), Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = LlmConfig {
            endpoint: "api.example.com".to_string(),
            ..LlmConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config =
            LlmConfig::from_toml("model = \"llama-3.1-8b-instant\"\nmax_retries = 5\n").unwrap();
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.max_tokens, 1024);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = LlmConfig::default();
        let toml_str = config.to_toml().unwrap();
        assert_eq!(LlmConfig::from_toml(&toml_str).unwrap(), config);
    }
}
