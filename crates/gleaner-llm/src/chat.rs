//! Chat-completions provider
//!
//! Sends one single-turn request per call to an OpenAI-compatible
//! `/chat/completions` endpoint with bearer-token auth.
//!
//! # Features
//!
//! - JSON-object reply mode
//! - Retry with exponential backoff (see [`RetryPolicy`])
//! - Code-fence stripping of the reply
//!
//! # Examples
//!
//! ```no_run
//! use gleaner_llm::{ChatCompletionsProvider, Credential, LlmConfig};
//!
//! let config = LlmConfig::default();
//! let credential = Credential::from_key("gsk_...");
//! let provider = ChatCompletionsProvider::new(config, credential).unwrap();
//! ```

use crate::{Credential, LlmConfig, LlmError, RetryPolicy};
use gleaner_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-call overrides of the configured request parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionOptions {
    /// Override `max_tokens`
    pub max_tokens: Option<u32>,

    /// Override `temperature`
    pub temperature: Option<f64>,
}

/// Provider backed by a hosted chat-completions API
pub struct ChatCompletionsProvider {
    config: LlmConfig,
    credential: Credential,
    client: reqwest::Client,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ChatCompletionsProvider {
    /// Create a provider
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: LlmConfig, credential: Credential) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Config)?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            retry: config.retry_policy(),
            config,
            credential,
            client,
        })
    }

    /// Override the retry policy from the configuration
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Full completions URL
    pub fn url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    /// Send `prompt` and return the fence-stripped reply, retrying transient failures
    pub async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        self.retry
            .run(move |attempt| {
                debug!(attempt, model = %self.config.model, "Sending classification request");
                self.send_once(prompt, options)
            })
            .await
    }

    async fn send_once(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        let key = self.credential.key().ok_or_else(|| {
            LlmError::http(401, format!("No API key configured ({})", self.config.api_key_var))
        })?;

        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: options.max_tokens.unwrap_or(self.config.max_tokens),
            temperature: options.temperature.unwrap_or(self.config.temperature),
            response_format: self.config.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let response = self
            .client
            .post(self.url())
            .bearer_auth(key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::network(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .and_then(|env| env.error)
                .and_then(|err| err.message)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(LlmError::http(status.as_u16(), message));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                LlmError::InvalidResponse("Response contained no message content".to_string())
            })?;

        Ok(strip_code_fences(&content))
    }
}

impl LlmProviderTrait for ChatCompletionsProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.complete(prompt, &CompletionOptions::default()).await
    }
}

/// Remove markdown code fences a model may wrap its JSON in
pub fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("  {\"plain\": true} "), "{\"plain\": true}");
    }

    #[test]
    fn test_request_shape() {
        let body = ChatRequest {
            model: "m",
            messages: [ChatMessage {
                role: "user",
                content: "hi",
            }],
            max_tokens: 1024,
            temperature: 0.0,
            response_format: Some(ResponseFormat { kind: "json_object" }),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "m",
                "messages": [{"role": "user", "content": "hi"}],
                "max_tokens": 1024,
                "temperature": 0.0,
                "response_format": {"type": "json_object"}
            })
        );
    }

    #[test]
    fn test_provider_url() {
        let config = LlmConfig {
            endpoint: "http://localhost:8080/v1/".to_string(),
            ..LlmConfig::default()
        };
        let provider = ChatCompletionsProvider::new(config, Credential::missing()).unwrap();
        assert_eq!(provider.url(), "http://localhost:8080/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_missing_credential_fails_authentication_without_retry() {
        let provider =
            ChatCompletionsProvider::new(LlmConfig::default(), Credential::missing()).unwrap();
        let err = provider.generate("prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::Service { status: Some(401), .. }));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let config = LlmConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            ..LlmConfig::default()
        };
        let provider = ChatCompletionsProvider::new(config, Credential::from_key("k"))
            .unwrap()
            .with_retry_policy(RetryPolicy::none());

        let err = provider.generate("prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::Service { status: None, .. }));
    }
}
