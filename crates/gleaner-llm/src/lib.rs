//! Gleaner LLM Provider Layer
//!
//! Client for the remote classification service.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from `gleaner-domain`.
//! The pipeline only ever sees raw reply text; parsing and validation happen in
//! `gleaner-gatekeeper`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic scripted mock for testing
//! - `ChatCompletionsProvider`: Hosted chat-completions API with retry/backoff
//!
//! # Examples
//!
//! ```
//! use gleaner_llm::MockProvider;
//! use gleaner_domain::traits::LlmProvider;
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let provider = MockProvider::new(r#"{"destination": "ideas"}"#);
//! let reply = rt.block_on(provider.generate("classify this")).unwrap();
//! assert_eq!(reply, r#"{"destination": "ideas"}"#);
//! ```

#![warn(missing_docs)]

pub mod chat;
pub mod config;
pub mod credential;
pub mod retry;

use gleaner_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use chat::{strip_code_fences, ChatCompletionsProvider, CompletionOptions};
pub use config::LlmConfig;
pub use credential::{ApiKey, Credential};
pub use retry::RetryPolicy;

/// Errors that can occur during classification service calls
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// The service was unreachable or rejected the request
    #[error("Service error{}: {message}", status_suffix(.status))]
    Service {
        /// HTTP status, `None` for network failures
        status: Option<u16>,
        /// Error message from the service or transport
        message: String,
    },

    /// The service replied with something that is not a completion
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Config(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

impl LlmError {
    /// Shorthand for an HTTP failure
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        LlmError::Service {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Shorthand for a transport failure
    pub fn network(message: impl Into<String>) -> Self {
        LlmError::Service {
            status: None,
            message: message.into(),
        }
    }

    /// Whether another attempt could succeed
    ///
    /// Client errors (4xx) other than rate limiting point at the request
    /// itself and are never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Service {
                status: Some(code), ..
            } => !((400..500).contains(code) && *code != 429),
            LlmError::Service { status: None, .. } => true,
            LlmError::InvalidResponse(_) => true,
            LlmError::Config(_) => false,
        }
    }
}

/// Mock LLM provider for deterministic testing
///
/// Scripted outcomes are consumed in order; once the script is empty every
/// call returns the default response. Clones share the script, the call count
/// and the recorded prompts.
///
/// # Examples
///
/// ```
/// use gleaner_llm::{LlmError, MockProvider};
///
/// let provider = MockProvider::new("fallback");
/// provider.push_error(LlmError::http(500, "boom"));
/// provider.push_response("scripted");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    latency: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            latency: None,
        }
    }

    /// Sleep this long before answering each call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a successful reply
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.script).push_back(Ok(response.into()));
    }

    /// Queue a failure
    pub fn push_error(&self, error: LlmError) {
        lock(&self.script).push_back(Err(error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// All prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// The most recent prompt
    pub fn last_prompt(&self) -> Option<String> {
        lock(&self.prompts).last().cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        lock(&self.prompts).push(prompt.to_string());
        let next = lock(&self.script).pop_front();

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        next.unwrap_or_else(|| Ok(self.default_response.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(LlmError::http(500, "x").is_retryable());
        assert!(LlmError::http(503, "x").is_retryable());
        assert!(LlmError::http(429, "x").is_retryable());
        assert!(LlmError::network("reset").is_retryable());
        assert!(!LlmError::http(400, "x").is_retryable());
        assert!(!LlmError::http(401, "x").is_retryable());
        assert!(!LlmError::http(404, "x").is_retryable());
        assert!(!LlmError::Config("x".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LlmError::http(404, "model not found").to_string(),
            "Service error (HTTP 404): model not found"
        );
        assert_eq!(
            LlmError::network("connection refused").to_string(),
            "Service error: connection refused"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_script_then_default() {
        let provider = MockProvider::new("default");
        provider.push_response("first");
        provider.push_error(LlmError::http(500, "boom"));

        assert_eq!(provider.generate("a").await.unwrap(), "first");
        assert!(provider.generate("b").await.is_err());
        assert_eq!(provider.generate("c").await.unwrap(), "default");
        assert_eq!(provider.call_count(), 3);
        assert_eq!(provider.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider2.push_response("queued");
        assert_eq!(provider1.generate("p").await.unwrap(), "queued");
        assert_eq!(provider2.call_count(), 1);
        assert_eq!(provider2.last_prompt().as_deref(), Some("p"));
    }
}
