//! Classification orchestration

use crate::config::ClassifierConfig;
use crate::error::ClassifierError;
use crate::override_syntax::parse_override;
use crate::prompt::PromptBuilder;
use gleaner_domain::traits::LlmProvider;
use gleaner_domain::{Category, ClassificationResult};
use gleaner_gatekeeper::{Gatekeeper, ValidationConfig};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Classifier turns capture entries into classification results
pub struct Classifier<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    gatekeeper: Gatekeeper,
    config: ClassifierConfig,
}

impl<L> Classifier<L>
where
    L: LlmProvider,
{
    /// Create a new Classifier
    pub fn new(llm_provider: L, config: ClassifierConfig) -> Self {
        let gatekeeper = Gatekeeper::new(
            ValidationConfig::default().with_review_threshold(config.review_threshold),
        );
        Self {
            llm_provider,
            gatekeeper,
            config,
        }
    }

    /// Replace the gatekeeper
    pub fn with_gatekeeper(mut self, gatekeeper: Gatekeeper) -> Self {
        self.gatekeeper = gatekeeper;
        self
    }

    /// The active configuration
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// The underlying provider
    pub fn provider(&self) -> &L {
        &self.llm_provider
    }

    /// Classify one entry
    ///
    /// Never fails: any service or validation failure becomes a `needs_review`
    /// result carrying the reason. An `@category:` override fixes the
    /// destination and confidence while the service still extracts the
    /// fields. The confidence gate is applied last.
    pub async fn classify(&self, text: &str) -> ClassificationResult {
        let outcome = match parse_override(text) {
            Some(ovr) => {
                debug!(category = %ovr.category, "Entry carries a category override");
                self.classify_forced(ovr.text, ovr.category, self.config.override_confidence)
                    .await
            }
            None => self.classify_full(text).await,
        };

        let mut result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!("Classification failed, routing to review: {}", e);
                ClassificationResult::needs_review(
                    text,
                    format!("API or validation error: {}", e),
                    self.config.review_excerpt_chars,
                )
            }
        };

        self.gatekeeper.gate(&mut result);
        info!(
            destination = %result.destination,
            confidence = result.confidence,
            "Entry classified"
        );
        result
    }

    /// Classify with the category already decided
    ///
    /// The service is only asked for the category's fields; whatever
    /// destination or confidence it replies with is replaced by `category`
    /// and `confidence`.
    pub async fn classify_forced(
        &self,
        text: &str,
        category: Category,
        confidence: f64,
    ) -> Result<ClassificationResult, ClassifierError> {
        let prompt = PromptBuilder::forced(text, category)
            .with_forced_confidence(confidence)
            .build();
        let raw = self.call_llm(&prompt).await?;

        let mut result = self.gatekeeper.validate(&raw)?;
        result.destination = category.into();
        result.confidence = confidence;
        Ok(result)
    }

    async fn classify_full(&self, text: &str) -> Result<ClassificationResult, ClassifierError> {
        let prompt = PromptBuilder::new(text).build();
        let raw = self.call_llm(&prompt).await?;
        Ok(self.gatekeeper.validate(&raw)?)
    }

    /// Call the LLM provider with the configured timeout
    async fn call_llm(&self, prompt: &str) -> Result<String, ClassifierError> {
        debug!("Prompt length: {} chars", prompt.len());
        let response = timeout(
            self.config.classification_timeout(),
            self.llm_provider.generate(prompt),
        )
        .await
        .map_err(|_| ClassifierError::Timeout(self.config.classification_timeout_secs))?
        .map_err(|e| ClassifierError::Llm(e.to_string()))?;

        debug!("LLM response length: {} chars", response.len());
        Ok(response)
    }
}
