//! Language model clients for sentence generation, grading and tutoring

mod offline;
mod openai;
pub mod prompts;

pub use offline::OfflineModel;
pub use openai::OpenAiClient;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use trainer_core::{Direction, GenerationStyle};

use crate::config::AiConfig;
use crate::models::Grade;

/// Failure of a model request
#[derive(Debug, Error)]
pub enum AiError {
    /// Rate-limited or overloaded; worth retrying later
    #[error("model overloaded: {0}")]
    Transient(String),

    #[error("model request failed: {0}")]
    Failed(String),
}

impl AiError {
    /// Classify a failure by its message.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();
        if lowered.contains("resource_exhausted") || lowered.contains("quota") {
            AiError::Transient(message)
        } else {
            AiError::Failed(message)
        }
    }

    /// Classify a non-success HTTP response.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            429 | 503 => AiError::Transient(format!("HTTP {status}: {body}")),
            _ => Self::classify(format!("HTTP {status}: {body}")),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, AiError::Transient(_))
    }
}

/// What to generate for one exercise batch
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub words: Vec<String>,
    pub count: usize,
    pub style: GenerationStyle,
    /// Language the sentences are written in
    pub language: String,
    /// Learner's own language, which the sentences must avoid
    pub native_language: String,
}

/// A model able to write practice sentences, grade translations and chat.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &'static str;

    /// False for the deterministic fallback
    fn is_remote(&self) -> bool;

    /// Up to `request.count` sentences using the requested words
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, AiError>;

    /// Grade `translation` of `sentence`; an empty translation asks for the answer.
    async fn grade(
        &self,
        sentence: &str,
        translation: &str,
        direction: Direction,
    ) -> Result<Grade, AiError>;

    async fn chat(&self, message: &str) -> Result<String, AiError>;
}

/// Pick the model client from configuration.
///
/// Without an API key the offline model is used.
pub fn from_config(config: &AiConfig) -> Result<Arc<dyn LanguageModel>, AiError> {
    match &config.api_key {
        Some(key) => Ok(Arc::new(OpenAiClient::new(
            key,
            &config.model,
            &config.base_url,
            config.timeout,
        )?)),
        None => Ok(Arc::new(OfflineModel)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_messages_are_transient() {
        assert!(AiError::classify("429 RESOURCE_EXHAUSTED").is_transient());
        assert!(AiError::classify("You exceeded your current Quota").is_transient());
        assert!(!AiError::classify("invalid api key").is_transient());
    }

    #[test]
    fn overload_statuses_are_transient() {
        assert!(AiError::from_status(429, "slow down").is_transient());
        assert!(AiError::from_status(503, "").is_transient());
        assert!(!AiError::from_status(500, "boom").is_transient());
        assert!(AiError::from_status(400, "insufficient_quota").is_transient());
    }

    #[test]
    fn no_api_key_selects_offline_model() {
        let model = from_config(&AiConfig::default()).unwrap();
        assert_eq!(model.name(), "offline");
        assert!(!model.is_remote());
    }

    #[test]
    fn api_key_selects_openai() {
        let config = AiConfig {
            api_key: Some("sk-test".to_string()),
            ..AiConfig::default()
        };
        let model = from_config(&config).unwrap();
        assert_eq!(model.name(), "openai");
        assert!(model.is_remote());
    }
}
