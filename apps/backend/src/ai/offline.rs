//! Deterministic stand-in used when no model is configured

use async_trait::async_trait;
use trainer_core::Direction;

use super::{AiError, GenerationRequest, LanguageModel};
use crate::models::Grade;

pub const CHAT_UNAVAILABLE: &str = "Sorry, AI chat is not available at the moment.";

/// Offline model: template sentences and a containment heuristic for grading.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineModel;

#[async_trait]
impl LanguageModel for OfflineModel {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn is_remote(&self) -> bool {
        false
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, AiError> {
        Ok(request
            .words
            .iter()
            .take(request.count)
            .map(|word| format!("Example sentence with {word}"))
            .collect())
    }

    async fn grade(
        &self,
        sentence: &str,
        translation: &str,
        _direction: Direction,
    ) -> Result<Grade, AiError> {
        let answer = translation.trim().to_lowercase();
        let is_correct = !answer.is_empty() && sentence.to_lowercase().contains(&answer);

        Ok(Grade {
            is_correct,
            correct_translation: if is_correct {
                translation.to_string()
            } else {
                sentence.to_string()
            },
            explanation: if is_correct {
                String::new()
            } else {
                "Offline check: the answer was not found in the sentence.".to_string()
            },
        })
    }

    async fn chat(&self, _message: &str) -> Result<String, AiError> {
        Ok(CHAT_UNAVAILABLE.to_string())
    }
}
