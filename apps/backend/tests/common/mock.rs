//! Scripted language model for tests.
//!
//! - `MockModel::working()` - writes one sentence per word and grades by keyword
//! - `MockModel::overloaded()` - always fails with a quota error
//! - `MockModel::failing()` - always fails with a generic error

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use lingo_trainer_backend::ai::{AiError, GenerationRequest, LanguageModel};
use lingo_trainer_backend::models::{Direction, GenerationStyle, Grade};

/// Reference translation returned by the working model
pub const REFERENCE: &str = "The dog eats.";

/// Behavior mode for the mock model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    Working,
    Overloaded,
    Failing,
}

#[derive(Debug)]
pub struct MockModel {
    behavior: MockBehavior,
    calls: AtomicUsize,
    last_style: Mutex<Option<GenerationStyle>>,
}

impl MockModel {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_style: Mutex::new(None),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn overloaded() -> Self {
        Self::new(MockBehavior::Overloaded)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Number of model calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Style of the most recent generation request
    pub fn last_style(&self) -> Option<GenerationStyle> {
        self.last_style.lock().unwrap().clone()
    }

    fn begin(&self) -> Result<(), AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            MockBehavior::Working => Ok(()),
            MockBehavior::Overloaded => Err(AiError::classify("429 RESOURCE_EXHAUSTED: quota exceeded")),
            MockBehavior::Failing => Err(AiError::classify("connection reset by peer")),
        }
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, AiError> {
        *self.last_style.lock().unwrap() = Some(request.style.clone());
        self.begin()?;
        Ok((0..request.count)
            .map(|i| match request.words.get(i % request.words.len().max(1)) {
                Some(word) => format!("Hoy practico {}.", word),
                None => format!("Frase número {}.", i + 1),
            })
            .collect())
    }

    async fn grade(
        &self,
        _sentence: &str,
        translation: &str,
        _direction: Direction,
    ) -> Result<Grade, AiError> {
        self.begin()?;
        let is_correct = translation.to_lowercase().contains("dog");
        Ok(Grade {
            is_correct,
            correct_translation: REFERENCE.to_string(),
            explanation: if is_correct {
                String::new()
            } else {
                "Scripted explanation.".to_string()
            },
        })
    }

    async fn chat(&self, message: &str) -> Result<String, AiError> {
        self.begin()?;
        Ok(format!("Tutor says: {}", message))
    }
}
