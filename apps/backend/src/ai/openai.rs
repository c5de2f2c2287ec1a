//! OpenAI-compatible chat completions client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trainer_core::Direction;

use super::prompts::{self, Prompt};
use super::{AiError, GenerationRequest, LanguageModel};
use crate::models::Grade;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for `/chat/completions` of OpenAI or a compatible server
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AiError::Failed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, AiError> {
        let request = CompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            max_tokens,
            temperature: 0.7,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::classify(format!("request to model API failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::debug!(status = %status, "model API returned an error");
            return Err(AiError::from_status(status.as_u16(), body));
        }

        let completion = response
            .json::<CompletionResponse>()
            .await
            .map_err(|e| AiError::Failed(format!("unexpected model API response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| AiError::Failed("model API returned no choices".to_string()))
    }

    async fn complete_prompt(&self, prompt: &Prompt, max_tokens: u32) -> Result<String, AiError> {
        self.complete(&prompt.system, &prompt.user, max_tokens).await
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, AiError> {
        let raw = self.complete_prompt(&prompts::generation(request), 500).await?;
        Ok(parse_sentences(&raw, request.count))
    }

    async fn grade(
        &self,
        sentence: &str,
        translation: &str,
        direction: Direction,
    ) -> Result<Grade, AiError> {
        let raw = self
            .complete_prompt(&prompts::grading(sentence, translation, direction), 200)
            .await?;
        Ok(parse_grade(&raw, translation))
    }

    async fn chat(&self, message: &str) -> Result<String, AiError> {
        self.complete(prompts::tutor(), message, 350).await
    }
}

/// Remove a surrounding markdown code fence, with or without a `json` tag.
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

fn parse_object(raw: &str) -> Option<serde_json::Map<String, Value>> {
    match serde_json::from_str::<Value>(strip_fences(raw)) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Sentences from `{"sentences": [...]}`, or one per non-empty line otherwise.
pub fn parse_sentences(raw: &str, limit: usize) -> Vec<String> {
    let listed: Vec<String> = parse_object(raw)
        .and_then(|mut map| map.remove("sentences"))
        .and_then(|value| match value {
            Value::Array(items) => Some(items),
            _ => None,
        })
        .map(|items| {
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let sentences = if listed.is_empty() {
        strip_fences(raw)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        listed
    };

    sentences.into_iter().take(limit).collect()
}

/// Grade from the model's JSON; missing fields default to incorrect, the
/// learner's translation and no explanation.
pub fn parse_grade(raw: &str, translation: &str) -> Grade {
    let map = parse_object(raw).unwrap_or_default();
    let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);

    Grade {
        is_correct: map.get("is_correct").and_then(Value::as_bool).unwrap_or(false),
        correct_translation: text("correct_translation").unwrap_or_else(|| translation.to_string()),
        explanation: text("explanation").unwrap_or_default(),
    }
}
