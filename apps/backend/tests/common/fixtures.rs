//! Test fixtures and factory functions for request bodies.

use serde_json::{json, Value};

/// Spanish words that never appear in the scripted sentence template.
pub const SPANISH_WORDS: [&str; 12] = [
    "perro", "gato", "libro", "mesa", "silla", "agua", "leche", "coche", "playa", "ventana",
    "puerta", "buenos días",
];

/// Register request body.
pub fn register_request(name: Option<&str>) -> Value {
    json!({ "name": name })
}

/// Word create/update body.
pub fn word_request(text: &str, language: Option<&str>) -> Value {
    match language {
        Some(language) => json!({ "text": text, "language": language }),
        None => json!({ "text": text }),
    }
}

/// Generate request body with default style.
pub fn generate_request(num_sentences: i64, words_count: i64) -> Value {
    json!({
        "level": "A2",
        "length": "short",
        "topic": "food",
        "num_sentences": num_sentences,
        "words_count": words_count,
    })
}

/// Check request body.
pub fn check_request(sentence: &str, translation: &str) -> Value {
    json!({
        "sentence": sentence,
        "translation": translation,
        "direction": "es-to-en",
    })
}
