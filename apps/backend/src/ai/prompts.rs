//! Prompt text sent to the chat model

use trainer_core::{Direction, Length, SentenceType, Tense, Topic};

use super::GenerationRequest;

/// System and user message of one completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const NATURALNESS_RULES: &str = "Rules:\n\
- Every sentence uses at least one word from the vocabulary list\n\
- Write only what native speakers say in everyday conversation\n\
- Keep contexts realistic and time references practical (today, tomorrow, tonight, this week, soon)\n\
- Never mention specific months or distant dates\n\
- Do not force unrelated vocabulary words into one sentence\n\
- Avoid textbook phrasing and pointless detail\n";

const GRADING_RUBRIC: &str = "Grade by MEANING, not by perfect spelling or grammar.\n\
\n\
Accept (is_correct=true) when the meaning is clearly the same despite:\n\
- understandable typos\n\
- capitalization or punctuation differences\n\
- missing accent marks\n\
- small article or preposition differences\n\
- slightly different but natural word order\n\
\n\
Reject (is_correct=false) only for a meaning error:\n\
- subject and object swapped\n\
- a tense that changes the time of the action\n\
- an added or dropped negation\n\
- missing or extra key information\n\
- a wrong key word\n\
\n\
Never invent errors. When the source sentence is ambiguous, accept any plausible reading.\n\
When is_correct is true the explanation is an empty string.\n";

fn length_label(length: Length) -> &'static str {
    match length {
        Length::Short => "short (up to 6 words)",
        Length::Medium => "medium (7 to 12 words)",
        Length::Long => "long (13 words or more)",
    }
}

fn type_instruction(sentence_type: SentenceType) -> &'static str {
    match sentence_type {
        SentenceType::Affirmative => "Write only affirmative sentences. ",
        SentenceType::Interrogative => "Write only questions. ",
        SentenceType::Negative => "Write only negative sentences. ",
        SentenceType::Mixed => "Mix affirmative, interrogative and negative sentences. ",
    }
}

fn tense_instruction(tense: Tense) -> &'static str {
    match tense {
        Tense::Present => "Use only the present tense. ",
        Tense::Past => "Use only the past tense. ",
        Tense::Future => "Use only the future tense. ",
        Tense::Mixed => "Mix present, past and future naturally. ",
    }
}

/// Prompt asking for `request.count` sentences as `{"sentences": [...]}`.
pub fn generation(request: &GenerationRequest) -> Prompt {
    let style = &request.style;
    let language = &request.language;
    let mut user = format!(
        "Write {} natural sentences in {}. Level: {}. Length: {}. ",
        request.count,
        language.to_uppercase(),
        style.level.as_str(),
        length_label(style.length),
    );

    if style.topic != Topic::Any {
        user.push_str(&format!("Every sentence is about {}. ", style.topic.as_str()));
    }
    user.push_str(type_instruction(style.sentence_type));
    user.push_str(tense_instruction(style.tense));
    if let Some(focus) = &style.grammar_focus {
        user.push_str(&format!(
            "Every sentence must practice this grammar point without naming it: {focus}. "
        ));
    }

    user.push_str(&format!("Vocabulary: {}.\n", request.words.join(", ")));
    user.push_str(NATURALNESS_RULES);
    user.push_str(&format!(
        "All sentences are in {}, never in {}. ",
        language, request.native_language
    ));
    user.push_str(r#"Reply with JSON only: {"sentences": ["...", "..."]}."#);

    Prompt {
        system: format!(
            "You are a native {language} speaker helping a learner. \
             You write only sentences people really use in daily life."
        ),
        user,
    }
}

/// Prompt grading `translation`, or asking for a reference translation when it is blank.
pub fn grading(sentence: &str, translation: &str, direction: Direction) -> Prompt {
    let (source, target) = direction.languages();
    let system = format!(
        "You are a language teaching assistant checking translations from {source} to {target}."
    );

    let user = if translation.trim().is_empty() {
        format!(
            "Translate this {source} sentence into {target}: {sentence}\n\
             Reply with JSON only: {{\"correct_translation\": \"...\"}}."
        )
    } else {
        format!(
            "Check this translation from {source} into {target}.\n\
             {source}: {sentence}\n\
             Learner's translation: {translation}\n\n\
             {GRADING_RUBRIC}\n\
             Reply with JSON only: \
             {{\"is_correct\": true/false, \"correct_translation\": \"...\", \"explanation\": \"\"}}."
        )
    };

    Prompt { system, user }
}

/// System message of the tutor chat
pub fn tutor() -> &'static str {
    "You are a friendly Spanish tutor. Answer questions about grammar, vocabulary, \
     pronunciation and culture with short, clear explanations and examples. \
     Be encouraging."
}

#[cfg(test)]
mod tests {
    use super::*;
    use trainer_core::GenerationStyle;

    fn request(style: GenerationStyle) -> GenerationRequest {
        GenerationRequest {
            words: vec!["perro".to_string(), "casa".to_string()],
            count: 5,
            style,
            language: "Spanish".to_string(),
            native_language: "English".to_string(),
        }
    }

    #[test]
    fn generation_mentions_words_count_and_format() {
        let prompt = generation(&request(GenerationStyle::default()));
        assert!(prompt.user.contains("Write 5 natural sentences in SPANISH"));
        assert!(prompt.user.contains("perro, casa"));
        assert!(prompt.user.contains(r#"{"sentences""#));
        assert!(prompt.user.contains("never in English"));
        assert!(!prompt.user.contains("grammar point"));
        assert!(!prompt.user.contains("Every sentence is about"));
    }

    #[test]
    fn generation_includes_style() {
        let style = GenerationStyle::from_params(
            Some("B1"),
            Some("long"),
            Some("food"),
            Some("interrogative"),
            Some("past"),
            Some("preterite vs imperfect"),
        );
        let prompt = generation(&request(style));
        assert!(prompt.user.contains("Level: B1"));
        assert!(prompt.user.contains("Every sentence is about food"));
        assert!(prompt.user.contains("Write only questions"));
        assert!(prompt.user.contains("only the past tense"));
        assert!(prompt.user.contains("preterite vs imperfect"));
    }

    #[test]
    fn grading_direction_and_blank_translation() {
        let prompt = grading("The dog eats.", "", Direction::EnglishToSpanish);
        assert!(prompt.system.contains("from English to Spanish"));
        assert!(prompt.user.starts_with("Translate this English sentence into Spanish"));

        let prompt = grading("El perro come.", "The dog eat", Direction::SpanishToEnglish);
        assert!(prompt.user.contains("Learner's translation: The dog eat"));
        assert!(prompt.user.contains("Grade by MEANING"));
    }
}
