//! Core practice library used by the backend.
//!
//! Provides:
//! - Text normalization for accent/punctuation/case-insensitive comparison
//! - Vocabulary selection with recency avoidance
//! - Matching of vocabulary items inside generated sentences
//! - Streak and accuracy arithmetic for progress reports
//! - Shared generation parameter types (Level, Tense, etc.)

pub mod error;
pub mod matching;
pub mod normalize;
pub mod progress;
pub mod selection;
pub mod types;

pub use error::{require_text, Result, ValidationError};
pub use matching::{match_words, SentenceIndex};
pub use normalize::{equivalent, normalize, tokens};
pub use progress::{accuracy, current_streak, longest_streak, StreakSummary};
pub use selection::{record_selection, select, Identified, HISTORY_LIMIT, RECENT_WINDOW};
pub use types::{
    Direction, ExerciseCounts, GenerationStyle, Length, Level, SentenceType, Tense, Topic,
};
