//! Request orchestration between the store and the language model

pub mod exercises;
pub mod progress;
pub mod selection;

pub use exercises::{
    chat, check_translation, generate_exercise_batch, BatchRequest, GeneratedBatch,
};
pub use progress::compute_progress;
pub use selection::select_words;
