//! Quiz progress and review list state.

mod evaluator;
mod manager;
mod persistence;
mod review;
mod summary;

pub use evaluator::check_answer;
pub use manager::{AnswerSubmission, QuizStateManager};
pub use persistence::{
    JsonFileStorage, MemoryStorage, StateStorage, StorageError, DEFAULT_NAMESPACE,
};
pub use summary::{CategoryStatus, CategorySummary, Performance};
