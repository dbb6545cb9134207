mod progress;
mod question;

pub use progress::{Answer, Progress, ReviewQuestion, Store, Timestamp};
pub use question::{Category, Metadata, Question, QuestionType, QuizData};

/// Which screen the terminal front-end is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Category list with per-category progress.
    Categories,
    /// Answering questions of one category.
    Quiz,
    /// Accuracy and breakdown of a category run.
    Result,
    /// Re-answering questions from the review list.
    Review,
    /// Summary after a review session.
    ReviewSummary,
}
