//! Persisted quiz run state.
//!
//! These types are the whole durable state of the application. Field
//! names serialize in camelCase so a saved document reads like:
//!
//! ```json
//! {
//!   "progress": {
//!     "basics": {
//!       "categoryId": "basics",
//!       "currentQuestionIndex": 1,
//!       "answers": [
//!         { "questionIndex": 0, "selectedOptions": [2], "isCorrect": true,
//!           "timestamp": "2024-05-01T10:00:00Z" }
//!       ],
//!       "lastUpdated": "2024-05-01T10:00:00Z"
//!     }
//!   },
//!   "reviewQuestions": []
//! }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point in time attached to answers and progress records.
pub type Timestamp = DateTime<Utc>;

/// One recorded response to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Zero-based position within the category's question list.
    pub question_index: usize,
    /// Chosen option indices, stored in the order they were given.
    pub selected_options: Vec<usize>,
    /// Whether the selection matched the correct options when submitted.
    pub is_correct: bool,
    pub timestamp: Timestamp,
}

/// Run state of one category's quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub category_id: String,
    /// Pointer to the next question to show.
    pub current_question_index: usize,
    /// Append-only answer log, in submission order.
    pub answers: Vec<Answer>,
    /// Set once every question has been advanced past.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    pub last_updated: Timestamp,
}

impl Progress {
    /// Create an empty run starting at the first question.
    pub fn new(category_id: impl Into<String>, now: Timestamp) -> Self {
        Self {
            category_id: category_id.into(),
            current_question_index: 0,
            answers: Vec::new(),
            completed_at: None,
            last_updated: now,
        }
    }

    /// Whether this run is finished for a category of `total_questions`.
    ///
    /// Any one of an explicit completion stamp, a full answer log, or a
    /// pointer at or past the end counts as finished.
    pub fn is_completed(&self, total_questions: usize) -> bool {
        self.completed_at.is_some()
            || self.answers.len() >= total_questions
            || self.current_question_index >= total_questions
    }

    /// The question pointer, never behind the number of recorded answers.
    pub fn synced_question_index(&self) -> usize {
        self.current_question_index.max(self.answers.len())
    }

    /// Number of correct answers in the log.
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }
}

/// A missed question tracked in the review registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuestion {
    pub category_id: String,
    pub question_index: usize,
    /// Times this question was answered incorrectly since it was last cleared.
    pub error_count: u32,
    pub last_error_at: Timestamp,
}

impl ReviewQuestion {
    /// Whether this entry refers to the given question.
    pub fn is_for(&self, category_id: &str, question_index: usize) -> bool {
        self.category_id == category_id && self.question_index == question_index
    }
}

/// Aggregate root: everything that gets persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(default)]
    pub progress: BTreeMap<String, Progress>,
    #[serde(default)]
    pub review_questions: Vec<ReviewQuestion>,
}
