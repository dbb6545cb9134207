//! The quiz state manager.
//!
//! [`QuizStateManager`] owns the in-memory [`Store`] and a storage
//! backend. Every mutating operation runs as a transaction: change the
//! store, then write the whole store through to storage before returning.

use chrono::Utc;

use crate::models::{Answer, Progress, ReviewQuestion, Store, Timestamp};

use super::evaluator::check_answer;
use super::persistence::{StateStorage, StorageError};
use super::review;
use super::summary::CategorySummary;

/// A submitted selection for one question.
#[derive(Debug, Clone, Copy)]
pub struct AnswerSubmission<'a> {
    pub category_id: &'a str,
    pub question_index: usize,
    pub selected_options: &'a [usize],
    pub correct_options: &'a [usize],
}

impl AnswerSubmission<'_> {
    fn evaluate(&self, now: Timestamp) -> Answer {
        Answer {
            question_index: self.question_index,
            selected_options: self.selected_options.to_vec(),
            is_correct: check_answer(self.selected_options, self.correct_options),
            timestamp: now,
        }
    }
}

/// Tracks per-category progress and the review list, persisting after
/// every change.
pub struct QuizStateManager<S: StateStorage> {
    store: Store,
    storage: S,
}

impl<S: StateStorage> QuizStateManager<S> {
    /// Load saved state from `storage`, starting empty if nothing was saved.
    pub fn new(storage: S) -> Result<Self, StorageError> {
        let store = storage.load()?.unwrap_or_default();
        log::debug!(
            "Loaded quiz state: {} categories in progress, {} review questions",
            store.progress.len(),
            store.review_questions.len()
        );
        Ok(Self { store, storage })
    }

    /// Read-only view of the whole state.
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Apply `change` to the store, then write it through to storage.
    fn transact<T>(
        &mut self,
        change: impl FnOnce(&mut Store, Timestamp) -> T,
    ) -> Result<T, StorageError> {
        let output = change(&mut self.store, Utc::now());
        self.storage
            .save(&self.store)
            .inspect_err(|e| log::error!("Failed to save quiz state: {}", e))?;
        Ok(output)
    }

    pub fn get_category_progress(&self, category_id: &str) -> Option<&Progress> {
        self.store.progress.get(category_id)
    }

    /// Resume an unfinished run of a category, or start a fresh one.
    ///
    /// An unfinished run is returned with its question pointer moved up to
    /// the answer count; that correction is not saved here. A finished run
    /// is discarded and replaced by an empty one. The review list is left
    /// untouched either way.
    pub fn start_quiz(
        &mut self,
        category_id: &str,
        total_questions: usize,
    ) -> Result<Progress, StorageError> {
        if let Some(existing) = self.store.progress.get(category_id) {
            if !existing.is_completed(total_questions) {
                let mut resumed = existing.clone();
                resumed.current_question_index = existing.synced_question_index();
                log::debug!(
                    "Resuming {} at question {} ({} answered)",
                    category_id,
                    resumed.current_question_index,
                    resumed.answers.len()
                );
                return Ok(resumed);
            }
            log::debug!("Retaking completed category {}", category_id);
        } else {
            log::debug!("Starting category {}", category_id);
        }

        self.transact(|store, now| {
            let fresh = Progress::new(category_id, now);
            store.progress.insert(category_id.to_string(), fresh.clone());
            fresh
        })
    }

    /// Evaluate and record an answer in the category's run.
    ///
    /// A wrong answer also lands in the review list. The question pointer
    /// is not advanced; call [`next_question`](Self::next_question) for
    /// that. The one exception is a run resumed with its pointer behind
    /// the answer log: the pointer is first raised to the answer count,
    /// saving the correction [`start_quiz`](Self::start_quiz) returned.
    /// Submitting twice without `next_question` in between is a caller
    /// error, since the second submit raises the pointer past the first
    /// answer. Without a run for the category the answer is still evaluated
    /// and returned, but nothing is recorded in any progress.
    pub fn submit_answer(&mut self, submission: AnswerSubmission<'_>) -> Result<Answer, StorageError> {
        self.transact(|store, now| {
            let answer = submission.evaluate(now);

            match store.progress.get_mut(submission.category_id) {
                Some(progress) => {
                    progress.current_question_index = progress.synced_question_index();
                    progress.answers.push(answer.clone());
                    progress.last_updated = now;
                    log::debug!(
                        "Recorded answer for {}#{} (correct: {})",
                        submission.category_id,
                        submission.question_index,
                        answer.is_correct
                    );
                }
                None => log::warn!(
                    "Answer for {}#{} not recorded: no quiz in progress",
                    submission.category_id,
                    submission.question_index
                ),
            }

            if !answer.is_correct {
                review::add_to_review(
                    &mut store.review_questions,
                    submission.category_id,
                    submission.question_index,
                    now,
                );
            }

            answer
        })
    }

    /// Advance the question pointer, stamping completion past the last
    /// question. Does nothing without a run for the category.
    pub fn next_question(
        &mut self,
        category_id: &str,
        total_questions: usize,
    ) -> Result<(), StorageError> {
        if !self.store.progress.contains_key(category_id) {
            log::warn!("Cannot advance {}: no quiz in progress", category_id);
            return Ok(());
        }

        self.transact(|store, now| {
            if let Some(progress) = store.progress.get_mut(category_id) {
                progress.current_question_index += 1;
                progress.last_updated = now;
                if progress.current_question_index >= total_questions {
                    progress.completed_at = Some(now);
                    log::debug!("Completed {}", category_id);
                }
            }
        })
    }

    /// Forget a category entirely: its run and its review entries.
    pub fn reset_category_progress(&mut self, category_id: &str) -> Result<(), StorageError> {
        self.transact(|store, _| {
            store.progress.remove(category_id);
            let removed = review::remove_category(&mut store.review_questions, category_id);
            log::info!(
                "Reset {} ({} review questions removed)",
                category_id,
                removed
            );
        })
    }

    pub fn get_review_questions(&self) -> &[ReviewQuestion] {
        &self.store.review_questions
    }

    /// Clear a question from the review list, whatever its miss count.
    pub fn mark_review_complete(
        &mut self,
        category_id: &str,
        question_index: usize,
    ) -> Result<(), StorageError> {
        self.transact(|store, _| {
            if review::remove_from_review(&mut store.review_questions, category_id, question_index) {
                log::debug!("Review {}#{} cleared", category_id, question_index);
            }
        })
    }

    /// Reconcile the review list with the category's finished run.
    ///
    /// Call once when a run finishes. Questions answered correctly in the
    /// run leave the review list; other categories are not touched.
    pub fn update_review_list_on_completion(&mut self, category_id: &str) -> Result<(), StorageError> {
        if !self.store.progress.contains_key(category_id) {
            log::warn!("No run of {} to reconcile the review list with", category_id);
            return Ok(());
        }

        self.transact(|store, _| {
            if let Some(run) = store.progress.get(category_id) {
                let cleared = review::reconcile_with_run(&mut store.review_questions, run);
                log::debug!(
                    "Reconciled review list with {}: {} cleared",
                    category_id,
                    cleared
                );
            }
        })
    }

    /// Answer a question from the review list.
    ///
    /// A correct answer clears the question from the review list, a wrong
    /// one bumps its miss count. The category's run is never touched, so
    /// its answer log and accuracy stay as they were.
    pub fn submit_review_answer(
        &mut self,
        submission: AnswerSubmission<'_>,
    ) -> Result<Answer, StorageError> {
        self.transact(|store, now| {
            let answer = submission.evaluate(now);
            if answer.is_correct {
                review::remove_from_review(
                    &mut store.review_questions,
                    submission.category_id,
                    submission.question_index,
                );
                log::debug!(
                    "Review {}#{} answered correctly",
                    submission.category_id,
                    submission.question_index
                );
            } else {
                review::add_to_review(
                    &mut store.review_questions,
                    submission.category_id,
                    submission.question_index,
                    now,
                );
            }
            answer
        })
    }

    /// Percentage (0-100) of correct answers in the category's current run.
    pub fn calculate_accuracy(&self, category_id: &str) -> f64 {
        match self.store.progress.get(category_id) {
            Some(progress) if !progress.answers.is_empty() => {
                100.0 * progress.correct_count() as f64 / progress.answers.len() as f64
            }
            _ => 0.0,
        }
    }

    /// Number of review list entries for one category.
    pub fn review_count(&self, category_id: &str) -> usize {
        review::count_for_category(&self.store.review_questions, category_id)
    }

    /// Everything the category list shows about one category.
    pub fn category_summary(&self, category_id: &str, total_questions: usize) -> CategorySummary {
        let progress = self.store.progress.get(category_id);
        CategorySummary {
            has_progress: progress.is_some(),
            is_completed: progress.is_some_and(|p| p.is_completed(total_questions)),
            current_question: progress.map_or(0, Progress::synced_question_index),
            total_answered: progress.map_or(0, |p| p.answers.len()),
            total_questions,
            accuracy: self.calculate_accuracy(category_id),
            review_count: self.review_count(category_id),
        }
    }

    /// Wipe all saved state: every run and the whole review list.
    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        self.store = Store::default();
        self.storage
            .clear()
            .inspect_err(|e| log::error!("Failed to clear quiz state: {}", e))?;
        log::info!("Cleared all quiz state");
        Ok(())
    }
}
