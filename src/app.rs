use chrono::Utc;

use crate::models::{Answer, AppState, Category, Progress, Question, QuizData};
use crate::store::{
    check_answer, AnswerSubmission, CategorySummary, QuizStateManager, StateStorage, StorageError,
};

/// A review list entry resolved against the loaded content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub category_id: String,
    pub question_index: usize,
    pub error_count: u32,
}

/// Terminal front-end state. Owns the state manager and drives it from
/// key presses.
pub struct App<S: StateStorage> {
    pub state: AppState,
    data: QuizData,
    manager: QuizStateManager<S>,
    category_cursor: usize,
    active_category: usize,
    current_question_index: usize,
    option_cursor: usize,
    selected_options: Vec<usize>,
    feedback: Option<Answer>,
    review_queue: Vec<ReviewItem>,
    review_position: usize,
    review_outcomes: Vec<bool>,
    result_scroll: usize,
    status_message: Option<String>,
}

impl<S: StateStorage> App<S> {
    pub fn new(data: QuizData, manager: QuizStateManager<S>) -> Self {
        Self {
            state: AppState::Categories,
            data,
            manager,
            category_cursor: 0,
            active_category: 0,
            current_question_index: 0,
            option_cursor: 0,
            selected_options: Vec::new(),
            feedback: None,
            review_queue: Vec::new(),
            review_position: 0,
            review_outcomes: Vec::new(),
            result_scroll: 0,
            status_message: None,
        }
    }

    pub fn manager(&self) -> &QuizStateManager<S> {
        &self.manager
    }

    pub fn title(&self) -> &str {
        &self.data.metadata.title
    }

    pub fn categories(&self) -> &[Category] {
        &self.data.categories
    }

    pub fn category_cursor(&self) -> usize {
        self.category_cursor
    }

    pub fn category_summary(&self, category: &Category) -> CategorySummary {
        self.manager
            .category_summary(&category.id, category.total_questions())
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn select_next_category(&mut self) {
        let count = self.data.categories.len();
        if count > 0 {
            self.category_cursor = (self.category_cursor + 1) % count;
        }
    }

    pub fn select_previous_category(&mut self) {
        let count = self.data.categories.len();
        if count > 0 {
            self.category_cursor = (self.category_cursor + count - 1) % count;
        }
    }

    pub fn active_category(&self) -> &Category {
        &self.data.categories[self.active_category]
    }

    /// Start or resume the category under the cursor.
    pub fn open_selected_category(&mut self) -> Result<(), StorageError> {
        if self.category_cursor >= self.data.categories.len() {
            return Ok(());
        }
        self.status_message = None;
        self.active_category = self.category_cursor;

        let category = &self.data.categories[self.active_category];
        let total = category.total_questions();
        let progress = self.manager.start_quiz(&category.id, total)?;

        // Categories without questions go straight to their result.
        if progress.current_question_index >= total {
            self.show_result();
        } else {
            self.current_question_index = progress.current_question_index;
            self.clear_selection();
            self.state = AppState::Quiz;
        }
        Ok(())
    }

    /// Drop the selected category's run and its review entries.
    pub fn reset_selected_category(&mut self) -> Result<(), StorageError> {
        let Some(category) = self.data.categories.get(self.category_cursor) else {
            return Ok(());
        };
        self.manager.reset_category_progress(&category.id)?;
        self.status_message = Some(format!("Reset progress for {}", category.name));
        Ok(())
    }

    /// Question currently shown in the quiz or review runner.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            AppState::Quiz => self
                .active_category()
                .questions
                .get(self.current_question_index),
            AppState::Review => {
                let item = self.review_queue.get(self.review_position)?;
                self.data.question(&item.category_id, item.question_index)
            }
            _ => None,
        }
    }

    pub fn current_question_number(&self) -> usize {
        match self.state {
            AppState::Review => self.review_position + 1,
            _ => self.current_question_index + 1,
        }
    }

    pub fn total_questions(&self) -> usize {
        match self.state {
            AppState::Review => self.review_queue.len(),
            _ => self.active_category().total_questions(),
        }
    }

    pub fn option_cursor(&self) -> usize {
        self.option_cursor
    }

    pub fn selected_options(&self) -> &[usize] {
        &self.selected_options
    }

    pub fn feedback(&self) -> Option<&Answer> {
        self.feedback.as_ref()
    }

    fn option_count(&self) -> usize {
        self.current_question().map_or(0, |q| q.options.len())
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 && self.feedback.is_none() {
            self.option_cursor = (self.option_cursor + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count > 0 && self.feedback.is_none() {
            self.option_cursor = (self.option_cursor + count - 1) % count;
        }
    }

    /// Pick the option under the cursor. Single choice replaces the
    /// selection, multiple choice toggles it.
    pub fn toggle_option(&mut self) {
        if self.feedback.is_some() {
            return;
        }
        let Some(multiple) = self.current_question().map(Question::is_multiple) else {
            return;
        };
        let option = self.option_cursor;

        if !multiple {
            self.selected_options = vec![option];
        } else if let Some(pos) = self.selected_options.iter().position(|&o| o == option) {
            self.selected_options.remove(pos);
        } else {
            self.selected_options.push(option);
        }
    }

    /// Submit the selection, or move on once feedback is showing.
    pub fn confirm(&mut self) -> Result<(), StorageError> {
        self.status_message = None;
        if self.feedback.is_some() {
            self.advance()
        } else {
            self.submit_answer()
        }
    }

    /// Record the selection and show feedback for it.
    ///
    /// Feedback is shown even when saving fails, so the screen stays in
    /// step with the manager's in-memory state; the save error is returned
    /// afterwards.
    pub fn submit_answer(&mut self) -> Result<(), StorageError> {
        if self.feedback.is_some() || self.selected_options.is_empty() {
            return Ok(());
        }
        let Some(correct) = self.current_question().map(|q| q.correct.clone()) else {
            return Ok(());
        };
        let (category_id, question_index) = match self.state {
            AppState::Quiz => (
                self.active_category().id.clone(),
                self.current_question_index,
            ),
            AppState::Review => {
                let item = &self.review_queue[self.review_position];
                (item.category_id.clone(), item.question_index)
            }
            _ => return Ok(()),
        };

        let submission = AnswerSubmission {
            category_id: &category_id,
            question_index,
            selected_options: &self.selected_options,
            correct_options: &correct,
        };
        let in_review = self.state == AppState::Review;
        let submitted = if in_review {
            self.manager.submit_review_answer(submission)
        } else {
            self.manager.submit_answer(submission)
        };

        let (answer, saved) = match submitted {
            Ok(answer) => (answer, Ok(())),
            Err(e) => (
                Answer {
                    question_index,
                    selected_options: self.selected_options.clone(),
                    is_correct: check_answer(&self.selected_options, &correct),
                    timestamp: Utc::now(),
                },
                Err(e),
            ),
        };

        if in_review {
            self.review_outcomes.push(answer.is_correct);
        }
        self.feedback = Some(answer);
        saved
    }

    fn advance(&mut self) -> Result<(), StorageError> {
        match self.state {
            AppState::Quiz => self.next_question(),
            AppState::Review => {
                self.review_position += 1;
                self.clear_selection();
                if self.review_position >= self.review_queue.len() {
                    self.state = AppState::ReviewSummary;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Move past the answered question. The screen moves on even when a
    /// save fails, so a repeated enter cannot advance the run twice.
    fn next_question(&mut self) -> Result<(), StorageError> {
        let category = &self.data.categories[self.active_category];
        let total = category.total_questions();
        let advanced = self.manager.next_question(&category.id, total);

        let next_index = self.current_question_index + 1;
        if next_index >= total {
            let reconciled = self.manager.update_review_list_on_completion(&category.id);
            self.show_result();
            advanced.and(reconciled)
        } else {
            self.current_question_index = next_index;
            self.clear_selection();
            advanced
        }
    }

    /// Show a failed save; the session carries on with the in-memory state.
    pub fn report_storage_error(&mut self, error: &StorageError) {
        self.status_message = Some(format!("Progress not saved: {}", error));
    }

    fn clear_selection(&mut self) {
        self.option_cursor = 0;
        self.selected_options.clear();
        self.feedback = None;
    }

    fn show_result(&mut self) {
        self.result_scroll = 0;
        self.clear_selection();
        self.state = AppState::Result;
    }

    /// Run of the category whose result is showing.
    pub fn result_progress(&self) -> Option<&Progress> {
        self.manager
            .get_category_progress(&self.active_category().id)
    }

    pub fn result_accuracy(&self) -> f64 {
        self.manager.calculate_accuracy(&self.active_category().id)
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self
            .result_progress()
            .map_or(0, |p| p.answers.len().saturating_sub(1));
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Start the shown category over from zero, review entries included.
    pub fn retake(&mut self) -> Result<(), StorageError> {
        let category = &self.data.categories[self.active_category];
        self.manager.reset_category_progress(&category.id)?;
        self.category_cursor = self.active_category;
        self.open_selected_category()
    }

    /// Begin a review session over a snapshot of the review list.
    pub fn start_review(&mut self) {
        let queue: Vec<ReviewItem> = self
            .manager
            .get_review_questions()
            .iter()
            .filter(|q| self.data.question(&q.category_id, q.question_index).is_some())
            .map(|q| ReviewItem {
                category_id: q.category_id.clone(),
                question_index: q.question_index,
                error_count: q.error_count,
            })
            .collect();

        if queue.is_empty() {
            self.status_message = Some("Nothing to review".to_string());
            return;
        }

        self.status_message = None;
        self.review_queue = queue;
        self.review_position = 0;
        self.review_outcomes.clear();
        self.clear_selection();
        self.state = AppState::Review;
    }

    pub fn current_review_item(&self) -> Option<&ReviewItem> {
        self.review_queue.get(self.review_position)
    }

    pub fn review_category_name<'a>(&'a self, category_id: &'a str) -> &'a str {
        self.data
            .category(category_id)
            .map_or(category_id, |c| c.name.as_str())
    }

    /// Answered review questions as `(cleared, still_missed)`.
    pub fn review_tally(&self) -> (usize, usize) {
        let cleared = self.review_outcomes.iter().filter(|&&ok| ok).count();
        (cleared, self.review_outcomes.len() - cleared)
    }

    pub fn back_to_categories(&mut self) {
        self.clear_selection();
        self.state = AppState::Categories;
    }
}
