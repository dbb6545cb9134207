//! # quiz-review
//!
//! Category quizzes with resumable progress and a review list of missed
//! questions, plus a terminal front-end.
//!
//! The core is [`QuizStateManager`]: it tracks each category's run
//! (question pointer, answer log, completion) and the cross-category
//! review list, writing the whole state through to a [`StateStorage`]
//! after every change.
//!
//! ## Usage
//!
//! ```rust
//! use quiz_review::{AnswerSubmission, MemoryStorage, QuizStateManager};
//!
//! # fn main() -> Result<(), quiz_review::StorageError> {
//! let mut manager = QuizStateManager::new(MemoryStorage::new())?;
//! manager.start_quiz("basics", 2)?;
//!
//! let answer = manager.submit_answer(AnswerSubmission {
//!     category_id: "basics",
//!     question_index: 0,
//!     selected_options: &[1],
//!     correct_options: &[0],
//! })?;
//! assert!(!answer.is_correct);
//! assert_eq!(manager.get_review_questions().len(), 1);
//!
//! manager.next_question("basics", 2)?;
//! assert_eq!(manager.calculate_accuracy("basics"), 0.0);
//! # Ok(())
//! # }
//! ```

mod app;
mod data;
mod models;
mod store;
pub mod terminal;
mod ui;

use std::io;
use std::path::Path;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

pub use app::{App, ReviewItem};
pub use data::{load_quiz_data, validate_quiz_data, LoadError};
pub use models::{
    Answer, AppState, Category, Metadata, Progress, Question, QuestionType, QuizData,
    ReviewQuestion, Store, Timestamp,
};
pub use store::{
    check_answer, AnswerSubmission, CategoryStatus, CategorySummary, JsonFileStorage,
    MemoryStorage, Performance, QuizStateManager, StateStorage, StorageError, DEFAULT_NAMESPACE,
};

/// Error type for quiz operations.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    /// Error loading quiz content.
    #[error("Failed to load questions: {0}")]
    Load(#[from] LoadError),
    /// Error reading or writing saved progress.
    #[error("Failed to access saved progress: {0}")]
    Storage(#[from] StorageError),
    /// IO error during quiz execution.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz that can be run in the terminal.
pub struct Quiz<S: StateStorage> {
    app: App<S>,
}

impl<S: StateStorage> Quiz<S> {
    /// Create a quiz over loaded content and a state manager.
    pub fn new(data: QuizData, manager: QuizStateManager<S>) -> Self {
        Self {
            app: App::new(data, manager),
        }
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub fn run(mut self) -> Result<(), QuizError> {
        let mut session = terminal::TerminalSession::start()?;
        run_event_loop(session.terminal(), &mut self.app)
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App<S> {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App<S> {
        &mut self.app
    }
}

impl Quiz<JsonFileStorage> {
    /// Load content from a JSON file and progress saved in `state_dir`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use quiz_review::Quiz;
    ///
    /// let quiz = Quiz::open("questions.json", ".").expect("Failed to load quiz");
    /// ```
    pub fn open<P: AsRef<Path>, D: AsRef<Path>>(questions: P, state_dir: D) -> Result<Self, QuizError> {
        let data = load_quiz_data(questions)?;
        let manager = QuizStateManager::new(JsonFileStorage::in_dir(state_dir))?;
        Ok(Self::new(data, manager))
    }
}

fn run_event_loop<S: StateStorage>(
    terminal: &mut terminal::AppTerminal,
    app: &mut App<S>,
) -> Result<(), QuizError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            // A failed save is shown on screen; the in-memory state stays current.
            match handle_input(app, key.code) {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => app.report_storage_error(&e),
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input<S: StateStorage>(app: &mut App<S>, key: KeyCode) -> Result<bool, StorageError> {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
        return Ok(true);
    }

    match app.state {
        AppState::Categories => handle_categories_input(app, key)?,
        AppState::Quiz | AppState::Review => handle_question_input(app, key)?,
        AppState::Result => handle_result_input(app, key)?,
        AppState::ReviewSummary => {
            if matches!(key, KeyCode::Enter | KeyCode::Esc) {
                app.back_to_categories();
            }
        }
    }
    Ok(false)
}

fn handle_categories_input<S: StateStorage>(app: &mut App<S>, key: KeyCode) -> Result<(), StorageError> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_category(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_category(),
        KeyCode::Enter => app.open_selected_category()?,
        KeyCode::Char('r') | KeyCode::Char('R') => app.start_review(),
        KeyCode::Char('x') | KeyCode::Char('X') => app.reset_selected_category()?,
        _ => {}
    }
    Ok(())
}

fn handle_question_input<S: StateStorage>(app: &mut App<S>, key: KeyCode) -> Result<(), StorageError> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Char(' ') => app.toggle_option(),
        KeyCode::Enter => app.confirm()?,
        KeyCode::Esc => app.back_to_categories(),
        _ => {}
    }
    Ok(())
}

fn handle_result_input<S: StateStorage>(app: &mut App<S>, key: KeyCode) -> Result<(), StorageError> {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.retake()?,
        KeyCode::Enter | KeyCode::Esc => app.back_to_categories(),
        _ => {}
    }
    Ok(())
}
