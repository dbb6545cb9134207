use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::{Category, Question, QuestionType, QuizData};

/// Error raised while loading quiz content.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid quiz data at `{field}`: {message}")]
    Validation { field: String, message: String },
}

impl LoadError {
    fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        LoadError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Read and validate quiz content from a JSON file.
///
/// Categories are returned sorted by their `order` field.
pub fn load_quiz_data<P: AsRef<Path>>(path: P) -> Result<QuizData, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let data = parse_quiz_data(&json_content).map_err(|err| match err {
        ParseFailure::Json(source) => LoadError::Parse {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::Invalid(err) => err,
    })?;

    log::debug!(
        "Loaded {} categories ({} questions) from {}",
        data.categories.len(),
        data.metadata.total_questions,
        path.display()
    );
    Ok(data)
}

enum ParseFailure {
    Json(serde_json::Error),
    Invalid(LoadError),
}

fn parse_quiz_data(json: &str) -> Result<QuizData, ParseFailure> {
    let mut data: QuizData = serde_json::from_str(json).map_err(ParseFailure::Json)?;
    validate_quiz_data(&data).map_err(ParseFailure::Invalid)?;
    data.categories.sort_by_key(|c| c.order);
    Ok(data)
}

/// Check the structural rules quiz content must satisfy.
pub fn validate_quiz_data(data: &QuizData) -> Result<(), LoadError> {
    if !is_iso_date(&data.metadata.last_updated) {
        return Err(LoadError::invalid(
            "metadata.lastUpdated",
            "Invalid date format in lastUpdated",
        ));
    }

    if data.categories.is_empty() {
        return Err(LoadError::invalid(
            "categories",
            "Quiz must have at least one category",
        ));
    }

    for (index, category) in data.categories.iter().enumerate() {
        validate_category(category, &format!("categories[{}]", index))?;
    }

    let mut seen = HashSet::new();
    for category in &data.categories {
        if !seen.insert(category.id.as_str()) {
            return Err(LoadError::invalid(
                "categories",
                format!("Duplicate category id found: {}", category.id),
            ));
        }
    }

    let actual: usize = data.categories.iter().map(Category::total_questions).sum();
    if actual != data.metadata.total_questions {
        return Err(LoadError::invalid(
            "metadata.totalQuestions",
            format!(
                "Total questions count mismatch: metadata says {}, found {}",
                data.metadata.total_questions, actual
            ),
        ));
    }

    Ok(())
}

fn validate_category(category: &Category, field: &str) -> Result<(), LoadError> {
    let id_ok = !category.id.is_empty()
        && category
            .id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !id_ok {
        return Err(LoadError::invalid(
            format!("{}.id", field),
            "Category id can only contain alphanumeric characters and hyphens",
        ));
    }

    if category.name.trim().is_empty() {
        return Err(LoadError::invalid(
            format!("{}.name", field),
            "Category name cannot be empty",
        ));
    }

    for (index, question) in category.questions.iter().enumerate() {
        validate_question(question, &format!("{}.questions[{}]", field, index))?;
    }

    Ok(())
}

fn validate_question(question: &Question, field: &str) -> Result<(), LoadError> {
    if question.text.trim().is_empty() {
        return Err(LoadError::invalid(
            format!("{}.question", field),
            "Question text cannot be empty",
        ));
    }

    if question.options.len() < 2 {
        return Err(LoadError::invalid(
            format!("{}.options", field),
            "Question must have at least 2 options",
        ));
    }

    if question.correct.iter().any(|&i| i >= question.options.len()) {
        return Err(LoadError::invalid(
            format!("{}.correct", field),
            "Invalid correct answer index",
        ));
    }

    match question.kind {
        QuestionType::Single if question.correct.len() != 1 => {
            return Err(LoadError::invalid(
                format!("{}.correct", field),
                "Single choice question must have exactly one correct answer",
            ));
        }
        QuestionType::Multiple if question.correct.is_empty() => {
            return Err(LoadError::invalid(
                format!("{}.correct", field),
                "Multiple choice question must have at least one correct answer",
            ));
        }
        _ => {}
    }

    if question.explanation.trim().is_empty() {
        return Err(LoadError::invalid(
            format!("{}.explanation", field),
            "Question explanation cannot be empty",
        ));
    }

    Ok(())
}

/// `YYYY-MM-DD` shape check.
fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
