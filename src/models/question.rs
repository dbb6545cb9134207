use serde::Deserialize;

/// How many options a question accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Exactly one option is correct.
    Single,
    /// One or more options are correct.
    Multiple,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(rename = "question")]
    pub text: String,
    #[serde(default)]
    pub code: Option<String>,
    pub options: Vec<String>,
    pub correct: Vec<usize>,
    pub explanation: String,
}

impl Question {
    pub fn is_multiple(&self) -> bool {
        self.kind == QuestionType::Multiple
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: i64,
    pub questions: Vec<Question>,
}

impl Category {
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub version: String,
    pub title: String,
    pub last_updated: String,
    pub total_questions: usize,
    #[serde(default)]
    pub description: Option<String>,
}

/// The full quiz content: metadata plus categories.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizData {
    pub metadata: Metadata,
    pub categories: Vec<Category>,
}

impl QuizData {
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Look up a single question by its category and position.
    pub fn question(&self, category_id: &str, question_index: usize) -> Option<&Question> {
        self.category(category_id)?.questions.get(question_index)
    }
}
