/// What the category list shows for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub has_progress: bool,
    pub is_completed: bool,
    /// Next question to show, zero-based.
    pub current_question: usize,
    pub total_answered: usize,
    pub total_questions: usize,
    pub accuracy: f64,
    /// Questions of this category still on the review list.
    pub review_count: usize,
}

impl CategorySummary {
    pub fn status(&self) -> CategoryStatus {
        if self.is_completed {
            CategoryStatus::Completed
        } else if self.has_progress {
            CategoryStatus::InProgress
        } else {
            CategoryStatus::NotStarted
        }
    }

    pub fn needs_review(&self) -> bool {
        self.review_count > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl CategoryStatus {
    pub fn label(self) -> &'static str {
        match self {
            CategoryStatus::NotStarted => "not started",
            CategoryStatus::InProgress => "in progress",
            CategoryStatus::Completed => "completed",
        }
    }
}

/// Rating of a finished run, derived from its accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    Excellent,
    Good,
    Fair,
    NeedsReview,
}

impl Performance {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 90.0 {
            Performance::Excellent
        } else if accuracy >= 80.0 {
            Performance::Good
        } else if accuracy >= 70.0 {
            Performance::Fair
        } else {
            Performance::NeedsReview
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Performance::Excellent => "Excellent!",
            Performance::Good => "Well done",
            Performance::Fair => "Almost there",
            Performance::NeedsReview => "Time to review",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_performance_thresholds() {
        assert_eq!(Performance::from_accuracy(100.0), Performance::Excellent);
        assert_eq!(Performance::from_accuracy(90.0), Performance::Excellent);
        assert_eq!(Performance::from_accuracy(89.9), Performance::Good);
        assert_eq!(Performance::from_accuracy(80.0), Performance::Good);
        assert_eq!(Performance::from_accuracy(70.0), Performance::Fair);
        assert_eq!(Performance::from_accuracy(69.9), Performance::NeedsReview);
        assert_eq!(Performance::from_accuracy(0.0), Performance::NeedsReview);
    }

    #[test]
    fn test_status() {
        let mut summary = CategorySummary {
            has_progress: false,
            is_completed: false,
            current_question: 0,
            total_answered: 0,
            total_questions: 3,
            accuracy: 0.0,
            review_count: 0,
        };
        assert_eq!(summary.status(), CategoryStatus::NotStarted);

        summary.has_progress = true;
        assert_eq!(summary.status(), CategoryStatus::InProgress);

        summary.is_completed = true;
        assert_eq!(summary.status(), CategoryStatus::Completed);
        assert!(!summary.needs_review());
    }
}
