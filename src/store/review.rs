//! Review registry bookkeeping.
//!
//! The registry is the cross-category list of missed questions. It holds
//! at most one entry per `(category_id, question_index)` pair.

use crate::models::{Progress, ReviewQuestion, Timestamp};

/// Record a miss: bump the existing entry or insert a fresh one.
pub(crate) fn add_to_review(
    reviews: &mut Vec<ReviewQuestion>,
    category_id: &str,
    question_index: usize,
    now: Timestamp,
) {
    match reviews
        .iter_mut()
        .find(|q| q.is_for(category_id, question_index))
    {
        Some(existing) => {
            existing.error_count += 1;
            existing.last_error_at = now;
            log::debug!(
                "Review {}#{} missed again ({} times)",
                category_id,
                question_index,
                existing.error_count
            );
        }
        None => {
            reviews.push(ReviewQuestion {
                category_id: category_id.to_string(),
                question_index,
                error_count: 1,
                last_error_at: now,
            });
            log::debug!("Review {}#{} added", category_id, question_index);
        }
    }
}

/// Drop the entry for one question. Returns whether anything was removed.
pub(crate) fn remove_from_review(
    reviews: &mut Vec<ReviewQuestion>,
    category_id: &str,
    question_index: usize,
) -> bool {
    let before = reviews.len();
    reviews.retain(|q| !q.is_for(category_id, question_index));
    before != reviews.len()
}

/// Drop every entry belonging to a category.
pub(crate) fn remove_category(reviews: &mut Vec<ReviewQuestion>, category_id: &str) -> usize {
    let before = reviews.len();
    reviews.retain(|q| q.category_id != category_id);
    before - reviews.len()
}

/// Reconcile the registry against a finished run of one category.
///
/// Correct answers in the run clear their entries; incorrect ones keep
/// theirs, re-adding any that went missing with a count of one. Entries
/// of other categories are left alone.
pub(crate) fn reconcile_with_run(reviews: &mut Vec<ReviewQuestion>, run: &Progress) -> usize {
    let category_id = run.category_id.as_str();
    let mut cleared = 0;

    for answer in &run.answers {
        if answer.is_correct {
            if remove_from_review(reviews, category_id, answer.question_index) {
                cleared += 1;
            }
        } else if !reviews
            .iter()
            .any(|q| q.is_for(category_id, answer.question_index))
        {
            reviews.push(ReviewQuestion {
                category_id: category_id.to_string(),
                question_index: answer.question_index,
                error_count: 1,
                last_error_at: answer.timestamp,
            });
        }
    }

    cleared
}

/// Number of registry entries for one category.
pub(crate) fn count_for_category(reviews: &[ReviewQuestion], category_id: &str) -> usize {
    reviews.iter().filter(|q| q.category_id == category_id).count()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::models::Answer;

    fn answer(question_index: usize, is_correct: bool) -> Answer {
        Answer {
            question_index,
            selected_options: vec![0],
            is_correct,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_add_increments_existing_entry() {
        let mut reviews = Vec::new();
        let first = Utc::now();
        let later = first + Duration::seconds(30);

        add_to_review(&mut reviews, "c", 0, first);
        add_to_review(&mut reviews, "c", 1, first);
        add_to_review(&mut reviews, "c", 0, later);

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].error_count, 2);
        assert_eq!(reviews[0].last_error_at, later);
        assert_eq!(reviews[1].error_count, 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut reviews = Vec::new();
        add_to_review(&mut reviews, "c", 0, Utc::now());

        assert!(!remove_from_review(&mut reviews, "c", 5));
        assert!(!remove_from_review(&mut reviews, "other", 0));
        assert_eq!(reviews.len(), 1);
        assert!(remove_from_review(&mut reviews, "c", 0));
        assert!(reviews.is_empty());
    }

    #[test]
    fn test_reconcile_only_touches_run_category() {
        let now = Utc::now();
        let mut reviews = Vec::new();
        add_to_review(&mut reviews, "a", 0, now);
        add_to_review(&mut reviews, "b", 0, now);

        let mut run = Progress::new("a", now);
        run.answers = vec![answer(0, true), answer(1, false)];

        let cleared = reconcile_with_run(&mut reviews, &run);

        assert_eq!(cleared, 1);
        assert_eq!(reviews.len(), 2);
        assert!(reviews.iter().any(|q| q.is_for("b", 0) && q.error_count == 1));
        assert!(reviews.iter().any(|q| q.is_for("a", 1)));
        assert_eq!(count_for_category(&reviews, "a"), 1);
    }

    #[test]
    fn test_reconcile_keeps_existing_miss_count() {
        let now = Utc::now();
        let mut reviews = Vec::new();
        add_to_review(&mut reviews, "a", 1, now);
        add_to_review(&mut reviews, "a", 1, now);

        let mut run = Progress::new("a", now);
        run.answers = vec![answer(1, false)];
        reconcile_with_run(&mut reviews, &run);

        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].error_count, 2);
    }

    #[test]
    fn test_remove_category() {
        let now = Utc::now();
        let mut reviews = Vec::new();
        add_to_review(&mut reviews, "a", 0, now);
        add_to_review(&mut reviews, "a", 2, now);
        add_to_review(&mut reviews, "b", 0, now);

        assert_eq!(remove_category(&mut reviews, "a"), 2);
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].category_id, "b");
    }
}
