use chrono::Utc;
use quiz_review::{
    check_answer, Answer, AnswerSubmission, JsonFileStorage, MemoryStorage, Progress,
    QuizStateManager, StateStorage, Store,
};

fn manager() -> QuizStateManager<MemoryStorage> {
    QuizStateManager::new(MemoryStorage::new()).unwrap()
}

fn submission<'a>(
    category_id: &'a str,
    question_index: usize,
    selected_options: &'a [usize],
    correct_options: &'a [usize],
) -> AnswerSubmission<'a> {
    AnswerSubmission {
        category_id,
        question_index,
        selected_options,
        correct_options,
    }
}

fn answer<S: StateStorage>(
    m: &mut QuizStateManager<S>,
    category_id: &str,
    question_index: usize,
    selected: &[usize],
    correct: &[usize],
) -> Answer {
    m.submit_answer(submission(category_id, question_index, selected, correct))
        .unwrap()
}

/// Manager whose saved state holds a run with `answers` and pointer `index`.
fn manager_with_run(answers: usize, index: usize) -> QuizStateManager<MemoryStorage> {
    let now = Utc::now();
    let mut progress = Progress::new("c", now);
    progress.current_question_index = index;
    progress.answers = (0..answers)
        .map(|i| Answer {
            question_index: i,
            selected_options: vec![0],
            is_correct: true,
            timestamp: now,
        })
        .collect();

    let mut store = Store::default();
    store.progress.insert("c".to_string(), progress);
    QuizStateManager::new(MemoryStorage::with_store(&store).unwrap()).unwrap()
}

/// Scenario B: two questions, second one missed, run finished.
fn scenario_b() -> QuizStateManager<MemoryStorage> {
    let mut m = manager();
    m.start_quiz("c", 2).unwrap();
    answer(&mut m, "c", 0, &[0], &[0]);
    m.next_question("c", 2).unwrap();
    answer(&mut m, "c", 1, &[0], &[1]);
    m.next_question("c", 2).unwrap();
    m
}

#[test]
fn resume_moves_pointer_up_to_answer_count() {
    for total in 2..6 {
        for answers in 1..total {
            for index in 0..answers {
                let mut m = manager_with_run(answers, index);
                let progress = m.start_quiz("c", total).unwrap();
                assert_eq!(progress.current_question_index, answers);
                assert_eq!(progress.answers.len(), answers);
            }
        }
    }
}

#[test]
fn resume_never_lowers_pointer() {
    let mut m = manager_with_run(1, 3);
    let progress = m.start_quiz("c", 5).unwrap();
    assert_eq!(progress.current_question_index, 3);
}

#[test]
fn completed_run_is_retaken_from_scratch() {
    // Completion stamp, full answer log and pointer past the end all count.
    let mut stamped = scenario_b();
    let mut full_log = manager_with_run(3, 1);
    let mut past_end = manager_with_run(0, 3);

    for (m, total) in [(&mut stamped, 2), (&mut full_log, 3), (&mut past_end, 3)] {
        let progress = m.start_quiz("c", total).unwrap();
        assert_eq!(progress.current_question_index, 0);
        assert!(progress.answers.is_empty());
        assert!(progress.completed_at.is_none());
        assert_eq!(m.get_category_progress("c"), Some(&progress));
    }
}

#[test]
fn evaluator_is_symmetric_and_reflexive() {
    let sets: [&[usize]; 6] = [&[], &[0], &[1], &[0, 1], &[1, 0], &[0, 1, 2]];
    for a in sets {
        assert!(check_answer(a, a));
        for b in sets {
            assert_eq!(check_answer(a, b), check_answer(b, a));
        }
    }
}

#[test]
fn repeated_misses_accumulate_in_one_entry() {
    for misses in 1..5u32 {
        let mut m = manager();
        m.start_quiz("c", 10).unwrap();
        for _ in 0..misses {
            answer(&mut m, "c", 3, &[0], &[1]);
        }

        let reviews = m.get_review_questions();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].category_id, "c");
        assert_eq!(reviews[0].question_index, 3);
        assert_eq!(reviews[0].error_count, misses);
    }
}

#[test]
fn review_answers_never_touch_progress() {
    // Every sequence of four correct/incorrect review submissions.
    for pattern in 0..16u32 {
        let mut m = scenario_b();
        let answers_before = m.get_category_progress("c").unwrap().answers.clone();
        let accuracy_before = m.calculate_accuracy("c");

        for step in 0..4 {
            let selected: &[usize] = if pattern & (1 << step) != 0 { &[1] } else { &[0] };
            m.submit_review_answer(submission("c", 1, selected, &[1]))
                .unwrap();

            assert_eq!(m.get_category_progress("c").unwrap().answers, answers_before);
            assert_eq!(m.calculate_accuracy("c"), accuracy_before);
        }
    }
}

#[test]
fn review_answers_clear_or_bump_entries() {
    let mut m = scenario_b();

    let missed = m
        .submit_review_answer(submission("c", 1, &[0], &[1]))
        .unwrap();
    assert!(!missed.is_correct);
    assert_eq!(m.get_review_questions()[0].error_count, 2);

    let cleared = m
        .submit_review_answer(submission("c", 1, &[1], &[1]))
        .unwrap();
    assert!(cleared.is_correct);
    assert!(m.get_review_questions().is_empty());
}

#[test]
fn completion_reconciliation_leaves_other_categories_alone() {
    let mut m = manager();
    for category in ["a", "b", "c"] {
        m.start_quiz(category, 2).unwrap();
        answer(&mut m, category, 0, &[0], &[1]);
        answer(&mut m, category, 1, &[0], &[1]);
    }
    answer(&mut m, "b", 1, &[0], &[1]);
    let others_before: Vec<_> = m
        .get_review_questions()
        .iter()
        .filter(|q| q.category_id != "a")
        .cloned()
        .collect();

    m.start_quiz("a", 2).unwrap();
    answer(&mut m, "a", 0, &[1], &[1]);
    answer(&mut m, "a", 1, &[1], &[1]);
    m.update_review_list_on_completion("a").unwrap();

    let others_after: Vec<_> = m
        .get_review_questions()
        .iter()
        .filter(|q| q.category_id != "a")
        .cloned()
        .collect();
    assert_eq!(others_before, others_after);
    assert_eq!(m.review_count("a"), 0);
}

#[test]
fn marking_absent_review_complete_is_noop() {
    let mut m = scenario_b();
    let before = m.get_review_questions().to_vec();

    m.mark_review_complete("c", 0).unwrap();
    m.mark_review_complete("other", 1).unwrap();
    assert_eq!(m.get_review_questions(), before.as_slice());

    m.mark_review_complete("c", 1).unwrap();
    m.mark_review_complete("c", 1).unwrap();
    assert!(m.get_review_questions().is_empty());
}

#[test]
fn scenario_a_all_correct() {
    let mut m = manager();
    m.start_quiz("c", 2).unwrap();
    assert!(answer(&mut m, "c", 0, &[0], &[0]).is_correct);
    m.next_question("c", 2).unwrap();
    assert!(answer(&mut m, "c", 1, &[1], &[1]).is_correct);
    m.next_question("c", 2).unwrap();

    assert!(m.get_category_progress("c").unwrap().completed_at.is_some());
    assert_eq!(m.calculate_accuracy("c"), 100.0);
}

#[test]
fn scenario_b_one_miss() {
    let m = scenario_b();

    assert_eq!(m.calculate_accuracy("c"), 50.0);
    let reviews = m.get_review_questions();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].category_id, "c");
    assert_eq!(reviews[0].question_index, 1);
    assert_eq!(reviews[0].error_count, 1);
}

#[test]
fn scenario_c_retake_heals_review_list() {
    let mut m = scenario_b();

    let retake = m.start_quiz("c", 2).unwrap();
    assert!(retake.answers.is_empty());
    assert_eq!(m.get_review_questions().len(), 1);

    answer(&mut m, "c", 0, &[0], &[0]);
    answer(&mut m, "c", 1, &[1], &[1]);
    m.update_review_list_on_completion("c").unwrap();

    assert!(m.get_review_questions().is_empty());
}

#[test]
fn scenario_d_retake_one_of_two_categories() {
    let mut m = manager();
    for category in ["c1", "c2"] {
        m.start_quiz(category, 1).unwrap();
        answer(&mut m, category, 0, &[0], &[1]);
        m.next_question(category, 1).unwrap();
    }
    assert_eq!(m.get_review_questions().len(), 2);

    m.start_quiz("c1", 1).unwrap();
    answer(&mut m, "c1", 0, &[1], &[1]);
    m.next_question("c1", 1).unwrap();
    m.update_review_list_on_completion("c1").unwrap();

    let reviews = m.get_review_questions();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].category_id, "c2");
}

#[test]
fn new_miss_in_retake_replaces_old_one() {
    let mut m = manager();
    m.start_quiz("science", 2).unwrap();
    answer(&mut m, "science", 0, &[0], &[1]);
    answer(&mut m, "science", 1, &[2], &[2]);

    m.start_quiz("science", 2).unwrap();
    answer(&mut m, "science", 0, &[1], &[1]);
    answer(&mut m, "science", 1, &[0], &[2]);
    m.update_review_list_on_completion("science").unwrap();

    let reviews = m.get_review_questions();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].question_index, 1);
}

#[test]
fn every_mutation_is_written_through() {
    let storage = MemoryStorage::new();
    let mut m = QuizStateManager::new(storage.clone()).unwrap();

    m.start_quiz("c", 2).unwrap();
    assert_eq!(storage.save_count(), 1);
    answer(&mut m, "c", 0, &[0], &[1]);
    assert_eq!(storage.save_count(), 2);
    m.next_question("c", 2).unwrap();
    assert_eq!(storage.save_count(), 3);
    m.submit_review_answer(submission("c", 0, &[1], &[1]))
        .unwrap();
    assert_eq!(storage.save_count(), 4);
    m.reset_category_progress("c").unwrap();
    assert_eq!(storage.save_count(), 5);

    assert_eq!(storage.load().unwrap().as_ref(), Some(m.store()));
}

#[test]
fn progress_survives_restart_from_file() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut m = QuizStateManager::new(JsonFileStorage::in_dir(dir.path())).unwrap();
        m.start_quiz("c", 3).unwrap();
        answer(&mut m, "c", 0, &[2, 0], &[0, 2]);
        m.next_question("c", 3).unwrap();
        answer(&mut m, "c", 1, &[1], &[0]);
    }

    let mut m = QuizStateManager::new(JsonFileStorage::in_dir(dir.path())).unwrap();
    let progress = m.get_category_progress("c").unwrap();
    assert_eq!(progress.answers.len(), 2);
    assert_eq!(progress.answers[0].selected_options, vec![2, 0]);
    assert_eq!(m.get_review_questions().len(), 1);

    let resumed = m.start_quiz("c", 3).unwrap();
    assert_eq!(resumed.current_question_index, 2);
}

#[test]
fn clear_all_resets_everything() {
    let dir = tempfile::tempdir().unwrap();
    let mut m = QuizStateManager::new(JsonFileStorage::in_dir(dir.path())).unwrap();
    m.start_quiz("c", 2).unwrap();
    answer(&mut m, "c", 0, &[0], &[1]);

    m.clear_all().unwrap();
    assert!(!m.storage().path().exists());

    let reloaded = QuizStateManager::new(JsonFileStorage::in_dir(dir.path())).unwrap();
    assert_eq!(reloaded.store(), &Store::default());
}
