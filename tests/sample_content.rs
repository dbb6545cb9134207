use quiz_review::{load_quiz_data, QuestionType};

#[test]
fn sample_questions_are_valid() {
    let data = load_quiz_data(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/questions.json")).unwrap();

    let ids: Vec<&str> = data.categories.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["programming-basics", "rust", "networking"]);

    let copy_question = data.question("rust", 1).unwrap();
    assert_eq!(copy_question.kind, QuestionType::Multiple);
    assert_eq!(copy_question.correct, vec![0, 2]);
    assert!(data.question("rust", 0).unwrap().code.is_some());
}
