use quiz_core::model::Question;
use services::{QuestionService, QuestionServiceError};
use tracing::info;

fn sample_bank() -> Vec<Question> {
    vec![
        Question::multiple_choice(
            "2+2=?",
            vec!["3".to_owned(), "4".to_owned(), "5".to_owned()],
            "4",
        ),
        Question::true_false("Sky is blue", "True"),
        Question::multiple_choice(
            "Which planet is known as the Red Planet?",
            vec!["Venus".to_owned(), "Mars".to_owned(), "Jupiter".to_owned()],
            "Mars",
        ),
        Question::true_false("Rust has a garbage collector", "False"),
    ]
}

/// Fill an empty bank with a few sample questions. Returns how many were added.
///
/// A bank that already holds questions is left untouched.
///
/// # Errors
///
/// Returns `QuestionServiceError::Storage` if the rewrite fails.
pub fn seed_questions(service: &mut QuestionService) -> Result<usize, QuestionServiceError> {
    if !service.is_empty() {
        info!(existing = service.len(), "question bank not empty; skipping seed");
        return Ok(0);
    }

    let bank = sample_bank();
    let count = bank.len();
    for question in bank {
        service.add(question)?;
    }
    info!(count, "seeded question bank");
    Ok(count)
}
