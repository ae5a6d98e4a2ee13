mod progress;
mod session;
mod view;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use progress::QuizProgress;
pub use session::{AnswerOutcome, QuizGrade, QuizSession, QuizState};
pub use view::{LabeledChoice, QuestionView, choice_label};
