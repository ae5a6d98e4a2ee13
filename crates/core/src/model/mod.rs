mod ids;
mod question;
mod student;

pub use ids::QuestionId;

pub use question::{Question, QuestionDraft, QuestionError, QuestionKind, parse_choice_list};
pub use student::{StudentAccount, StudentError, find_by_credentials, position_by_credentials};
