//! Line-oriented record format for `questions.txt` and `students.txt`.
//!
//! Pure encode/decode over `BufRead` / `Write`; no file handling lives here.

mod question;
mod student;

use std::io;
use std::num::ParseIntError;

use thiserror::Error;

pub use question::{DecodedQuestions, decode_questions, encode_question, encode_questions};
pub use student::{
    DecodedStudents, PASSWORD_PREFIX, SCORE_PREFIX, USERNAME_PREFIX, decode_students,
    encode_student, encode_students,
};

/// Fatal decode failures. Line numbers are 1-based.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("line {line}: score {raw:?} is not an integer")]
    InvalidScore {
        line: usize,
        raw: String,
        #[source]
        source: ParseIntError,
    },
}

/// Pulls the next line, counting lines read so far.
fn next_line<I>(lines: &mut I, line_no: &mut usize) -> io::Result<Option<String>>
where
    I: Iterator<Item = io::Result<String>>,
{
    let next = lines.next().transpose()?;
    if next.is_some() {
        *line_no += 1;
    }
    Ok(next)
}
