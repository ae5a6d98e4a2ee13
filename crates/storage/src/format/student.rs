use std::io::{self, BufRead, Write};

use quiz_core::model::StudentAccount;

use super::{DecodeError, next_line};

pub const USERNAME_PREFIX: &str = "Username: ";
pub const PASSWORD_PREFIX: &str = "Password: ";
pub const SCORE_PREFIX: &str = "Score: ";

/// Result of decoding a student file.
#[derive(Debug, Default)]
pub struct DecodedStudents {
    pub students: Vec<StudentAccount>,
    /// Blank-terminated records dropped because the username or password was missing.
    pub incomplete: usize,
    /// Fields were pending at end of input with no closing blank line; that record is lost.
    pub unterminated_tail: bool,
    /// The underlying reader failed; decoding stopped there.
    pub read_error: Option<io::Error>,
    /// Number of lines consumed before decoding stopped.
    pub lines_read: usize,
}


#[derive(Default)]
struct Pending {
    username: Option<String>,
    password: Option<String>,
    score: i32,
}

impl Pending {
    fn has_fields(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }
}

/// Decode blank-line separated student records.
///
/// A blank line closes the pending record; it is kept only if both a username and a password
/// were seen. Unrecognised lines are ignored. A record not followed by a blank line is lost.
/// A read failure stops decoding but keeps every record closed before it.
///
/// # Errors
///
/// Returns `DecodeError::InvalidScore` for a non-integer score; the whole decode fails.
pub fn decode_students<R: BufRead>(reader: R) -> Result<DecodedStudents, DecodeError> {
    let mut lines = reader.lines();
    let mut out = DecodedStudents::default();
    let mut pending = Pending::default();

    loop {
        let line = match next_line(&mut lines, &mut out.lines_read) {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                out.read_error = Some(err);
                break;
            }
        };
        let line_no = out.lines_read;

        if let Some(username) = line.strip_prefix(USERNAME_PREFIX) {
            pending.username = Some(username.to_owned());
        } else if let Some(password) = line.strip_prefix(PASSWORD_PREFIX) {
            pending.password = Some(password.to_owned());
        } else if let Some(raw) = line.strip_prefix(SCORE_PREFIX) {
            pending.score = raw.parse().map_err(|source| DecodeError::InvalidScore {
                line: line_no,
                raw: raw.to_owned(),
                source,
            })?;
        } else if line.is_empty() {
            match std::mem::take(&mut pending) {
                Pending {
                    username: Some(username),
                    password: Some(password),
                    score,
                } => out
                    .students
                    .push(StudentAccount::from_persisted(username, password, score)),
                flushed if flushed.has_fields() => out.incomplete += 1,
                _ => {}
            }
        }
    }

    out.unterminated_tail = out.read_error.is_none() && pending.has_fields();
    Ok(out)
}

/// Encode one student record including its closing blank line.
///
/// # Errors
///
/// Propagates writer failures.
pub fn encode_student<W: Write>(writer: &mut W, student: &StudentAccount) -> io::Result<()> {
    writeln!(writer, "{USERNAME_PREFIX}{}", student.username())?;
    writeln!(writer, "{PASSWORD_PREFIX}{}", student.password())?;
    writeln!(writer, "{SCORE_PREFIX}{}", student.score())?;
    writeln!(writer)
}

/// Encode every student in order.
///
/// # Errors
///
/// Propagates writer failures.
pub fn encode_students<W: Write>(writer: &mut W, students: &[StudentAccount]) -> io::Result<()> {
    students
        .iter()
        .try_for_each(|student| encode_student(writer, student))
}
