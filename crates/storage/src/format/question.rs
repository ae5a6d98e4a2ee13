use std::io::{self, BufRead, Write};

use quiz_core::model::{Question, QuestionKind};

use super::next_line;

/// Result of decoding a question file.
///
/// Decoding never fails outright: a truncated trailing record is dropped and flagged, and a
/// read failure keeps every record completed before it.
#[derive(Debug, Default)]
pub struct DecodedQuestions {
    pub questions: Vec<Question>,
    /// A record was cut short by end of input and discarded.
    pub truncated: bool,
    /// The underlying reader failed; decoding stopped there.
    pub read_error: Option<io::Error>,
    /// Number of lines consumed, including a partial record.
    pub lines_read: usize,
}

/// Decode question records.
///
/// Records are framed by their tag line: `TrueFalse` is followed by exactly a text and an
/// answer line, `MCQ` by a text line, choice lines up to a blank line (or end of input) and an
/// answer line. Lines found where a tag is expected but that are not one are skipped.
pub fn decode_questions<R: BufRead>(reader: R) -> DecodedQuestions {
    let mut lines = reader.lines();
    let mut out = DecodedQuestions::default();

    loop {
        let tag = match next_line(&mut lines, &mut out.lines_read) {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                out.read_error = Some(err);
                break;
            }
        };
        let Some(kind) = QuestionKind::from_tag(&tag) else {
            continue;
        };

        match read_body(kind, &mut lines, &mut out.lines_read) {
            Ok(Some(question)) => out.questions.push(question),
            Ok(None) => {
                out.truncated = true;
                break;
            }
            Err(err) => {
                out.read_error = Some(err);
                break;
            }
        }
    }

    out
}

/// Reads the lines after a tag. `Ok(None)` means input ended before the answer line.
fn read_body<I>(kind: QuestionKind, lines: &mut I, line_no: &mut usize) -> io::Result<Option<Question>>
where
    I: Iterator<Item = io::Result<String>>,
{
    let Some(text) = next_line(lines, line_no)? else {
        return Ok(None);
    };

    match kind {
        QuestionKind::TrueFalse => {
            let Some(answer) = next_line(lines, line_no)? else {
                return Ok(None);
            };
            Ok(Some(Question::true_false(text, answer)))
        }
        QuestionKind::MultipleChoice => {
            let mut choices = Vec::new();
            while let Some(choice) = next_line(lines, line_no)? {
                if choice.is_empty() {
                    break;
                }
                choices.push(choice);
            }
            let Some(answer) = next_line(lines, line_no)? else {
                return Ok(None);
            };
            Ok(Some(Question::multiple_choice(text, choices, answer)))
        }
    }
}

/// Encode one question record.
///
/// Multiple choice records always close their choice block with a blank line, so
/// consecutive `MCQ` records (and ones without choices) decode back unchanged.
///
/// # Errors
///
/// Propagates writer failures.
pub fn encode_question<W: Write>(writer: &mut W, question: &Question) -> io::Result<()> {
    writeln!(writer, "{}", question.kind().tag())?;
    writeln!(writer, "{}", question.text())?;
    if let Some(choices) = question.choices() {
        for choice in choices {
            writeln!(writer, "{choice}")?;
        }
        writeln!(writer)?;
    }
    writeln!(writer, "{}", question.answer())
}

/// Encode every question in order, with no separator between records.
///
/// # Errors
///
/// Propagates writer failures.
pub fn encode_questions<W: Write>(writer: &mut W, questions: &[Question]) -> io::Result<()> {
    questions
        .iter()
        .try_for_each(|question| encode_question(writer, question))
}
