use quiz_core::model::Question;
use tracing::{debug, warn};

use super::{FlatFileRepository, open_for_read};
use crate::format::{decode_questions, encode_questions};
use crate::repository::{LoadedQuestions, QuestionRepository, StorageError};

impl QuestionRepository for FlatFileRepository {
    fn load_questions(&self) -> Result<LoadedQuestions, StorageError> {
        let path = self.questions_path();
        let Some(reader) = open_for_read(path)? else {
            debug!(path = %path.display(), "question file missing; starting with an empty bank");
            return Ok(LoadedQuestions::default());
        };

        let decoded = decode_questions(reader);
        if decoded.truncated {
            warn!(
                path = %path.display(),
                line = decoded.lines_read,
                "question file ends mid-record; partial record discarded"
            );
        }
        let interrupted = decoded.read_error.map(|source| {
            warn!(
                path = %path.display(),
                line = decoded.lines_read,
                error = %source,
                "question file read interrupted; keeping records parsed so far"
            );
            StorageError::Read {
                path: path.to_path_buf(),
                source,
            }
        });

        debug!(path = %path.display(), count = decoded.questions.len(), "loaded questions");
        Ok(LoadedQuestions {
            questions: decoded.questions,
            truncated: decoded.truncated,
            interrupted,
        })
    }

    fn save_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        let path = self.questions_path();
        let mut contents = Vec::new();
        encode_questions(&mut contents, questions).map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        self.rewrite(path, &contents).inspect_err(|err| {
            warn!(path = %path.display(), error = %err, "question file rewrite failed");
        })?;
        debug!(path = %path.display(), count = questions.len(), "saved questions");
        Ok(())
    }
}
