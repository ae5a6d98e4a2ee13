use quiz_core::model::StudentAccount;
use tracing::{debug, warn};

use super::{FlatFileRepository, append, open_for_read};
use crate::format::{decode_students, encode_student, encode_students};
use crate::repository::{LoadedStudents, StorageError, StudentRepository};

impl StudentRepository for FlatFileRepository {
    fn load_students(&self) -> Result<LoadedStudents, StorageError> {
        let path = self.students_path();
        let Some(reader) = open_for_read(path)? else {
            debug!(path = %path.display(), "student file missing; starting with no accounts");
            return Ok(LoadedStudents::default());
        };

        let decoded = decode_students(reader).map_err(|source| StorageError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        if decoded.incomplete > 0 {
            warn!(
                path = %path.display(),
                dropped = decoded.incomplete,
                "skipped student records without username or password"
            );
        }
        if decoded.unterminated_tail {
            warn!(
                path = %path.display(),
                "last student record has no closing blank line; ignored"
            );
        }
        let interrupted = decoded.read_error.map(|source| {
            warn!(
                path = %path.display(),
                line = decoded.lines_read,
                error = %source,
                "student file read interrupted; keeping records parsed so far"
            );
            StorageError::Read {
                path: path.to_path_buf(),
                source,
            }
        });

        debug!(path = %path.display(), count = decoded.students.len(), "loaded students");
        Ok(LoadedStudents {
            students: decoded.students,
            incomplete: decoded.incomplete,
            unterminated_tail: decoded.unterminated_tail,
            interrupted,
        })
    }

    fn append_student(&self, student: &StudentAccount) -> Result<(), StorageError> {
        let path = self.students_path();
        let mut record = Vec::new();
        encode_student(&mut record, student).map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        append(path, &record).inspect_err(|err| {
            warn!(path = %path.display(), error = %err, "student append failed");
        })?;
        debug!(path = %path.display(), username = student.username(), "appended student");
        Ok(())
    }

    fn save_students(&self, students: &[StudentAccount]) -> Result<(), StorageError> {
        let path = self.students_path();
        let mut contents = Vec::new();
        encode_students(&mut contents, students).map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        self.rewrite(path, &contents).inspect_err(|err| {
            warn!(path = %path.display(), error = %err, "student file rewrite failed");
        })?;
        debug!(path = %path.display(), count = students.len(), "saved students");
        Ok(())
    }
}
