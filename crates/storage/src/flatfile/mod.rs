use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::repository::{QuestionRepository, Storage, StorageError, StudentRepository};

mod question_repo;
mod student_repo;

pub const DEFAULT_QUESTIONS_FILE: &str = "questions.txt";
pub const DEFAULT_STUDENTS_FILE: &str = "students.txt";

/// Text-file backend: one file for questions, one for students.
///
/// Every operation opens its file, does its work and drops the handle before returning.
#[derive(Debug, Clone)]
pub struct FlatFileRepository {
    questions_path: PathBuf,
    students_path: PathBuf,
    atomic_writes: bool,
}

impl FlatFileRepository {
    /// Files at the given paths, with atomic rewrites enabled.
    #[must_use]
    pub fn new(questions_path: impl Into<PathBuf>, students_path: impl Into<PathBuf>) -> Self {
        Self {
            questions_path: questions_path.into(),
            students_path: students_path.into(),
            atomic_writes: true,
        }
    }

    /// When enabled, full rewrites go through a sibling temp file renamed over the target, so
    /// a failed save leaves the previous file intact. When disabled the target is truncated
    /// and written in place.
    #[must_use]
    pub fn with_atomic_writes(mut self, atomic_writes: bool) -> Self {
        self.atomic_writes = atomic_writes;
        self
    }

    #[must_use]
    pub fn questions_path(&self) -> &Path {
        &self.questions_path
    }

    #[must_use]
    pub fn students_path(&self) -> &Path {
        &self.students_path
    }

    #[must_use]
    pub fn atomic_writes(&self) -> bool {
        self.atomic_writes
    }

    fn rewrite(&self, path: &Path, contents: &[u8]) -> Result<(), StorageError> {
        let result = if self.atomic_writes {
            replace_atomically(path, contents)
        } else {
            replace_in_place(path, contents)
        };
        result.map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for FlatFileRepository {
    fn default() -> Self {
        Self::new(DEFAULT_QUESTIONS_FILE, DEFAULT_STUDENTS_FILE)
    }
}

impl Storage {
    /// Build a `Storage` backed by flat text files.
    #[must_use]
    pub fn flat_file(repo: FlatFileRepository) -> Self {
        let repo = Arc::new(repo);
        let questions: Arc<dyn QuestionRepository> = repo.clone();
        let students: Arc<dyn StudentRepository> = repo;
        Self {
            questions,
            students,
        }
    }
}

/// Opens `path` for reading; `Ok(None)` when it does not exist.
fn open_for_read(path: &Path) -> Result<Option<BufReader<File>>, StorageError> {
    match File::open(path) {
        Ok(file) => Ok(Some(BufReader::new(file))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn replace_in_place(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.flush()
}

fn replace_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn append(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let write = || -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(contents)?;
        file.flush()
    };
    write().map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })
}
