#![forbid(unsafe_code)]

pub mod flatfile;
pub mod format;
pub mod repository;

pub use flatfile::FlatFileRepository;
pub use repository::{
    InMemoryRepository, LoadedQuestions, LoadedStudents, QuestionRepository, Storage, StorageError,
    StudentRepository,
};
