//! Layered configuration loading using figment.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`QUIZBANK_*`, `__` separating sections)
//! 2. The config file (`--config <path>`, else `./quizbank.toml` when present)
//! 3. Built-in defaults
//!
//! `QUIZBANK_ADMIN__PASSWORD` maps to `admin.password`, `QUIZBANK_QUIZ__PERSIST_SCORES` to
//! `quiz.persist_scores`, and so on.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use services::AdminCredentials;
use storage::FlatFileRepository;
use storage::flatfile::{DEFAULT_QUESTIONS_FILE, DEFAULT_STUDENTS_FILE};
use thiserror::Error;

use crate::cli::Cli;

pub const DEFAULT_CONFIG_FILE: &str = "quizbank.toml";
pub const ENV_PREFIX: &str = "QUIZBANK_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("config file {} does not exist", path.display())]
    MissingFile { path: PathBuf },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub questions_path: PathBuf,
    pub students_path: PathBuf,
    /// Rewrite files through a temp file + rename.
    pub atomic_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            questions_path: PathBuf::from(DEFAULT_QUESTIONS_FILE),
            students_path: PathBuf::from(DEFAULT_STUDENTS_FILE),
            atomic_writes: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QuizConfig {
    /// Add quiz scores to the student's account and rewrite the student file.
    #[serde(default)]
    pub persist_scores: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub admin: AdminCredentials,
    #[serde(default)]
    pub quiz: QuizConfig,
}

impl AppConfig {
    /// Build the provider chain. An explicit `config_file` must exist; the default file is
    /// only merged when present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingFile` if `config_file` is given but absent.
    pub fn figment(config_file: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match config_file {
            Some(path) if !path.exists() => {
                return Err(ConfigError::MissingFile {
                    path: path.to_path_buf(),
                });
            }
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    figment = figment.merge(Toml::file(local));
                }
            }
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a missing explicit file or values that fail to extract.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Ok(Self::figment(config_file)?.extract()?)
    }

    /// [`Self::load`] after reading `.env` from the working directory, if any.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(config_file)
    }

    /// Apply `--questions` / `--students` from the command line.
    #[must_use]
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        if let Some(path) = &cli.questions {
            self.storage.questions_path.clone_from(path);
        }
        if let Some(path) = &cli.students {
            self.storage.students_path.clone_from(path);
        }
        self
    }

    #[must_use]
    pub fn repository(&self) -> FlatFileRepository {
        FlatFileRepository::new(&self.storage.questions_path, &self.storage.students_path)
            .with_atomic_writes(self.storage.atomic_writes)
    }
}
