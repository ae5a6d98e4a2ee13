use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for the `quizbank` binary.
#[derive(Debug, Parser)]
#[command(
    name = "quizbank",
    version,
    about = "Quiz bank with flat-file question and student records"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file (defaults to ./quizbank.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Question file, overriding the configured path
    #[arg(long, global = true)]
    pub questions: Option<PathBuf>,

    /// Student file, overriding the configured path
    #[arg(long, global = true)]
    pub students: Option<PathBuf>,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the interactive menu (default)
    Run,
    /// Write a sample question bank if the bank is empty
    Seed,
}

impl Cli {
    #[must_use]
    pub fn action(&self) -> Command {
        self.command.unwrap_or(Command::Run)
    }
}
