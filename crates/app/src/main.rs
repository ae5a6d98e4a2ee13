use std::io;

use anyhow::Context;
use clap::Parser;
use quizbank::{AppConfig, Cli, Command, Console, Menu, MenuSettings, seed};
use services::QuestionService;
use storage::Storage;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("quizbank error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = AppConfig::load_with_dotenv(cli.config.as_deref())
        .context("failed to load quizbank configuration")?
        .with_cli_overrides(&cli);
    info!(
        questions = %config.storage.questions_path.display(),
        students = %config.storage.students_path.display(),
        "configuration loaded"
    );
    let storage = Storage::flat_file(config.repository());

    match cli.action() {
        Command::Run => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            let console = Console::new(stdin.lock(), stdout.lock());
            let mut menu = Menu::open(console, &storage, MenuSettings::from_config(&config))
                .context("failed to write to the console")?;
            menu.run().context("console I/O failed")?;
        }
        Command::Seed => {
            let mut questions = QuestionService::load(storage.questions);
            if let Some(warning) = questions.load_warning() {
                anyhow::bail!("refusing to seed a partially loaded question bank: {warning}");
            }
            let added = seed::seed_questions(&mut questions)
                .context("failed to write the sample question bank")?;
            if added == 0 {
                println!(
                    "Question bank already has {} question(s); nothing seeded.",
                    questions.len()
                );
            } else {
                println!(
                    "Seeded {added} question(s) into {}.",
                    config.storage.questions_path.display()
                );
            }
        }
    }
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("QUIZBANK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
