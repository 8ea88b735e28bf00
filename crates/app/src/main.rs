//! vocab-quiz: audio-first vocabulary quiz in the terminal.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use clap::parser::ValueSource;
use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use quiz_services::{QuizConfig, QuizController};

use crate::audio::TerminalCue;
use crate::terminal::QuizTerminal;

mod audio;
mod terminal;
mod vm;

const DEFAULT_LOG_FILTER: &str = "vocab_quiz=warn,quiz_services=warn";

#[derive(Parser)]
#[command(name = "vocab-quiz", version, about = "Audio-first vocabulary quiz")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a quiz from a Google Sheet or a spreadsheet file
    Play(PlayArgs),
}

#[derive(Args)]
struct PlayArgs {
    /// Published Google Sheet URL to start with
    #[arg(long, env = "QUIZ_SHEET_URL")]
    url: Option<String>,

    /// Spreadsheet file (xlsx, xls, ods) to start with
    #[arg(long, env = "QUIZ_FILE")]
    file: Option<PathBuf>,

    /// Where "Download Updated File" writes the workbook
    #[arg(long, env = "QUIZ_EXPORT_PATH")]
    export: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Host serving the sheet CSV export
    #[arg(long, env = "QUIZ_EXPORT_BASE_URL")]
    export_base_url: Option<String>,

    /// Pause after a correct answer, in milliseconds
    #[arg(long, env = "QUIZ_CORRECT_DELAY_MS")]
    correct_delay_ms: Option<u64>,

    /// Pause after an incorrect answer, in milliseconds
    #[arg(long, env = "QUIZ_INCORRECT_DELAY_MS")]
    incorrect_delay_ms: Option<u64>,
}

impl PlayArgs {
    /// Config file (or defaults) with command-line overrides applied.
    fn quiz_config(&self) -> Result<QuizConfig> {
        let mut config = match &self.config {
            Some(path) => QuizConfig::from_path(path)
                .with_context(|| format!("could not load config {}", path.display()))?,
            None => QuizConfig::default(),
        };

        if let Some(base_url) = &self.export_base_url {
            config.export_base_url.clone_from(base_url);
        }
        if let Some(ms) = self.correct_delay_ms {
            config.reveal.correct_ms = ms;
        }
        if let Some(ms) = self.incorrect_delay_ms {
            config.reveal.incorrect_ms = ms;
        }
        Ok(config)
    }

    /// Word list to load before the first prompt. `matches` are the `play`
    /// subcommand's matches, used to tell typed flags from environment values.
    fn start_source(&self, matches: Option<&ArgMatches>) -> Result<Option<StartSource>> {
        let typed = |id: &str| {
            matches.is_some_and(|m| m.value_source(id) == Some(ValueSource::CommandLine))
        };
        pick_start(
            self.url.clone().map(|url| (url, typed("url"))),
            self.file.clone().map(|file| (file, typed("file"))),
        )
    }
}

#[derive(Debug, PartialEq, Eq)]
enum StartSource {
    Sheet(String),
    File(PathBuf),
}

/// Choose between a sheet URL and a file, each paired with whether it was
/// typed on the command line. A typed value wins over one from the environment.
fn pick_start(
    url: Option<(String, bool)>,
    file: Option<(PathBuf, bool)>,
) -> Result<Option<StartSource>> {
    match (url, file) {
        (None, None) => Ok(None),
        (Some((url, _)), None) | (Some((url, true)), Some((_, false))) => {
            Ok(Some(StartSource::Sheet(url)))
        }
        (None, Some((file, _))) | (Some((_, false)), Some((file, true))) => {
            Ok(Some(StartSource::File(file)))
        }
        (Some((_, true)), Some((_, true))) => bail!("--url and --file cannot be used together"),
        (Some((_, false)), Some((_, false))) => {
            bail!("QUIZ_SHEET_URL and QUIZ_FILE are both set; pass --url or --file to choose")
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let result = match cli.command {
        Commands::Play(args) => play(args, matches.subcommand_matches("play")).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn play(args: PlayArgs, matches: Option<&ArgMatches>) -> Result<()> {
    let config = args.quiz_config()?;
    let start = args.start_source(matches)?;
    let export_path = args
        .export
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.export.file_name));

    let mut quiz = QuizController::new(&config);
    let mut terminal = QuizTerminal::new(
        BufReader::new(tokio::io::stdin()),
        std::io::stdout(),
        TerminalCue,
        config.reveal,
        export_path,
    );

    match start {
        Some(StartSource::Sheet(url)) => terminal.load(&mut quiz, &url).await?,
        Some(StartSource::File(file)) => terminal.load_file(&mut quiz, &file).await?,
        None => {}
    }

    terminal.run(&mut quiz).await
}
