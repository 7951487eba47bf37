use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use sanderson_core::model::MAX_QUIZ_LENGTH;
use services::{AppServices, Clock, DEFAULT_TRANSCRIPT_FILE};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownCommand(String),
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidThreshold { raw: String },
    InvalidQuestionCount { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidThreshold { raw } => {
                write!(f, "invalid --pass-threshold value (0-100): {raw}")
            }
            ArgsError::InvalidQuestionCount { raw } => {
                write!(f, "invalid --questions value (1-{MAX_QUIZ_LENGTH}): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    db_url: String,
    pass_threshold: Option<u8>,
    questions: Option<u8>,
    transcript: PathBuf,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui      [--db <sqlite_url>] [--pass-threshold <0-100>]");
    eprintln!("                              [--questions <n>] [--transcript <path>]");
    eprintln!("  cargo run -p app -- history [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults for ui:");
    eprintln!("  --db sqlite:sanderson.sqlite3");
    eprintln!("  --transcript {DEFAULT_TRANSCRIPT_FILE}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SANDERSON_DB_URL, SANDERSON_AI_API_KEY, SANDERSON_AI_BASE_URL,");
    eprintln!("  SANDERSON_AI_MODEL, SANDERSON_AI_IMAGE_MODEL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    History,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "history" => Some(Self::History),
            _ => None,
        }
    }
}

/// Pops the subcommand off `argv`. `None` means help was requested.
fn parse_command(argv: &mut Vec<String>) -> Result<Option<Command>, ArgsError> {
    match argv.first().map(String::as_str) {
        None => Ok(Some(Command::Ui)),
        Some("--help" | "-h") => Ok(None),
        Some(first) if first.starts_with("--") => Ok(Some(Command::Ui)),
        Some(first) => {
            let cmd = Command::from_arg(first)
                .ok_or_else(|| ArgsError::UnknownCommand(first.to_string()))?;
            argv.remove(0);
            Ok(Some(cmd))
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("SANDERSON_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://sanderson.sqlite3".into(), normalize_sqlite_url);
        let mut pass_threshold = None;
        let mut questions = None;
        let mut transcript = PathBuf::from(DEFAULT_TRANSCRIPT_FILE);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--pass-threshold" => {
                    let value = require_value(args, "--pass-threshold")?;
                    let parsed = value
                        .trim()
                        .parse::<u8>()
                        .ok()
                        .filter(|percent| *percent <= 100)
                        .ok_or_else(|| ArgsError::InvalidThreshold { raw: value.clone() })?;
                    pass_threshold = Some(parsed);
                }
                "--questions" => {
                    let value = require_value(args, "--questions")?;
                    let parsed = value
                        .trim()
                        .parse::<u8>()
                        .ok()
                        .filter(|count| (1..=MAX_QUIZ_LENGTH).contains(count))
                        .ok_or_else(|| ArgsError::InvalidQuestionCount { raw: value.clone() })?;
                    questions = Some(parsed);
                }
                "--transcript" => {
                    transcript = PathBuf::from(require_value(args, "--transcript")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            pass_threshold,
            questions,
            transcript,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// Apply command-line overrides on top of the stored settings for this run.
fn apply_overrides(
    services: AppServices,
    args: &Args,
) -> Result<AppServices, Box<dyn std::error::Error>> {
    if args.pass_threshold.is_none() && args.questions.is_none() {
        return Ok(services);
    }
    let mut draft = services.settings().to_draft();
    if args.pass_threshold.is_some() {
        draft.pass_threshold = args.pass_threshold;
    }
    if args.questions.is_some() {
        draft.quiz_length = args.questions;
    }
    let settings = draft.validate()?;
    Ok(services.with_settings(settings))
}

async fn print_history(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let items = services.quiz_history().list_recent(50).await?;
    if items.is_empty() {
        println!("No quizzes taken yet.");
        return Ok(());
    }
    for item in items {
        println!(
            "#{:<4} {}  {:<6} {}/{} ({}%)  {}",
            item.id,
            item.completed_at.format("%Y-%m-%d %H:%M"),
            item.difficulty,
            item.score,
            item.total_questions,
            item.percent,
            if item.passed { "passed" } else { "not passed" }
        );
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let Some(cmd) = parse_command(&mut argv).inspect_err(|_| print_usage())? else {
        print_usage();
        return Ok(());
    };
    let parsed = Args::parse(&mut argv.into_iter()).inspect_err(|_| print_usage())?;

    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::default()).await?;
    let services = apply_overrides(services, &parsed)?;

    match cmd {
        Command::Ui => {
            info!(db = %parsed.db_url, "launching desktop app");
            let app: Arc<dyn UiApp> = Arc::new(services);
            let context = build_app_context(&app, parsed.transcript);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Sanderson AI Learning")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::History => print_history(&services).await,
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
