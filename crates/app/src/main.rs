use std::fmt;
use std::io::Read;

use mastery_core::model::{ExerciseContext, ExerciseId, MasteryModel};
use services::{Clock, ExerciseProgress, MasterySnapshot, MasteryTracker};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFlag { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidModel { raw: String },
    InvalidOutcome { raw: char },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { flag } => write!(f, "{flag} is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidModel { raw } => {
                write!(f, "invalid --model value: {raw} (expected <m>/<n>)")
            }
            ArgsError::InvalidOutcome { raw } => {
                write!(f, "invalid attempt outcome: {raw} (expected 1/0 or y/n)")
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  mastery eval   [--file <path>] [--log-level <filter>]");
    eprintln!("  mastery replay --model <m>/<n> --attempts <seq> [--log-level <filter>]");
    eprintln!();
    eprintln!("eval reads a session snapshot (JSON) from --file or stdin.");
    eprintln!("replay takes outcomes as 1/0 or y/n, e.g. --attempts 0110.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MASTERY_LOG (default: info)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Eval,
    Replay,
}

impl Command {
    fn from_arg(arg: &str) -> Result<Self, ArgsError> {
        match arg {
            "eval" => Ok(Self::Eval),
            "replay" => Ok(Self::Replay),
            other => Err(ArgsError::UnknownCommand(other.to_string())),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    file: Option<String>,
    model: Option<MasteryModel>,
    attempts: Option<Vec<bool>>,
    log_level: Option<String>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--file" => parsed.file = Some(require_value(args, "--file")?),
                "--model" => {
                    let value = require_value(args, "--model")?;
                    parsed.model = Some(parse_model(&value)?);
                }
                "--attempts" => {
                    let value = require_value(args, "--attempts")?;
                    parsed.attempts = Some(parse_outcomes(&value)?);
                }
                "--log-level" => parsed.log_level = Some(require_value(args, "--log-level")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn parse_model(raw: &str) -> Result<MasteryModel, ArgsError> {
    let invalid = || ArgsError::InvalidModel {
        raw: raw.to_string(),
    };
    let (m, n) = raw.split_once('/').ok_or_else(invalid)?;
    let m: u32 = m.trim().parse().map_err(|_| invalid())?;
    let n: u32 = n.trim().parse().map_err(|_| invalid())?;
    MasteryModel::m_of_n(m, n).map_err(|_| invalid())
}

fn parse_outcomes(raw: &str) -> Result<Vec<bool>, ArgsError> {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| match c {
            '1' | 'y' | 'Y' => Ok(true),
            '0' | 'n' | 'N' => Ok(false),
            other => Err(ArgsError::InvalidOutcome { raw: other }),
        })
        .collect()
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_env("MASTERY_LOG").ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn read_snapshot(file: Option<&str>) -> Result<String, std::io::Error> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_progress(label: &str, view: &ExerciseProgress) {
    println!(
        "{label}: {} ({}/{} correct, {} attempts){}",
        view.progress,
        view.correct.min(view.required),
        view.required,
        view.total_attempts,
        if view.is_mastered { " mastered" } else { "" }
    );
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next() {
        None => {
            print_usage();
            return Ok(());
        }
        Some(first) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).inspect_err(|_| print_usage())?,
    };

    let parsed = Args::parse(&mut argv).inspect_err(|_| print_usage())?;

    init_tracing(parsed.log_level.as_deref());

    match cmd {
        Command::Eval => {
            let json = read_snapshot(parsed.file.as_deref())?;
            let snapshot = MasterySnapshot::from_json(&json)?;
            if snapshot.malformed_records() > 0 {
                tracing::info!(
                    malformed = snapshot.malformed_records(),
                    "snapshot contained unreadable attempt records"
                );
            }
            if snapshot.model.is_none() {
                println!(
                    "no mastery model: {} ({} attempts)",
                    snapshot.progress(),
                    snapshot.state.total_attempts()
                );
                return Ok(());
            }
            let tracker = MasteryTracker::from_snapshot(Clock::default(), snapshot)?;
            print_progress(&tracker.model().to_string(), &tracker.progress());
            Ok(())
        }
        Command::Replay => {
            let model = parsed.model.ok_or(ArgsError::MissingFlag { flag: "--model" })?;
            let attempts = parsed
                .attempts
                .ok_or(ArgsError::MissingFlag { flag: "--attempts" })?;

            let context = ExerciseContext::new(ExerciseId::random());
            let mut tracker = MasteryTracker::new(Clock::default(), context, model);
            print_progress("start", &tracker.progress());
            for (index, correct) in attempts.into_iter().enumerate() {
                let view = tracker.record_attempt(correct);
                let mark = if correct { "correct" } else { "incorrect" };
                print_progress(&format!("#{} {mark}", index + 1), &view);
            }
            Ok(())
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
