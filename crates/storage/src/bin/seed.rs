use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rescue_core::Catalog;
use rescue_core::model::{TestResult, TestResultId, UserProgress};
use storage::repository::{ProgressRecord, Storage};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    lessons: usize,
    scenarios: usize,
    passed_tests: u32,
    failed_tests: u32,
    now: Option<DateTime<Utc>>,
    verbose: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidCount { flag: &'static str, raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidCount { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
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

fn parse_count<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<T, ArgsError> {
    let value = require_value(args, flag)?;
    value
        .parse::<T>()
        .map_err(|_| ArgsError::InvalidCount { flag, raw: value })
}

fn env_count<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("RESCUE_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3?mode=rwc".into());
        let mut lessons = env_count("RESCUE_LESSONS", 2_usize);
        let mut scenarios = env_count("RESCUE_SCENARIOS", 1_usize);
        let mut passed_tests = env_count("RESCUE_PASSED_TESTS", 1_u32);
        let mut failed_tests = env_count("RESCUE_FAILED_TESTS", 1_u32);
        let mut now: Option<DateTime<Utc>> = None;
        let mut verbose = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--lessons" => lessons = parse_count(&mut args, "--lessons")?,
                "--scenarios" => scenarios = parse_count(&mut args, "--scenarios")?,
                "--passed-tests" => passed_tests = parse_count(&mut args, "--passed-tests")?,
                "--failed-tests" => failed_tests = parse_count(&mut args, "--failed-tests")?,
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "-v" | "--verbose" => verbose = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            lessons,
            scenarios,
            passed_tests,
            failed_tests,
            now,
            verbose,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3?mode=rwc)");
    eprintln!("  --lessons <n>             Lessons to mark completed in order (default: 2)");
    eprintln!("  --scenarios <n>           Scenarios to mark completed (default: 1)");
    eprintln!("  --passed-tests <n>        Passing test results to append (default: 1)");
    eprintln!("  --failed-tests <n>        Failing test results to append (default: 1)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -v, --verbose             Log at debug level");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!(
        "  RESCUE_DB_URL, RESCUE_LESSONS, RESCUE_SCENARIOS, RESCUE_PASSED_TESTS, RESCUE_FAILED_TESTS"
    );
}

fn init_logging(verbose: bool) -> Result<(), log::SetLoggerError> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Utc::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                message
            ));
        })
        .level(level)
        .level_for("sqlx", log::LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply()
}

/// Demo progress: the first catalog lessons and scenarios plus a test history
/// spaced one day apart, oldest first.
fn build_progress(
    catalog: &Catalog,
    args: &Args,
    now: DateTime<Utc>,
) -> Result<UserProgress, rescue_core::Error> {
    let mut progress = UserProgress::new();
    for lesson in catalog.lessons().iter().take(args.lessons) {
        progress.mark_lesson_completed(lesson.id().clone());
    }
    for scenario in catalog.scenarios().iter().take(args.scenarios) {
        progress.mark_scenario_completed(scenario.id().clone());
    }

    let outcomes = (0..args.failed_tests)
        .map(|_| 6)
        .chain((0..args.passed_tests).map(|_| 9));
    let total_tests = i64::from(args.passed_tests) + i64::from(args.failed_tests);
    for (i, score) in (0_i64..).zip(outcomes) {
        let taken_at = now - Duration::days(total_tests - i);
        let result = TestResult::new(TestResultId::generate(), taken_at, score, 10)?;
        progress.record_test_result(result);
    }
    Ok(progress)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    init_logging(args.verbose)?;

    let catalog = Catalog::builtin().map_err(rescue_core::Error::from)?;
    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);

    let progress = build_progress(&catalog, &args, now)?;
    storage
        .progress
        .save_progress(&ProgressRecord::from_progress(&progress))
        .await?;

    log::info!(
        "seeded {} lessons, {} scenarios and {} test results into {} (level: {})",
        progress.completed_lessons().len(),
        progress.completed_scenarios().len(),
        progress.test_results().len(),
        args.db_url,
        progress.knowledge_level()
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
