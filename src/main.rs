//! Class Attendance - roster, daily attendance marking and statistics.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use class_attendance as app;
use tracing_appender::non_blocking::WorkerGuard;

use app::config::{AppConfig, ConfigLoadResult};
use app::dates::{parse_flexible_date, today};
use app::export;
use app::models::{AttendanceStatus, status_label};
use app::report::weekly_grid;
use app::storage::JsonFileBackend;
use app::{AppError, AttendanceStore};

type Store = AttendanceStore<JsonFileBackend>;

/// Classroom attendance roster and statistics.
#[derive(Parser)]
#[command(name = "class-attendance")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Explicit config file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a student to the roster
    Add { name: String },
    /// Remove a student from the roster (history is kept)
    Remove { name: String },
    /// List the roster
    Students,
    /// Record a student's status for a day
    Mark {
        name: String,
        #[arg(value_parser = parse_status)]
        status: AttendanceStatus,
        #[arg(long, value_parser = parse_flexible_date)]
        date: Option<NaiveDate>,
    },
    /// Show a student's status for a day
    Status {
        name: String,
        #[arg(long, value_parser = parse_flexible_date)]
        date: Option<NaiveDate>,
    },
    /// Show status counts and attendance rate for a day
    Tally {
        #[arg(long, value_parser = parse_flexible_date)]
        date: Option<NaiveDate>,
    },
    /// Show tallies for the most recent recorded days
    Report {
        #[arg(long)]
        days: Option<usize>,
    },
    /// Show the roster's statuses over the week ending at a day
    Week {
        #[arg(long, value_parser = parse_flexible_date)]
        date: Option<NaiveDate>,
    },
    /// Export a day report (text) or the rolling report (xlsx)
    Export {
        #[arg(long, value_parser = parse_flexible_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        xlsx: bool,
    },
    /// Print the stored snapshot as JSON
    Snapshot,
    /// Run commands read from stdin against one session
    Shell,
}

/// One line typed in shell mode.
#[derive(Parser)]
#[command(no_binary_name = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

fn parse_status(input: &str) -> Result<AttendanceStatus, String> {
    input.parse()
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = match (&cli.config, cli.dev) {
        (Some(path), _) => path.clone(),
        (None, true) => PathBuf::from("config.toml"),
        (None, false) => AppConfig::default_path(),
    };

    let (config, config_error) = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => (config, None),
        ConfigLoadResult::Missing => (AppConfig::default(), None),
        ConfigLoadResult::Invalid(e) => (AppConfig::default(), Some(e)),
    };

    let _guard = init_logging(&config);
    tracing::info!("Config path: {:?}", config_path);
    if let Some(e) = config_error {
        tracing::warn!("Config invalid, using defaults: {}", e);
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<AppError>() {
            Some(app_err) if app_err.is_user_error() => {
                eprintln!("{app_err}");
                ExitCode::FAILURE
            }
            Some(app_err) if matches!(app_err, AppError::Persistence(_)) => {
                eprintln!("Warning: {app_err}");
                ExitCode::FAILURE
            }
            _ => {
                eprintln!("Error: {e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

/// Initialize logging to stderr, plus a daily log file when configured.
fn init_logging(config: &AppConfig) -> Option<WorkerGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = log_filter(&std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default());
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    match &config.logging.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "class-attendance.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(stderr_layer).init();
            None
        }
    }
}

/// Log filter from `RUST_LOG` directives, `warn` when none are given.
fn log_filter(directives: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .parse_lossy(directives)
}

fn run(command: Command, config: &AppConfig) -> anyhow::Result<()> {
    let backend = JsonFileBackend::new(&config.storage.data_file);
    let mut store = AttendanceStore::open(backend, config.storage.startup);

    match command {
        Command::Shell => run_shell(&mut store, config),
        command => execute(&mut store, command, config),
    }
}

/// Read commands line by line until EOF or `quit`.
///
/// Errors are reported and the session continues with in-memory state.
fn run_shell(store: &mut Store, config: &AppConfig) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            _ => {}
        }

        let command = match ShellLine::try_parse_from(words) {
            Ok(ShellLine { command: Command::Shell }) => {
                println!("Already in shell mode");
                continue;
            }
            Ok(parsed) => parsed.command,
            Err(e) => {
                let _ = e.print();
                continue;
            }
        };

        if let Err(e) = execute(store, command, config) {
            match e.downcast_ref::<AppError>() {
                Some(app_err) if app_err.is_user_error() => println!("{app_err}"),
                Some(app_err) => {
                    tracing::warn!("{app_err}");
                    println!("Warning: {app_err}");
                }
                None => println!("Error: {e:#}"),
            }
        }
    }
    Ok(())
}

fn execute(store: &mut Store, command: Command, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Command::Add { name } => {
            let name = store.add_student(&name)?;
            println!("Added {name}");
        }
        Command::Remove { name } => {
            store.remove_student(&name)?;
            println!("Removed {name}");
        }
        Command::Students => {
            if store.students().is_empty() {
                println!("No students on the roster");
            }
            for (index, name) in store.students().iter().enumerate() {
                println!("{:>3}. {name}", index + 1);
            }
        }
        Command::Mark { name, status, date } => {
            let date = date.unwrap_or_else(today);
            store.set_status(date, &name, status)?;
            println!("{date} {name} - {}", status.label());
        }
        Command::Status { name, date } => {
            let date = date.unwrap_or_else(today);
            println!("{date} {name} - {}", status_label(store.get_status(date, &name)));
        }
        Command::Tally { date } => {
            let date = date.unwrap_or_else(today);
            let tally = store.daily_tally(date);
            println!(
                "{date}  present: {}  late: {}  absent: {}  leave: {}  recorded: {}  rate: {}",
                tally.present,
                tally.late,
                tally.absent,
                tally.leave,
                tally.recorded_total,
                tally.rate_display()
            );
        }
        Command::Report { days } => {
            let rows = store.rolling_report(days.unwrap_or(config.report.rolling_days));
            if rows.is_empty() {
                println!("No attendance recorded yet");
            }
            for row in rows {
                let t = row.tally;
                println!(
                    "{}  ✅:{}  ⚠️:{}  ❌:{}  📝:{}  📈:{}",
                    row.date,
                    t.present,
                    t.late,
                    t.absent,
                    t.leave,
                    t.rate_display()
                );
            }
        }
        Command::Week { date } => {
            let grid = weekly_grid(store, date.unwrap_or_else(today), config.report.weekly_days);
            let header: Vec<String> = grid.dates.iter().map(|d| d.format("%m-%d").to_string()).collect();
            println!("{:<16} {}", "Student", header.join("  "));
            for row in &grid.rows {
                let cells: Vec<&str> = row
                    .statuses
                    .iter()
                    .map(|s| s.map_or("  -  ", short_code))
                    .collect();
                println!("{:<16} {}", row.name, cells.join("  "));
            }
        }
        Command::Export { date, xlsx } => {
            let dir = &config.export.directory;
            let path = if xlsx {
                std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
                let path = dir.join(export::generate_export_filename("attendance_report"));
                let rows = store.rolling_report(config.report.rolling_days);
                export::export_rolling_report_to_excel(&rows, &path)
                    .with_context(|| format!("writing {}", path.display()))?;
                path
            } else {
                export::export_day_report(store, date.unwrap_or_else(today), dir)?
            };
            println!("Exported to {}", path.display());
        }
        Command::Snapshot => {
            println!("{}", store.export_snapshot().to_json()?);
        }
        Command::Shell => {}
    }
    Ok(())
}

/// Fixed-width cell for the weekly grid.
fn short_code(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Present => "  P  ",
        AttendanceStatus::Absent => "  A  ",
        AttendanceStatus::Late => "  L  ",
        AttendanceStatus::Leave => "  V  ",
    }
}
