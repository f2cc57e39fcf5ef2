//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `quota_core` wiring against a real database file.
//! - Print one day's checklist and the month's active days, read-only apart
//!   from first-run bootstrap and day instantiation.
//!
//! Usage: `quota_cli [DB_PATH] [YYYY-MM-DD]`. The database path falls back to
//! `QUOTA_DB_PATH`, then to `quota.sqlite3` in the working directory.
//! Rolling logs go to `QUOTA_LOG_DIR`, or next to the database file.

use chrono::Local;
use quota_core::db::{open_db, DEFAULT_DB_FILE_NAME};
use quota_core::model::day::{format_day, parse_day};
use quota_core::{core_version, default_log_level, flush_logging, init_logging, SqliteQuotaService};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DB_PATH_ENV: &str = "QUOTA_DB_PATH";
const LOG_DIR_ENV: &str = "QUOTA_LOG_DIR";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let log_dir_override = std::env::var(LOG_DIR_ENV).ok();
    let outcome = run(&args, log_dir_override.as_deref());
    flush_logging();
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("quota_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String], log_dir_override: Option<&str>) -> Result<(), Box<dyn Error>> {
    let db_path = resolve_db_path(args.first());
    let day = match args.get(1) {
        Some(text) => parse_day(text).ok_or_else(|| format!("invalid day `{text}`"))?,
        None => Local::now().date_naive(),
    };

    println!("quota_core version={}", core_version());
    println!("database={}", db_path.display());

    // Logging failures are reported; the checklist still prints.
    match resolve_log_dir(&db_path, log_dir_override) {
        Ok(log_dir) => {
            if let Err(err) = init_logging(default_log_level(), &log_dir.to_string_lossy()) {
                eprintln!("quota_cli logging disabled: {err}");
            } else {
                println!("log_dir={}", log_dir.display());
            }
        }
        Err(err) => eprintln!("quota_cli logging disabled: {err}"),
    }

    let conn = open_db(&db_path)?;
    let service = SqliteQuotaService::from_connection(&conn);
    service.initialize()?;

    let state = service.get_day(day)?;
    let closed_marker = if state.closed { " (closed)" } else { "" };
    println!(
        "day={}{} checked={}/{}",
        format_day(day),
        closed_marker,
        state.checked_count(),
        state.items.len()
    );
    for item in &state.items {
        let checkbox = if item.checked { "[x]" } else { "[ ]" };
        println!(
            "{checkbox} {} (importance {}) id={}",
            item.item_text, item.importance, item.item_id
        );
        if item.checked {
            println!("    evidence: {}", item.evidence);
            if !item.why.is_empty() {
                println!("    why: {}", item.why);
            }
        }
    }

    let active_days = service.get_checked_days_in_month(day)?;
    let rendered: Vec<String> = active_days.iter().map(|d| format_day(*d)).collect();
    println!("active_days={}", rendered.join(","));
    Ok(())
}

fn resolve_db_path(arg: Option<&String>) -> PathBuf {
    if let Some(path) = arg {
        return PathBuf::from(path);
    }
    match std::env::var(DB_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_DB_FILE_NAME),
    }
}

fn resolve_log_dir(db_path: &Path, override_dir: Option<&str>) -> std::io::Result<PathBuf> {
    if let Some(dir) = override_dir.map(str::trim).filter(|dir| !dir.is_empty()) {
        return absolutize(Path::new(dir));
    }
    let db_path = absolutize(db_path)?;
    Ok(db_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| db_path.clone()))
}

fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_db_path, resolve_log_dir, run};
    use std::path::Path;

    #[test]
    fn log_dir_defaults_to_database_parent() {
        let dir = resolve_log_dir(Path::new("/var/lib/quota/quota.sqlite3"), None).unwrap();
        assert_eq!(dir, Path::new("/var/lib/quota"));
    }

    #[test]
    fn log_dir_override_wins_and_blank_override_is_ignored() {
        let db = Path::new("/var/lib/quota/quota.sqlite3");
        assert_eq!(
            resolve_log_dir(db, Some("/tmp/quota-logs")).unwrap(),
            Path::new("/tmp/quota-logs")
        );
        assert_eq!(resolve_log_dir(db, Some("  ")).unwrap(), Path::new("/var/lib/quota"));
    }

    #[test]
    fn relative_database_path_resolves_to_absolute_log_dir() {
        let dir = resolve_log_dir(Path::new("quota.sqlite3"), None).unwrap();
        assert!(dir.is_absolute());
        assert_eq!(dir, std::env::current_dir().unwrap());
    }

    #[test]
    fn explicit_database_argument_wins() {
        let arg = "/tmp/explicit.sqlite3".to_string();
        assert_eq!(resolve_db_path(Some(&arg)), Path::new("/tmp/explicit.sqlite3"));
    }

    #[test]
    fn run_writes_core_events_to_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("quota.sqlite3");
        let args = vec![db_path.to_string_lossy().into_owned(), "2024-01-01".to_string()];

        run(&args, None).unwrap();
        quota_core::flush_logging();

        let mut contents = String::new();
        for entry in std::fs::read_dir(dir.path()).unwrap() {
            let entry = entry.unwrap();
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with("quota") && name.ends_with(".log") {
                contents.push_str(&std::fs::read_to_string(entry.path()).unwrap());
            }
        }
        assert!(contents.contains("event=db_open"));
        assert!(contents.contains("event=quota_init"));
        assert!(contents.contains("event=day_instantiate"));
    }
}
