use crate::error::RestconfResult;
use core::fmt;
use core::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Ok,
    Warn,
    Error,
}

impl Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            Level::Info => "INFO",
            Level::Ok => "OK",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        };
        write!(f, "{}", level)
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: Level,
    pub message: String,
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] [{}] {}", self.timestamp, self.level, self.message)
    }
}

/// Append-only trail of a loader run, echoed to stdout and appended to the log file
/// line by line.
pub struct RunLog {
    path: PathBuf,
    file: File,
    entries: Vec<LogEntry>,
    echo: bool,
}

impl RunLog {
    pub fn open(path: &Path) -> RestconfResult<RunLog> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(RunLog {
            path: path.to_path_buf(),
            file,
            entries: Vec::new(),
            echo: true,
        })
    }

    /// Stops mirroring entries to stdout; the log file is still written.
    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.level == level && entry.message.contains(needle))
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        self.append(Level::Info, msg.into());
    }

    pub fn ok(&mut self, msg: impl Into<String>) {
        self.append(Level::Ok, msg.into());
    }

    pub fn warn(&mut self, msg: impl Into<String>) {
        self.append(Level::Warn, msg.into());
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.append(Level::Error, msg.into());
    }

    /// Visual separator on the console only.
    pub fn blank_line(&self) {
        if self.echo {
            println!();
        }
    }

    fn append(&mut self, level: Level, message: String) {
        let entry = LogEntry {
            timestamp: timestamp(),
            level,
            message,
        };
        if self.echo {
            println!("{}", entry);
        }
        if let Err(err) = writeln!(self.file, "{}", entry) {
            log::warn!(
                "Could not write to log file '{}': {}",
                self.path.display(),
                err
            );
        }
        self.entries.push(entry);
    }
}

fn timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

pub(crate) fn unix_timestamp() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_entries_are_mirrored_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let mut log = RunLog::open(&path).unwrap();
        log.set_echo(false);
        log.info("Checking RESTCONF connectivity...");
        log.ok("RESTCONF is reachable (HTTP 200)");
        log.error("Cannot proceed");

        let written = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("[INFO] Checking RESTCONF connectivity..."));
        assert!(lines[1].contains("] [OK] RESTCONF is reachable"));
        assert!(lines[2].ends_with("[ERROR] Cannot proceed"));
        assert_eq!(log.entries().len(), 3);
        assert!(log.contains(Level::Ok, "reachable"));
        assert!(!log.contains(Level::Warn, "reachable"));
    }

    #[test]
    fn test_log_file_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        fs::write(&path, "previous run\n").unwrap();

        let mut log = RunLog::open(&path).unwrap();
        log.set_echo(false);
        log.warn("Discarding candidate configuration...");

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("previous run\n"));
        assert!(written.contains("[WARN] Discarding candidate configuration..."));
    }

    #[test]
    fn test_entry_format() {
        let entry = LogEntry {
            timestamp: "2024-05-01 12:00:00".to_string(),
            level: Level::Ok,
            message: "Changes discarded".to_string(),
        };
        assert_eq!(
            entry.to_string(),
            "[2024-05-01 12:00:00] [OK] Changes discarded"
        );
    }
}
