use crate::error::{Result, RunlogError};
use crate::logs::{LINE_TIMESTAMP_FORMAT, RUN_DIR_FORMAT};
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

/// Length of a `YYYY/MM/DD HH:MM:SS` line prefix
const TIMESTAMP_LEN: usize = 19;

/// One line read back from a log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// When the line was written
    pub timestamp: Option<NaiveDateTime>,
    /// `file:line` of the logging call
    pub location: Option<String>,
    /// The message, indentation included
    pub message: String,
}

impl LogEntry {
    /// Parse a log line into a LogEntry
    ///
    /// Lines that do not start with a timestamp (continuation lines of
    /// multi-line messages) are kept whole as the message.
    pub fn parse(line: &str) -> Self {
        let parsed = line.get(..TIMESTAMP_LEN).and_then(|prefix| {
            NaiveDateTime::parse_from_str(prefix, LINE_TIMESTAMP_FORMAT).ok()
        });

        let (timestamp, rest) = match (parsed, line.get(TIMESTAMP_LEN..)) {
            (Some(ts), Some(rest)) if rest.starts_with(' ') => (ts, &rest[1..]),
            _ => {
                return Self {
                    timestamp: None,
                    location: None,
                    message: line.to_string(),
                }
            }
        };

        // `file.rs:LINE: message`
        match rest.split_once(": ") {
            Some((location, message)) if location.contains(':') => Self {
                timestamp: Some(timestamp),
                location: Some(location.to_string()),
                message: message.to_string(),
            },
            _ => Self {
                timestamp: Some(timestamp),
                location: None,
                message: rest.to_string(),
            },
        }
    }

    /// Number of leading `unit` repetitions in the message
    pub fn indent_level(&self, unit: &str) -> usize {
        if unit.is_empty() {
            return 0;
        }

        let mut level = 0;
        let mut rest = self.message.as_str();
        while let Some(stripped) = rest.strip_prefix(unit) {
            level += 1;
            rest = stripped;
        }
        level
    }

    /// Format the log entry for display
    pub fn format(&self) -> String {
        match (&self.timestamp, &self.location) {
            (Some(ts), Some(location)) => format!(
                "{} {} {}",
                ts.format(LINE_TIMESTAMP_FORMAT),
                location,
                self.message
            ),
            (Some(ts), None) => format!("{} {}", ts.format(LINE_TIMESTAMP_FORMAT), self.message),
            _ => self.message.clone(),
        }
    }
}

/// Summary of one run folder
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Folder name, e.g. `2024-03-09_14-05-07`
    pub stamp: String,
    pub started_at: NaiveDateTime,
    pub dir: PathBuf,
    /// Logger names with a file in the run, sorted
    pub loggers: Vec<String>,
    /// Total size of the run's log files
    pub bytes: u64,
}

/// Read every entry of a log file
pub fn read_entries(file_path: &Path) -> Result<Vec<LogEntry>> {
    let content = fs::read_to_string(file_path).map_err(|e| {
        RunlogError::LogReadError(format!(
            "Failed to open log file {}: {}",
            file_path.display(),
            e
        ))
    })?;

    Ok(content.lines().map(LogEntry::parse).collect())
}

/// Read the last N lines from a log file
///
/// # Arguments
/// * `file_path` - Path to the log file
/// * `lines` - Number of lines to read from the end
/// * `filter` - Optional substring a line must contain
///
/// # Returns
/// * `Ok(Vec<LogEntry>)` - Successfully read log entries, oldest first
/// * `Err(RunlogError)` - Failed to read log file
pub fn read_last_lines(
    file_path: &Path,
    lines: usize,
    filter: Option<&str>,
) -> Result<Vec<LogEntry>> {
    let mut entries = read_entries(file_path)?;

    if let Some(pattern) = filter {
        entries.retain(|entry| entry.format().contains(pattern));
    }

    let start_index = entries.len().saturating_sub(lines);
    Ok(entries.split_off(start_index))
}

/// List the runs recorded under a program folder, oldest first
///
/// Folders whose name is not a run timestamp are skipped. A missing program
/// folder means no runs.
pub fn list_runs(program_dir: &Path) -> Result<Vec<RunSummary>> {
    if !program_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(program_dir).map_err(|e| {
        RunlogError::LogReadError(format!(
            "Failed to list {}: {}",
            program_dir.display(),
            e
        ))
    })?;

    let mut runs = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let Some(stamp) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        let Ok(started_at) = NaiveDateTime::parse_from_str(&stamp, RUN_DIR_FORMAT) else {
            continue;
        };

        let (loggers, bytes) = scan_run(&path)?;
        runs.push(RunSummary {
            stamp,
            started_at,
            dir: path,
            loggers,
            bytes,
        });
    }

    runs.sort_by(|a, b| a.stamp.cmp(&b.stamp));
    Ok(runs)
}

/// The most recent run under a program folder
pub fn latest_run(program_dir: &Path) -> Result<Option<RunSummary>> {
    Ok(list_runs(program_dir)?.pop())
}

fn scan_run(dir: &Path) -> Result<(Vec<String>, u64)> {
    let mut loggers = Vec::new();
    let mut bytes = 0;

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("log") || !path.is_file() {
            continue;
        }

        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            loggers.push(stem.to_string());
        }
        bytes += fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    }

    loggers.sort();
    Ok((loggers, bytes))
}
