use crate::error::{Result, RunlogError};
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::fmt::{self, Display};
use std::fs::File;
use std::io::Write;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Timestamp written at the start of every line: `YYYY/MM/DD HH:MM:SS`
pub const LINE_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Exit status used by the fatal family
pub const FATAL_EXIT_CODE: i32 = 1;

/// A Logger writes lines to one file of the current run
///
/// Each line carries a timestamp, the file and line of the logging call, and
/// the message indented by the logger's tab level. Loggers are meant to group
/// messages with a similar purpose, so a program usually holds several:
///
/// ```no_run
/// # fn work() {}
/// # let manager = runlog::LogManager::init("demo").unwrap();
/// let stats = manager.create_logger("stats").unwrap();
///
/// stats.printf(format_args!("starting batch {}", 7)).unwrap();
/// stats.inc_tab();
/// work();
/// stats.dec_tab();
/// ```
///
/// Writes from several threads are serialized, one whole line at a time.
#[derive(Debug)]
pub struct Logger {
    name: String,
    path: PathBuf,
    file: Mutex<File>,
    tab_level: AtomicUsize,
    indent: String,
}

impl Logger {
    /// Create (or truncate) the file at `path` and bind a new logger to it
    pub(crate) fn create(name: &str, path: PathBuf, indent: &str) -> Result<Self> {
        let file = File::create(&path).map_err(|e| {
            RunlogError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create log file {}: {}", path.display(), e),
            ))
        })?;

        tracing::debug!(logger = name, path = %path.display(), "Opened log file");

        Ok(Self {
            name: name.to_string(),
            path,
            file: Mutex::new(file),
            tab_level: AtomicUsize::new(0),
            indent: indent.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path to the file this logger writes to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// String repeated once per tab level
    pub fn indent(&self) -> &str {
        &self.indent
    }

    /// Set the indentation to `level` units; negative levels become 0
    pub fn set_tab(&self, level: isize) {
        let level = usize::try_from(level).unwrap_or(0);
        self.tab_level.store(level, Ordering::Relaxed);
    }

    pub fn inc_tab(&self) {
        let _ = self
            .tab_level
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |level| {
                Some(level.saturating_add(1))
            });
    }

    pub fn dec_tab(&self) {
        let _ = self
            .tab_level
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |level| {
                Some(level.saturating_sub(1))
            });
    }

    pub fn tab_level(&self) -> usize {
        self.tab_level.load(Ordering::Relaxed)
    }

    /// Log the operands joined by single spaces
    #[track_caller]
    pub fn log(&self, args: &[&dyn Display]) -> Result<()> {
        self.output(Location::caller(), &join_operands(args))
    }

    /// Same as [`Logger::log`]
    #[track_caller]
    pub fn print(&self, args: &[&dyn Display]) -> Result<()> {
        self.output(Location::caller(), &join_operands(args))
    }

    /// Log a formatted message, usually built with `format_args!` or [`crate::logf!`]
    #[track_caller]
    pub fn printf(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.output(Location::caller(), &args.to_string())
    }

    /// Log the operands joined by single spaces, terminated by a newline
    #[track_caller]
    pub fn println(&self, args: &[&dyn Display]) -> Result<()> {
        self.output(Location::caller(), &terminated(join_operands(args)))
    }

    /// Log the operands, then exit the process with status 1
    #[track_caller]
    pub fn fatal(&self, args: &[&dyn Display]) -> ! {
        self.fatal_with(join_operands(args))
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.fatal_with(args.to_string())
    }

    #[track_caller]
    pub fn fatalln(&self, args: &[&dyn Display]) -> ! {
        self.fatal_with(terminated(join_operands(args)))
    }

    /// Log the operands, then panic with the same message
    #[track_caller]
    pub fn panic(&self, args: &[&dyn Display]) -> ! {
        self.panic_with(join_operands(args))
    }

    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
        self.panic_with(args.to_string())
    }

    #[track_caller]
    pub fn panicln(&self, args: &[&dyn Display]) -> ! {
        self.panic_with(terminated(join_operands(args)))
    }

    #[track_caller]
    fn fatal_with(&self, message: String) -> ! {
        if let Err(e) = self.output(Location::caller(), &message) {
            tracing::error!(logger = %self.name, error = %e, "Fatal message was not logged");
        }
        std::process::exit(FATAL_EXIT_CODE)
    }

    #[track_caller]
    fn panic_with(&self, message: String) -> ! {
        if let Err(e) = self.output(Location::caller(), &message) {
            tracing::error!(logger = %self.name, error = %e, "Panic message was not logged");
        }
        panic!("{}", message)
    }

    /// Write one formatted line attributed to `location`
    fn output(&self, location: &Location<'_>, message: &str) -> Result<()> {
        let line = self.format_line(&Local::now(), location, message);

        let mut file = self.file.lock();
        file.write_all(line.as_bytes()).map_err(|e| {
            tracing::warn!(logger = %self.name, error = %e, "Failed to write log line");
            RunlogError::WriteError(format!("{}: {}", self.path.display(), e))
        })
    }

    /// Format: `YYYY/MM/DD HH:MM:SS file.rs:LINE: <indent>message\n`
    fn format_line(
        &self,
        timestamp: &DateTime<Local>,
        location: &Location<'_>,
        message: &str,
    ) -> String {
        let file = Path::new(location.file())
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(location.file());

        let mut line = format!(
            "{} {}:{}: {}{}",
            timestamp.format(LINE_TIMESTAMP_FORMAT),
            file,
            location.line(),
            self.indent.repeat(self.tab_level()),
            message
        );

        if !line.ends_with('\n') {
            line.push('\n');
        }

        line
    }
}

pub(crate) fn join_operands(args: &[&dyn Display]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn terminated(mut message: String) -> String {
    message.push('\n');
    message
}
