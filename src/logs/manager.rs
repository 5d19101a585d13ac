use crate::config::LogConfig;
use crate::error::{Result, RunlogError};
use crate::logs::{Logger, NameRegistry, RunContext};
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::fmt::{self, Display};
use std::path::Path;
use std::sync::Arc;

/// Name of the logger every manager opens on initialization
pub const STD_LOGGER_NAME: &str = "std";

/// LogManager owns one run directory and every logger writing into it
///
/// Constructing a manager initializes the run: the timestamped folder is
/// created and the default `std` logger is opened. The convenience methods
/// (`print`, `fatal`, ...) write through that default logger.
#[derive(Debug)]
pub struct LogManager {
    run: RunContext,
    indent: String,
    /// Names claimed by loggers of this run
    registry: Mutex<NameRegistry>,
    std_logger: Arc<Logger>,
}

impl LogManager {
    /// Initialize logging for `program` under `~/logs`
    ///
    /// The run folder is named after the start time at one-second resolution,
    /// so two runs of the same program started within the same second share a
    /// folder, and the later run truncates the earlier run's `std.log` (and any
    /// logger file it reopens under the same name).
    ///
    /// # Returns
    /// * `Ok(LogManager)` - Run folder created and `std.log` opened
    /// * `Err(RunlogError::Initialization)` - Home folder, run folder or `std.log` unavailable
    pub fn init(program: &str) -> Result<Self> {
        Self::with_config(LogConfig::new(program))
    }

    /// Initialize logging from a full configuration, timestamped now
    ///
    /// Same-second runs share a folder, as described on [`LogManager::init`].
    pub fn with_config(config: LogConfig) -> Result<Self> {
        Self::with_start_time(config, Local::now())
    }

    /// Initialize logging with an explicit run timestamp
    pub fn with_start_time(config: LogConfig, started_at: DateTime<Local>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| RunlogError::Initialization(e.to_string()))?;

        let root = config.log_root()?;
        let run = RunContext::new(&root, &config.program, started_at);
        run.create_dir()?;

        let mut registry = NameRegistry::new();
        registry.claim(STD_LOGGER_NAME)?;

        let std_logger = Logger::create(
            STD_LOGGER_NAME,
            run.log_path(STD_LOGGER_NAME),
            &config.indent,
        )
        .map_err(|e| {
            RunlogError::Initialization(format!("Failed to create default log file: {}", e))
        })?;

        Ok(Self {
            run,
            indent: config.indent,
            registry: Mutex::new(registry),
            std_logger: Arc::new(std_logger),
        })
    }

    /// Open a new logger writing to `<run dir>/<name>.log`
    ///
    /// # Arguments
    /// * `name` - File stem of the log file, unique within the run
    ///
    /// # Returns
    /// * `Ok(Arc<Logger>)` - Logger at tab level 0 on a freshly truncated file
    /// * `Err(RunlogError::DuplicateLogger)` - Another logger already owns the name
    /// * `Err(RunlogError::InvalidLoggerName)` - Name is empty or not a plain file stem
    pub fn create_logger(&self, name: &str) -> Result<Arc<Logger>> {
        let mut registry = self.registry.lock();

        if let Err(e) = registry.claim(name) {
            tracing::warn!(logger = name, error = %e, "Rejected logger");
            return Err(e);
        }

        match Logger::create(name, self.run.log_path(name), &self.indent) {
            Ok(logger) => Ok(Arc::new(logger)),
            Err(e) => {
                registry.release(name);
                Err(e)
            }
        }
    }

    /// The default logger, writing to `std.log`
    pub fn std_logger(&self) -> &Arc<Logger> {
        &self.std_logger
    }

    pub fn run(&self) -> &RunContext {
        &self.run
    }

    /// Folder holding this run's log files
    pub fn run_dir(&self) -> &Path {
        self.run.dir()
    }

    pub fn program(&self) -> &str {
        self.run.program()
    }

    /// Check if a logger name is already claimed in this run
    pub fn has_logger(&self, name: &str) -> bool {
        self.registry.lock().contains(name)
    }

    /// Get the number of loggers opened in this run, `std` included
    pub fn logger_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Names of the loggers opened in this run, sorted
    pub fn logger_names(&self) -> Vec<String> {
        self.registry.lock().names()
    }

    #[track_caller]
    pub fn print(&self, args: &[&dyn Display]) -> Result<()> {
        self.std_logger.print(args)
    }

    #[track_caller]
    pub fn printf(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.std_logger.printf(args)
    }

    #[track_caller]
    pub fn println(&self, args: &[&dyn Display]) -> Result<()> {
        self.std_logger.println(args)
    }

    #[track_caller]
    pub fn fatal(&self, args: &[&dyn Display]) -> ! {
        self.std_logger.fatal(args)
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.std_logger.fatalf(args)
    }

    #[track_caller]
    pub fn fatalln(&self, args: &[&dyn Display]) -> ! {
        self.std_logger.fatalln(args)
    }

    #[track_caller]
    pub fn panic(&self, args: &[&dyn Display]) -> ! {
        self.std_logger.panic(args)
    }

    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
        self.std_logger.panicf(args)
    }

    #[track_caller]
    pub fn panicln(&self, args: &[&dyn Display]) -> ! {
        self.std_logger.panicln(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_manager(temp_dir: &TempDir) -> LogManager {
        LogManager::with_config(LogConfig::new("demo").with_root(temp_dir.path())).unwrap()
    }

    #[test]
    fn test_create_log_manager() {
        let temp_dir = TempDir::new().unwrap();
        let manager = new_manager(&temp_dir);

        assert!(manager.run_dir().is_dir());
        assert!(manager.run_dir().starts_with(temp_dir.path().join("demo")));
        assert!(manager.run_dir().join("std.log").is_file());
        assert_eq!(manager.program(), "demo");
        assert_eq!(manager.logger_count(), 1);
        assert!(manager.has_logger(STD_LOGGER_NAME));
    }

    #[test]
    fn test_empty_program_is_initialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = LogManager::with_config(LogConfig::new("").with_root(temp_dir.path()));

        assert!(matches!(result, Err(RunlogError::Initialization(_))));
    }

    #[test]
    fn test_create_logger() {
        let temp_dir = TempDir::new().unwrap();
        let manager = new_manager(&temp_dir);

        let logger = manager.create_logger("stats").unwrap();

        assert_eq!(logger.path(), manager.run_dir().join("stats.log"));
        assert!(logger.path().is_file());
        assert_eq!(logger.tab_level(), 0);
        assert_eq!(manager.logger_count(), 2);
        assert_eq!(manager.logger_names(), vec!["stats", "std"]);
    }

    #[test]
    fn test_create_duplicate_logger() {
        let temp_dir = TempDir::new().unwrap();
        let manager = new_manager(&temp_dir);

        manager.create_logger("err").unwrap();

        let result = manager.create_logger("err");
        assert!(matches!(result, Err(RunlogError::DuplicateLogger(_))));
    }

    #[test]
    fn test_std_name_is_reserved() {
        let temp_dir = TempDir::new().unwrap();
        let manager = new_manager(&temp_dir);

        let result = manager.create_logger(STD_LOGGER_NAME);
        assert!(matches!(result, Err(RunlogError::DuplicateLogger(_))));
    }

    #[test]
    fn test_invalid_logger_name() {
        let temp_dir = TempDir::new().unwrap();
        let manager = new_manager(&temp_dir);

        let result = manager.create_logger("../escape");
        assert!(matches!(result, Err(RunlogError::InvalidLoggerName(_))));
        assert_eq!(manager.logger_count(), 1);
    }

    #[test]
    fn test_failed_create_releases_name() {
        let temp_dir = TempDir::new().unwrap();
        let manager = new_manager(&temp_dir);

        // A folder in the way makes file creation fail
        std::fs::create_dir(manager.run_dir().join("blocked.log")).unwrap();

        assert!(manager.create_logger("blocked").is_err());
        assert!(!manager.has_logger("blocked"));
    }

    #[test]
    fn test_convenience_calls_use_std_logger() {
        let temp_dir = TempDir::new().unwrap();
        let manager = new_manager(&temp_dir);

        manager.print(&[&"via", &"manager"]).unwrap();
        manager.printf(format_args!("{} + {}", 1, 2)).unwrap();
        manager.println(&[&"last"]).unwrap();

        let content = std::fs::read_to_string(manager.run_dir().join("std.log")).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("manager.rs:"));
        assert!(lines[0].ends_with(": via manager"));
        assert!(lines[1].ends_with(": 1 + 2"));
        assert!(lines[2].ends_with(": last"));
    }

    #[test]
    fn test_manager_is_shareable_across_threads() {
        let temp_dir = TempDir::new().unwrap();
        let manager = Arc::new(new_manager(&temp_dir));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let manager = Arc::clone(&manager);
                std::thread::spawn(move || manager.create_logger("race").is_ok())
            })
            .collect();

        let created = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(created, 1);
    }
}
