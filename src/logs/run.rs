use crate::error::{Result, RunlogError};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Format of the per-run folder name: `YYYY-MM-DD_HH-MM-SS`
pub const RUN_DIR_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Identifies one run of a program and the folder its log files live in
#[derive(Debug, Clone)]
pub struct RunContext {
    program: String,
    started_at: DateTime<Local>,
    dir: PathBuf,
}

impl RunContext {
    /// Describe a run of `program` started at `started_at`, with program folders under `root`
    ///
    /// Nothing is created on disk until [`RunContext::create_dir`] is called.
    pub fn new(root: &Path, program: &str, started_at: DateTime<Local>) -> Self {
        let dir = root
            .join(program)
            .join(started_at.format(RUN_DIR_FORMAT).to_string());

        Self {
            program: program.to_string(),
            started_at,
            dir,
        }
    }

    /// Create the run folder and any missing parents
    ///
    /// Succeeds if the folder already exists.
    pub fn create_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            RunlogError::Initialization(format!(
                "Failed to create log directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        tracing::info!(dir = %self.dir.display(), "Log directory ready");
        Ok(())
    }

    /// Path of the file backing the logger called `name`
    pub fn log_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.log", name))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Folder name of this run, e.g. `2024-03-09_14-05-07`
    pub fn stamp(&self) -> String {
        self.started_at.format(RUN_DIR_FORMAT).to_string()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_run_dir_layout() {
        let run = RunContext::new(Path::new("/home/me/logs"), "demo", fixed_time());

        assert_eq!(
            run.dir(),
            Path::new("/home/me/logs/demo/2024-03-09_14-05-07")
        );
        assert_eq!(run.stamp(), "2024-03-09_14-05-07");
        assert_eq!(run.program(), "demo");
    }

    #[test]
    fn test_log_path() {
        let run = RunContext::new(Path::new("/r"), "demo", fixed_time());

        assert_eq!(
            run.log_path("stats"),
            Path::new("/r/demo/2024-03-09_14-05-07/stats.log")
        );
    }

    #[test]
    fn test_create_dir_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let run = RunContext::new(temp_dir.path(), "demo", fixed_time());

        run.create_dir().unwrap();
        assert!(run.dir().is_dir());

        // Second call on an existing folder still succeeds
        run.create_dir().unwrap();
        assert!(run.dir().is_dir());
    }

    #[test]
    fn test_create_dir_fails_under_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("demo");
        std::fs::write(&blocker, "not a folder").unwrap();

        let run = RunContext::new(temp_dir.path(), "demo", fixed_time());
        assert!(matches!(
            run.create_dir(),
            Err(RunlogError::Initialization(_))
        ));
    }
}
