// Logs module - Run folders, named loggers and reading logs back

pub mod global;
mod logger;
mod manager;
mod reader;
mod registry;
mod run;

pub use logger::{Logger, FATAL_EXIT_CODE, LINE_TIMESTAMP_FORMAT};
pub use manager::{LogManager, STD_LOGGER_NAME};
pub use reader::{latest_run, list_runs, read_entries, read_last_lines, LogEntry, RunSummary};
pub use registry::NameRegistry;
pub use run::{RunContext, RUN_DIR_FORMAT};
