// CLI module - Write to and inspect per-run log folders

mod output;

use crate::config::{is_plain_component, LogConfig};
use crate::error::{Result, RunlogError};
use crate::logs::{self, LogManager, Logger, STD_LOGGER_NAME};
use clap::{Parser, Subcommand};
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use output::print_error;

/// runlog - per-run log folders with named, indented loggers
#[derive(Parser)]
#[command(name = "runlog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Folder holding per-program log folders (defaults to ~/logs)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Configuration file (.toml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a run and log a message
    Log {
        /// Program name (overrides the config file)
        #[arg(short, long)]
        program: Option<String>,

        /// Logger to write to (defaults to std)
        #[arg(short, long)]
        logger: Option<String>,

        /// Indentation level of the message
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        tab: isize,

        /// Message words, joined by spaces
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Start a run, log a message, then exit with status 1
    Fatal {
        #[arg(short, long)]
        program: Option<String>,

        #[arg(short, long)]
        logger: Option<String>,

        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Start a run, log a message, then panic
    Panic {
        #[arg(short, long)]
        program: Option<String>,

        #[arg(short, long)]
        logger: Option<String>,

        #[arg(required = true)]
        message: Vec<String>,
    },

    /// List the recorded runs of a program
    Runs {
        #[arg(short, long)]
        program: Option<String>,
    },

    /// Show the last lines of a logger's file
    Tail {
        #[arg(short, long)]
        program: Option<String>,

        /// Logger to read (defaults to std)
        #[arg(short, long, default_value = STD_LOGGER_NAME)]
        logger: String,

        /// Run folder name (defaults to the latest run)
        #[arg(short, long)]
        run: Option<String>,

        /// Number of lines to display
        #[arg(short = 'n', long, default_value = "20")]
        lines: usize,

        /// Only show lines containing this text
        #[arg(short, long)]
        filter: Option<String>,
    },
}

impl Cli {
    /// Run the CLI application
    pub fn run() -> Result<()> {
        init_tracing();
        let cli = Cli::parse();
        cli.execute()
    }

    /// Execute the parsed command
    fn execute(&self) -> Result<()> {
        match self.command {
            Commands::Log {
                ref program,
                ref logger,
                tab,
                ref message,
            } => {
                let manager = LogManager::with_config(self.resolve_config(program.clone())?)?;
                let logger = open_logger(&manager, logger.as_deref())?;

                logger.set_tab(tab);
                logger.print(&operands(message))?;

                output::print_logged(logger.name(), logger.path());
                Ok(())
            }

            Commands::Fatal {
                ref program,
                ref logger,
                ref message,
            } => {
                let manager = LogManager::with_config(self.resolve_config(program.clone())?)?;
                let logger = open_logger(&manager, logger.as_deref())?;

                logger.fatal(&operands(message))
            }

            Commands::Panic {
                ref program,
                ref logger,
                ref message,
            } => {
                let manager = LogManager::with_config(self.resolve_config(program.clone())?)?;
                let logger = open_logger(&manager, logger.as_deref())?;

                logger.panic(&operands(message))
            }

            Commands::Runs { ref program } => {
                let config = self.resolve_config(program.clone())?;
                let runs = logs::list_runs(&config.program_dir()?)?;

                output::print_runs(&config.program, &runs);
                Ok(())
            }

            Commands::Tail {
                ref program,
                ref logger,
                ref run,
                lines,
                ref filter,
            } => {
                if !is_plain_component(logger) {
                    return Err(RunlogError::InvalidLoggerName(logger.clone()));
                }

                let config = self.resolve_config(program.clone())?;
                let program_dir = config.program_dir()?;

                let run_dir = match run {
                    Some(stamp) if !is_plain_component(stamp) => {
                        return Err(RunlogError::LogReadError(format!(
                            "Invalid run folder name: {:?}",
                            stamp
                        )))
                    }
                    Some(stamp) => program_dir.join(stamp),
                    None => {
                        logs::latest_run(&program_dir)?
                            .ok_or_else(|| {
                                RunlogError::LogReadError(format!(
                                    "No runs recorded for {}",
                                    config.program
                                ))
                            })?
                            .dir
                    }
                };

                let path = run_dir.join(format!("{}.log", logger));
                output::print_info(&format!("Reading {}", path.display()));

                let entries = logs::read_last_lines(&path, lines, filter.as_deref())?;
                output::print_entries(&format!("{} / {}", config.program, logger), &entries);
                Ok(())
            }
        }
    }

    /// Merge the config file (if any) with command-line overrides
    fn resolve_config(&self, program: Option<String>) -> Result<LogConfig> {
        let mut resolved = match (&self.config, program) {
            (Some(path), program) => {
                let mut config = LogConfig::from_file(path)?;
                if let Some(program) = program {
                    config.program = program;
                }
                config
            }
            (None, Some(program)) => LogConfig::new(program),
            (None, None) => return Err(RunlogError::MissingConfigField("program".to_string())),
        };

        if let Some(ref root) = self.root {
            resolved.root = Some(root.clone());
        }

        resolved.validate()?;
        Ok(resolved)
    }
}

/// The std logger, or a freshly created named one
fn open_logger(manager: &LogManager, name: Option<&str>) -> Result<Arc<Logger>> {
    match name {
        None | Some(STD_LOGGER_NAME) => Ok(Arc::clone(manager.std_logger())),
        Some(name) => manager.create_logger(name),
    }
}

fn operands(words: &[String]) -> Vec<&dyn Display> {
    words.iter().map(|w| w as &dyn Display).collect()
}

/// Initialize tracing for diagnostics on stderr
///
/// Reads `RUST_LOG`, defaulting to `warn`. Diagnostics never reach the run's log files.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
