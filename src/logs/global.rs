// Process-wide default manager and the convenience calls bound to its `std` logger

use super::logger::join_operands;
use crate::config::LogConfig;
use crate::error::{Result, RunlogError};
use crate::logs::{LogManager, Logger, FATAL_EXIT_CODE};
use parking_lot::{const_mutex, Mutex};
use std::fmt::{self, Display};
use std::sync::{Arc, OnceLock};

static MANAGER: OnceLock<LogManager> = OnceLock::new();
static INIT_LOCK: Mutex<()> = const_mutex(());

/// Initialize process-wide logging for `program` under `~/logs`
///
/// Until this is called, the convenience calls are disabled and return
/// [`RunlogError::NotInitialized`]. Calling it a second time fails with
/// [`RunlogError::AlreadyInitialized`].
pub fn init(program: &str) -> Result<&'static LogManager> {
    init_with_config(LogConfig::new(program))
}

/// Initialize process-wide logging from a full configuration
pub fn init_with_config(config: LogConfig) -> Result<&'static LogManager> {
    let _guard = INIT_LOCK.lock();

    if MANAGER.get().is_some() {
        return Err(RunlogError::AlreadyInitialized);
    }

    let created = LogManager::with_config(config)?;
    MANAGER
        .set(created)
        .map_err(|_| RunlogError::AlreadyInitialized)?;

    manager()
}

/// The process-wide manager
pub fn manager() -> Result<&'static LogManager> {
    MANAGER.get().ok_or(RunlogError::NotInitialized)
}

/// Whether [`init`] has succeeded in this process
pub fn is_enabled() -> bool {
    MANAGER.get().is_some()
}

/// Open a new logger in the process-wide run
pub fn new_logger(name: &str) -> Result<Arc<Logger>> {
    manager()?.create_logger(name)
}

#[track_caller]
pub fn print(args: &[&dyn Display]) -> Result<()> {
    manager()?.print(args)
}

#[track_caller]
pub fn printf(args: fmt::Arguments<'_>) -> Result<()> {
    manager()?.printf(args)
}

#[track_caller]
pub fn println(args: &[&dyn Display]) -> Result<()> {
    manager()?.println(args)
}

/// Log to `std.log`, then exit with status 1; exits even when logging is disabled
#[track_caller]
pub fn fatal(args: &[&dyn Display]) -> ! {
    match MANAGER.get() {
        Some(manager) => manager.fatal(args),
        None => exit_uninitialized(),
    }
}

#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) -> ! {
    match MANAGER.get() {
        Some(manager) => manager.fatalf(args),
        None => exit_uninitialized(),
    }
}

#[track_caller]
pub fn fatalln(args: &[&dyn Display]) -> ! {
    match MANAGER.get() {
        Some(manager) => manager.fatalln(args),
        None => exit_uninitialized(),
    }
}

/// Log to `std.log`, then panic; panics even when logging is disabled
#[track_caller]
pub fn panic(args: &[&dyn Display]) -> ! {
    match MANAGER.get() {
        Some(manager) => manager.panic(args),
        None => panic!("{}", join_operands(args)),
    }
}

#[track_caller]
pub fn panicf(args: fmt::Arguments<'_>) -> ! {
    match MANAGER.get() {
        Some(manager) => manager.panicf(args),
        None => panic!("{}", args),
    }
}

#[track_caller]
pub fn panicln(args: &[&dyn Display]) -> ! {
    match MANAGER.get() {
        Some(manager) => manager.panicln(args),
        None => panic!("{}\n", join_operands(args)),
    }
}

fn exit_uninitialized() -> ! {
    tracing::error!("Fatal message dropped: logging is not initialized");
    std::process::exit(FATAL_EXIT_CODE)
}
