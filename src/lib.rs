// Library exports for runlog
//
// Per-run log folders (`~/logs/<program>/<timestamp>/`) holding one file per
// named logger, with indentation control and a guard against two loggers
// sharing a file.

pub mod cli;
pub mod config;
pub mod error;
pub mod logs;
mod macros;

pub use config::LogConfig;
pub use error::{Result, RunlogError};
pub use logs::global::{
    fatal, fatalf, fatalln, init, init_with_config, is_enabled, manager, new_logger, panic,
    panicf, panicln, print, printf, println,
};
pub use logs::{LogManager, Logger};
