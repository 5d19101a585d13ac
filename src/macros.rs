// Formatting front ends for the `*f` logging methods

/// Log a formatted message through a logger
///
/// ```no_run
/// # let manager = runlog::LogManager::init("demo").unwrap();
/// # let stats = manager.create_logger("stats").unwrap();
/// runlog::logf!(stats, "{} items in {:.1}s", 42, 0.5).unwrap();
/// ```
#[macro_export]
macro_rules! logf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.printf(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message through a logger, then exit with status 1
#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatalf(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message through a logger, then panic
#[macro_export]
macro_rules! panicf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.panicf(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message to the process-wide `std.log`
#[macro_export]
macro_rules! std_logf {
    ($($arg:tt)+) => {
        $crate::logs::global::printf(::std::format_args!($($arg)+))
    };
}
