// Output formatting and display for CLI

use crate::logs::{LogEntry, RunSummary};
use colored::*;
use std::path::Path;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// Print an error message to stderr
pub fn print_error(error: &str) {
    eprintln!("{} {}", "✗ Error:".red().bold(), error);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print where a message was logged
pub fn print_logged(logger: &str, path: &Path) {
    println!(
        "{} Logged to {} ({})",
        "✓".green().bold(),
        logger.cyan(),
        path.display().to_string().dimmed()
    );
}

/// Print a formatted table of runs
pub fn print_runs(program: &str, runs: &[RunSummary]) {
    if runs.is_empty() {
        println!("{}", format!("No runs recorded for {}", program).yellow());
        return;
    }

    #[derive(Tabled)]
    struct RunRow {
        #[tabled(rename = "Run")]
        stamp: String,
        #[tabled(rename = "Loggers")]
        loggers: String,
        #[tabled(rename = "Size")]
        size: String,
    }

    let rows: Vec<RunRow> = runs
        .iter()
        .map(|run| RunRow {
            stamp: run.stamp.clone(),
            loggers: truncate(&run.loggers.join(", "), 40),
            size: format_size(run.bytes),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    println!("\n{}\n", table);
    println!(
        "{}",
        format!("Total: {} run(s) of {}", runs.len(), program)
            .dimmed()
            .italic()
    );
}

/// Print log entries, dimming the timestamp and location
pub fn print_entries(title: &str, entries: &[LogEntry]) {
    if entries.is_empty() {
        println!("{}", "No logs available".yellow());
        return;
    }

    println!("\n{}", title.bold().underline());
    println!();

    for entry in entries {
        match (&entry.timestamp, &entry.location) {
            (Some(ts), location) => println!(
                "{} {} {}",
                ts.format("%H:%M:%S").to_string().dimmed(),
                location.as_deref().unwrap_or("-").bright_black(),
                entry.message
            ),
            (None, _) => println!("{}", entry.message),
        }
    }

    println!();
}

/// Format a byte count in human-readable format
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        format!("{}B", bytes)
    } else if bytes < MB {
        format!("{:.1}KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.2}GB", bytes as f64 / GB as f64)
    }
}

/// Truncate a string to a maximum number of characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(2048), "2.0KB");
        assert_eq!(format_size(2 * 1024 * 1024), "2.0MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00GB");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a very long string", 10), "this is...");
        assert_eq!(truncate("ééééééééééééé", 5), "éé...");
    }
}
