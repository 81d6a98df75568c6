use colored::{ColoredString, Colorize};
use declarative::Change;
use std::time::Duration;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Colored plan symbol for a change
pub fn change_symbol(change: &Change) -> ColoredString {
    match change {
        Change::Create => change.symbol().green(),
        Change::Destroy => change.symbol().red(),
        Change::UpdateAttributes(_) => change.symbol().yellow(),
        Change::NoOp => change.symbol().dimmed(),
    }
}

/// Format a delay as seconds, e.g. `2s` or `0.5s`
pub fn format_seconds(duration: Duration) -> String {
    if duration.subsec_nanos() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}s", duration.as_secs_f64())
    }
}

// ============================================================================
// Tests
// ============================================================================
