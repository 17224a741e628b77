//! Color theme for consistent output

use colored::*;

/// Color for section headings
pub fn heading(msg: &str) -> ColoredString {
    msg.bold()
}

/// Color for success messages
pub fn success(msg: &str) -> ColoredString {
    msg.green()
}

/// Color for paths
pub fn path(p: &str) -> ColoredString {
    p.dimmed()
}

/// Symbol for success
pub fn success_symbol() -> ColoredString {
    "✓".green().bold()
}

/// Symbol for info
pub fn info_symbol() -> ColoredString {
    "→".cyan()
}
