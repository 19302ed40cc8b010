//! Terminal output utilities
//!
//! Status lines go to stdout, problems to stderr.

use outdir_core::error::Error;
use owo_colors::OwoColorize;
use std::path::Path;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print an aligned `label  path` row
    pub fn path_row(label: &str, width: usize, path: &Path) {
        println!("  {:<width$}  {}", label.cyan(), path.display(), width = width);
    }

    /// Print an error with its code, context and suggestion
    pub fn report(err: &Error) {
        eprintln!("{} {} {}", "✗".red(), err.code.to_string().dimmed(), err.message);
        if let Some(ctx) = &err.context {
            eprintln!("  {} {}", "context:".dimmed(), ctx);
        }
        if let Some(suggestion) = &err.suggestion {
            eprintln!("  {} {}", "hint:".yellow(), suggestion);
        }
    }
}

/// Width of the longest label, for aligning `path_row`s
pub fn label_width<'a>(labels: impl IntoIterator<Item = &'a str>) -> usize {
    labels.into_iter().map(|l| l.chars().count()).max().unwrap_or(0)
}

/// Format a file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: u64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
