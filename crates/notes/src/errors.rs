//! Error taxonomy and error printing utilities

use colored::*;
use thiserror::Error;

/// A rule broken by the notes collection.
///
/// Every variant names the offending path (relative to the collection root
/// where one is known). The pipeline stops at the first violation it meets.
#[derive(Debug, Error)]
pub enum Violation {
    /// Missing heading, missing Contents section, disallowed formatting
    #[error("Structural violation in {path}: {message}")]
    Structural { path: String, message: String },

    /// Missing or unknown front matter field, reserved sequence in front matter
    #[error("Metadata violation in {path}: {message}")]
    Metadata { path: String, message: String },

    /// Image or link reference that does not match the expected shape
    #[error("Link violation in {path}: {message}")]
    LinkShape { path: String, message: String },

    /// Missing marker or index file, failing external command
    #[error("Environment failure for {path}: {message}")]
    Environment { path: String, message: String },
}

/// Discriminant of a [`Violation`], handy for assertions and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Structural,
    Metadata,
    LinkShape,
    Environment,
}

impl Violation {
    pub fn structural(path: impl Into<String>, message: impl Into<String>) -> Self {
        Violation::Structural {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn metadata(path: impl Into<String>, message: impl Into<String>) -> Self {
        Violation::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn link_shape(path: impl Into<String>, message: impl Into<String>) -> Self {
        Violation::LinkShape {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn environment(path: impl Into<String>, message: impl Into<String>) -> Self {
        Violation::Environment {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Attach the offending text to a message, JSON-quoted so that
    /// whitespace and line breaks stay visible
    pub fn with_match(message: &str, matched: &str) -> String {
        let quoted = serde_json::to_string(matched).unwrap_or_else(|_| format!("{:?}", matched));
        format!("{}\nMatch: {}", message, quoted)
    }

    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::Structural { .. } => ViolationKind::Structural,
            Violation::Metadata { .. } => ViolationKind::Metadata,
            Violation::LinkShape { .. } => ViolationKind::LinkShape,
            Violation::Environment { .. } => ViolationKind::Environment,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Violation::Structural { path, .. }
            | Violation::Metadata { path, .. }
            | Violation::LinkShape { path, .. }
            | Violation::Environment { path, .. } => path,
        }
    }
}

/// Find the [`Violation`] inside an error chain, if any
pub fn violation_of(error: &anyhow::Error) -> Option<&Violation> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<Violation>())
}

/// Print a formatted error message
pub fn print_error(context: &str, error: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), context);
    eprintln!("  {}", error.to_string().red());

    // Show chain of causes
    let mut current = error.source();
    while let Some(cause) = current {
        eprintln!("  {} {}", "Caused by:".dimmed(), cause.to_string().dimmed());
        current = std::error::Error::source(cause);
    }
}

/// Print an error with a suggestion
pub fn print_error_with_suggestion(context: &str, error: &anyhow::Error, suggestion: &str) {
    print_error(context, error);
    eprintln!("\n{} {}", "Suggestion:".cyan().bold(), suggestion);
}

/// Suggestion matching the kind of violation, when there is a useful one
pub fn suggestion_for(violation: &Violation) -> Option<&'static str> {
    match violation.kind() {
        ViolationKind::Structural if violation.to_string().contains("index") => {
            Some("Run 'notes tree' to regenerate the directory index files")
        }
        ViolationKind::Metadata => {
            Some("Front matter may only contain tree_title, description and last_modified")
        }
        ViolationKind::Environment if violation.to_string().contains("git") => {
            Some("Make sure the notes root is inside a git repository")
        }
        _ => None,
    }
}
