//! Structural checks for notes and generated directory indexes
//!
//! Runs after the index files have been written: a directory index that does
//! not have the generated layout is reported instead of being guessed at.

use crate::config::Config;
use crate::errors::Violation;
use crate::frontmatter;
use crate::index::{AUTO_GENERATED_BANNER, DIRECTORY_TITLE_LINE};
use crate::tree::{walk_entries, EntryKind};
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Heading every note must contain
pub const CONTENTS_HEADING: &str = "## Contents";

fn loose_list_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"- +[^\r\n]+(\r\n\r\n|\r\r|\n\n)\s*-").unwrap())
}

fn double_space_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\w|`)+  (\w|`)").unwrap())
}

fn list_parent_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\n-   \[[^\n]+\n    -)|(\n    -   \[[^\n]+\n        -)").unwrap()
    })
}

/// Summary of a successful lint run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LintReport {
    pub files: usize,
    pub directories: usize,
}

/// Check the whole collection, stopping at the first violation
pub fn lint(config: &Config) -> Result<LintReport> {
    let mut report = LintReport::default();
    lint_directory(&config.root, "", config, &mut report)?;
    Ok(report)
}

fn lint_directory(
    absolute_path: &Path,
    relative_path: &str,
    config: &Config,
    report: &mut LintReport,
) -> Result<()> {
    for entry in walk_entries(absolute_path, config)? {
        let entry_path = join(relative_path, &entry.name);

        match entry.kind {
            EntryKind::Directory => {
                let index_rel = join(&entry_path, &config.index_filename);
                let index_path = entry.path.join(&config.index_filename);

                if !index_path.is_file() {
                    return Err(Violation::environment(index_rel, "Directory index file not found")
                        .into());
                }

                let contents = fs::read_to_string(&index_path)
                    .with_context(|| format!("Failed to read {}", index_path.display()))?;
                check_directory_index(&contents, &entry.name, &index_rel)?;
                report.directories += 1;

                lint_directory(&entry.path, &entry_path, config, report)?;
            }
            EntryKind::File => {
                let contents = fs::read_to_string(&entry.path)
                    .with_context(|| format!("Failed to read {}", entry.path.display()))?;
                check_note(&contents, &entry_path)?;
                report.files += 1;
            }
        }
    }

    Ok(())
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Run every per-note check, in order
pub fn check_note(contents: &str, path: &str) -> Result<(), Violation> {
    check_contents_heading(contents, path)?;
    check_no_double_spaces(contents, path)?;
    check_no_list_parent_starting_with_link(contents, path)?;
    check_no_loose_lists(contents, path)?;
    check_no_ellipsis_in_front_matter(contents, path)?;
    Ok(())
}

/// A generated directory index must carry a custom title at its fixed line
pub fn check_directory_index(
    contents: &str,
    directory_name: &str,
    path: &str,
) -> Result<(), Violation> {
    let lines: Vec<&str> = contents.lines().collect();

    if lines.first() != Some(&AUTO_GENERATED_BANNER) {
        return Err(Violation::structural(path, "directory index not generated, banner missing"));
    }

    let title = lines
        .get(DIRECTORY_TITLE_LINE)
        .and_then(|line| line.strip_prefix("# "))
        .ok_or_else(|| Violation::structural(path, "No title found in generated directory index"))?;

    if title == directory_name {
        return Err(Violation::structural(path, "No custom title set"));
    }

    Ok(())
}

pub fn check_contents_heading(contents: &str, path: &str) -> Result<(), Violation> {
    let is_contents = |line: &str| line.trim_end_matches('\r') == CONTENTS_HEADING;
    if contents.lines().any(is_contents) {
        Ok(())
    } else {
        Err(Violation::structural(path, "No 'Contents' heading found"))
    }
}

pub fn check_no_loose_lists(contents: &str, path: &str) -> Result<(), Violation> {
    match loose_list_regex().find(contents) {
        Some(m) => {
            let message = Violation::with_match("Loose list found", m.as_str());
            Err(Violation::structural(path, message))
        }
        None => Ok(()),
    }
}

pub fn check_no_double_spaces(contents: &str, path: &str) -> Result<(), Violation> {
    match double_space_regex().find(contents) {
        Some(m) => {
            let message = Violation::with_match("Double space found", m.as_str());
            Err(Violation::structural(path, message))
        }
        None => Ok(()),
    }
}

/// The site generator cannot render a list item that starts with a link and
/// has a nested list, so such items are rejected below the Contents section
pub fn check_no_list_parent_starting_with_link(
    contents: &str,
    path: &str,
) -> Result<(), Violation> {
    let Some(contents_at) = contents.find(CONTENTS_HEADING) else {
        return Ok(());
    };
    let after_heading = contents_at + CONTENTS_HEADING.len();
    let Some(next_heading) = contents[after_heading..].find("##") else {
        // Contents-only note, no body below the table of contents
        return Ok(());
    };

    let text = &contents[after_heading + next_heading..];

    match list_parent_link_regex().find(text) {
        Some(m) => Err(Violation::structural(
            path,
            Violation::with_match("List parent starting with link found", m.as_str()),
        )),
        None => Ok(()),
    }
}

/// `...` ends a YAML document, so it may not appear in front matter
pub fn check_no_ellipsis_in_front_matter(contents: &str, path: &str) -> Result<(), Violation> {
    match frontmatter::split(contents) {
        (Some(block), _) if block.contains("...") => {
            Err(Violation::metadata(path, "Ellipsis found in front matter"))
        }
        _ => Ok(()),
    }
}
