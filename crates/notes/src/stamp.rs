//! Keeping the `last_modified` front matter field in sync with git

use crate::config::Config;
use crate::errors::Violation;
use crate::frontmatter::{self, iso_timestamp, parse_timestamp, FrontMatter};
use crate::git::VersionControl;
use crate::tree::{walk_entries, EntryKind};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// What the normalizer did to a note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampOutcome {
    /// Not staged and already stamped
    Unchanged,
    /// Staged, stamped with the current time
    Stamped,
    /// Not staged and unstamped, filled from the last commit
    Backfilled,
}

/// Counts per outcome for a whole collection
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StampReport {
    pub unchanged: usize,
    pub stamped: usize,
    pub backfilled: usize,
}

impl StampReport {
    fn record(&mut self, outcome: StampOutcome) {
        match outcome {
            StampOutcome::Unchanged => self.unchanged += 1,
            StampOutcome::Stamped => self.stamped += 1,
            StampOutcome::Backfilled => self.backfilled += 1,
        }
    }
}

/// Compute the new content of a note, `None` when it stays as is
pub fn stamp_content(
    contents: &str,
    relative_path: &str,
    is_staged: bool,
    vcs: &dyn VersionControl,
    now: DateTime<Utc>,
) -> Result<Option<(String, StampOutcome)>> {
    let (front_matter, body) = FrontMatter::parse(contents, relative_path)?;
    let has_last_modified = front_matter.get("last_modified").is_some();

    if !is_staged && has_last_modified {
        return Ok(None);
    }

    let (value, outcome) = if is_staged {
        (iso_timestamp(now), StampOutcome::Stamped)
    } else {
        let committed = vcs.last_commit_time(relative_path)?.ok_or_else(|| {
            Violation::environment(relative_path, "no git history to take last_modified from")
        })?;
        let value = parse_timestamp(&committed).map(iso_timestamp).unwrap_or(committed);
        (value, StampOutcome::Backfilled)
    };

    let block = front_matter.with_field("last_modified", &value);
    Ok(Some((frontmatter::render(&block, body), outcome)))
}

/// Set `last_modified` on one note file if needed
pub fn normalize_timestamp(
    path: &Path,
    relative_path: &str,
    is_staged: bool,
    vcs: &dyn VersionControl,
    now: DateTime<Utc>,
) -> Result<StampOutcome> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    match stamp_content(&contents, relative_path, is_staged, vcs, now)? {
        Some((updated, outcome)) => {
            fs::write(path, updated)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::debug!(path = relative_path, ?outcome, "updated last_modified");
            Ok(outcome)
        }
        None => Ok(StampOutcome::Unchanged),
    }
}

/// Normalize every note of the collection
pub fn normalize_all(config: &Config, vcs: &dyn VersionControl) -> Result<StampReport> {
    let staged = vcs.staged_paths()?;
    let now = Utc::now();
    let mut report = StampReport::default();
    normalize_directory(&config.root, "", config, vcs, &staged, now, &mut report)?;
    Ok(report)
}

fn normalize_directory(
    absolute_path: &Path,
    relative_path: &str,
    config: &Config,
    vcs: &dyn VersionControl,
    staged: &[String],
    now: DateTime<Utc>,
    report: &mut StampReport,
) -> Result<()> {
    for entry in walk_entries(absolute_path, config)? {
        let entry_path = if relative_path.is_empty() {
            entry.name.clone()
        } else {
            format!("{}/{}", relative_path, entry.name)
        };

        match entry.kind {
            EntryKind::Directory => {
                normalize_directory(&entry.path, &entry_path, config, vcs, staged, now, report)?
            }
            EntryKind::File => {
                let is_staged = staged.iter().any(|p| p == &entry_path);
                report.record(normalize_timestamp(&entry.path, &entry_path, is_staged, vcs, now)?);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{violation_of, ViolationKind};
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeVcs {
        staged: Vec<String>,
        history: HashMap<String, String>,
    }

    impl VersionControl for FakeVcs {
        fn staged_paths(&self) -> Result<Vec<String>> {
            Ok(self.staged.clone())
        }

        fn last_commit_time(&self, relative_path: &str) -> Result<Option<String>> {
            Ok(self.history.get(relative_path).cloned())
        }
    }

    const STAMPED: &str =
        "---\ndescription: d\nlast_modified: 2019-01-01T00:00:00.000Z\n---\n\n# T\n";

    fn now() -> DateTime<Utc> {
        parse_timestamp("2024-03-04T05:06:07Z").unwrap()
    }

    #[test]
    fn test_unstaged_with_value_is_untouched() {
        let vcs = FakeVcs::default();
        assert!(stamp_content(STAMPED, "a.md", false, &vcs, now()).unwrap().is_none());
    }

    #[test]
    fn test_staged_always_gets_now() {
        let vcs = FakeVcs::default();
        let (updated, outcome) =
            stamp_content(STAMPED, "a.md", true, &vcs, now()).unwrap().unwrap();
        assert_eq!(outcome, StampOutcome::Stamped);
        assert_eq!(
            updated,
            "---\ndescription: d\nlast_modified: 2024-03-04T05:06:07.000Z\n---\n\n# T\n"
        );
    }

    #[test]
    fn test_staged_within_execution_window() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.md");
        fs::write(&path, STAMPED).unwrap();

        let before = Utc::now();
        let outcome =
            normalize_timestamp(&path, "a.md", true, &FakeVcs::default(), Utc::now()).unwrap();
        let after = Utc::now();
        assert_eq!(outcome, StampOutcome::Stamped);

        let contents = fs::read_to_string(&path).unwrap();
        let (fm, _) = FrontMatter::parse(&contents, "a.md").unwrap();
        let stamped = parse_timestamp(&fm.get("last_modified").unwrap()).unwrap();
        // millisecond precision in the file
        assert!(stamped >= before - chrono::Duration::milliseconds(1));
        assert!(stamped <= after);
    }

    #[test]
    fn test_unstaged_missing_backfills_from_history() {
        let mut vcs = FakeVcs::default();
        vcs.history.insert("java/a.md".to_string(), "2020-05-01T12:00:00+02:00".to_string());

        let content = "---\ndescription: d\n---\n\n# T\n";
        let (updated, outcome) =
            stamp_content(content, "java/a.md", false, &vcs, now()).unwrap().unwrap();
        assert_eq!(outcome, StampOutcome::Backfilled);
        assert!(updated.contains("last_modified: 2020-05-01T10:00:00.000Z"));
    }

    #[test]
    fn test_unstaged_missing_without_history_fails() {
        let vcs = FakeVcs::default();
        let err = stamp_content("# T\n", "a.md", false, &vcs, now()).unwrap_err();
        let violation = violation_of(&err).unwrap();
        assert_eq!(violation.kind(), ViolationKind::Environment);
        assert_eq!(violation.path(), "a.md");
    }

    #[test]
    fn test_note_without_front_matter_gets_block() {
        let vcs = FakeVcs::default();
        let (updated, _) =
            stamp_content("# T\n\ntext\n", "a.md", true, &vcs, now()).unwrap().unwrap();
        assert_eq!(updated, "---\nlast_modified: 2024-03-04T05:06:07.000Z\n---\n\n# T\n\ntext\n");
    }

    #[test]
    fn test_normalize_all() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("java")).unwrap();
        fs::write(root.join("java/staged.md"), STAMPED).unwrap();
        fs::write(root.join("java/old.md"), "---\ndescription: d\n---\n\n# Old\n").unwrap();
        fs::write(root.join("done.md"), STAMPED).unwrap();
        fs::write(root.join("README.md"), "# Notes\n").unwrap();

        let mut vcs = FakeVcs {
            staged: vec!["java/staged.md".to_string()],
            ..Default::default()
        };
        vcs.history.insert("java/old.md".to_string(), "2021-02-03T04:05:06Z".to_string());

        let config = Config {
            root: root.to_path_buf(),
            ..Config::default()
        };
        let report = normalize_all(&config, &vcs).unwrap();
        assert_eq!(report, StampReport {
            unchanged: 1,
            stamped: 1,
            backfilled: 1,
        });

        let old = fs::read_to_string(root.join("java/old.md")).unwrap();
        assert!(old.contains("last_modified: 2021-02-03T04:05:06.000Z"));
        assert_eq!(fs::read_to_string(root.join("done.md")).unwrap(), STAMPED);
        // the index file is not a note
        assert_eq!(fs::read_to_string(root.join("README.md")).unwrap(), "# Notes\n");
    }
}
