//! Git integration for notes
//!
//! Provides the version-control queries the front matter normalizer needs:
//! which paths are staged, and when a path was last committed.

use crate::errors::Violation;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Version-control queries used by the pipeline
pub trait VersionControl {
    /// Paths staged for commit, relative to the notes root, with `/` separators
    fn staged_paths(&self) -> Result<Vec<String>>;

    /// Committer date (ISO 8601) of the latest commit touching `relative_path`,
    /// `None` when the path has no history
    fn last_commit_time(&self, relative_path: &str) -> Result<Option<String>>;
}

/// Git, invoked as an external process inside the notes root
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl AsRef<Path>) -> Self {
        Self {
            workdir: workdir.as_ref().to_path_buf(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Violation::environment(
                self.workdir.display().to_string(),
                format!("git {} failed: {}", args.join(" "), stderr.trim()),
            )
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl VersionControl for Git {
    fn staged_paths(&self) -> Result<Vec<String>> {
        let stdout = self.run(&["diff", "--name-only", "--cached", "--relative"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn last_commit_time(&self, relative_path: &str) -> Result<Option<String>> {
        let stdout = self.run(&["log", "-1", "--format=%cI", "--", relative_path])?;
        let time = stdout.trim();
        Ok(if time.is_empty() { None } else { Some(time.to_string()) })
    }
}

/// Check if a path is in a git repository
pub fn is_git_repo(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    let dir = if path.is_dir() { path } else { path.parent().unwrap_or(path) };

    Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .current_dir(dir)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
