//! Stamp command implementation

use anyhow::{Context, Result};
use notes::config::Config;
use notes::errors::Violation;
use notes::git::{is_git_repo, Git};
use notes::stamp::normalize_all;
use notes::theme;

/// Bring `last_modified` of every note in line with git
pub fn stamp_notes(config: &Config) -> Result<()> {
    println!("{}\n", theme::heading("Updating last_modified..."));

    if !is_git_repo(&config.root) {
        return Err(Violation::environment(
            config.root.display().to_string(),
            "not inside a git repository",
        )
        .into());
    }

    let git = Git::new(&config.root);
    let report = normalize_all(config, &git).context("Failed to update front matter")?;

    println!("  {} {} staged note(s) stamped", theme::info_symbol(), report.stamped);
    println!("  {} {} note(s) filled from history", theme::info_symbol(), report.backfilled);
    println!("  {} {} note(s) unchanged", theme::info_symbol(), report.unchanged);
    println!("\n{} {}", theme::success_symbol(), theme::success("Front matter up to date"));
    Ok(())
}
