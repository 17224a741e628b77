//! Lint command implementation

use anyhow::{Context, Result};
use notes::config::Config;
use notes::lint::lint;
use notes::theme;

pub fn lint_collection(config: &Config) -> Result<()> {
    println!("{}\n", theme::heading("Checking notes..."));

    let report = lint(config).context("Notes check failed")?;

    println!(
        "{} {}",
        theme::success_symbol(),
        theme::success(&format!(
            "Checked {} note(s) and {} directory index(es)",
            report.files, report.directories
        ))
    );
    Ok(())
}
