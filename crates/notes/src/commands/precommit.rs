//! Precommit command implementation

use super::{lint_collection, stamp_notes, write_tree};
use anyhow::Result;
use notes::config::Config;

/// The pre-commit flow: indexes first, so the linter sees fresh ones
pub fn precommit(config: &Config) -> Result<()> {
    write_tree(config)?;
    println!();
    lint_collection(config)?;
    println!();
    stamp_notes(config)
}
