//! Sidebar command implementation

use anyhow::{Context, Result};
use notes::config::Config;
use notes::sidebar::build_sidebars;
use notes::tree::build_tree;

/// Print the sidebars as JSON, without writing anything
pub fn print_sidebar(config: &Config) -> Result<()> {
    let tree = build_tree(config).context("Failed to build notes tree")?;
    let sidebars = build_sidebars(&tree, &config.website);

    println!("{}", serde_json::to_string_pretty(&sidebars)?);
    Ok(())
}
