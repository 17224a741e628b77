//! Tree command implementation

use super::display_path;
use anyhow::{Context, Result};
use notes::config::Config;
use notes::index::write_indexes;
use notes::theme;
use notes::tree::build_tree;

/// Rebuild the root index tree and all directory indexes
pub fn write_tree(config: &Config) -> Result<()> {
    println!("{}\n", theme::heading("Writing notes tree..."));

    let tree = build_tree(config).context("Failed to build notes tree")?;
    let written = write_indexes(&tree, config).context("Failed to write index files")?;

    for path in &written {
        println!("  {} {}", theme::info_symbol(), theme::path(&display_path(&config.root, path)));
    }

    println!(
        "\n{} {}",
        theme::success_symbol(),
        theme::success(&format!("Wrote {} index file(s)", written.len()))
    );
    Ok(())
}
