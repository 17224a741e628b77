//! Sitemap command implementation

use super::display_path;
use anyhow::{Context, Result};
use notes::config::Config;
use notes::sitemap::generate_sitemap;
use notes::theme;

pub fn write_sitemap(config: &Config) -> Result<()> {
    println!("{}\n", theme::heading("Generating sitemap..."));

    let path = generate_sitemap(config).context("Failed to generate sitemap")?;

    println!(
        "{} {} {}",
        theme::success_symbol(),
        theme::success("Wrote"),
        theme::path(&display_path(&config.root, &path))
    );
    Ok(())
}
