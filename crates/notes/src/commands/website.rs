//! Website command implementation

use anyhow::{Context, Result};
use notes::config::Config;
use notes::theme;
use notes::website::write_website_data;

pub fn write_website(config: &Config) -> Result<()> {
    println!("{}\n", theme::heading("Writing website data..."));

    let report = write_website_data(config).context("Failed to write website data")?;

    println!("  {} {} doc(s) from notes", theme::info_symbol(), report.docs);
    println!("  {} {} static doc(s)", theme::info_symbol(), report.static_docs);
    println!("  {} {} image(s)", theme::info_symbol(), report.images);
    println!(
        "\n{} {} {}",
        theme::success_symbol(),
        theme::success("Website data written to"),
        theme::path(&config.website_dir().display().to_string())
    );
    Ok(())
}
