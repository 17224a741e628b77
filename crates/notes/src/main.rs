//! Notes collection CLI tool

use anyhow::Result;
use clap::Parser;
use notes::config::Config;
use notes::errors::{print_error, print_error_with_suggestion, suggestion_for, violation_of};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::*;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match Config::load(&cli.root) {
        Ok(config) => config,
        Err(e) => {
            print_error_with_suggestion(
                "Failed to load configuration",
                &e,
                &format!("Check '{}/{}'", cli.root, notes::config::CONFIG_FILE),
            );
            std::process::exit(1);
        }
    };
    tracing::debug!(root = %config.root.display(), "loaded configuration");

    if let Err(e) = run(cli.command, &config) {
        match violation_of(&e).and_then(suggestion_for) {
            Some(suggestion) => print_error_with_suggestion("Command failed", &e, suggestion),
            None => print_error("Command failed", &e),
        }
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Tree => write_tree(config),
        Commands::Lint => lint_collection(config),
        Commands::Stamp => stamp_notes(config),
        Commands::Precommit => precommit(config),
        Commands::Website => write_website(config),
        Commands::Sitemap => write_sitemap(config),
        Commands::Sidebar => print_sidebar(config),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tfmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
