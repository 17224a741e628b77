//! CLI argument parsing

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "notes")]
#[command(about = "Notes collection tree, lint and website tools", long_about = None)]
#[command(after_help = "Use 'notes <command> --help' for more information about a command.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root of the notes collection
    #[arg(short, long, default_value = ".", global = true)]
    pub root: String,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the root index tree and every directory index
    #[command(visible_alias = "gen-tree")]
    Tree,

    /// Check notes and directory indexes for structural problems
    #[command(visible_alias = "check")]
    Lint,

    /// Update last_modified in note front matter from git
    Stamp,

    /// Run tree, lint and stamp, in that order
    Precommit,

    /// Write docs, images and sidebars for the site generator
    Website,

    /// Write sitemap.xml and robots.txt into the built website
    Sitemap,

    /// Print the sidebar navigation as JSON
    Sidebar,
}
