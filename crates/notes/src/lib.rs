//! Tooling for a Markdown notes collection
//!
//! This library builds the notes tree, keeps index files and front matter in
//! shape, and turns the collection into input for a static site generator.

pub mod config;
pub mod errors;
pub mod frontmatter;
pub mod git;
pub mod index;
pub mod lint;
pub mod sidebar;
pub mod sitemap;
pub mod stamp;
pub mod theme;
pub mod transform;
pub mod tree;
pub mod website;

pub use config::Config;
pub use errors::{Violation, ViolationKind};
pub use frontmatter::FrontMatter;
pub use sidebar::{SidebarItem, Sidebars};
pub use transform::{transform, TransformOptions, Transformed};
pub use tree::{build_tree, ContentNode, DirectoryNode, EntryOrder, FileNode};

/// Re-export common error types
pub use anyhow::{Error, Result};
