//! Notes tree: walking the collection and building an ordered content tree
//!
//! The tree mirrors the folder hierarchy of the collection. Hidden and
//! underscore-prefixed directories (images live in `_img`) are skipped, as
//! are excluded directory names. Only Markdown files that are not an index
//! file count as notes.

use crate::config::Config;
use crate::errors::Violation;
use crate::frontmatter::{self, FrontMatter};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Which group of entries comes first within a directory
///
/// Each group keeps file-name order. The same rule drives the index files,
/// the sidebar and the website data, so all projections list a directory
/// identically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryOrder {
    #[default]
    DirectoriesFirst,
    FilesFirst,
}

impl EntryOrder {
    /// Concatenate both groups in this order
    pub fn arrange<T>(self, mut directories: Vec<T>, mut files: Vec<T>) -> Vec<T> {
        match self {
            EntryOrder::DirectoriesFirst => {
                directories.append(&mut files);
                directories
            }
            EntryOrder::FilesFirst => {
                files.append(&mut directories);
                files
            }
        }
    }
}

/// Kind of an included filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// An included entry of a notes directory
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// A file or directory of the notes collection
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    Directory(DirectoryNode),
    File(FileNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryNode {
    pub name: String,
    /// Segments from the collection root; empty for the root itself
    pub relative_path: Vec<String>,
    pub title: String,
    pub children: Vec<ContentNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileNode {
    pub name: String,
    pub relative_path: Vec<String>,
    pub title: String,
    /// Shorter label from the `tree_title` front matter field
    pub tree_title: Option<String>,
}

impl ContentNode {
    pub fn name(&self) -> &str {
        match self {
            ContentNode::Directory(dir) => &dir.name,
            ContentNode::File(file) => &file.name,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentNode::Directory(dir) => &dir.title,
            ContentNode::File(file) => &file.title,
        }
    }

    /// Text shown for this node in navigation lists
    pub fn label(&self) -> &str {
        match self {
            ContentNode::Directory(dir) => &dir.title,
            ContentNode::File(file) => file.tree_title.as_deref().unwrap_or(&file.title),
        }
    }

    pub fn relative_path(&self) -> &[String] {
        match self {
            ContentNode::Directory(dir) => &dir.relative_path,
            ContentNode::File(file) => &file.relative_path,
        }
    }

    /// Relative path joined with forward slashes
    pub fn path_string(&self) -> String {
        self.relative_path().join("/")
    }

    pub fn children(&self) -> &[ContentNode] {
        match self {
            ContentNode::Directory(dir) => &dir.children,
            ContentNode::File(_) => &[],
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, ContentNode::Directory(_))
    }

    /// All file nodes below this node, depth-first in tree order
    pub fn files(&self) -> Vec<&FileNode> {
        let mut files = Vec::new();
        collect_files(self, &mut files);
        files
    }

    /// All directory nodes, this one included, depth-first in tree order
    pub fn directories(&self) -> Vec<&DirectoryNode> {
        let mut dirs = Vec::new();
        collect_directories(self, &mut dirs);
        dirs
    }
}

fn collect_files<'a>(node: &'a ContentNode, out: &mut Vec<&'a FileNode>) {
    match node {
        ContentNode::File(file) => out.push(file),
        ContentNode::Directory(dir) => dir.children.iter().for_each(|c| collect_files(c, out)),
    }
}

fn collect_directories<'a>(node: &'a ContentNode, out: &mut Vec<&'a DirectoryNode>) {
    if let ContentNode::Directory(dir) = node {
        out.push(dir);
        dir.children.iter().for_each(|c| collect_directories(c, out));
    }
}

impl FileNode {
    pub fn path_string(&self) -> String {
        self.relative_path.join("/")
    }

    /// Site generator document id: lower-cased path without extension
    pub fn doc_id(&self) -> String {
        let path = self.path_string();
        path.strip_suffix(".md").unwrap_or(&path).to_lowercase()
    }
}

impl DirectoryNode {
    pub fn path_string(&self) -> String {
        self.relative_path.join("/")
    }
}

/// Whether a directory belongs to the notes tree
pub fn is_notes_directory(name: &str, config: &Config) -> bool {
    !name.starts_with('.') && !name.starts_with('_') && !config.is_excluded_dir(name)
}

/// Whether a file is a note
pub fn is_note_file(name: &str, config: &Config) -> bool {
    name.ends_with(".md")
        && name != config.index_filename
        && !config.excluded_files.iter().any(|excluded| excluded == name)
}

/// Included entries of one directory, arranged by the configured order
pub fn walk_entries(dir: &Path, config: &Config) -> Result<Vec<WalkEntry>> {
    let mut directories = Vec::new();
    let mut files = Vec::new();

    let walker = WalkDir::new(dir).min_depth(1).max_depth(1);
    for entry in walker.sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to read directory {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().to_string();

        if entry.file_type().is_dir() {
            if is_notes_directory(&name, config) {
                directories.push(WalkEntry {
                    name,
                    path: entry.path().to_path_buf(),
                    kind: EntryKind::Directory,
                });
            }
        } else if is_note_file(&name, config) {
            files.push(WalkEntry {
                name,
                path: entry.path().to_path_buf(),
                kind: EntryKind::File,
            });
        }
    }

    Ok(config.entry_order.arrange(directories, files))
}

/// Title of a note: the first body line, which must be a level-1 heading
pub fn title_from_note(content: &str, path: &str) -> Result<String, Violation> {
    let (_, body) = frontmatter::split(content);
    let first_line = body.trim_start().lines().next().unwrap_or("");

    match first_line.strip_prefix("# ") {
        Some(title) if !title.trim().is_empty() => Ok(title.trim_end().to_string()),
        _ => Err(Violation::structural(path, "No title found for Markdown file")),
    }
}

/// Title of a directory index: the first level-1 heading anywhere in it
pub fn title_from_index(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim_end().to_string())
        .filter(|title| !title.is_empty())
}

/// Build the notes tree rooted at `config.root`
pub fn build_tree(config: &Config) -> Result<ContentNode> {
    let root = &config.root;
    let name = root
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| ".".to_string());

    let dir = build_directory(root, name, Vec::new(), config)?;
    Ok(ContentNode::Directory(dir))
}

fn build_directory(
    absolute_path: &Path,
    name: String,
    relative_path: Vec<String>,
    config: &Config,
) -> Result<DirectoryNode> {
    let index_path = absolute_path.join(&config.index_filename);
    let title = if index_path.is_file() {
        let content = fs::read_to_string(&index_path)
            .with_context(|| format!("Failed to read {}", index_path.display()))?;
        title_from_index(&content).unwrap_or_else(|| name.clone())
    } else {
        name.clone()
    };

    let mut children = Vec::new();

    for entry in walk_entries(absolute_path, config)? {
        let mut child_path = relative_path.clone();
        child_path.push(entry.name.clone());

        match entry.kind {
            EntryKind::Directory => {
                let dir = build_directory(&entry.path, entry.name, child_path, config)?;
                children.push(ContentNode::Directory(dir));
            }
            EntryKind::File => {
                let file = build_file(&entry.path, entry.name, child_path)?;
                children.push(ContentNode::File(file));
            }
        }
    }

    tracing::debug!(
        directory = %relative_path.join("/"),
        children = children.len(),
        "built tree node"
    );

    Ok(DirectoryNode {
        name,
        relative_path,
        title,
        children,
    })
}

fn build_file(absolute_path: &Path, name: String, relative_path: Vec<String>) -> Result<FileNode> {
    let display_path = relative_path.join("/");
    let content = fs::read_to_string(absolute_path)
        .with_context(|| format!("Failed to read {}", absolute_path.display()))?;

    let title = title_from_note(&content, &display_path)?;
    let (front_matter, _) = FrontMatter::parse(&content, &display_path)?;

    Ok(FileNode {
        name,
        relative_path,
        title,
        tree_title: front_matter.get("tree_title"),
    })
}
