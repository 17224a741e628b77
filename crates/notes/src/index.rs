//! Index file generation
//!
//! The root index keeps everything before the notes tree marker and gets the
//! rendered tree after it. Every other directory index is regenerated from
//! scratch on each run.

use crate::config::Config;
use crate::errors::Violation;
use crate::tree::{ContentNode, DirectoryNode};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Marker in the root index after which the notes tree is written
pub const NOTES_TREE_MARKER: &str = "<!-- auto-generated notes tree starts here -->";

/// First line of every generated directory index
pub const AUTO_GENERATED_BANNER: &str = "<!-- this entire file is auto-generated -->";

/// Line index of the title heading in a generated directory index
pub const DIRECTORY_TITLE_LINE: usize = 2;

const INDENT: &str = "    ";

/// Render the children of `node` as a nested Markdown bullet list
///
/// Link targets are relative to `node`. Directories are shown in bold with
/// their own children indented one level below them.
pub fn render_index(node: &ContentNode) -> String {
    let base = node.relative_path().len();
    render_lines(node.children(), base).join("\n")
}

fn render_lines(nodes: &[ContentNode], base: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for node in nodes {
        let target = node.relative_path()[base..].join("/");
        let label = if node.is_directory() {
            format!("**{}**", node.label())
        } else {
            node.label().to_string()
        };
        lines.push(format!("- [{}]({})", label, target));

        if node.is_directory() {
            let nested = render_lines(node.children(), base);
            lines.extend(nested.into_iter().map(|line| INDENT.to_string() + &line));
        }
    }

    lines
}

/// Full content of a generated directory index
pub fn render_directory_index(dir: &DirectoryNode) -> String {
    let node = ContentNode::Directory(dir.clone());
    format!("{}\n\n# {}\n\n{}\n", AUTO_GENERATED_BANNER, dir.title, render_index(&node))
}

/// Root index content with the tree placed after the marker
pub fn splice_root_index(
    current: &str,
    tree: &ContentNode,
    path: &str,
) -> Result<String, Violation> {
    let marker_at = current
        .find(NOTES_TREE_MARKER)
        .ok_or_else(|| Violation::environment(path, "No notes tree marker found"))?;

    Ok(format!("{}{}\n\n{}\n", &current[..marker_at], NOTES_TREE_MARKER, render_index(tree)))
}

/// Rewrite the root index file below its marker
pub fn write_root_index(tree: &ContentNode, config: &Config) -> Result<PathBuf> {
    let index_path = config.root.join(&config.index_filename);

    if !index_path.is_file() {
        return Err(
            Violation::environment(&config.index_filename, "Root index file not found").into()
        );
    }

    let current = fs::read_to_string(&index_path)
        .with_context(|| format!("Failed to read {}", index_path.display()))?;
    let updated = splice_root_index(&current, tree, &config.index_filename)?;

    fs::write(&index_path, updated)
        .with_context(|| format!("Failed to write {}", index_path.display()))?;

    Ok(index_path)
}

/// Overwrite the index file of every non-root directory
pub fn write_directory_indexes(tree: &ContentNode, config: &Config) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let directories = tree.directories();
    for dir in directories.into_iter().filter(|d| !d.relative_path.is_empty()) {
        let index_path = directory_index_path(&config.root, dir, config);
        tracing::debug!(path = %index_path.display(), "writing directory index");

        fs::write(&index_path, render_directory_index(dir))
            .with_context(|| format!("Failed to write {}", index_path.display()))?;
        written.push(index_path);
    }

    Ok(written)
}

/// Write the root index and all directory indexes
pub fn write_indexes(tree: &ContentNode, config: &Config) -> Result<Vec<PathBuf>> {
    let mut written = vec![write_root_index(tree, config)?];
    written.extend(write_directory_indexes(tree, config)?);
    Ok(written)
}

fn directory_index_path(root: &Path, dir: &DirectoryNode, config: &Config) -> PathBuf {
    let mut path = root.to_path_buf();
    path.extend(&dir.relative_path);
    path.join(&config.index_filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::FileNode;

    fn file(path: &[&str], title: &str) -> ContentNode {
        ContentNode::File(FileNode {
            name: path.last().unwrap().to_string(),
            relative_path: path.iter().map(|s| s.to_string()).collect(),
            title: title.to_string(),
            tree_title: None,
        })
    }

    fn dir(path: &[&str], title: &str, children: Vec<ContentNode>) -> DirectoryNode {
        DirectoryNode {
            name: path.last().unwrap_or(&"notes").to_string(),
            relative_path: path.iter().map(|s| s.to_string()).collect(),
            title: title.to_string(),
            children,
        }
    }

    fn sample_tree() -> ContentNode {
        let streams = file(&["java", "basics", "streams.md"], "Streams");
        let basics = dir(&["java", "basics"], "Basics", vec![streams]);
        let generics = file(&["java", "generics.md"], "Generics");
        let java = dir(&["java"], "Java", vec![ContentNode::Directory(basics), generics]);
        let top = file(&["top.md"], "Top level");
        ContentNode::Directory(dir(&[], "Notes", vec![ContentNode::Directory(java), top]))
    }

    #[test]
    fn test_render_index_root() {
        let expected = "\
- [**Java**](java)
    - [**Basics**](java/basics)
        - [Streams](java/basics/streams.md)
    - [Generics](java/generics.md)
- [Top level](top.md)";
        assert_eq!(render_index(&sample_tree()), expected);
    }

    #[test]
    fn test_render_index_subtree_is_relative() {
        let tree = sample_tree();
        let java = &tree.children()[0];
        let expected = "\
- [**Basics**](basics)
    - [Streams](basics/streams.md)
- [Generics](generics.md)";
        assert_eq!(render_index(java), expected);
    }

    #[test]
    fn test_render_index_uses_tree_title() {
        let node = ContentNode::File(FileNode {
            name: "a.md".to_string(),
            relative_path: vec!["a.md".to_string()],
            title: "A very long title".to_string(),
            tree_title: Some("Short".to_string()),
        });
        let root = ContentNode::Directory(dir(&[], "Notes", vec![node]));
        assert_eq!(render_index(&root), "- [Short](a.md)");
    }

    #[test]
    fn test_render_directory_index() {
        let tree = sample_tree();
        let ContentNode::Directory(java) = &tree.children()[0] else { panic!("not a directory") };
        let content = render_directory_index(java);

        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], AUTO_GENERATED_BANNER);
        assert_eq!(lines[DIRECTORY_TITLE_LINE], "# Java");
        assert!(content.ends_with("- [Generics](generics.md)\n"));
    }

    #[test]
    fn test_splice_root_index_keeps_prefix() {
        let current = format!("# Notes\n\nIntro text.\n\n{}\n\nstale tree", NOTES_TREE_MARKER);
        let updated = splice_root_index(&current, &sample_tree(), "README.md").unwrap();

        assert!(updated.starts_with("# Notes\n\nIntro text.\n\n"));
        assert!(!updated.contains("stale tree"));
        assert!(updated.contains(&format!("{}\n\n- [**Java**](java)", NOTES_TREE_MARKER)));
        assert!(updated.ends_with("- [Top level](top.md)\n"));

        // applying twice gives the same text
        let again = splice_root_index(&updated, &sample_tree(), "README.md").unwrap();
        assert_eq!(updated, again);
    }

    #[test]
    fn test_splice_root_index_without_marker() {
        let err = splice_root_index("# Notes\n", &sample_tree(), "README.md").unwrap_err();
        assert_eq!(err.kind(), crate::errors::ViolationKind::Environment);
    }
}
