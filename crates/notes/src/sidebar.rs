//! Sidebar navigation for the site generator
//!
//! The sidebar file is a CommonJS module exporting one JSON object, so the
//! site generator can `require` it and the sitemap pass can read it back.

use crate::config::WebsiteConfig;
use crate::errors::Violation;
use crate::tree::ContentNode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const MODULE_PREFIX: &str = "module.exports = ";

/// A leaf document id or a labelled group of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SidebarItem {
    Doc(String),
    Category(Category),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "category")]
pub struct Category {
    pub label: String,
    pub items: Vec<SidebarItem>,
}

/// Content of the sidebar file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sidebars {
    pub docs: Vec<SidebarItem>,
}

impl SidebarItem {
    pub fn category(label: impl Into<String>, items: Vec<SidebarItem>) -> Self {
        SidebarItem::Category(Category {
            label: label.into(),
            items,
        })
    }
}

/// Sidebar items for the children of `node`, in tree order
pub fn build_sidebar(node: &ContentNode) -> Vec<SidebarItem> {
    node.children()
        .iter()
        .map(|child| match child {
            ContentNode::Directory(dir) => SidebarItem::category(&dir.title, build_sidebar(child)),
            ContentNode::File(file) => SidebarItem::Doc(file.doc_id()),
        })
        .collect()
}

/// Full sidebars for a tree, with the configured leading category
pub fn build_sidebars(tree: &ContentNode, website: &WebsiteConfig) -> Sidebars {
    let mut docs = Vec::new();

    if !website.about_items.is_empty() {
        let items = website.about_items.iter().cloned().map(SidebarItem::Doc).collect();
        docs.push(SidebarItem::category(&website.about_label, items));
    }

    docs.extend(build_sidebar(tree));
    Sidebars { docs }
}

/// Every document id, depth-first
pub fn flatten_doc_ids(items: &[SidebarItem]) -> Vec<String> {
    let mut ids = Vec::new();

    for item in items {
        match item {
            SidebarItem::Doc(id) => ids.push(id.clone()),
            SidebarItem::Category(category) => ids.extend(flatten_doc_ids(&category.items)),
        }
    }

    ids
}

pub fn render_sidebars_file(sidebars: &Sidebars) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    sidebars.serialize(&mut serializer).context("Failed to serialize sidebars")?;

    let json = String::from_utf8(buf).context("Serialized sidebars are not UTF-8")?;
    Ok(format!("{}{};\n", MODULE_PREFIX, json))
}

pub fn parse_sidebars_file(contents: &str, path: &str) -> Result<Sidebars, Violation> {
    let json = contents
        .trim()
        .strip_prefix(MODULE_PREFIX)
        .ok_or_else(|| Violation::environment(path, "sidebars file does not export an object"))?
        .trim_end_matches(';');

    serde_json::from_str(json)
        .map_err(|e| Violation::environment(path, format!("unexpected sidebars content: {}", e)))
}

pub fn write_sidebars_file(path: &Path, sidebars: &Sidebars) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(path, render_sidebars_file(sidebars)?)
        .with_context(|| format!("Failed to write {}", path.display()))
}

pub fn read_sidebars_file(path: &Path) -> Result<Sidebars> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parse_sidebars_file(&contents, &path.display().to_string())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DirectoryNode, FileNode};

    fn file(path: &[&str]) -> ContentNode {
        ContentNode::File(FileNode {
            name: path.last().unwrap().to_string(),
            relative_path: path.iter().map(|s| s.to_string()).collect(),
            title: "t".to_string(),
            tree_title: None,
        })
    }

    fn sample_tree() -> ContentNode {
        let java = DirectoryNode {
            name: "Java".to_string(),
            relative_path: vec!["Java".to_string()],
            title: "Java stuff".to_string(),
            children: vec![file(&["Java", "Streams.md"])],
        };
        ContentNode::Directory(DirectoryNode {
            name: "notes".to_string(),
            relative_path: Vec::new(),
            title: "Notes".to_string(),
            children: vec![ContentNode::Directory(java), file(&["top.md"])],
        })
    }

    #[test]
    fn test_build_sidebar() {
        let items = build_sidebar(&sample_tree());
        assert_eq!(
            items,
            vec![
                SidebarItem::category(
                    "Java stuff",
                    vec![SidebarItem::Doc("java/streams".to_string())]
                ),
                SidebarItem::Doc("top".to_string()),
            ]
        );
    }

    #[test]
    fn test_about_category() {
        let mut website = WebsiteConfig::default();
        assert_eq!(build_sidebars(&sample_tree(), &website).docs.len(), 2);

        website.about_items = vec!["about/about".to_string()];
        let sidebars = build_sidebars(&sample_tree(), &website);
        assert_eq!(
            sidebars.docs[0],
            SidebarItem::category("About", vec![SidebarItem::Doc("about/about".to_string())])
        );
        assert_eq!(flatten_doc_ids(&sidebars.docs), vec!["about/about", "java/streams", "top"]);
    }

    #[test]
    fn test_render_sidebars_file() {
        let sidebars = Sidebars {
            docs: build_sidebar(&sample_tree()),
        };
        let rendered = render_sidebars_file(&sidebars).unwrap();

        assert!(rendered.starts_with("module.exports = {\n    \"docs\": [\n        {\n"));
        assert!(rendered
            .contains("\"type\": \"category\",\n            \"label\": \"Java stuff\""));

        let parsed = parse_sidebars_file(&rendered, "sidebars.js").unwrap();
        assert_eq!(parsed, sidebars);
    }

    #[test]
    fn test_parse_bad_sidebars_file() {
        let err = parse_sidebars_file("const x = 1;", "sidebars.js").unwrap_err();
        assert_eq!(err.kind(), crate::errors::ViolationKind::Environment);

        assert!(parse_sidebars_file("module.exports = {\"other\": []}", "sidebars.js").is_err());
    }
}
