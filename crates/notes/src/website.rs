//! Writing the site generator input from the notes collection
//!
//! Old output is removed first, so every run starts from a clean slate.

use crate::config::Config;
use crate::errors::Violation;
use crate::sidebar::{build_sidebars, write_sidebars_file};
use crate::transform::{transform, TransformOptions, IMAGES_FOLDER};
use crate::tree::build_tree;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Paths inside the website directory
#[derive(Debug, Clone)]
pub struct WebsiteLayout {
    pub docs: PathBuf,
    pub static_docs: PathBuf,
    pub images: PathBuf,
    pub sidebars: PathBuf,
    pub build: PathBuf,
}

impl WebsiteLayout {
    pub fn new(website_dir: &Path) -> Self {
        Self {
            docs: website_dir.join("docs"),
            static_docs: website_dir.join("docs-static"),
            images: website_dir.join("static").join("img").join("from-notes"),
            sidebars: website_dir.join("sidebars.js"),
            build: website_dir.join("build"),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.website_dir())
    }
}

/// What a website data run wrote
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WebsiteReport {
    pub docs: usize,
    pub static_docs: usize,
    pub images: usize,
}

pub fn write_website_data(config: &Config) -> Result<WebsiteReport> {
    let layout = WebsiteLayout::from_config(config);
    let mut report = WebsiteReport::default();

    remove_old_data(&layout)?;

    if layout.static_docs.is_dir() {
        report.static_docs = copy_tree(&layout.static_docs, &layout.docs, false)?;
    }

    let tree = build_tree(config)?;
    write_sidebars_file(&layout.sidebars, &build_sidebars(&tree, &config.website))?;

    let options = TransformOptions {
        source_url_prefix: config.website.source_url_prefix.clone(),
    };

    for file in tree.files() {
        let relative_path = file.path_string();
        write_doc(config, &layout, &relative_path, &options)?;
        report.docs += 1;
    }

    for dir in tree.directories() {
        let mut images_dir = config.root.clone();
        images_dir.extend(&dir.relative_path);
        images_dir.push(IMAGES_FOLDER);

        if images_dir.is_dir() {
            let target = layout.images.join(dir.path_string().to_lowercase());
            report.images += copy_tree(&images_dir, &target, true)?;
        }
    }

    Ok(report)
}

fn remove_old_data(layout: &WebsiteLayout) -> Result<()> {
    for dir in [&layout.docs, &layout.images] {
        if dir.exists() {
            fs::remove_dir_all(dir)
                .with_context(|| format!("Failed to remove {}", dir.display()))?;
        }
    }
    Ok(())
}

fn write_doc(
    config: &Config,
    layout: &WebsiteLayout,
    relative_path: &str,
    options: &TransformOptions,
) -> Result<()> {
    let source = config.root.join(relative_path);
    let content = fs::read_to_string(&source)
        .with_context(|| format!("Failed to read {}", source.display()))?;

    let transformed = transform(&content, relative_path, options)?;

    for image in &transformed.images {
        if !config.root.join(image).is_file() {
            let message = format!("image {} not found", image);
            return Err(Violation::link_shape(relative_path, message).into());
        }
    }

    let target = layout.docs.join(relative_path.to_lowercase());
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(&target, transformed.content)
        .with_context(|| format!("Failed to write {}", target.display()))?;

    tracing::debug!(source = relative_path, target = %target.display(), "wrote doc");
    Ok(())
}

/// Copy a directory tree, returning the number of files copied
fn copy_tree(from: &Path, to: &Path, lowercase: bool) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(from).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to read directory {}", from.display()))?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .with_context(|| format!("Unexpected path {}", entry.path().display()))?;
        let relative = if lowercase {
            PathBuf::from(relative.to_string_lossy().to_lowercase())
        } else {
            relative.to_path_buf()
        };
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create directory {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!("Failed to copy {} to {}", entry.path().display(), target.display())
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}
