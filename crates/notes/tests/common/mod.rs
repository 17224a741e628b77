// Test infrastructure and utilities for notes crate tests

#![allow(dead_code)]

use notes::config::Config;
use notes::index::{AUTO_GENERATED_BANNER, NOTES_TREE_MARKER};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A note that passes every check and can be published
pub fn publishable_note(title: &str) -> String {
    format!(
        "---\ndescription: Notes on {title}\nlast_modified: 2021-06-01T08:00:00.000Z\n---\n\n\
         # {title}\n\n## Contents\n\n-   [Basics](#basics)\n\n\
         ## Basics\n\nSome text about {title}.\n"
    )
}

/// Generated directory index with a custom title
pub fn directory_index(title: &str) -> String {
    format!("{}\n\n# {}\n", AUTO_GENERATED_BANNER, title)
}

/// Builder for a notes collection in a temporary directory
pub struct TestCollection {
    temp: TempDir,
}

impl TestCollection {
    /// Collection with a root index carrying the tree marker
    pub fn new() -> Self {
        let collection = Self {
            temp: TempDir::new().unwrap(),
        };
        collection.file("README.md", &format!("# Notes\n\nIntro.\n\n{}\n", NOTES_TREE_MARKER))
    }

    pub fn file(self, relative_path: &str, content: &str) -> Self {
        let path = self.temp.path().join(relative_path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    pub fn note(self, relative_path: &str, title: &str) -> Self {
        self.file(relative_path, &publishable_note(title))
    }

    pub fn directory(self, relative_path: &str, title: &str) -> Self {
        self.file(&format!("{}/README.md", relative_path), &directory_index(title))
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn path(&self, relative_path: &str) -> PathBuf {
        self.temp.path().join(relative_path)
    }

    pub fn read(&self, relative_path: &str) -> String {
        fs::read_to_string(self.path(relative_path)).unwrap()
    }

    pub fn config(&self) -> Config {
        Config::load(self.root()).unwrap()
    }
}
