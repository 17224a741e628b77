//! Configuration with layered defaults

use crate::tree::EntryOrder;
use anyhow::{Context, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Location of the optional config file, relative to the notes root
pub const CONFIG_FILE: &str = ".notes/config.toml";

/// Application configuration with layered defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the notes collection
    pub root: PathBuf,

    /// Name of the per-directory index file
    pub index_filename: String,

    /// Markdown files that are never treated as notes
    pub excluded_files: Vec<String>,

    /// Glob patterns for directory names that are never walked
    pub excluded_dirs: Vec<String>,

    /// Whether directories or files come first within a directory
    pub entry_order: EntryOrder,

    /// Website (site generator) settings
    pub website: WebsiteConfig,
}

/// Settings for the generated website data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteConfig {
    /// Site generator directory, relative to the notes root
    pub dir: PathBuf,

    /// Public URL of the site, without trailing slash
    pub site_url: String,

    /// URL prefix under which the notes sources are browsable
    pub source_url_prefix: String,

    /// Label of the leading sidebar category
    pub about_label: String,

    /// Doc ids listed in the leading sidebar category (omitted when empty)
    pub about_items: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index_filename: "README.md".to_string(),
            excluded_files: vec!["CONTRIBUTING.md".to_string()],
            excluded_dirs: vec!["node_modules".to_string()],
            entry_order: EntryOrder::default(),
            website: WebsiteConfig::default(),
        }
    }
}

impl Default for WebsiteConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("_website"),
            site_url: "https://learning-notes.example.com".to_string(),
            source_url_prefix: "https://github.com/example/learning-notes/blob/master/"
                .to_string(),
            about_label: "About".to_string(),
            about_items: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration for a notes root: defaults, then `.notes/config.toml`
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut config = Config {
            root: root.to_path_buf(),
            ..Config::default()
        };

        if let Some(file_config) = Self::load_from_file(root)? {
            config.merge(file_config);
        }

        for pattern in &config.excluded_dirs {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid excluded_dirs pattern '{}'", pattern))?;
        }

        Ok(config)
    }

    /// Load configuration from .notes/config.toml
    fn load_from_file(root: &Path) -> Result<Option<PartialConfig>> {
        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: PartialConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Merge partial config into this one (partial takes precedence for specified fields)
    fn merge(&mut self, other: PartialConfig) {
        if let Some(val) = other.index_filename {
            self.index_filename = val;
        }
        if let Some(val) = other.excluded_files {
            self.excluded_files = val;
        }
        if let Some(val) = other.excluded_dirs {
            self.excluded_dirs = val;
        }
        if let Some(val) = other.entry_order {
            self.entry_order = val;
        }
        if let Some(website) = other.website {
            if let Some(val) = website.dir {
                self.website.dir = val;
            }
            if let Some(val) = website.site_url {
                self.website.site_url = val.trim_end_matches('/').to_string();
            }
            if let Some(val) = website.source_url_prefix {
                self.website.source_url_prefix = val;
            }
            if let Some(val) = website.about_label {
                self.website.about_label = val;
            }
            if let Some(val) = website.about_items {
                self.website.about_items = val;
            }
        }
    }

    /// Whether a directory name matches one of the excluded patterns
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .any(|p| p.matches(name))
    }

    /// Absolute-ish path of the website directory
    pub fn website_dir(&self) -> PathBuf {
        self.root.join(&self.website.dir)
    }
}

/// Partial configuration for deserializing from TOML with optional fields
#[derive(Debug, Deserialize)]
struct PartialConfig {
    index_filename: Option<String>,
    excluded_files: Option<Vec<String>>,
    excluded_dirs: Option<Vec<String>>,
    entry_order: Option<EntryOrder>,
    website: Option<PartialWebsiteConfig>,
}

#[derive(Debug, Deserialize)]
struct PartialWebsiteConfig {
    dir: Option<PathBuf>,
    site_url: Option<String>,
    source_url_prefix: Option<String>,
    about_label: Option<String>,
    about_items: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.index_filename, "README.md");
        assert_eq!(config.excluded_files, vec!["CONTRIBUTING.md"]);
        assert_eq!(config.entry_order, EntryOrder::DirectoriesFirst);
        assert_eq!(config.website.dir, PathBuf::from("_website"));
        assert!(config.website.about_items.is_empty());
    }

    #[test]
    fn test_load_without_file() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.root, temp.path());
        assert_eq!(config.website_dir(), temp.path().join("_website"));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".notes")).unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            r#"
entry_order = "files-first"
excluded_dirs = ["node_modules", "build*"]

[website]
site_url = "https://notes.example.org/"
about_items = ["about/about"]
"#,
        )
        .unwrap();

        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.entry_order, EntryOrder::FilesFirst);
        assert_eq!(config.website.site_url, "https://notes.example.org");
        assert_eq!(config.website.about_items, vec!["about/about"]);
        // untouched fields keep their defaults
        assert_eq!(config.index_filename, "README.md");
        assert_eq!(config.website.about_label, "About");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".notes")).unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "entry_order = [").unwrap();

        assert!(Config::load(temp.path()).is_err());
    }

    #[test]
    fn test_invalid_glob_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".notes")).unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "excluded_dirs = [\"[\"]").unwrap();

        let err = Config::load(temp.path()).unwrap_err();
        assert!(err.to_string().contains("excluded_dirs"));
    }

    #[test]
    fn test_is_excluded_dir() {
        let config = Config {
            excluded_dirs: vec!["node_modules".to_string(), "build*".to_string()],
            ..Default::default()
        };
        assert!(config.is_excluded_dir("node_modules"));
        assert!(config.is_excluded_dir("build-output"));
        assert!(!config.is_excluded_dir("java"));
    }
}
