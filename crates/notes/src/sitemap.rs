//! Sitemap and robots.txt for the built website
//!
//! Runs after the site generator has built the site: the page list comes from
//! the sidebars file written by the website data step.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/java/streams/</loc>
//!     <lastmod>2024-01-02T03:04:05.678Z</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::config::Config;
use crate::frontmatter::{iso_timestamp, parse_timestamp, FrontMatter};
use crate::sidebar::{flatten_doc_ids, read_sidebars_file};
use crate::website::WebsiteLayout;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Single URL entry in the sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    /// Path below the site URL, with leading and trailing slash
    pub path: String,
    pub lastmod: Option<String>,
}

/// Entries for the site root and every document id
///
/// Document paths end with a slash, the site redirects the bare form.
pub fn sitemap_entries(doc_ids: &[String], docs_dir: &Path) -> Result<Vec<UrlEntry>> {
    let mut entries = vec![UrlEntry {
        path: "/".to_string(),
        lastmod: None,
    }];

    for id in doc_ids {
        entries.push(UrlEntry {
            path: format!("/{}/", id),
            lastmod: last_modified(docs_dir, id)?,
        });
    }

    Ok(entries)
}

fn last_modified(docs_dir: &Path, doc_id: &str) -> Result<Option<String>> {
    let doc_path = docs_dir.join(format!("{}.md", doc_id));
    let contents = fs::read_to_string(&doc_path)
        .with_context(|| format!("Failed to read {}", doc_path.display()))?;

    let (front_matter, _) = FrontMatter::parse(&contents, doc_id)?;
    Ok(front_matter
        .get("last_modified")
        .map(|value| parse_timestamp(&value).map(iso_timestamp).unwrap_or(value)))
}

pub fn render_sitemap(site_url: &str, entries: &[UrlEntry]) -> String {
    let site_url = site_url.trim_end_matches('/');
    let mut xml = String::with_capacity(4096);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{}">"#, SITEMAP_NS));
    xml.push('\n');

    for entry in entries {
        xml.push_str("  <url>\n");
        let loc = format!("{}{}", site_url, entry.path);
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&loc)));
        if let Some(lastmod) = &entry.lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", escape_xml(lastmod)));
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

pub fn render_robots_txt(site_url: &str) -> String {
    format!("Sitemap: {}/sitemap.xml", site_url.trim_end_matches('/'))
}

/// Write `sitemap.xml` and `robots.txt` into the website build directory
pub fn generate_sitemap(config: &Config) -> Result<PathBuf> {
    let layout = WebsiteLayout::from_config(config);

    let sidebars = read_sidebars_file(&layout.sidebars)?;
    let doc_ids = flatten_doc_ids(&sidebars.docs);
    let entries = sitemap_entries(&doc_ids, &layout.docs)?;
    tracing::debug!(urls = entries.len(), "collected sitemap entries");

    fs::create_dir_all(&layout.build)
        .with_context(|| format!("Failed to create directory {}", layout.build.display()))?;

    let sitemap_path = layout.build.join("sitemap.xml");
    fs::write(&sitemap_path, render_sitemap(&config.website.site_url, &entries))
        .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;

    let robots_path = layout.build.join("robots.txt");
    fs::write(&robots_path, render_robots_txt(&config.website.site_url))
        .with_context(|| format!("Failed to write {}", robots_path.display()))?;

    Ok(sitemap_path)
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
