//! Turning a note into a document for the site generator
//!
//! The transformation is a pure function of the note text and its path:
//!
//! 1. the front matter is validated,
//! 2. the table of contents (from `## Contents` to the next `##` heading) is
//!    dropped, the site generator renders its own,
//! 3. links and images are rewritten on the Markdown syntax tree,
//! 4. the title line becomes generator front matter plus the description,
//! 5. a footer pointing to the note source is appended.

use crate::errors::Violation;
use crate::frontmatter::{iso_timestamp, yaml_scalar, FrontMatter, PublishMeta};
use crate::lint::CONTENTS_HEADING;
use anyhow::{Context, Result};
use comrak::nodes::{AstNode, NodeValue};
use comrak::{format_commonmark, parse_document, Arena, Options};
use regex::Regex;
use std::sync::OnceLock;

/// URL prefix under which note images are served
pub const IMAGES_URL_PREFIX: &str = "/img/from-notes";

/// Folder next to a note that holds its images (`_img/<note name>/`)
pub const IMAGES_FOLDER: &str = "_img";

/// Settings that do not come from the note itself
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Prefix of the URL where the note source can be viewed
    pub source_url_prefix: String,
}

/// Result of transforming one note
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    /// Document content for the site generator
    pub content: String,
    /// Images referenced by the note, relative to the collection root
    pub images: Vec<String>,
}

const GITHUB_ICON: &str = r##"<svg class="embedded-fa-icon"><use href="#github"></use></svg>"##;
const EXTERNAL_LINK_ICON: &str =
    r##"<svg class="embedded-fa-icon"><use href="#external-link-alt"></use></svg>"##;

fn scheme_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.\-]*:|//)").unwrap())
}

/// Transform a note located at `relative_path` (forward slashes)
pub fn transform(
    content: &str,
    relative_path: &str,
    options: &TransformOptions,
) -> Result<Transformed> {
    let (front_matter, body) = FrontMatter::parse(content, relative_path)?;
    let meta = front_matter.validate_for_publish(relative_path)?;

    let body = strip_table_of_contents(body.trim_start(), relative_path)?;
    let (title, rest) = split_title(&body, relative_path)?;
    let (rest, images) = rewrite_links(rest, relative_path)?;

    if title.contains('`') {
        let message = "code in note title is not supported";
        return Err(Violation::structural(relative_path, message).into());
    }

    let mut output = generator_front_matter(&title, &meta);
    output.push_str(&format!("\n\n_{}_\n\n", meta.description));
    output.push_str(rest.trim_start());
    output.push('\n');
    output.push_str(&footer(relative_path, &meta, options));
    output.push('\n');

    Ok(Transformed {
        content: output,
        images,
    })
}

/// Remove everything from the Contents heading up to the next `##` heading
pub fn strip_table_of_contents(body: &str, path: &str) -> Result<String, Violation> {
    let mut offset = 0;
    let mut start = None;

    for line in body.split_inclusive('\n') {
        let text = line.trim_end_matches(['\r', '\n']);

        match start {
            None if text == CONTENTS_HEADING => start = Some(offset),
            Some(from) if text.starts_with("## ") => {
                return Ok(format!("{}{}", &body[..from], &body[offset..]));
            }
            _ => {}
        }

        offset += line.len();
    }

    match start {
        Some(from) => Ok(body[..from].to_string()),
        None => Err(Violation::structural(path, "No 'Contents' heading found")),
    }
}

fn split_title<'a>(body: &'a str, path: &str) -> Result<(String, &'a str), Violation> {
    let (first_line, rest) = body.split_once('\n').unwrap_or((body, ""));

    let title = first_line
        .trim_end_matches('\r')
        .strip_prefix("# ")
        .ok_or_else(|| Violation::structural(path, "No title found for Markdown file"))?;

    Ok((title.trim_end().to_string(), rest))
}

fn generator_front_matter(title: &str, meta: &PublishMeta) -> String {
    let mut lines = vec![
        "---".to_string(),
        format!("title: {}", yaml_scalar(title)),
        format!("description: {}", yaml_scalar(&meta.description)),
        format!("last_modified: {}", iso_timestamp(meta.last_modified)),
    ];

    if let Some(label) = &meta.tree_title {
        lines.push(format!("sidebar_label: {}", yaml_scalar(label)));
    }

    lines.push("---".to_string());
    lines.join("\n")
}

fn footer(relative_path: &str, meta: &PublishMeta, options: &TransformOptions) -> String {
    let source_url = format!("{}{}", options.source_url_prefix, relative_path.replace('\\', "/"));
    let source_link = external_link_html(&source_url, "View this note on GitHub");
    let source_part = format!("<p>{} <strong>{}</strong></p>", GITHUB_ICON, source_link);
    let modified_part = format!(
        "<p><strong>Last modified:</strong> {}</p>",
        meta.last_modified.format("%Y-%m-%d")
    );

    format!(r#"<div class="github-footer">{}{}</div>"#, source_part, modified_part)
}

/// Inline HTML for a link that opens in a new browsing context
pub fn external_link_html(url: &str, text: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank" rel="nofollow noopener noreferrer">{} {}</a>"#,
        escape_html(url),
        escape_html(text),
        EXTERNAL_LINK_ICON
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Whether a link URL points outside the collection
pub fn is_external(url: &str) -> bool {
    scheme_regex().is_match(url)
}

/// Parse and render options: GitHub flavored Markdown, as the site renders it
pub fn markdown_options() -> Options {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options
}

/// Rewrite images and links of a Markdown fragment
///
/// Returns the re-rendered Markdown and the images it references.
pub fn rewrite_links(markdown: &str, relative_path: &str) -> Result<(String, Vec<String>)> {
    let arena = Arena::new();
    let options = markdown_options();
    let root = parse_document(&arena, markdown, &options);

    let mut images = Vec::new();
    let nodes: Vec<&AstNode> = root.descendants().collect();

    for node in nodes {
        let external_url = {
            let mut data = node.data.borrow_mut();
            match &mut data.value {
                NodeValue::Image(link) => {
                    let (url, source) = rewrite_image_url(&link.url, relative_path)?;
                    link.url = url;
                    images.push(source);
                    None
                }
                NodeValue::Link(link) if is_external(&link.url) => Some(link.url.clone()),
                NodeValue::Link(link) => {
                    link.url = rewrite_internal_url(&link.url, relative_path);
                    None
                }
                _ => None,
            }
        };

        if let Some(url) = external_url {
            let text = single_text_child(node, &url, relative_path)?;
            for child in node.children().collect::<Vec<_>>() {
                child.detach();
            }
            node.data.borrow_mut().value =
                NodeValue::HtmlInline(external_link_html(&url, &text));
        }
    }

    let mut rendered = Vec::new();
    format_commonmark(root, &options, &mut rendered)
        .with_context(|| format!("Failed to render Markdown for {}", relative_path))?;
    let rendered = String::from_utf8(rendered)
        .with_context(|| format!("Rendered Markdown for {} is not UTF-8", relative_path))?;

    Ok((rendered, images))
}

/// Plain text of a link whose children are all text nodes
///
/// The parser splits plain text at characters such as `&`, `!` or `[`, so
/// several adjacent text nodes still count as one text child.
fn single_text_child<'a>(
    node: &'a AstNode<'a>,
    url: &str,
    path: &str,
) -> Result<String, Violation> {
    let children: Vec<&AstNode> = node.children().collect();
    let mut text = String::new();
    let mut all_text = !children.is_empty();

    for child in &children {
        match &child.data.borrow().value {
            NodeValue::Text(literal) => text.push_str(literal),
            _ => all_text = false,
        }
    }

    if all_text {
        return Ok(text);
    }

    let kinds: Vec<&str> =
        children.iter().map(|c| node_kind(&c.data.borrow().value)).collect();
    Err(Violation::link_shape(
        path,
        format!(
            "only links with single 'text' child are supported, found [{}] for link with URL {}",
            kinds.join(","),
            url
        ),
    ))
}

fn node_kind(value: &NodeValue) -> &'static str {
    match value {
        NodeValue::Text(_) => "text",
        NodeValue::Emph => "emphasis",
        NodeValue::Strong => "strong",
        NodeValue::Code(_) => "inlineCode",
        NodeValue::Image(_) => "image",
        NodeValue::HtmlInline(_) => "html",
        NodeValue::SoftBreak | NodeValue::LineBreak => "break",
        _ => "other",
    }
}

/// New URL for an image, plus the image path relative to the collection root
///
/// Images must live in `_img/<note name>/` next to the note.
/// The recorded source path is percent-decoded, the new URL keeps the
/// encoding of the original.
pub fn rewrite_image_url(
    url: &str,
    relative_path: &str,
) -> Result<(String, String), Violation> {
    let (folder, note_name) = match relative_path.rsplit_once('/') {
        Some((folder, name)) => (folder, name),
        None => ("", relative_path),
    };
    let stem = note_name.strip_suffix(".md").unwrap_or(note_name);

    let (image_folder, image_name) = url.rsplit_once('/').unwrap_or((".", url));
    let expected =
        [format!("./{}/{}", IMAGES_FOLDER, stem), format!("{}/{}", IMAGES_FOLDER, stem)];

    if image_name.is_empty() || !expected.iter().any(|e| e == image_folder) {
        return Err(Violation::link_shape(relative_path, format!("unexpected image URL {}", url)));
    }

    let file_name = urlencoding::decode(image_name).map_err(|_| {
        Violation::link_shape(relative_path, format!("image URL {} is not valid UTF-8", url))
    })?;

    let note_without_extension = relative_path.strip_suffix(".md").unwrap_or(relative_path);
    let new_url =
        format!("{}/{}/{}", IMAGES_URL_PREFIX, note_without_extension, image_name).to_lowercase();

    let source = if folder.is_empty() {
        format!("{}/{}/{}", IMAGES_FOLDER, stem, file_name)
    } else {
        format!("{}/{}/{}/{}", folder, IMAGES_FOLDER, stem, file_name)
    };

    Ok((new_url, source))
}

/// Absolute, lower-cased, extension-less site path for an internal link
pub fn rewrite_internal_url(url: &str, relative_path: &str) -> String {
    if url.starts_with('#') {
        return url.to_string();
    }

    let (target, anchor) = match url.split_once('#') {
        Some((target, anchor)) => (target, Some(anchor)),
        None => (url, None),
    };

    let mut segments: Vec<&str> = relative_path.split('/').collect();
    segments.pop();

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    let joined = joined.strip_suffix(".md").unwrap_or(&joined);

    let mut new_url = format!("/{}", joined);
    if let Some(anchor) = anchor {
        new_url.push('#');
        new_url.push_str(anchor);
    }
    new_url.to_lowercase()
}
