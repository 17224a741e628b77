//! Front matter (leading `---` metadata block) parsing and rewriting

use crate::errors::Violation;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use regex::Regex;
use serde_yaml::{Mapping, Value};

/// Keys a note may carry in its front matter
pub const KNOWN_KEYS: [&str; 3] = ["tree_title", "description", "last_modified"];

/// Parsed front matter of a note
#[derive(Debug, Clone, Default)]
pub struct FrontMatter {
    /// Raw text between the delimiters, `None` when the note has no block
    block: Option<String>,
    fields: Mapping,
}

/// Front matter fields required to publish a note
#[derive(Debug, Clone, PartialEq)]
pub struct PublishMeta {
    pub description: String,
    pub last_modified: DateTime<Utc>,
    pub tree_title: Option<String>,
}

/// Split content into its raw front matter block and the body after it
///
/// The block must open on the very first line and close with a line that is
/// exactly `---`. Without a closing delimiter the content has no front matter.
pub fn split(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content.strip_prefix("---") else {
        return (None, content);
    };
    let Some(rest) = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let block = rest[..offset].trim_end_matches(['\r', '\n']);
            return (Some(block), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, content)
}

impl FrontMatter {
    /// Parse the front matter of `content`, returning it with the remaining body
    pub fn parse<'a>(content: &'a str, path: &str) -> Result<(FrontMatter, &'a str), Violation> {
        let (block, body) = split(content);

        let Some(block) = block else {
            return Ok((FrontMatter::default(), body));
        };

        let fields = if block.trim().is_empty() {
            Mapping::new()
        } else {
            match serde_yaml::from_str::<Value>(block) {
                Ok(Value::Mapping(mapping)) => mapping,
                Ok(Value::Null) => Mapping::new(),
                Ok(_) => {
                    return Err(Violation::metadata(path, "front matter is not a key-value block"))
                }
                Err(e) => {
                    return Err(Violation::metadata(path, format!("invalid front matter: {}", e)))
                }
            }
        };

        let front_matter = FrontMatter {
            block: Some(block.to_string()),
            fields,
        };
        Ok((front_matter, body))
    }

    /// Keys in their original order
    pub fn keys(&self) -> Vec<String> {
        self.fields.keys().filter_map(scalar_to_string).collect()
    }

    /// Scalar value of a key; empty strings and nulls count as absent
    pub fn get(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .and_then(scalar_to_string)
            .filter(|v| !v.is_empty())
    }

    /// Check the fields needed to publish a note
    pub fn validate_for_publish(&self, path: &str) -> Result<PublishMeta, Violation> {
        let description = self
            .get("description")
            .ok_or_else(|| Violation::metadata(path, "front matter doesn't contain description"))?;

        let last_modified = self.get("last_modified").ok_or_else(|| {
            Violation::metadata(path, "front matter doesn't contain last_modified")
        })?;

        let is_unknown = |key: &String| !KNOWN_KEYS.contains(&key.as_str());
        if let Some(unknown) = self.keys().into_iter().find(is_unknown) {
            return Err(Violation::metadata(
                path,
                format!("unexpected attribute {} in front matter", unknown),
            ));
        }

        let last_modified = parse_timestamp(&last_modified).ok_or_else(|| {
            Violation::metadata(path, format!("invalid last_modified value {}", last_modified))
        })?;

        Ok(PublishMeta {
            description,
            last_modified,
            tree_title: self.get("tree_title"),
        })
    }

    /// Block text with `key` set to `value`
    ///
    /// An existing `key:` line is replaced in place, every other line is kept
    /// verbatim. A missing key is appended at the end of the block.
    pub fn with_field(&self, key: &str, value: &str) -> String {
        let line = format!("{}: {}", key, value);
        let block = self.block.as_deref().unwrap_or("");

        // escaped key, the pattern is always valid
        let re = Regex::new(&format!(r"(?m)^{}:.*$", regex::escape(key))).unwrap();

        if re.is_match(block) {
            re.replace(block, regex::NoExpand(&line)).into_owned()
        } else if block.trim().is_empty() {
            line
        } else {
            format!("{}\n{}", block.trim_end(), line)
        }
    }
}

/// Assemble a document from a front matter block and a body
pub fn render(block: &str, body: &str) -> String {
    format!("---\n{}\n---\n\n{}", block, body.trim_start_matches(['\r', '\n']))
}

/// Format a timestamp the way note front matter stores it
/// (`2024-01-02T03:04:05.678Z`)
pub fn iso_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Quote a value for a YAML line only when it needs it
pub fn yaml_scalar(value: &str) -> String {
    match serde_yaml::to_string(value) {
        Ok(s) => s.trim_end().to_string(),
        Err(_) => format!("{:?}", value),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
