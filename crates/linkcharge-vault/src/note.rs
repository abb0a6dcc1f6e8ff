//! Reading metadata out of a single note.

use crate::error::{Result, VaultError};
use linkcharge_core::Metadata;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::warn;

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s(\[,])#([\p{L}\p{N}_/-]+)").expect("tag regex"));

static CODE_BLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^```[\s\S]*?^```|`[^`\n]+`").expect("code block regex"));

/// Split a note into its front-matter block and body.
///
/// The block must open on the first line with `---` and close with a line
/// that is exactly `---`. Returns `None` when there is no such block.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse a front-matter block into a map of JSON values.
///
/// An empty block is an empty map; anything other than a mapping is an
/// error.
pub fn parse_frontmatter(yaml: &str) -> Result<HashMap<String, Value>> {
    let value: Value =
        serde_yaml::from_str(yaml).map_err(|e| VaultError::Frontmatter(e.to_string()))?;
    match value {
        Value::Null => Ok(HashMap::new()),
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(VaultError::Frontmatter(format!(
            "expected a mapping, found {}",
            kind_of(&other)
        ))),
    }
}

/// Inline `#tags` of a note body, without the `#`, deduplicated in order of
/// appearance. Code spans and fenced blocks are skipped, as are purely
/// numeric tags.
pub fn inline_tags(body: &str) -> Vec<String> {
    let code: Vec<_> = CODE_BLOCK_REGEX.find_iter(body).map(|m| m.range()).collect();
    let mut tags: Vec<String> = Vec::new();
    for cap in TAG_REGEX.captures_iter(body) {
        let Some(tag) = cap.get(1) else { continue };
        if code.iter().any(|r| r.contains(&tag.start())) {
            continue;
        }
        let tag = tag.as_str();
        if tag.chars().all(|c| c.is_ascii_digit()) || tags.iter().any(|t| t == tag) {
            continue;
        }
        tags.push(tag.to_string());
    }
    tags
}

/// Metadata of a note.
///
/// A malformed front-matter block is logged and treated as empty so the note
/// still resolves as a link target.
pub fn parse_note(path: &str, content: &str) -> Metadata {
    let (frontmatter, body) = match split_frontmatter(content) {
        Some((yaml, body)) => {
            let frontmatter = parse_frontmatter(yaml).unwrap_or_else(|e| {
                warn!("Ignoring front-matter of {}: {}", path, e);
                HashMap::new()
            });
            (frontmatter, body)
        }
        None => (HashMap::new(), content),
    };

    Metadata {
        frontmatter,
        tags: inline_tags(body),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_frontmatter() {
        let (yaml, body) = split_frontmatter("---\nstatus: active\n---\nBody\n").unwrap();
        assert_eq!(yaml, "status: active\n");
        assert_eq!(body, "Body\n");

        assert!(split_frontmatter("No front-matter").is_none());
        assert!(split_frontmatter("---\nnever closed\n").is_none());
    }

    #[test]
    fn test_split_frontmatter_crlf() {
        let (yaml, body) = split_frontmatter("---\r\na: 1\r\n---\r\nBody").unwrap();
        assert_eq!(yaml, "a: 1\r\n");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_parse_frontmatter_values() {
        let map = parse_frontmatter("status: active\ntags: [a, b]\ndue: 2024-03-01\n").unwrap();
        assert_eq!(map["status"], json!("active"));
        assert_eq!(map["tags"], json!(["a", "b"]));
        assert_eq!(map["due"], json!("2024-03-01"));

        assert!(parse_frontmatter("").unwrap().is_empty());
        assert!(matches!(parse_frontmatter("- a\n- b"), Err(VaultError::Frontmatter(_))));
    }

    #[test]
    fn test_inline_tags() {
        let body = concat!(
            "# Heading\nSome #project/alpha text #todo and #todo again.\n",
            "`#code` #2024\n```\n#fenced\n```\n(#paren)",
        );
        assert_eq!(inline_tags(body), vec!["project/alpha", "todo", "paren"]);
    }

    #[test]
    fn test_parse_note_survives_bad_frontmatter() {
        let metadata = parse_note("Bad.md", "---\n: : :\n  - [\n---\n#tag");
        assert!(metadata.frontmatter.is_empty());
        assert_eq!(metadata.tags, vec!["tag"]);
    }
}
