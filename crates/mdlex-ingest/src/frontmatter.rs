//! Front matter extraction.
//!
//! A document may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Notes
//! tags: [a, b]
//! ---
//! # Body starts here
//! ```
//!
//! Extraction never fails. Text without a block yields empty metadata and the
//! whole input as body; a block that does not parse as a YAML mapping yields
//! empty metadata plus a warning, with the body chosen by [`MalformedPolicy`].

use crate::yaml;
use mdlex_config::{ExtractConfig, MalformedPolicy};
use mdlex_core::Metadata;
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

fn front_matter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n(.*))?\z")
            .expect("front matter pattern is valid")
    })
}

/// Result of splitting one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub metadata: Metadata,
    pub body: String,
    /// Set when a block was found but could not be parsed.
    pub warning: Option<String>,
}

impl Extraction {
    fn plain(text: &str) -> Self {
        Self {
            metadata: Metadata::new(),
            body: text.to_string(),
            warning: None,
        }
    }

    pub fn into_parts(self) -> (Metadata, String) {
        (self.metadata, self.body)
    }
}

/// Splits documents into front matter and body.
#[derive(Debug, Clone, Default)]
pub struct FrontMatterExtractor {
    on_malformed: MalformedPolicy,
}

impl FrontMatterExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(on_malformed: MalformedPolicy) -> Self {
        Self { on_malformed }
    }

    pub fn from_config(config: &ExtractConfig) -> Self {
        Self::with_policy(config.on_malformed)
    }

    pub fn extract(&self, raw: &str) -> Extraction {
        let Some(caps) = front_matter_pattern().captures(raw) else {
            return Extraction::plain(raw);
        };

        let block = caps.get(1).map_or("", |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());

        match parse_block(block) {
            Ok(metadata) => Extraction {
                metadata,
                body: body.to_string(),
                warning: None,
            },
            Err(message) => {
                warn!("Failed to parse YAML front matter: {}", message);
                let kept = match self.on_malformed {
                    MalformedPolicy::KeepFullText => raw,
                    MalformedPolicy::BodyOnly => body,
                };
                Extraction {
                    metadata: Metadata::new(),
                    body: kept.to_string(),
                    warning: Some(message),
                }
            }
        }
    }
}

/// Extract with the default policy.
pub fn extract(raw: &str) -> Extraction {
    FrontMatterExtractor::new().extract(raw)
}

fn parse_block(block: &str) -> Result<Metadata, String> {
    if block.trim().is_empty() {
        return Ok(Metadata::new());
    }
    yaml::parse_mapping(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdlex_core::{metadata_to_json, MetaValue, TypeTag};

    #[test]
    fn test_extract_frontmatter() {
        let content = "---\ntitle: Test\ndate: 2023-01-01\n---\n# Content\nTest content.";

        let extraction = extract(content);
        assert!(extraction.warning.is_none());
        assert_eq!(
            extraction.metadata.get("title"),
            Some(&MetaValue::String("Test".into()))
        );
        assert_eq!(
            extraction.metadata.get("date").and_then(|v| v.type_tag()),
            Some(TypeTag::Date)
        );
        assert_eq!(extraction.body, "# Content\nTest content.");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just Content\nNo frontmatter here.";
        let (metadata, body) = extract(content).into_parts();
        assert!(metadata.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_unclosed_block_is_body() {
        let content = "---\ntitle: Test\n# Content";
        let extraction = extract(content);
        assert!(extraction.metadata.is_empty());
        assert_eq!(extraction.body, content);
        assert!(extraction.warning.is_none());
    }

    #[test]
    fn test_block_must_start_the_document() {
        let content = "Intro\n---\ntitle: Test\n---\nBody";
        let extraction = extract(content);
        assert!(extraction.metadata.is_empty());
        assert_eq!(extraction.body, content);
    }

    #[test]
    fn test_malformed_block_keeps_full_text() {
        let content = "---\ntitle: [unclosed\n---\nBody text";
        let extraction = extract(content);
        assert!(extraction.metadata.is_empty());
        assert_eq!(extraction.body, content);
        assert!(extraction.warning.is_some());
    }

    #[test]
    fn test_malformed_block_body_only() {
        let content = "---\ntitle: [unclosed\n---\nBody text";
        let extraction =
            FrontMatterExtractor::with_policy(MalformedPolicy::BodyOnly).extract(content);
        assert!(extraction.metadata.is_empty());
        assert_eq!(extraction.body, "Body text");
        assert!(extraction.warning.is_some());
    }

    #[test]
    fn test_non_mapping_block_is_malformed() {
        let content = "---\n- a\n- b\n---\nBody";
        let extraction = extract(content);
        assert!(extraction.metadata.is_empty());
        assert_eq!(extraction.body, content);
        assert!(extraction.warning.unwrap().contains("a list"));
    }

    #[test]
    fn test_empty_block_is_empty_mapping() {
        for content in ["---\n---\nBody", "---\n\n---\nBody", "---\nnull\n---\nBody"] {
            let extraction = extract(content);
            assert!(extraction.metadata.is_empty(), "{:?}", content);
            assert_eq!(extraction.body, "Body", "{:?}", content);
            assert!(extraction.warning.is_none(), "{:?}", content);
        }
    }

    #[test]
    fn test_block_without_body() {
        let extraction = extract("---\ntitle: Only\n---");
        assert_eq!(extraction.metadata.len(), 1);
        assert_eq!(extraction.body, "");
    }

    #[test]
    fn test_crlf_line_endings() {
        let extraction = extract("---\r\ntitle: Windows\r\n---\r\nBody\r\n");
        assert_eq!(
            extraction.metadata.get("title"),
            Some(&MetaValue::String("Windows".into()))
        );
        assert_eq!(extraction.body, "Body\r\n");
    }

    #[test]
    fn test_value_types() {
        let content = r#"---
count: 42
ratio: 0.5
draft: false
tags: [a, b]
author:
  name: Ada
quoted: "hello"
empty:
stamp: 2023-01-01 12:00:00
---
"#;
        let metadata = extract(content).metadata;
        let tag = |k: &str| metadata.get(k).and_then(|v| v.type_tag());

        assert_eq!(tag("count"), Some(TypeTag::Integer));
        assert_eq!(tag("ratio"), Some(TypeTag::Float));
        assert_eq!(tag("draft"), Some(TypeTag::Boolean));
        assert_eq!(tag("tags"), Some(TypeTag::List));
        assert_eq!(tag("author"), Some(TypeTag::Mapping));
        assert_eq!(tag("quoted"), Some(TypeTag::String));
        assert_eq!(tag("stamp"), Some(TypeTag::Date));
        assert_eq!(metadata.get("empty"), Some(&MetaValue::Null));
        assert_eq!(tag("empty"), None);
    }

    #[test]
    fn test_non_string_keys() {
        let metadata = extract("---\n1: one\ntrue: yes\n---\n").metadata;
        assert!(metadata.contains_key("1"));
        assert!(metadata.contains_key("true"));
    }

    #[test]
    fn test_quoted_date_is_string() {
        let metadata = extract("---\nversion: \"2023-01-01\"\nreleased: 2023-01-01\n---\n").metadata;
        assert_eq!(
            metadata.get("version"),
            Some(&MetaValue::String("2023-01-01".into()))
        );
        assert_eq!(
            metadata.get("released").and_then(|v| v.type_tag()),
            Some(TypeTag::Date)
        );
    }

    #[test]
    fn test_yaml_11_booleans() {
        let content = "---\ndraft: yes\npublic: no\ncomments: on\nindexed: Off\nword: 'yes'\n---\n";
        let metadata = extract(content).metadata;
        assert_eq!(metadata.get("draft"), Some(&MetaValue::Boolean(true)));
        assert_eq!(metadata.get("public"), Some(&MetaValue::Boolean(false)));
        assert_eq!(metadata.get("comments"), Some(&MetaValue::Boolean(true)));
        assert_eq!(metadata.get("indexed"), Some(&MetaValue::Boolean(false)));
        assert_eq!(metadata.get("word"), Some(&MetaValue::String("yes".into())));
    }

    #[test]
    fn test_reserialized_metadata_extracts_the_same() {
        let content = r#"---
title: Round trip
count: 7
ratio: 2.25
published: true
date: 2023-01-02
tags:
  - x
  - y
---
Body
"#;
        let first = extract(content);
        let json = metadata_to_json(&first.metadata).unwrap();

        let rendered = format!("---\n{}---\n{}", serde_yaml::to_string(&json).unwrap(), first.body);
        let second = extract(&rendered);

        assert!(second.warning.is_none());
        assert_eq!(metadata_to_json(&second.metadata).unwrap(), json);
        assert_eq!(second.body, first.body);
        assert_eq!(json["date"], "2023-01-02");
    }
}
