//! Front-matter parsing
//!
//! Content files may start with a header block fenced by `---` lines. The
//! header is a flat list of `key: value` lines; a value written as
//! `[a, b, c]` is read as a list. There is no escaping, nesting or multi-line
//! value support, and a header that cannot be read simply yields no fields.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FRONT_MATTER_RE: Regex =
        Regex::new(r"(?s)\A---\s*\n(.*?)\n---\s*(?:\n|\z)(.*)\z").unwrap();
}

/// Characters stripped from both ends of a header value
const QUOTES: [char; 2] = ['"', '\''];

/// A single header value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.len() >= 2 && raw.starts_with('[') && raw.ends_with(']') {
            let items = raw[1..raw.len() - 1]
                .split(',')
                .map(|item| item.trim().trim_matches(QUOTES).trim().to_string())
                .filter(|item| !item.is_empty())
                .collect();
            FieldValue::List(items)
        } else {
            FieldValue::Scalar(raw.trim_matches(QUOTES).to_string())
        }
    }
}

/// Header fields of a content file, in the order they were written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: IndexMap<String, FieldValue>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> (Self, &str) {
        let Some(caps) = FRONT_MATTER_RE.captures(content) else {
            return (FrontMatter::default(), content);
        };

        let header = caps.get(1).map_or("", |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());

        let mut fields = IndexMap::new();
        for line in header.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            fields.insert(key.to_string(), FieldValue::parse(value));
        }

        tracing::trace!("Parsed {} front-matter fields", fields.len());
        (Self { fields }, body)
    }

    /// Raw value of a field
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Scalar value of a field. Empty scalars and lists count as absent.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        match self.fields.get(key)? {
            FieldValue::Scalar(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// List value of a field. A non-empty scalar is read as a one-element list.
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        match self.fields.get(key)? {
            FieldValue::List(items) => Some(items.clone()),
            FieldValue::Scalar(s) if !s.is_empty() => Some(vec![s.clone()]),
            FieldValue::Scalar(_) => None,
        }
    }

    /// First present scalar among several spellings of the same field
    pub fn first_scalar(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.scalar(key))
    }

    /// First present list among several spellings of the same field
    pub fn first_list(&self, keys: &[&str]) -> Option<Vec<String>> {
        keys.iter().find_map(|key| self.list(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_and_body() {
        let content = r#"---
title: "Securing the Remote Workplace"
date: 2024-02-10
tags: [Security, 'Remote Work', DevOps]
---

# Heading

Body text.
"#;

        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.len(), 3);
        assert_eq!(fm.scalar("title"), Some("Securing the Remote Workplace"));
        assert_eq!(fm.scalar("date"), Some("2024-02-10"));
        assert_eq!(
            fm.list("tags"),
            Some(vec![
                "Security".to_string(),
                "Remote Work".to_string(),
                "DevOps".to_string()
            ])
        );
        assert_eq!(body, "# Heading\n\nBody text.\n");
    }

    #[test]
    fn test_no_header_returns_input() {
        let content = "# Just markdown\n\nNo header here.";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_header_must_start_the_text() {
        let content = "intro\n---\ntitle: x\n---\nbody";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_unclosed_header_is_body() {
        let content = "---\ntitle: Lost\n\nNo closing delimiter.";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_value_split_on_first_colon() {
        let content = "---\ngithubUrl: https://github.com/example\n---\n";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.scalar("githubUrl"), Some("https://github.com/example"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_header_only_file() {
        let (fm, body) = FrontMatter::parse("---\ntitle: x\n---");
        assert_eq!(fm.scalar("title"), Some("x"));
        assert_eq!(body, "");

        let (fm, body) = FrontMatter::parse("---\ntitle: y\n---  ");
        assert_eq!(fm.scalar("title"), Some("y"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_lines_without_colon_ignored() {
        let content = "---\njust some words\n: no key\ntitle: Kept\n---\nbody\n";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.keys().collect::<Vec<_>>(), vec!["title"]);
    }

    #[test]
    fn test_crlf_header() {
        let content = "---\r\ntitle: Windows\r\ntags: [a, b]\r\n---\r\nBody\r\n";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.scalar("title"), Some("Windows"));
        assert_eq!(fm.list("tags"), Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_empty_values() {
        let content = "---\nexcerpt:\ntags: []\n---\nbody";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.get("excerpt"), Some(&FieldValue::Scalar(String::new())));
        assert_eq!(fm.scalar("excerpt"), None);
        assert_eq!(fm.list("excerpt"), None);
        assert_eq!(fm.list("tags"), Some(Vec::new()));
    }

    #[test]
    fn test_scalar_promoted_to_list() {
        let content = "---\ntags: Notes\n---\nbody";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.list("tags"), Some(vec!["Notes".to_string()]));
        assert_eq!(fm.scalar("tags"), Some("Notes"));
    }

    #[test]
    fn test_repeated_key_overwrites() {
        let content = "---\ntitle: First\nstatus: Beta\ntitle: Second\n---\nbody";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.scalar("title"), Some("Second"));
        assert_eq!(fm.keys().collect::<Vec<_>>(), vec!["title", "status"]);
    }

    #[test]
    fn test_alias_lookup() {
        let content = "---\ndemo: https://demo.example\nrepo: https://git.example\n---\n";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(
            fm.first_scalar(&["liveUrl", "demo"]),
            Some("https://demo.example")
        );
        assert_eq!(
            fm.first_scalar(&["githubUrl", "github", "repo"]),
            Some("https://git.example")
        );
        assert_eq!(fm.first_list(&["technologies", "tech"]), None);
    }
}
