//! Metadata derivation
//!
//! Turns parsed front matter plus a markdown body into a complete [`Post`] or
//! [`Project`]. Every field a header leaves out is filled from a fallback, so
//! a document always comes out with a title, an id and a date.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{FrontMatter, Post, Project};

/// Assumed reading speed for read-time estimates
pub const WORDS_PER_MINUTE: usize = 200;

/// Number of body characters kept for a derived excerpt
pub const EXCERPT_CHARS: usize = 200;

const UNTITLED_POST: &str = "Untitled Post";
const UNTITLED_PROJECT: &str = "Untitled Project";
const DEFAULT_STATUS: &str = "Development";
const CATCH_ALL_TAG: &str = "Technology";

/// Tag -> trigger substrings, matched against the lower-cased title and body
const TAG_KEYWORDS: &[(&str, &[&str])] = &[
    ("JavaScript", &["javascript", "js", "react", "vue", "angular", "node"]),
    ("React", &["react", "jsx", "hooks", "component"]),
    (
        "AI",
        &["ai", "artificial intelligence", "machine learning", "neural network"],
    ),
    ("Security", &["security", "cybersecurity", "encryption", "auth"]),
    ("Frontend", &["frontend", "ui", "ux", "css", "html"]),
    ("Backend", &["backend", "api", "database", "server"]),
    ("Performance", &["performance", "optimization", "speed"]),
    ("DevOps", &["devops", "deployment", "ci/cd", "docker"]),
    ("Tools", &["tools", "development", "productivity"]),
];

lazy_static! {
    static ref FIRST_HEADING_RE: Regex = Regex::new(r"(?m)^#[ \t]+(.+?)\s*$").unwrap();
    static ref BYLINE_DATE_RE: Regex = Regex::new(r"\*Published on (.+?) •").unwrap();
    static ref BYLINE_READ_TIME_RE: Regex = Regex::new(r"• (.+? read)\*").unwrap();
    static ref HEADING_LINE_RE: Regex = Regex::new(r"(?m)^#.+$").unwrap();
    static ref EMPHASIS_RE: Regex = Regex::new(r"\*.*?\*").unwrap();
    static ref CODE_BLOCK_RE: Regex = Regex::new(r"(?s)```.*?```").unwrap();
    static ref NEWLINES_RE: Regex = Regex::new(r"\n+").unwrap();
}

/// How fields missing from a header are filled in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Derivation {
    /// Only the header is trusted; missing tags stay empty
    #[default]
    Explicit,
    /// Missing title, date, read time and tags are inferred from the body
    Inferred,
}

/// Values a project falls back to when its header is silent
#[derive(Debug, Clone)]
pub struct ProjectDefaults {
    pub image: String,
}

/// Builds documents from front matter and body text
#[derive(Debug, Clone)]
pub struct Deriver {
    strategy: Derivation,
    /// Fixed "today"; the clock is read at derivation time when unset
    today: Option<NaiveDate>,
}

impl Deriver {
    /// Create a deriver that dates undated documents with the current day
    pub fn new(strategy: Derivation) -> Self {
        Self {
            strategy,
            today: None,
        }
    }

    /// Create a deriver with a fixed notion of "today"
    pub fn with_today(strategy: Derivation, today: NaiveDate) -> Self {
        Self {
            strategy,
            today: Some(today),
        }
    }

    /// Build a post from the file `name`, its header and its markdown body
    pub fn derive_post(&self, name: &str, fm: &FrontMatter, body: &str) -> Post {
        let inferred = self.strategy == Derivation::Inferred;
        let file_slug = slugify(name);

        let title = fm
            .scalar("title")
            .map(str::to_string)
            .or_else(|| inferred.then(|| first_heading(body)).flatten())
            .unwrap_or_else(|| UNTITLED_POST.to_string());

        let excerpt = match fm.scalar("excerpt") {
            Some(excerpt) => excerpt.to_string(),
            None if inferred => clean_excerpt(body),
            None => excerpt(body),
        };

        let date = match fm.scalar("date") {
            Some(date) if inferred => self.normalize_date(date),
            Some(date) => date.to_string(),
            None if inferred => BYLINE_DATE_RE
                .captures(body)
                .map(|caps| self.normalize_date(&caps[1]))
                .unwrap_or_else(|| self.today_string()),
            None => self.today_string(),
        };

        let read_time = fm
            .scalar("readTime")
            .map(str::to_string)
            .or_else(|| {
                inferred
                    .then(|| BYLINE_READ_TIME_RE.captures(body).map(|c| c[1].to_string()))
                    .flatten()
            })
            .unwrap_or_else(|| read_time(body));

        let tags = match fm.list("tags") {
            Some(tags) => tags,
            None if inferred => infer_tags(&title, body),
            None => Vec::new(),
        };

        let id = fm
            .scalar("id")
            .map(str::to_string)
            .unwrap_or_else(|| file_slug.clone());
        let slug = fm.scalar("slug").map(str::to_string).unwrap_or(file_slug);

        Post {
            id: non_empty_or(id, name),
            slug: non_empty_or(slug, name),
            title,
            excerpt,
            content: body.to_string(),
            date,
            read_time,
            tags,
            source: name.to_string(),
        }
    }

    /// Build a portfolio project from the file `name`, its header and body
    pub fn derive_project(
        &self,
        name: &str,
        fm: &FrontMatter,
        body: &str,
        defaults: &ProjectDefaults,
    ) -> Project {
        let title = fm
            .scalar("title")
            .map(str::to_string)
            .unwrap_or_else(|| UNTITLED_PROJECT.to_string());

        let description = fm
            .scalar("description")
            .map(str::to_string)
            .unwrap_or_else(|| excerpt(body));

        let date = match fm.scalar("date") {
            Some(date) if self.strategy == Derivation::Inferred => self.normalize_date(date),
            Some(date) => date.to_string(),
            None => self.today_string(),
        };

        let id = fm
            .scalar("id")
            .map(str::to_string)
            .unwrap_or_else(|| slugify(name));

        Project {
            id: non_empty_or(id, name),
            title,
            description,
            content: body.to_string(),
            date,
            image: fm
                .scalar("image")
                .unwrap_or(defaults.image.as_str())
                .to_string(),
            technologies: fm.first_list(&["technologies", "tech"]).unwrap_or_default(),
            live_url: fm.first_scalar(&["liveUrl", "demo"]).map(str::to_string),
            github_url: fm
                .first_scalar(&["githubUrl", "github", "repo"])
                .map(str::to_string),
            status: fm
                .scalar("status")
                .unwrap_or(DEFAULT_STATUS)
                .to_string(),
            source: name.to_string(),
        }
    }

    /// The day undated documents are given
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn today_string(&self) -> String {
        self.today().format("%Y-%m-%d").to_string()
    }

    /// Reformat a date as `YYYY-MM-DD`, falling back to today
    fn normalize_date(&self, date: &str) -> String {
        parse_date(date)
            .unwrap_or_else(|| self.today())
            .format("%Y-%m-%d")
            .to_string()
    }
}

/// Turn a file name into a URL-safe identifier.
///
/// The markdown extension is dropped, letters are lower-cased and every run
/// of other characters becomes a single hyphen, with no hyphen at either end.
pub fn slugify(name: &str) -> String {
    let stem = [".md", ".markdown"]
        .iter()
        .find_map(|ext| strip_suffix_ignore_case(name, ext))
        .unwrap_or(name);
    slug::slugify(stem)
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    let (stem, tail) = (name.get(..split)?, name.get(split..)?);
    tail.eq_ignore_ascii_case(suffix).then_some(stem)
}

/// First `EXCERPT_CHARS` characters of a body with `#` and `*` removed
pub fn excerpt(body: &str) -> String {
    let head: String = body
        .chars()
        .take(EXCERPT_CHARS)
        .filter(|c| !matches!(c, '#' | '*'))
        .collect();
    format!("{}...", head.trim())
}

/// Excerpt built from body text with headings, emphasis and code removed
fn clean_excerpt(body: &str) -> String {
    let text = HEADING_LINE_RE.replace_all(body, "");
    let text = EMPHASIS_RE.replace_all(&text, "");
    let text = CODE_BLOCK_RE.replace_all(&text, "");
    let text = NEWLINES_RE.replace_all(&text, " ");
    let head: String = text.trim().chars().take(EXCERPT_CHARS).collect();
    format!("{}...", head)
}

/// Estimated reading time, e.g. `"3 min read"`
pub fn read_time(body: &str) -> String {
    let words = body.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{} min read", minutes)
}

/// Tags whose trigger words appear in the title or body
pub fn infer_tags(title: &str, body: &str) -> Vec<String> {
    let text = format!("{} {}", title, body).to_lowercase();
    let tags: Vec<String> = TAG_KEYWORDS
        .iter()
        .filter(|(_, triggers)| triggers.iter().any(|t| text.contains(t)))
        .map(|(tag, _)| tag.to_string())
        .collect();

    if tags.is_empty() {
        vec![CATCH_ALL_TAG.to_string()]
    } else {
        tags
    }
}

fn first_heading(body: &str) -> Option<String> {
    FIRST_HEADING_RE
        .captures(body)
        .map(|caps| caps[1].to_string())
}

fn non_empty_or(value: String, name: &str) -> String {
    if value.is_empty() {
        // A name made only of punctuation slugifies to nothing
        name.to_string()
    } else {
        value
    }
}

/// Parse a date string in the formats content files use
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    // Try RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    None
}
