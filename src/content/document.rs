//! Post and Project models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::derive::parse_date;
use super::MarkdownRenderer;

/// A blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,

    /// Slug (URL-friendly name) used for lookups
    pub slug: String,

    pub title: String,

    pub excerpt: String,

    /// Raw markdown body
    pub content: String,

    /// Publication date, `YYYY-MM-DD` when derived
    pub date: String,

    /// Estimated reading time, e.g. "4 min read"
    pub read_time: String,

    pub tags: Vec<String>,

    /// Identifier the post was loaded from
    pub source: String,
}

impl Post {
    /// Publication date used for ordering; unparseable dates count as `today`
    pub fn published_on(&self, today: NaiveDate) -> NaiveDate {
        parse_date(&self.date).unwrap_or(today)
    }

    /// Render the markdown body to HTML
    pub fn render_html(&self, renderer: &MarkdownRenderer) -> String {
        renderer.render(&self.content)
    }
}

/// A portfolio project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,

    /// Raw markdown body
    pub content: String,

    pub date: String,

    /// Card image URL
    pub image: String,

    pub technologies: Vec<String>,

    pub live_url: Option<String>,

    pub github_url: Option<String>,

    /// Status label such as "Production" or "Beta"
    pub status: String,

    pub source: String,
}

impl Project {
    pub fn published_on(&self, today: NaiveDate) -> NaiveDate {
        parse_date(&self.date).unwrap_or(today)
    }

    pub fn render_html(&self, renderer: &MarkdownRenderer) -> String {
        renderer.render(&self.content)
    }
}

/// Posts whose title or excerpt contains `search` (case-insensitive) and,
/// when a tag is selected, that carry it
pub fn filter_posts<'a>(posts: &'a [Post], search: &str, tag: Option<&str>) -> Vec<&'a Post> {
    let needle = search.to_lowercase();
    posts
        .iter()
        .filter(|post| {
            needle.is_empty()
                || post.title.to_lowercase().contains(&needle)
                || post.excerpt.to_lowercase().contains(&needle)
        })
        .filter(|post| tag.map_or(true, |tag| post.tags.iter().any(|t| t == tag)))
        .collect()
}

/// Distinct tags across all posts, in first-seen order
pub fn collect_tags(posts: &[Post]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in posts.iter().flat_map(|post| &post.tags) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

/// Tag usage counts, most used first
pub fn tag_counts(posts: &[Post]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = collect_tags(posts)
        .into_iter()
        .map(|tag| {
            let count = posts.iter().filter(|p| p.tags.contains(&tag)).count();
            (tag, count)
        })
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// The `n` newest items of an already sorted list
pub fn latest<T>(items: &[T], n: usize) -> &[T] {
    &items[..n.min(items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, title: &str, excerpt: &str, tags: &[&str]) -> Post {
        Post {
            id: slug.to_string(),
            slug: slug.to_string(),
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            content: String::new(),
            date: "2024-01-01".to_string(),
            read_time: "1 min read".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            source: format!("{}.md", slug),
        }
    }

    fn sample() -> Vec<Post> {
        vec![
            post("reactive", "Building Reactive UIs", "Signals and hooks", &["JavaScript", "React"]),
            post("security", "Remote Work Security", "Protect your home office", &["Security"]),
            post("ai-tools", "AI Tools for Developers", "How assistants change coding", &["AI", "JavaScript"]),
        ]
    }

    #[test]
    fn test_filter_by_search() {
        let posts = sample();
        let found = filter_posts(&posts, "SECURITY", None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].slug, "security");

        // Excerpt matches too
        let found = filter_posts(&posts, "hooks", None);
        assert_eq!(found[0].slug, "reactive");

        assert_eq!(filter_posts(&posts, "", None).len(), 3);
    }

    #[test]
    fn test_filter_by_tag() {
        let posts = sample();
        let slugs: Vec<_> = filter_posts(&posts, "", Some("JavaScript"))
            .iter()
            .map(|p| p.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["reactive", "ai-tools"]);

        assert!(filter_posts(&posts, "remote", Some("AI")).is_empty());
    }

    #[test]
    fn test_collect_tags() {
        assert_eq!(
            collect_tags(&sample()),
            vec!["JavaScript", "React", "Security", "AI"]
        );
    }

    #[test]
    fn test_tag_counts() {
        let counts = tag_counts(&sample());
        assert_eq!(counts[0], ("JavaScript".to_string(), 2));
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn test_latest() {
        let posts = sample();
        assert_eq!(latest(&posts, 2).len(), 2);
        assert_eq!(latest(&posts, 10).len(), 3);
    }

    #[test]
    fn test_published_on_fallback() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut p = post("x", "X", "", &[]);
        assert_eq!(p.published_on(today), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        p.date = "garbage".to_string();
        assert_eq!(p.published_on(today), today);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(post("x", "X", "", &[])).unwrap();
        assert!(json.get("readTime").is_some());
        assert!(json.get("read_time").is_none());
    }
}
