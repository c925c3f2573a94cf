//! Content loader - fetches, parses and derives posts and projects

use std::cmp::Reverse;
use std::fmt;

use super::derive::{Deriver, ProjectDefaults};
use super::source::{Collection, ContentSource};
use super::{FrontMatter, Post, Project};
use crate::config::SiteConfig;

/// A document that was listed but could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub name: String,
    pub reason: String,
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

/// Result of loading a whole collection
#[derive(Debug, Clone)]
pub struct Batch<T> {
    /// Loaded documents, newest first
    pub items: Vec<T>,
    /// Documents left out because they could not be fetched
    pub skipped: Vec<Skipped>,
    /// Set when the collection could not be listed at all
    pub failure: Option<String>,
}

impl<T> Batch<T> {
    fn failed(reason: String) -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
            failure: Some(reason),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Loads content collections from a [`ContentSource`]
pub struct ContentLoader<S> {
    source: S,
    deriver: Deriver,
    project_defaults: ProjectDefaults,
}

impl<S: ContentSource> ContentLoader<S> {
    /// Create a new content loader using the site's derivation settings
    pub fn new(source: S, config: &SiteConfig) -> Self {
        Self::with_deriver(
            source,
            Deriver::new(config.derivation),
            ProjectDefaults {
                image: config.default_image.clone(),
            },
        )
    }

    pub fn with_deriver(source: S, deriver: Deriver, project_defaults: ProjectDefaults) -> Self {
        Self {
            source,
            deriver,
            project_defaults,
        }
    }

    /// Load all posts, newest first
    pub async fn load_posts(&self) -> Batch<Post> {
        let mut batch = self.fetch_all(Collection::Posts).await.map(|name, text| {
            let (fm, body) = FrontMatter::parse(text);
            self.deriver.derive_post(name, &fm, body)
        });

        // Sort by date descending (newest first)
        let today = self.deriver.today();
        batch
            .items
            .sort_by_cached_key(|post| Reverse(post.published_on(today)));
        batch
    }

    /// Load all portfolio projects, newest first
    pub async fn load_projects(&self) -> Batch<Project> {
        let mut batch = self.fetch_all(Collection::Portfolio).await.map(|name, text| {
            let (fm, body) = FrontMatter::parse(text);
            self.deriver
                .derive_project(name, &fm, body, &self.project_defaults)
        });

        let today = self.deriver.today();
        batch
            .items
            .sort_by_cached_key(|project| Reverse(project.published_on(today)));
        batch
    }

    /// Find a post by slug
    pub async fn get_post(&self, slug: &str) -> Option<Post> {
        self.load_posts()
            .await
            .items
            .into_iter()
            .find(|post| post.slug == slug)
    }

    /// Find a project by id
    pub async fn get_project(&self, id: &str) -> Option<Project> {
        self.load_projects()
            .await
            .items
            .into_iter()
            .find(|project| project.id == id)
    }

    /// Fetch every listed document in order, one at a time.
    /// Items are `(name, raw text)` pairs.
    async fn fetch_all(&self, collection: Collection) -> Batch<(String, String)> {
        let names = match self.source.list(collection).await {
            Ok(names) => names,
            Err(e) => {
                tracing::error!("Failed to list {}: {}", collection, e);
                return Batch::failed(e.to_string());
            }
        };

        let mut items = Vec::with_capacity(names.len());
        let mut skipped = Vec::new();

        for name in names {
            match self.source.fetch(collection, &name).await {
                Ok(text) => items.push((name, text)),
                Err(e) => {
                    tracing::warn!("Failed to load {} {:?}: {}", collection, name, e);
                    skipped.push(Skipped {
                        name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            "Fetched {} {} ({} skipped)",
            items.len(),
            collection,
            skipped.len()
        );

        Batch {
            items,
            skipped,
            failure: None,
        }
    }
}

impl Batch<(String, String)> {
    fn map<T>(self, mut build: impl FnMut(&str, &str) -> T) -> Batch<T> {
        Batch {
            items: self
                .items
                .iter()
                .map(|(name, text)| build(name, text))
                .collect(),
            skipped: self.skipped,
            failure: self.failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Derivation, HttpSource, MemorySource, SourceError};
    use chrono::NaiveDate;

    fn loader<S: ContentSource>(source: S) -> ContentLoader<S> {
        ContentLoader::with_deriver(
            source,
            Deriver::with_today(
                Derivation::Explicit,
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            ),
            ProjectDefaults {
                image: "/default.png".to_string(),
            },
        )
    }

    fn post_text(title: &str, date: &str) -> String {
        format!("---\ntitle: {}\ndate: {}\n---\nBody of {}.\n", title, date, title)
    }

    #[tokio::test]
    async fn test_partial_failure_skips_missing_file() {
        let source = MemorySource::new()
            .with(Collection::Posts, "older.md", &post_text("Older", "2024-01-10"))
            .with_missing(Collection::Posts, "missing.md")
            .with(Collection::Posts, "newer.md", &post_text("Newer", "2024-03-05"));

        let batch = loader(source).load_posts().await;
        let titles: Vec<_> = batch.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].name, "missing.md");
        assert!(batch.failure.is_none());
    }

    #[tokio::test]
    async fn test_undated_posts_sort_as_today() {
        let source = MemorySource::new()
            .with(Collection::Posts, "old.md", &post_text("Old", "2020-01-01"))
            .with(Collection::Posts, "undated.md", "No header at all")
            .with(Collection::Posts, "future.md", &post_text("Future", "2999-01-01"))
            .with(Collection::Posts, "vague.md", &post_text("Vague", "someday"))
            .with(Collection::Posts, "recent.md", &post_text("Recent", "2024-05-01"));

        let batch = loader(source).load_posts().await;
        let slugs: Vec<_> = batch.items.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["future", "undated", "vague", "recent", "old"]);
        assert_eq!(batch.items[2].date, "someday");
        assert_eq!(batch.items[1].title, "Untitled Post");
        assert_eq!(batch.items[1].date, "2024-06-01");
    }

    #[tokio::test]
    async fn test_get_post_by_slug() {
        let source = MemorySource::new()
            .with(Collection::Posts, "sample-post.md", &post_text("Sample", "2024-02-01"))
            .with(Collection::Posts, "other.md", &post_text("Other", "2024-02-02"));
        let loader = loader(source);

        let post = loader.get_post("sample-post").await.unwrap();
        assert_eq!(post.title, "Sample");
        assert_eq!(post.content, "Body of Sample.\n");
        assert!(loader.get_post("does-not-exist").await.is_none());
    }

    #[tokio::test]
    async fn test_projects() {
        let source = MemorySource::new()
            .with(
                Collection::Portfolio,
                "project-1.md",
                "---\ntitle: Visualizer\ndate: 2023-05-01\ntech: [React, D3.js]\n---\nNeural nets.",
            )
            .with(
                Collection::Portfolio,
                "project-2.md",
                "---\ntitle: Terminal\ndate: 2024-05-01\nstatus: Beta\n---\nRetro.",
            );
        let loader = loader(source);

        let batch = loader.load_projects().await;
        assert_eq!(batch.items[0].id, "project-2");
        assert_eq!(batch.items[1].technologies, vec!["React", "D3.js"]);
        assert_eq!(batch.items[1].image, "/default.png");

        let project = loader.get_project("project-1").await.unwrap();
        assert_eq!(project.title, "Visualizer");
        assert!(loader.get_project("project-9").await.is_none());
    }

    struct BrokenSource;

    impl ContentSource for BrokenSource {
        async fn list(&self, _collection: Collection) -> Result<Vec<String>, SourceError> {
            Err(SourceError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )))
        }

        async fn fetch(&self, collection: Collection, name: &str) -> Result<String, SourceError> {
            Err(SourceError::NotFound {
                collection,
                name: name.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_listing_failure_yields_empty_batch() {
        let batch = loader(BrokenSource).load_posts().await;
        assert!(batch.is_empty());
        assert!(batch.failure.unwrap().contains("denied"));
    }

    #[tokio::test]
    async fn test_http_partial_failure() {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("content/posts");
        std::fs::create_dir_all(&posts).unwrap();
        std::fs::write(posts.join("first.md"), post_text("First", "2024-01-01")).unwrap();
        std::fs::write(posts.join("third.md"), post_text("Third", "2024-04-01")).unwrap();

        let app = axum::Router::new().nest_service(
            "/content",
            tower_http::services::ServeDir::new(dir.path().join("content")),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = SiteConfig {
            posts: vec![
                "first.md".to_string(),
                "second.md".to_string(),
                "third.md".to_string(),
            ],
            ..SiteConfig::default()
        };
        let source = HttpSource::new(&format!("http://{}", addr), &config);

        let batch = loader(source).load_posts().await;
        let titles: Vec<_> = batch.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Third", "First"]);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].name, "second.md");
        assert!(batch.skipped[0].reason.contains("404"));
    }
}
