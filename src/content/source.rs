//! Content sources
//!
//! A source knows which documents a collection holds and can hand out the raw
//! text of one of them. The loader only talks to this trait, so content can
//! come from a web server, a local directory or memory without the parsing
//! code noticing.

use indexmap::IndexMap;
use std::fmt;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::SiteConfig;

/// The document collections of a site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Posts,
    Portfolio,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Posts => f.write_str("posts"),
            Collection::Portfolio => f.write_str("portfolio"),
        }
    }
}

/// Errors raised while listing or fetching content
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{collection} document not found: {name}")]
    NotFound { collection: Collection, name: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("invalid document name: {0}")]
    InvalidName(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lists and fetches documents of a collection
pub trait ContentSource {
    /// Names of the documents in a collection, in load order
    fn list(
        &self,
        collection: Collection,
    ) -> impl Future<Output = Result<Vec<String>, SourceError>> + Send;

    /// Raw text of one document
    fn fetch(
        &self,
        collection: Collection,
        name: &str,
    ) -> impl Future<Output = Result<String, SourceError>> + Send;
}

/// Fetches a statically known list of files over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    posts_path: String,
    portfolio_path: String,
    posts: Vec<String>,
    projects: Vec<String>,
}

impl HttpSource {
    /// Create a source rooted at `base_url` using the paths and file lists
    /// of the site configuration
    pub fn new(base_url: &str, config: &SiteConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            posts_path: config.posts_path.trim_matches('/').to_string(),
            portfolio_path: config.portfolio_path.trim_matches('/').to_string(),
            posts: config.collection_files(Collection::Posts).to_vec(),
            projects: config.collection_files(Collection::Portfolio).to_vec(),
        }
    }

    /// URL of a document
    pub fn url(&self, collection: Collection, name: &str) -> String {
        let path = match collection {
            Collection::Posts => &self.posts_path,
            Collection::Portfolio => &self.portfolio_path,
        };
        format!("{}/{}/{}", self.base_url, path, name)
    }
}

impl ContentSource for HttpSource {
    async fn list(&self, collection: Collection) -> Result<Vec<String>, SourceError> {
        Ok(match collection {
            Collection::Posts => self.posts.clone(),
            Collection::Portfolio => self.projects.clone(),
        })
    }

    async fn fetch(&self, collection: Collection, name: &str) -> Result<String, SourceError> {
        let url = self.url(collection, name);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Reads markdown files from a local directory tree
#[derive(Debug, Clone)]
pub struct DirSource {
    posts_dir: PathBuf,
    portfolio_dir: PathBuf,
}

impl DirSource {
    /// Create a source reading the collections below `root`
    pub fn new<P: AsRef<Path>>(root: P, config: &SiteConfig) -> Self {
        let root = root.as_ref();
        Self {
            posts_dir: root.join(config.collection_path(Collection::Posts)),
            portfolio_dir: root.join(config.collection_path(Collection::Portfolio)),
        }
    }

    /// Directory holding a collection
    pub fn dir(&self, collection: Collection) -> &Path {
        match collection {
            Collection::Posts => &self.posts_dir,
            Collection::Portfolio => &self.portfolio_dir,
        }
    }
}

impl ContentSource for DirSource {
    async fn list(&self, collection: Collection) -> Result<Vec<String>, SourceError> {
        let dir = self.dir(collection);
        if !dir.exists() {
            tracing::debug!("No {} directory at {:?}", collection, dir);
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(SourceError::Io(e.into())),
                Err(e) => {
                    // Broken links and unreadable subdirectories only lose themselves
                    tracing::warn!("Skipping entry in {:?}: {}", dir, e);
                    continue;
                }
            };
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                if let Ok(relative) = path.strip_prefix(dir) {
                    names.push(relative.to_string_lossy().replace('\\', "/"));
                }
            }
        }

        Ok(names)
    }

    async fn fetch(&self, collection: Collection, name: &str) -> Result<String, SourceError> {
        let relative = Path::new(name);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(SourceError::InvalidName(name.to_string()));
        }

        let path = self.dir(collection).join(relative);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SourceError::NotFound {
                collection,
                name: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// Documents held in memory. Listed names without text fail to fetch.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    posts: IndexMap<String, Option<String>>,
    portfolio: IndexMap<String, Option<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document
    pub fn with(mut self, collection: Collection, name: &str, text: &str) -> Self {
        self.entries_mut(collection)
            .insert(name.to_string(), Some(text.to_string()));
        self
    }

    /// List a document that cannot be fetched
    pub fn with_missing(mut self, collection: Collection, name: &str) -> Self {
        self.entries_mut(collection).insert(name.to_string(), None);
        self
    }

    fn entries(&self, collection: Collection) -> &IndexMap<String, Option<String>> {
        match collection {
            Collection::Posts => &self.posts,
            Collection::Portfolio => &self.portfolio,
        }
    }

    fn entries_mut(&mut self, collection: Collection) -> &mut IndexMap<String, Option<String>> {
        match collection {
            Collection::Posts => &mut self.posts,
            Collection::Portfolio => &mut self.portfolio,
        }
    }
}

impl ContentSource for MemorySource {
    async fn list(&self, collection: Collection) -> Result<Vec<String>, SourceError> {
        Ok(self.entries(collection).keys().cloned().collect())
    }

    async fn fetch(&self, collection: Collection, name: &str) -> Result<String, SourceError> {
        self.entries(collection)
            .get(name)
            .cloned()
            .flatten()
            .ok_or_else(|| SourceError::NotFound {
                collection,
                name: name.to_string(),
            })
    }
}

/// Either a local directory or a remote server, picked at startup
#[derive(Debug, Clone)]
pub enum SiteSource {
    Dir(DirSource),
    Http(HttpSource),
}

impl ContentSource for SiteSource {
    async fn list(&self, collection: Collection) -> Result<Vec<String>, SourceError> {
        match self {
            SiteSource::Dir(source) => source.list(collection).await,
            SiteSource::Http(source) => source.list(collection).await,
        }
    }

    async fn fetch(&self, collection: Collection, name: &str) -> Result<String, SourceError> {
        match self {
            SiteSource::Dir(source) => source.fetch(collection, name).await,
            SiteSource::Http(source) => source.fetch(collection, name).await,
        }
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
