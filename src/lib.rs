//! folio: content pipeline for a portfolio and blog site
//!
//! Posts and portfolio projects are markdown files with an optional
//! front-matter header. This crate loads them from a directory or over HTTP,
//! fills in whatever metadata the header leaves out, and renders post bodies
//! to HTML.

pub mod commands;
pub mod config;
pub mod content;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentLoader, DirSource, HttpSource, MarkdownRenderer, SiteSource};

/// The main application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the content collections
    pub content_dir: PathBuf,
}

impl Folio {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        Self {
            config,
            base_dir,
            content_dir,
        }
    }

    /// Content source: the given URL, else the configured `content_url`,
    /// else the local content directory
    pub fn source(&self, url: Option<&str>) -> SiteSource {
        match url.or(self.config.content_url.as_deref()) {
            Some(url) => {
                tracing::debug!("Loading content from {}", url);
                SiteSource::Http(HttpSource::new(url, &self.config))
            }
            None => {
                tracing::debug!("Loading content from {:?}", self.content_dir);
                SiteSource::Dir(DirSource::new(&self.content_dir, &self.config))
            }
        }
    }

    /// Content loader over [`Folio::source`]
    pub fn loader(&self, url: Option<&str>) -> ContentLoader<SiteSource> {
        ContentLoader::new(self.source(url), &self.config)
    }

    /// Markdown renderer with the configured element classes
    pub fn renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::with_classes(self.config.classes.clone())
    }

    /// Create a new post
    pub fn new_post(&self, title: &str) -> Result<PathBuf> {
        commands::new::create_post(self, title)
    }
}
