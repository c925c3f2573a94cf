//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::{Collection, Derivation, HtmlClasses};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site name shown by the server
    pub title: String,

    // Content location
    /// Local directory holding the content collections
    pub content_dir: String,
    /// Base URL the content is served from, used by the HTTP source
    pub content_url: Option<String>,
    pub posts_path: String,
    pub portfolio_path: String,

    // Known files, fetched by name when content comes over HTTP
    pub posts: Vec<String>,
    pub projects: Vec<String>,

    // Derivation
    pub derivation: Derivation,
    pub default_image: String,

    // Listing
    pub latest_count: usize,

    // Rendering
    #[serde(default)]
    pub classes: HtmlClasses,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),

            content_dir: "public".to_string(),
            content_url: None,
            posts_path: "content/posts".to_string(),
            portfolio_path: "content/portfolio".to_string(),

            posts: Vec::new(),
            projects: Vec::new(),

            derivation: Derivation::Explicit,
            default_image:
                "https://images.unsplash.com/photo-1555066931-4365d14bab8c?w=500&h=300&fit=crop"
                    .to_string(),

            latest_count: 3,

            classes: HtmlClasses::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Relative path of a collection below the content root
    pub fn collection_path(&self, collection: Collection) -> &str {
        match collection {
            Collection::Posts => &self.posts_path,
            Collection::Portfolio => &self.portfolio_path,
        }
    }

    /// Statically configured file names of a collection
    pub fn collection_files(&self, collection: Collection) -> &[String] {
        match collection {
            Collection::Posts => &self.posts,
            Collection::Portfolio => &self.projects,
        }
    }
}
