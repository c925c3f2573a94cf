//! Create a new post

use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::slugify;
use crate::Folio;

/// Write a post skeleton named after the title and return its path
pub fn create_post(folio: &Folio, title: &str) -> Result<PathBuf> {
    let slug = slugify(title);
    if slug.is_empty() {
        bail!("Cannot derive a file name from title {:?}", title);
    }

    let target_dir = folio.content_dir.join(&folio.config.posts_path);
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        bail!("Post already exists: {:?}", file_path);
    }

    let date = chrono::Local::now().format("%Y-%m-%d");
    let content = format!(
        "---\ntitle: \"{}\"\ndate: {}\ntags: []\n---\n\n# {}\n",
        title.replace('"', ""),
        date,
        title
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
