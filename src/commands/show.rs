//! Show a single post or project

use anyhow::{bail, Result};
use serde::Serialize;
use std::io::Write;

use crate::content::{ContentLoader, ContentSource, MarkdownRenderer};

/// A document together with its rendered body
#[derive(Serialize)]
struct Rendered<'a, T: Serialize> {
    #[serde(flatten)]
    document: &'a T,
    html: String,
}

/// Print the post with the given slug, rendered to HTML
pub async fn post<S: ContentSource>(
    loader: &ContentLoader<S>,
    renderer: &MarkdownRenderer,
    slug: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let Some(post) = loader.get_post(slug).await else {
        bail!("Post not found: {}", slug);
    };

    let html = post.render_html(renderer);
    if json {
        serde_json::to_writer_pretty(&mut *out, &Rendered { document: &post, html })?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", post.title)?;
        writeln!(out, "{} · {}", post.date, post.read_time)?;
        if !post.tags.is_empty() {
            writeln!(out, "{}", post.tags.join(", "))?;
        }
        writeln!(out)?;
        writeln!(out, "{}", html)?;
    }

    Ok(())
}

/// Print the project with the given id
pub async fn project<S: ContentSource>(
    loader: &ContentLoader<S>,
    renderer: &MarkdownRenderer,
    id: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let Some(project) = loader.get_project(id).await else {
        bail!("Project not found: {}", id);
    };

    let html = project.render_html(renderer);
    if json {
        serde_json::to_writer_pretty(&mut *out, &Rendered { document: &project, html })?;
        writeln!(out)?;
    } else {
        writeln!(out, "{} [{}]", project.title, project.status)?;
        writeln!(out, "{}", project.description)?;
        if !project.technologies.is_empty() {
            writeln!(out, "tech: {}", project.technologies.join(", "))?;
        }
        if let Some(url) = &project.live_url {
            writeln!(out, "live: {}", url)?;
        }
        if let Some(url) = &project.github_url {
            writeln!(out, "code: {}", url)?;
        }
        writeln!(out)?;
        writeln!(out, "{}", html)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Collection, Derivation, Deriver, MemorySource, ProjectDefaults};

    fn loader() -> ContentLoader<MemorySource> {
        let source = MemorySource::new()
            .with(
                Collection::Posts,
                "sample-post.md",
                "---\ntitle: Sample\ndate: 2024-02-01\n---\n# Heading\n\nText.",
            )
            .with(
                Collection::Portfolio,
                "iot.md",
                "---\ntitle: IoT Manager\ngithub: https://git.example/iot\n---\nMQTT all the things.",
            );
        ContentLoader::with_deriver(
            source,
            Deriver::new(Derivation::Explicit),
            ProjectDefaults {
                image: String::new(),
            },
        )
    }

    #[tokio::test]
    async fn test_show_post() {
        let mut out = Vec::new();
        post(&loader(), &MarkdownRenderer::new(), "sample-post", false, &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Sample\n2024-02-01 · 1 min read\n"));
        assert!(text.contains(">Heading</h1>"));
    }

    #[tokio::test]
    async fn test_show_post_json() {
        let mut out = Vec::new();
        post(&loader(), &MarkdownRenderer::new(), "sample-post", true, &mut out)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["slug"], "sample-post");
        assert!(value["html"].as_str().unwrap().contains("Text.</p>"));
    }

    #[tokio::test]
    async fn test_show_missing() {
        let mut out = Vec::new();
        let err = post(&loader(), &MarkdownRenderer::new(), "does-not-exist", false, &mut out)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Post not found: does-not-exist");
    }

    #[tokio::test]
    async fn test_show_project() {
        let mut out = Vec::new();
        project(&loader(), &MarkdownRenderer::new(), "iot", false, &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("IoT Manager [Development]\n"));
        assert!(text.contains("code: https://git.example/iot\n"));
        assert!(!text.contains("live:"));
    }
}
