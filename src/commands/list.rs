//! List site content

use anyhow::Result;
use std::io::Write;

use crate::content::{filter_posts, tag_counts, Batch, ContentLoader, ContentSource};

/// Filters and output format for listings
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub json: bool,
}

/// List site content by type
pub async fn run<S: ContentSource>(
    loader: &ContentLoader<S>,
    content_type: &str,
    options: &ListOptions,
    out: &mut impl Write,
) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let batch = loader.load_posts().await;
            report_problems(&batch);
            let posts = filter_posts(
                &batch.items,
                options.search.as_deref().unwrap_or(""),
                options.tag.as_deref(),
            );

            if options.json {
                serde_json::to_writer_pretty(&mut *out, &posts)?;
                writeln!(out)?;
            } else if posts.is_empty() {
                writeln!(out, "No posts found.")?;
            } else {
                writeln!(out, "Posts ({}):", posts.len())?;
                for post in posts {
                    writeln!(
                        out,
                        "  {} - {} ({}) [{}]",
                        post.date, post.title, post.read_time, post.slug
                    )?;
                    if !post.tags.is_empty() {
                        writeln!(out, "      tags: {}", post.tags.join(", "))?;
                    }
                }
            }
        }
        "project" | "projects" => {
            let batch = loader.load_projects().await;
            report_problems(&batch);

            if options.json {
                serde_json::to_writer_pretty(&mut *out, &batch.items)?;
                writeln!(out)?;
            } else if batch.items.is_empty() {
                writeln!(out, "No projects found.")?;
            } else {
                writeln!(out, "Projects ({}):", batch.items.len())?;
                for project in &batch.items {
                    writeln!(
                        out,
                        "  {} - {} <{}> [{}]",
                        project.date, project.title, project.status, project.id
                    )?;
                    if !project.technologies.is_empty() {
                        writeln!(out, "      tech: {}", project.technologies.join(", "))?;
                    }
                }
            }
        }
        "tag" | "tags" => {
            let batch = loader.load_posts().await;
            report_problems(&batch);
            let tags = tag_counts(&batch.items);

            if options.json {
                serde_json::to_writer_pretty(&mut *out, &tags)?;
                writeln!(out)?;
            } else {
                writeln!(out, "Tags ({}):", tags.len())?;
                for (tag, count) in tags {
                    writeln!(out, "  {} ({})", tag, count)?;
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, project, tag",
                content_type
            );
        }
    }

    Ok(())
}

fn report_problems<T>(batch: &Batch<T>) {
    if let Some(failure) = &batch.failure {
        eprintln!("Failed to load content: {}", failure);
    }
    for skipped in &batch.skipped {
        eprintln!("Skipped {}", skipped);
    }
}
