//! Content module - handles posts, projects, and content processing

mod derive;
mod document;
mod frontmatter;
pub mod loader;
mod markdown;
pub mod source;

pub use derive::{
    excerpt, infer_tags, parse_date, read_time, slugify, Derivation, Deriver, ProjectDefaults,
};
pub use document::{collect_tags, filter_posts, latest, tag_counts, Post, Project};
pub use frontmatter::{FieldValue, FrontMatter};
pub use loader::{Batch, ContentLoader, Skipped};
pub use markdown::{HtmlClasses, MarkdownRenderer};
pub use source::{
    Collection, ContentSource, DirSource, HttpSource, MemorySource, SiteSource, SourceError,
};
