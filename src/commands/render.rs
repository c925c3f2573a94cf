//! Render a single markdown file

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::content::{FieldValue, FrontMatter, MarkdownRenderer};

/// Print the header fields of a file as HTML comments, followed by its
/// rendered body
pub fn run(renderer: &MarkdownRenderer, path: &Path, out: &mut impl Write) -> Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let (fm, body) = FrontMatter::parse(&text);
    tracing::debug!("{:?}: {} header fields", path, fm.len());

    for key in fm.keys() {
        let value = match fm.get(key) {
            Some(FieldValue::Scalar(s)) => s.clone(),
            Some(FieldValue::List(items)) => format!("[{}]", items.join(", ")),
            None => continue,
        };
        writeln!(out, "<!-- {}: {} -->", key, value)?;
    }

    writeln!(out, "{}", renderer.render(body))?;
    Ok(())
}
