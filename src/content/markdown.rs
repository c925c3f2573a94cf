//! Line-oriented markdown rendering
//!
//! Covers the handful of constructs the site's posts use: headings, fenced
//! code, emphasis lines, rules and inline spans. Each line is converted on its
//! own; the only state carried between lines is whether a code fence is open.
//! Lists, tables, blockquotes and multi-line emphasis are not recognized and
//! come out as plain paragraphs.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref BOLD_RE: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
    static ref ITALIC_RE: Regex = Regex::new(r"\*(.+?)\*").unwrap();
    static ref CODE_SPAN_RE: Regex = Regex::new(r"`([^`]+)`").unwrap();
    static ref LINK_RE: Regex = Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap();
}

/// Languages that get the highlighted code style
const HIGHLIGHTED_LANGUAGES: &[&str] = &[
    "javascript", "js", "jsx", "typescript", "ts", "tsx", "rust", "python", "bash", "sh",
    "json", "html", "css",
];

const FENCE: &str = "```";

/// CSS classes attached to the generated elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlClasses {
    pub h1: String,
    pub h2: String,
    pub h3: String,
    pub h4: String,
    pub pre: String,
    pub code: String,
    pub code_highlight: String,
    pub italic: String,
    pub paragraph: String,
    pub hr: String,
    pub inline_code: String,
    pub link: String,
}

impl Default for HtmlClasses {
    fn default() -> Self {
        Self {
            h1: "text-3xl font-mono font-bold text-foreground mb-6".to_string(),
            h2: "text-2xl font-mono font-bold text-foreground mb-4 mt-8".to_string(),
            h3: "text-xl font-mono font-bold text-primary mb-3 mt-6".to_string(),
            h4: "text-lg font-mono font-semibold text-foreground mb-2 mt-4".to_string(),
            pre: "bg-card border border-border rounded-lg p-4 my-4 overflow-x-auto".to_string(),
            code: "font-mono text-sm".to_string(),
            code_highlight: "text-cyber-cyan".to_string(),
            italic: "text-muted-foreground italic mb-4".to_string(),
            paragraph: "text-foreground leading-relaxed mb-4".to_string(),
            hr: "border-border my-8".to_string(),
            inline_code: "bg-muted px-1 rounded font-mono text-sm".to_string(),
            link: "text-primary underline".to_string(),
        }
    }
}

/// Markdown renderer for post bodies
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    classes: HtmlClasses,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom element classes
    pub fn with_classes(classes: HtmlClasses) -> Self {
        Self { classes }
    }

    /// Render markdown to HTML.
    ///
    /// A fence that is opened but never closed leaves the `<code>` element
    /// open in the output.
    pub fn render(&self, markdown: &str) -> String {
        let mut html = String::with_capacity(markdown.len() * 2);
        let mut in_code = false;

        for raw in markdown.lines() {
            let line = raw.trim();

            if in_code {
                if line.starts_with(FENCE) {
                    html.push_str("</code></pre>");
                    in_code = false;
                } else {
                    html.push_str(&html_escape(raw));
                    html.push('\n');
                }
                continue;
            }

            if let Some((level, text)) = heading(line) {
                let class = match level {
                    1 => &self.classes.h1,
                    2 => &self.classes.h2,
                    3 => &self.classes.h3,
                    _ => &self.classes.h4,
                };
                html.push_str(&format!(
                    r#"<h{level} class="{class}">{text}</h{level}>"#
                ));
            } else if let Some(lang) = line.strip_prefix(FENCE) {
                html.push_str(&self.open_code_block(lang));
                in_code = true;
            } else if let Some(inner) = italic_line(line) {
                html.push_str(&format!(
                    r#"<p class="{}">{}</p>"#,
                    self.classes.italic, inner
                ));
            } else if let Some(inner) = bold_line(line) {
                html.push_str(&format!(
                    r#"<p class="{}"><strong>{}</strong></p>"#,
                    self.classes.paragraph, inner
                ));
            } else if line.starts_with("---") {
                html.push_str(&format!(r#"<hr class="{}" />"#, self.classes.hr));
            } else if line.is_empty() {
                html.push_str("<br>");
            } else {
                html.push_str(&format!(
                    r#"<p class="{}">{}</p>"#,
                    self.classes.paragraph,
                    self.render_inline(line)
                ));
            }
        }

        html
    }

    fn open_code_block(&self, info: &str) -> String {
        let lang: String = info
            .split_whitespace()
            .next()
            .unwrap_or("")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        let mut class = self.classes.code.clone();
        if HIGHLIGHTED_LANGUAGES.contains(&lang.as_str()) {
            class.push(' ');
            class.push_str(&self.classes.code_highlight);
        }
        if !lang.is_empty() {
            class.push_str(" language-");
            class.push_str(&lang);
        }

        format!(
            r#"<pre class="{}"><code class="{}">"#,
            self.classes.pre, class
        )
    }

    /// Replace bold, italic, code and link spans, in that order
    fn render_inline(&self, line: &str) -> String {
        let text = BOLD_RE.replace_all(line, "<strong>${1}</strong>");
        let text = ITALIC_RE.replace_all(&text, "<em>${1}</em>");
        let text = CODE_SPAN_RE.replace_all(&text, |caps: &Captures| {
            format!(
                r#"<code class="{}">{}</code>"#,
                self.classes.inline_code, &caps[1]
            )
        });
        let text = LINK_RE.replace_all(&text, |caps: &Captures| {
            format!(
                r#"<a href="{}" class="{}">{}</a>"#,
                &caps[2], self.classes.link, &caps[1]
            )
        });
        text.into_owned()
    }
}

fn heading(line: &str) -> Option<(usize, &str)> {
    ["# ", "## ", "### ", "#### "]
        .iter()
        .enumerate()
        .find_map(|(i, prefix)| line.strip_prefix(prefix).map(|text| (i + 1, text)))
}

/// `*text*` with no other asterisk inside
fn italic_line(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('*')?.strip_suffix('*')?;
    (!inner.is_empty() && !inner.contains('*')).then_some(inner)
}

/// `**text**` holding a single bold span
fn bold_line(line: &str) -> Option<&str> {
    let inner = line.strip_prefix("**")?.strip_suffix("**")?;
    (!inner.is_empty() && !inner.contains("**")).then_some(inner)
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
