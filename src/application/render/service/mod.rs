mod anchors;
mod config;
mod highlight;
mod rewrite;
mod toc;

use std::sync::Arc;

use comrak::{Arena, format_html, nodes::AstNode, parse_document};
use once_cell::sync::Lazy;
use syntect::{dumps::from_uncompressed_data, parsing::SyntaxSet};

use crate::application::render::types::{
    RenderError, RenderOutput, RenderRequest, RenderService,
};

use anchors::apply_heading_ids;
use config::default_options;
use rewrite::rewrite_ast;

/// Comrak-based rendering pipeline with fenced code, Syntect highlighting and
/// a `[TOC]` table of contents.
pub struct ComrakRenderService {
    options: comrak::Options<'static>,
    syntax_set: SyntaxSet,
}

impl ComrakRenderService {
    fn new() -> Self {
        Self {
            options: default_options(),
            syntax_set: load_syntax_set(),
        }
    }
}

static RENDER_SERVICE: Lazy<Arc<ComrakRenderService>> =
    Lazy::new(|| Arc::new(ComrakRenderService::new()));

/// Access the shared render service instance, initialised on first use.
pub fn render_service() -> Arc<ComrakRenderService> {
    Arc::clone(&RENDER_SERVICE)
}

impl Default for ComrakRenderService {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderService for ComrakRenderService {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError> {
        let arena = Arena::new();
        let root = parse_document(&arena, &request.markdown, &self.options);

        let rewrite_outcome = rewrite_ast(root, &self.syntax_set)?;
        let rendered_html = render_html_stage(root, &self.options)?;
        let html = apply_heading_ids(&rendered_html, &rewrite_outcome.headings)?;

        Ok(RenderOutput {
            html,
            headings: rewrite_outcome.headings,
            contains_code: rewrite_outcome.contains_code,
            contains_toc: rewrite_outcome.contains_toc,
        })
    }
}

pub(crate) fn load_syntax_set() -> SyntaxSet {
    let syntax_bytes = include_bytes!(env!("SYNTAX_PACK_FILE"));
    from_uncompressed_data(syntax_bytes).expect("syntax pack must be valid")
}

fn render_html_stage<'a>(
    root: &'a AstNode<'a>,
    options: &comrak::Options<'static>,
) -> Result<String, RenderError> {
    let mut html = String::new();
    format_html(root, options, &mut html).map_err(|err| RenderError::Markdown {
        message: err.to_string(),
    })?;
    Ok(html)
}

pub(crate) fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> RenderOutput {
        render_service()
            .render(&RenderRequest::new(markdown))
            .expect("render succeeds")
    }

    #[test]
    fn heading_renders_with_anchor() {
        let output = render("# Hello\n");

        assert_eq!(output.html.trim_end(), "<h1 id=\"hello\">Hello</h1>");
        assert_eq!(output.headings.len(), 1);
        assert!(!output.contains_code);
    }

    #[test]
    fn strong_emphasis_renders() {
        let output = render("**world**\n");

        assert!(output.html.contains("world</strong>"));
        assert!(output.html.contains("<strong"));
        assert!(!output.html.contains("data-sourcepos"));
    }

    #[test]
    fn fragment_has_no_document_wrapper() {
        let output = render("# Title\n\nBody\n");

        assert!(!output.html.contains("<html"));
        assert!(!output.html.contains("<body"));
    }

    #[test]
    fn code_and_toc_render_together() {
        let output = render("[TOC]\n\n# Setup\n\n```python\nprint(\"hi\")\n```\n");

        assert!(output.contains_code);
        assert!(output.contains_toc);
        assert!(output.html.contains("<a href=\"#setup\">Setup</a>"));
        assert!(output.html.contains("<h1 id=\"setup\">Setup</h1>"));
        assert!(output.html.contains("class=\"codehilite\""));
        assert!(output.html.contains("<span class=\"s"));
    }

    #[test]
    fn raw_html_heading_does_not_shift_anchors() {
        let output = render("<h2>Raw</h2>\n\n## Parsed\n");

        assert!(output.html.contains("<h2>Raw</h2>"));
        assert!(output.html.contains("<h2 id=\"parsed\">Parsed</h2>"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let markdown = "# A\n\n## A\n\n```rust\nlet x = 0x1f;\n```\n";
        assert_eq!(render(markdown), render(markdown));
    }

    #[test]
    fn escape_html_escapes_markup_characters() {
        assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
