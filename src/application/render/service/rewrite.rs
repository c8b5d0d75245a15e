use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};
use syntect::parsing::SyntaxSet;

use crate::{
    application::render::types::{DocumentHeading, RenderError},
    domain::slug::AnchorSlugger,
};

use super::{highlight, toc};

/// Paragraph text that is replaced by the table of contents.
pub(crate) const TOC_MARKER: &str = "[TOC]";

#[derive(Default)]
pub(crate) struct RewriteOutcome {
    pub(crate) contains_code: bool,
    pub(crate) contains_toc: bool,
    pub(crate) headings: Vec<DocumentHeading>,
}

/// Highlight code blocks, assign heading anchors, and expand `[TOC]` markers.
pub(crate) fn rewrite_ast<'a>(
    root: &'a AstNode<'a>,
    syntax_set: &SyntaxSet,
) -> Result<RewriteOutcome, RenderError> {
    let mut walker = RewriteWalker::new(syntax_set);
    walker.visit_nodes(root)?;

    let RewriteWalker {
        mut outcome,
        toc_markers,
        ..
    } = walker;

    if !toc_markers.is_empty() {
        let toc_html = toc::render_toc(&outcome.headings);
        for marker in toc_markers {
            replace_with_html_block(marker, toc_html.clone());
        }
        outcome.contains_toc = true;
    }

    Ok(outcome)
}

struct RewriteWalker<'a, 's> {
    syntax_set: &'s SyntaxSet,
    outcome: RewriteOutcome,
    slugger: AnchorSlugger,
    toc_markers: Vec<&'a AstNode<'a>>,
}

impl<'a, 's> RewriteWalker<'a, 's> {
    fn new(syntax_set: &'s SyntaxSet) -> Self {
        Self {
            syntax_set,
            outcome: RewriteOutcome::default(),
            slugger: AnchorSlugger::new(),
            toc_markers: Vec::new(),
        }
    }

    fn visit_nodes(&mut self, node: &'a AstNode<'a>) -> Result<(), RenderError> {
        if let Some(level) = heading_level(node) {
            let text = collect_inline_text(node);
            let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
            let slug = self.slugger.anchor_for(&normalized);
            self.outcome.headings.push(DocumentHeading {
                level,
                slug,
                text: normalized,
            });
        } else if is_toc_marker(node) {
            self.toc_markers.push(node);
            return Ok(());
        } else if let Some((info, literal)) = extract_code_block(node) {
            let language = info.split_whitespace().next();
            let html = highlight::highlight_code(language, &literal, self.syntax_set)?;
            self.outcome.contains_code = true;
            replace_with_html_block(node, html);
            return Ok(());
        }

        let mut child = node.first_child();
        while let Some(next) = child {
            self.visit_nodes(next)?;
            child = next.next_sibling();
        }

        Ok(())
    }
}

fn replace_with_html_block<'a>(node: &'a AstNode<'a>, html: String) {
    while let Some(child) = node.first_child() {
        child.detach();
    }
    let mut data = node.data.borrow_mut();
    data.value = NodeValue::HtmlBlock(NodeHtmlBlock {
        block_type: 0,
        literal: html,
    });
}

fn is_toc_marker(node: &AstNode<'_>) -> bool {
    if !matches!(node.data.borrow().value, NodeValue::Paragraph) {
        return false;
    }

    let mut child = node.first_child();
    while let Some(next) = child {
        if !matches!(next.data.borrow().value, NodeValue::Text(_)) {
            return false;
        }
        child = next.next_sibling();
    }

    collect_inline_text(node).trim() == TOC_MARKER
}

fn extract_code_block(node: &AstNode<'_>) -> Option<(String, String)> {
    let data = node.data.borrow();
    if let NodeValue::CodeBlock(block) = &data.value {
        let info = block.info.trim().to_string();
        let literal = block.literal.clone();
        Some((info, literal))
    } else {
        None
    }
}

fn heading_level(node: &AstNode<'_>) -> Option<u8> {
    let data = node.data.borrow();
    if let NodeValue::Heading(heading) = &data.value {
        Some(heading.level)
    } else {
        None
    }
}

fn collect_inline_text(node: &AstNode<'_>) -> String {
    fn walk(node: &AstNode<'_>, buffer: &mut String) {
        {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::Text(text) => buffer.push_str(text),
                NodeValue::Code(code) => buffer.push_str(&code.literal),
                NodeValue::LineBreak | NodeValue::SoftBreak => buffer.push(' '),
                _ => {}
            }
        }
        let mut child = node.first_child();
        while let Some(next) = child {
            walk(next, buffer);
            child = next.next_sibling();
        }
    }

    let mut text = String::new();
    let mut child = node.first_child();
    while let Some(next) = child {
        walk(next, &mut text);
        child = next.next_sibling();
    }
    text
}

#[cfg(test)]
mod tests {
    use comrak::{Arena, format_html, parse_document};

    use super::*;
    use crate::application::render::service::{config::default_options, load_syntax_set};

    fn rewrite(markdown: &str) -> (RewriteOutcome, String) {
        let options = default_options();
        let syntax_set = load_syntax_set();
        let arena = Arena::new();
        let root = parse_document(&arena, markdown, &options);

        let outcome = rewrite_ast(root, &syntax_set).expect("rewrite");
        let mut html = String::new();
        format_html(root, &options, &mut html).expect("html");
        (outcome, html)
    }

    #[test]
    fn headings_are_collected_in_order() {
        let (outcome, _) = rewrite("# Intro\n\n## Usage `cli`\n\n## Intro\n");

        let slugs: Vec<_> = outcome.headings.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, ["intro", "usage-cli", "intro-2"]);
        assert_eq!(outcome.headings[1].level, 2);
        assert_eq!(outcome.headings[1].text, "Usage cli");
    }

    #[test]
    fn fenced_code_is_highlighted() {
        let (outcome, html) = rewrite("```rust\nfn main() {}\n```\n");

        assert!(outcome.contains_code);
        assert!(html.contains("<div class=\"codehilite\"><pre>"));
        assert!(html.contains("<span class=\"k"));
        assert!(!html.contains("language-rust"));
    }

    #[test]
    fn unknown_language_renders_plain_escaped_text() {
        let (_, html) = rewrite("```nosuchlang\na < b && c\n```\n");

        assert!(html.contains("a &lt; b &amp;&amp; c"));
    }

    #[test]
    fn toc_marker_is_expanded_with_later_headings() {
        let (outcome, html) = rewrite("[TOC]\n\n# First\n\n## Nested\n");

        assert!(outcome.contains_toc);
        assert!(html.contains("<div class=\"toc\">"));
        assert!(html.contains("<a href=\"#first\">First</a>"));
        assert!(html.contains("<a href=\"#nested\">Nested</a>"));
        assert!(!html.contains(TOC_MARKER));
    }

    #[test]
    fn toc_marker_inside_text_is_left_alone() {
        let (outcome, html) = rewrite("See [TOC] for details.\n\n# Heading\n");

        assert!(!outcome.contains_toc);
        assert!(html.contains("See [TOC] for details."));
    }
}
