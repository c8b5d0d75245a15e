use thiserror::Error;

/// Rendering request passed into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// Source markdown read from the documentation tree.
    pub markdown: String,
}

impl RenderRequest {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
        }
    }
}

/// A heading discovered while rendering, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHeading {
    pub level: u8,
    /// Anchor assigned to the heading's `id`, unique within the document.
    pub slug: String,
    pub text: String,
}

/// Deterministic rendering result returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// HTML fragment without any document wrapper.
    pub html: String,
    pub headings: Vec<DocumentHeading>,
    /// Indicates whether the document contains highlighted code blocks.
    pub contains_code: bool,
    /// Indicates whether a `[TOC]` marker was expanded.
    pub contains_toc: bool,
}

/// Structured errors surfaced by the rendering pipeline.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("markdown rendering failed: {message}")]
    Markdown { message: String },
    #[error("syntax highlighting failed: {language}: {message}")]
    Highlighting { language: String, message: String },
    #[error("document processing failed: {message}")]
    Document { message: String },
}

/// Trait exposed by the rendering pipeline. Implementations must be pure and
/// deterministic: given the same input, they return identical outputs or errors.
pub trait RenderService: Send + Sync {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError>;
}
