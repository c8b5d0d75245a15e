//! Markdown to HTML conversion.
//!
//! The rendering pipeline is pure: it accepts markdown input, produces a
//! deterministic HTML fragment, and surfaces structured errors. Reading
//! sources and writing pages happen in the caller.

mod service;
mod types;

pub use service::{ComrakRenderService, render_service};
pub use types::{DocumentHeading, RenderError, RenderOutput, RenderRequest, RenderService};
