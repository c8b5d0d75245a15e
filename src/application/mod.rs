//! Application layer: rendering, page templating, and the build pipeline.

pub mod build;
pub mod error;
pub mod render;
pub mod template;
