//! Renders a tree of markdown documents into a mirrored tree of standalone
//! HTML pages.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
