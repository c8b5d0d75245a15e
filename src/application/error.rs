use std::{error::Error as StdError, path::PathBuf};

use thiserror::Error;

use crate::{application::render::RenderError, config::LoadError, infra::error::InfraError};

/// Any failure that aborts a build. There is no per-document recovery: the
/// first error ends the run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("failed to render {}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
    #[error("unexpected error: {message}")]
    Unexpected { message: String },
}

impl AppError {
    pub fn render(path: impl Into<PathBuf>, source: RenderError) -> Self {
        Self::Render {
            path: path.into(),
            source,
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }
}

/// Flattened view of an error and its `source()` chain, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { messages }
    }

    pub fn causes(&self) -> &[String] {
        self.messages.get(1..).unwrap_or_default()
    }
}
