//! One documentation build: enumerate sources, render each to HTML, wrap it
//! in the page template, and write it to the mirrored destination path.

use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use futures::{TryStreamExt, stream};
use tracing::info;

use crate::{
    application::{
        error::AppError,
        render::{RenderRequest, RenderService, render_service},
        template,
    },
    config::{BuildSettings, Settings},
    domain::document::DocumentFile,
    infra::{
        error::InfraError,
        fs::{ResolvedPaths, enumerate_documents, read_document, resolve_paths, write_document},
    },
};

/// Outcome of a completed build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub documents: usize,
}

/// Resolve the configured roots and convert every document beneath the source root.
pub async fn run(settings: &Settings) -> Result<BuildReport, AppError> {
    let paths = resolve_paths(&settings.paths).await?;
    let pipeline = BuildPipeline::new(paths, settings.build, render_service());
    pipeline.run().await
}

pub struct BuildPipeline {
    paths: ResolvedPaths,
    settings: BuildSettings,
    renderer: Arc<dyn RenderService>,
}

impl BuildPipeline {
    pub fn new(
        paths: ResolvedPaths,
        settings: BuildSettings,
        renderer: Arc<dyn RenderService>,
    ) -> Self {
        Self {
            paths,
            settings,
            renderer,
        }
    }

    pub fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    pub async fn run(&self) -> Result<BuildReport, AppError> {
        let src = self.paths.src_dir.display();
        let build = self.paths.build_dir.display();
        info!(
            target = "docs_builder::build",
            jobs = self.settings.jobs.get(),
            sorted = self.settings.sorted,
            "{src} -> {build}"
        );

        let documents = enumerate_documents(&self.paths.src_dir);
        let count = if self.settings.sorted {
            let mut sorted = documents.collect::<Result<Vec<_>, _>>()?;
            sorted.sort();
            self.convert_all(sorted.into_iter().map(Ok)).await?
        } else {
            self.convert_all(documents).await?
        };

        info!(
            target = "docs_builder::build",
            documents = count,
            "Build completed"
        );
        Ok(BuildReport { documents: count })
    }

    async fn convert_all<I>(&self, documents: I) -> Result<usize, AppError>
    where
        I: Iterator<Item = Result<DocumentFile, InfraError>>,
    {
        let total = AtomicUsize::new(0);
        let counter = &total;

        stream::iter(documents)
            .map_err(AppError::from)
            .try_for_each_concurrent(Some(self.settings.jobs.get()), move |document| async move {
                self.convert(document).await?;
                counter.fetch_add(1, Ordering::Relaxed);
                Ok::<(), AppError>(())
            })
            .await?;

        Ok(total.load(Ordering::Relaxed))
    }

    /// Read → render → wrap → write for a single document.
    pub async fn convert(&self, document: DocumentFile) -> Result<PathBuf, AppError> {
        let markdown = read_document(&document).await?;

        let renderer = Arc::clone(&self.renderer);
        let output = tokio::task::spawn_blocking(move || {
            renderer.render(&RenderRequest::new(markdown))
        })
        .await
        .map_err(|err| AppError::unexpected(format!("render task failed: {err}")))?
        .map_err(|source| AppError::render(document.source_path(), source))?;

        let page = template::wrap(&output.html);
        let html_path = document.output_path(&self.paths.build_dir);
        write_document(&html_path, &page).await?;

        info!(
            target = "docs_builder::build",
            code = output.contains_code,
            toc = output.contains_toc,
            "{} -> {}",
            document.source_path().display(),
            html_path.display()
        );
        Ok(html_path)
    }
}
