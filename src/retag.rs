//! Retag orchestration
//!
//! A retag is one manifest fetch from the source reference followed by one
//! publish per target reference. Publishes run on a [`ParallelUploader`]
//! capped at [`DEFAULT_MAX_WORKERS`] workers.

use crate::common::ManifestRegistry;
use crate::config::DEFAULT_MAX_WORKERS;
use crate::error::Result;
use crate::image::{ImageReference, Manifest};
use crate::logging::Logger;
use crate::upload::{ParallelUploader, UploadJob};
use std::sync::Arc;

/// What a successful retag did
#[derive(Debug, Clone)]
pub struct RetagSummary {
    pub source: ImageReference,
    pub manifest: Arc<Manifest>,
    /// Targets in the order their uploads completed
    pub published: Vec<ImageReference>,
}

pub struct Retagger<R: ?Sized> {
    registry: Arc<R>,
    max_workers: usize,
    output: Logger,
}

impl<R> Retagger<R>
where
    R: ManifestRegistry + ?Sized + 'static,
{
    pub fn new(registry: Arc<R>, output: Logger) -> Self {
        Self {
            registry,
            max_workers: DEFAULT_MAX_WORKERS,
            output,
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Parse textual references and retag
    pub async fn retag_refs<S: AsRef<str>>(
        &self,
        source: &str,
        targets: &[S],
    ) -> Result<RetagSummary> {
        let source = ImageReference::parse(source);
        let targets: Vec<_> = targets
            .iter()
            .map(|t| ImageReference::parse(t.as_ref()))
            .collect();
        self.retag(&source, &targets).await
    }

    /// Publish the manifest of `source` under every reference in `targets`.
    ///
    /// Fails without publishing anything if the fetch fails. Otherwise every
    /// target is attempted, and the first failure to arrive is returned once all
    /// uploads have finished.
    pub async fn retag(
        &self,
        source: &ImageReference,
        targets: &[ImageReference],
    ) -> Result<RetagSummary> {
        self.output.step(&format!("Fetching manifest for {}", source));
        let manifest = Arc::new(self.registry.fetch_manifest(source).await?);
        self.output.info(&format!(
            "Fetched manifest for {} ({} layers)",
            source,
            manifest.layers.len()
        ));

        let jobs: Vec<UploadJob> = targets
            .iter()
            .cloned()
            .map(|target| UploadJob {
                manifest: Arc::clone(&manifest),
                target,
            })
            .collect();

        let uploader = ParallelUploader::new(
            Arc::clone(&self.registry),
            self.max_workers,
            self.output.clone(),
        );
        let outcomes = uploader.run(jobs).await?;

        let mut published = Vec::with_capacity(outcomes.len());
        let mut first_failure = None;
        let mut failures = 0;

        for outcome in outcomes {
            match outcome.into_result() {
                Ok(target) => {
                    self.output.success(&format!("Tagged {}", target));
                    published.push(target);
                }
                Err(e) => {
                    self.output.error(&e.to_string());
                    failures += 1;
                    if first_failure.is_none() {
                        first_failure = Some(e);
                    }
                }
            }
        }

        if let Some(err) = first_failure {
            self.output.error(&format!(
                "{} of {} targets failed",
                failures,
                targets.len()
            ));
            return Err(err);
        }

        Ok(RetagSummary {
            source: source.clone(),
            manifest,
            published,
        })
    }
}
