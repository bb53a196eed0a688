//! Upload module: units of work for the manifest worker pool

pub mod parallel;

pub use parallel::ParallelUploader;

use crate::error::{RetagError, Result};
use crate::image::{ImageReference, Manifest};
use std::sync::Arc;

/// One manifest to publish under one target reference
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub manifest: Arc<Manifest>,
    pub target: ImageReference,
}

/// Result of a single [`UploadJob`]
#[derive(Debug)]
pub struct UploadOutcome {
    pub target: ImageReference,
    pub result: Result<()>,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Tie a failure to the target it happened on
    pub fn into_result(self) -> Result<ImageReference> {
        match self.result {
            Ok(()) => Ok(self.target),
            Err(source) => Err(RetagError::Publish {
                target: self.target.to_string(),
                source: Box::new(source),
            }),
        }
    }
}
