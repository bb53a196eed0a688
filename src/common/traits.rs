//! Common traits and interfaces

use crate::error::Result;
use crate::image::{ImageReference, Manifest};
use async_trait::async_trait;

/// Manifest storage addressed by image reference
///
/// Implemented by [`crate::registry::RegistryClient`] for a real registry. The
/// orchestrator only depends on this trait.
#[async_trait]
pub trait ManifestRegistry: Send + Sync {
    /// Fetch the schema 2 manifest stored under `reference`
    async fn fetch_manifest(&self, reference: &ImageReference) -> Result<Manifest>;

    /// Store `manifest` under `reference`
    async fn publish_manifest(
        &self,
        reference: &ImageReference,
        manifest: &Manifest,
    ) -> Result<()>;
}
