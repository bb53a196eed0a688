//! Docker Retag Library
//!
//! Retags an image on a Docker Registry v2 by fetching its manifest once and
//! publishing it under new references. No layer data is transferred.

pub mod cli;
pub mod common;
pub mod config;
pub mod error;
pub mod image;
pub mod logging;
pub mod registry;
pub mod retag;
pub mod upload;

pub use config::RetagConfig;
pub use error::{RetagError, Result};
pub use image::{ImageReference, Manifest};
pub use registry::RegistryClient;
pub use retag::{RetagSummary, Retagger};
