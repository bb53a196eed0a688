//! Image addressing and manifest model
//!
//! - [`reference`]: textual reference parsing (`registry/repository:tag`)
//! - [`manifest`]: the schema 2 manifest carried from source to targets

pub mod manifest;
pub mod reference;

pub use manifest::{DOCKER_MANIFEST_V2, Descriptor, Manifest};
pub use reference::{DEFAULT_REGISTRY, DEFAULT_TAG, ImageReference};
