//! Registry module for Docker registry interactions
//!
//! This module provides credential resolution and the HTTP client for the
//! Docker Registry HTTP API v2 manifest endpoints.

pub mod auth;
pub mod client;

pub use crate::config::AuthConfig;
pub use auth::{Credential, CredentialResolver, CredentialSource, DockerConfigFile};
pub use client::{RegistryClient, RegistryClientBuilder};
