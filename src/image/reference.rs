//! Image reference parsing
//!
//! Splits `registry/repository/path:tag` into its three parts. Parsing never
//! fails; [`ImageReference::validate`] is the gate applied before a reference
//! is turned into a request URL.

use crate::error::{RetagError, Result};
use std::fmt;

/// Registry used when the reference carries no host
pub const DEFAULT_REGISTRY: &str = "index.docker.io";
pub const DEFAULT_TAG: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference {
    pub registry: String,
    pub repository: String,
    pub tag: String,
}

impl ImageReference {
    /// Parse a textual reference.
    ///
    /// Everything before the first `/` is the registry host; without a `/` the
    /// default registry is used and the whole text is the repository. Within the
    /// remainder, the text after the last `:` is the tag, defaulting to `latest`.
    pub fn parse(text: &str) -> Self {
        let (registry, remainder) = match text.split_once('/') {
            Some((host, rest)) => (host, rest),
            None => (DEFAULT_REGISTRY, text),
        };

        let (repository, tag) = match remainder.rsplit_once(':') {
            Some((repository, tag)) => (repository, tag),
            None => (remainder, DEFAULT_TAG),
        };

        Self {
            registry: registry.to_string(),
            repository: repository.to_string(),
            tag: tag.to_string(),
        }
    }

    /// Reject references that cannot address a manifest
    pub fn validate(&self) -> Result<()> {
        if self.registry.is_empty() {
            return Err(RetagError::Validation(format!(
                "Registry host cannot be empty in reference '{}'",
                self
            )));
        }
        if self.repository.is_empty() {
            return Err(RetagError::Validation(format!(
                "Repository path cannot be empty in reference '{}'",
                self
            )));
        }
        if self.tag.is_empty() {
            return Err(RetagError::Validation(format!(
                "Tag cannot be empty in reference '{}'",
                self
            )));
        }

        // The URL parser would otherwise resolve dot segments or cut the path at
        // a query or fragment, addressing a different manifest.
        if let Some(c) = self
            .repository
            .chars()
            .chain(self.tag.chars())
            .find(|&c| is_url_delimiter(c))
        {
            return Err(RetagError::Validation(format!(
                "Invalid character {:?} in reference '{}'",
                c, self
            )));
        }
        if self
            .repository
            .split('/')
            .any(|segment| matches!(segment, "" | "." | ".."))
        {
            return Err(RetagError::Validation(format!(
                "Repository path has an empty or relative segment in reference '{}'",
                self
            )));
        }
        if self.tag.contains('/') || matches!(self.tag.as_str(), "." | "..") {
            return Err(RetagError::Validation(format!(
                "Invalid tag '{}' in reference '{}'",
                self.tag, self
            )));
        }
        Ok(())
    }
}

fn is_url_delimiter(c: char) -> bool {
    matches!(c, '#' | '?' | '%' | '\\') || c.is_whitespace() || c.is_control()
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.registry, self.repository, self.tag)
    }
}
