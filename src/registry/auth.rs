//! Credential resolution for registry access
//!
//! Each registry host gets a Basic auth token from the first source that has one:
//! explicit credentials, then `DOCKER_USER`/`DOCKER_PASS`, then the `auths`
//! section of the docker credential store. No source means anonymous access.

use crate::config::{AuthConfig, RetagConfig};
use crate::error::{RetagError, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

/// Opaque Basic auth token, usable directly in an `Authorization` header
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn basic(username: &str, password: &str) -> Self {
        Credential(STANDARD.encode(format!("{}:{}", username, password)))
    }

    /// Wrap a token that is already base64 encoded
    pub fn from_encoded(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    pub fn header_value(&self) -> String {
        format!("Basic {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Explicit,
    Environment,
    CredentialStore,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Explicit => f.write_str("explicit credentials"),
            CredentialSource::Environment => f.write_str("environment credentials"),
            CredentialSource::CredentialStore => f.write_str("credential store"),
        }
    }
}

/// The parts of `~/.docker/config.json` this tool reads
#[derive(Debug, Default, Deserialize)]
pub struct DockerConfigFile {
    #[serde(default)]
    pub auths: Option<HashMap<String, AuthEntry>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthEntry {
    #[serde(default)]
    pub auth: Option<String>,
}

impl DockerConfigFile {
    /// Load the store; a missing file yields `None`
    pub async fn load(path: &Path) -> Result<Option<Self>> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(RetagError::Resolution {
                    path: path.to_path_buf(),
                    message: format!("failed to read credential store: {}", e),
                });
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| RetagError::Resolution {
                path: path.to_path_buf(),
                message: format!("failed to parse credential store: {}", e),
            })
    }

    /// Pre-encoded token for `host`, ignoring empty entries
    pub fn auth_for(&self, host: &str) -> Option<&str> {
        self.auths
            .as_ref()?
            .get(host)?
            .auth
            .as_deref()
            .filter(|auth| !auth.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct CredentialResolver {
    config: Arc<RetagConfig>,
}

impl CredentialResolver {
    pub fn new(config: Arc<RetagConfig>) -> Self {
        Self { config }
    }

    pub async fn resolve(&self, host: &str) -> Result<Option<Credential>> {
        Ok(self
            .resolve_with_source(host)
            .await?
            .map(|(credential, _)| credential))
    }

    /// Resolve a credential for `host` and report which source supplied it
    pub async fn resolve_with_source(
        &self,
        host: &str,
    ) -> Result<Option<(Credential, CredentialSource)>> {
        if let Some(credential) = Self::from_pair(&self.config.explicit) {
            return Ok(Some((credential, CredentialSource::Explicit)));
        }

        if let Some(credential) = Self::from_pair(&self.config.environment) {
            return Ok(Some((credential, CredentialSource::Environment)));
        }

        let Some(path) = self.config.docker_config.as_deref() else {
            return Ok(None);
        };

        let Some(store) = DockerConfigFile::load(path).await? else {
            return Ok(None);
        };

        Ok(store.auth_for(host).map(|auth| {
            (
                Credential::from_encoded(auth),
                CredentialSource::CredentialStore,
            )
        }))
    }

    fn from_pair(auth: &AuthConfig) -> Option<Credential> {
        auth.pair()
            .map(|(username, password)| Credential::basic(username, password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HOST: &str = "registry.example.com";

    fn store(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn with_store(path: &Path) -> RetagConfig {
        RetagConfig::default().with_docker_config(Some(path.to_path_buf()))
    }

    fn resolver(config: RetagConfig) -> CredentialResolver {
        CredentialResolver::new(Arc::new(config))
    }

    #[test]
    fn test_basic_encoding() {
        assert_eq!(
            Credential::basic("user", "pass").header_value(),
            "Basic dXNlcjpwYXNz"
        );
        assert_eq!(format!("{:?}", Credential::basic("u", "p")), "Credential(<redacted>)");
    }

    #[tokio::test]
    async fn test_explicit_beats_everything() {
        let file = store(r#"{"auths":{"registry.example.com":{"auth":"c3RvcmU6c3RvcmU="}}}"#);
        let config = RetagConfig::default()
            .with_explicit_auth(Some("cli".into()), Some("clipass".into()))
            .with_environment_auth(AuthConfig::new("env", "envpass"))
            .with_docker_config(Some(file.path().to_path_buf()));

        let (credential, source) = resolver(config)
            .resolve_with_source(HOST)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(source, CredentialSource::Explicit);
        assert_eq!(credential, Credential::basic("cli", "clipass"));
    }

    #[tokio::test]
    async fn test_environment_beats_store() {
        let file = store(r#"{"auths":{"registry.example.com":{"auth":"c3RvcmU6c3RvcmU="}}}"#);
        let config = RetagConfig::default()
            .with_explicit_auth(Some("cli".into()), None)
            .with_environment_auth(AuthConfig::new("env", "envpass"))
            .with_docker_config(Some(file.path().to_path_buf()));

        let (credential, source) = resolver(config)
            .resolve_with_source(HOST)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(source, CredentialSource::Environment);
        assert_eq!(credential, Credential::basic("env", "envpass"));
    }

    #[tokio::test]
    async fn test_store_token_used_verbatim() {
        let file = store(
            r#"{"auths":{"registry.example.com":{"auth":"c3RvcmU6c3RvcmU="}},"credsStore":"desktop"}"#,
        );
        let config = with_store(file.path());

        let (credential, source) = resolver(config)
            .resolve_with_source(HOST)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(source, CredentialSource::CredentialStore);
        assert_eq!(credential.header_value(), "Basic c3RvcmU6c3RvcmU=");
    }

    #[tokio::test]
    async fn test_store_misses_are_absent() {
        let file =
            store(r#"{"auths":{"registry.example.com":{"auth":""},"other.example.com":{}}}"#);
        let r = resolver(with_store(file.path()));
        assert!(r.resolve(HOST).await.unwrap().is_none());
        assert!(r.resolve("other.example.com").await.unwrap().is_none());
        assert!(r.resolve("unknown.example.com").await.unwrap().is_none());

        let no_auths = store(r#"{"credsStore":"desktop"}"#);
        let r = resolver(with_store(no_auths.path()));
        assert!(r.resolve(HOST).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_store_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let config = with_store(&dir.path().join("config.json"));
        assert!(resolver(config).resolve(HOST).await.unwrap().is_none());
        assert!(resolver(RetagConfig::default()).resolve(HOST).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_store_is_resolution_error() {
        let malformed = [
            "{not json",
            r#"{"auths":["registry.example.com"]}"#,
            r#"{"auths":{"registry.example.com":{"auth":42}}}"#,
        ];
        for content in malformed {
            let file = store(content);
            let config = with_store(file.path());
            match resolver(config).resolve(HOST).await {
                Err(RetagError::Resolution { path, .. }) => assert_eq!(path, file.path()),
                other => panic!("expected resolution error for {content}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_unreadable_store_is_resolution_error() {
        // A directory exists but cannot be read as a file
        let dir = tempfile::tempdir().unwrap();
        let config = with_store(dir.path());
        assert!(matches!(
            resolver(config).resolve(HOST).await,
            Err(RetagError::Resolution { .. })
        ));
    }
}
