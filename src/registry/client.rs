//! Registry HTTP client for manifest operations
//!
//! Implements the two Docker Registry v2 calls a retag needs:
//! - Manifest fetch (GET /v2/{name}/manifests/{reference}), expecting 200
//! - Manifest publish (PUT /v2/{name}/manifests/{reference}), expecting 201
//!
//! Credentials are resolved per registry host on every call, so source and
//! target references may live on different registries.

use crate::common::ManifestRegistry;
use crate::config::RetagConfig;
use crate::error::handlers::HttpErrorHandler;
use crate::error::{RetagError, Result};
use crate::image::{DOCKER_MANIFEST_V2, ImageReference, Manifest};
use crate::logging::Logger;
use crate::registry::auth::CredentialResolver;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use std::sync::Arc;
use url::Url;

const USER_AGENT: &str = concat!("docker-retag/", env!("CARGO_PKG_VERSION"));

pub struct RegistryClientBuilder {
    config: Arc<RetagConfig>,
    logger: Logger,
}

impl RegistryClientBuilder {
    pub fn new(config: Arc<RetagConfig>) -> Self {
        let logger = Logger::new(config.log_level);
        Self { config, logger }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn build(self) -> Result<RegistryClient> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RetagError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(RegistryClient {
            client,
            resolver: CredentialResolver::new(Arc::clone(&self.config)),
            config: self.config,
            logger: self.logger,
        })
    }
}

#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
    config: Arc<RetagConfig>,
    resolver: CredentialResolver,
    logger: Logger,
}

impl RegistryClient {
    pub fn builder(config: Arc<RetagConfig>) -> RegistryClientBuilder {
        RegistryClientBuilder::new(config)
    }

    /// `{scheme}://{host}/v2/{repository}/manifests/{tag}`
    pub fn manifest_url(&self, reference: &ImageReference) -> Result<Url> {
        reference.validate()?;
        let url = Url::parse(&format!(
            "{}://{}/v2/{}/manifests/{}",
            self.config.scheme(),
            reference.registry,
            reference.repository,
            reference.tag
        ))?;
        Ok(url)
    }

    async fn authorize(&self, request: RequestBuilder, host: &str) -> Result<RequestBuilder> {
        match self.resolver.resolve_with_source(host).await? {
            Some((credential, source)) => {
                self.logger.debug(&format!("Using {} for {}", source, host));
                Ok(request.header(AUTHORIZATION, credential.header_value()))
            }
            None => {
                self.logger.debug(&format!(
                    "No credentials found for {}, sending anonymous request",
                    host
                ));
                Ok(request)
            }
        }
    }

    pub async fn fetch_manifest(&self, reference: &ImageReference) -> Result<Manifest> {
        let url = self.manifest_url(reference)?;
        self.logger.debug(&format!("Fetching manifest from {}", url));

        let request = self.client.get(url).header(ACCEPT, DOCKER_MANIFEST_V2);
        let request = self.authorize(request, &reference.registry).await?;

        let response = request
            .send()
            .await
            .map_err(|e| HttpErrorHandler::handle_network_error(&e, "manifest fetch"))?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            self.logger.error(&format!(
                "Failed to fetch manifest for {}: HTTP {}",
                reference, status
            ));
            return Err(HttpErrorHandler::handle_registry_error(
                status,
                &error_text,
                "manifest fetch",
            ));
        }

        let body = response.bytes().await.map_err(|e| {
            RetagError::Network(format!("Failed to read manifest response: {}", e))
        })?;
        self.logger.trace(&format!(
            "Manifest body: {}",
            String::from_utf8_lossy(&body)
        ));

        let manifest = Manifest::from_slice(&body).map_err(|e| {
            RetagError::Decode(format!("{} did not return a schema 2 manifest: {}", reference, e))
        })?;

        self.logger.detail(&format!(
            "Manifest {} with {} layers",
            manifest.content_type(),
            manifest.layers.len()
        ));
        Ok(manifest)
    }

    pub async fn publish_manifest(
        &self,
        reference: &ImageReference,
        manifest: &Manifest,
    ) -> Result<()> {
        let url = self.manifest_url(reference)?;
        let body = manifest
            .to_vec()
            .map_err(|e| RetagError::Decode(format!("Failed to encode manifest: {}", e)))?;

        self.logger.debug(&format!(
            "Publishing manifest to {} with content-type: {}",
            url,
            manifest.content_type()
        ));

        let request = self
            .client
            .put(url)
            .header(CONTENT_TYPE, manifest.content_type())
            .body(body);
        let request = self.authorize(request, &reference.registry).await?;

        let response = request
            .send()
            .await
            .map_err(|e| HttpErrorHandler::handle_network_error(&e, "manifest publish"))?;

        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        self.logger.trace(&format!("Publish response: {}", error_text));

        if status != StatusCode::CREATED {
            self.logger.error(&format!(
                "Failed to publish manifest to {}: HTTP {}",
                reference, status
            ));
            return Err(HttpErrorHandler::handle_registry_error(
                status,
                &error_text,
                "manifest publish",
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl ManifestRegistry for RegistryClient {
    async fn fetch_manifest(&self, reference: &ImageReference) -> Result<Manifest> {
        RegistryClient::fetch_manifest(self, reference).await
    }

    async fn publish_manifest(
        &self,
        reference: &ImageReference,
        manifest: &Manifest,
    ) -> Result<()> {
        RegistryClient::publish_manifest(self, reference, manifest).await
    }
}
