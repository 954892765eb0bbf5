//! Template fetching and interpolation

use std::fmt;
use std::sync::Arc;

use crate::config::FetcherConfig;
use crate::error::{AppError, Result};
use crate::store::{ObjectStore, S3Store};

use super::key::curate_file_location;
use super::render::render_with;
use super::types::{RenderedTemplate, TemplateContent, TemplateDescriptor};

/// Fetches templates from an object store and renders them.
///
/// Holds validated configuration and a shared store handle. Cheap to share
/// behind an `Arc`; every call is independent.
pub struct TemplateFetcher {
    config: FetcherConfig,
    store: Arc<dyn ObjectStore>,
}

impl fmt::Debug for TemplateFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateFetcher")
            .field("config", &self.config)
            .field("backend", &self.store.backend_type())
            .finish()
    }
}

impl TemplateFetcher {
    /// Create a fetcher over an explicit store.
    pub fn new(config: FetcherConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }

    /// Create a fetcher backed by S3.
    pub async fn connect(config: FetcherConfig) -> Self {
        let store = S3Store::connect(&config).await;
        Self::new(config, Arc::new(store))
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Storage key for `descriptor` under this fetcher's prefix.
    pub fn key_for(&self, descriptor: &TemplateDescriptor) -> String {
        curate_file_location(&self.config.location.prefix, descriptor)
    }

    /// Fetch and decode a template without validating the descriptor.
    ///
    /// A single `get` is issued; store faults are returned as
    /// [`AppError::Backend`] with their message and code intact.
    pub async fn get_template(&self, descriptor: &TemplateDescriptor) -> Result<TemplateContent> {
        let bucket = &self.config.location.bucket;
        let key = self.key_for(descriptor);

        tracing::debug!(
            backend = self.store.backend_type(),
            bucket = %bucket,
            key = %key,
            "Fetching template"
        );

        let bytes = self.store.get(bucket, &key).await.map_err(|e| {
            tracing::warn!(
                bucket = %bucket,
                key = %key,
                code = e.code.as_deref().unwrap_or("none"),
                error = %e,
                "Template fetch failed"
            );
            AppError::from(e)
        })?;

        let text = String::from_utf8(bytes)?;

        Ok(TemplateContent::parse(text, self.config.options.structured))
    }

    /// Fetch a template as stored.
    pub async fn raw(&self, descriptor: &TemplateDescriptor) -> Result<TemplateContent> {
        descriptor.validate()?;
        self.get_template(descriptor).await
    }

    /// Fetch a template and substitute `data` into it.
    ///
    /// Both subject and body of structured content are rendered.
    pub async fn interpolate(
        &self,
        descriptor: &TemplateDescriptor,
        data: &serde_json::Value,
    ) -> Result<RenderedTemplate> {
        descriptor.validate()?;
        let template = self.get_template(descriptor).await?;

        let escape_html = self.config.options.escape_html;
        Ok(template.map_text(|text| render_with(text, data, escape_html)))
    }
}
