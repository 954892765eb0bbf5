use config::builder::DefaultState;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use super::builder::{ConfigBuilder, ConfigSchema, FetchOptions, FetcherConfig, LocationRule, StoreConfig};
use crate::error::AppError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub template: FetchOptions,
    #[serde(default)]
    pub deployment: DeploymentConfig,
}

/// Per-deployment schema: which location fields are fixed.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentConfig {
    /// Bucket fixed at deploy time (caller value ignored)
    pub fixed_bucket: Option<String>,
    /// Key prefix fixed at deploy time (caller value ignored)
    pub fixed_folder: Option<String>,
    #[serde(default = "default_require_credentials")]
    pub require_credentials: bool,
}

fn default_require_credentials() -> bool {
    true
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            fixed_bucket: None,
            fixed_folder: None,
            require_credentials: default_require_credentials(),
        }
    }
}

impl DeploymentConfig {
    pub fn schema(&self) -> ConfigSchema {
        let rule = |fixed: &Option<String>| match fixed.as_deref() {
            Some(value) if !value.is_empty() => LocationRule::Fixed(value.to_string()),
            _ => LocationRule::Required,
        };

        ConfigSchema {
            require_credentials: self.require_credentials,
            bucket: rule(&self.fixed_bucket),
            folder: rule(&self.fixed_folder),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::defaults()?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // TEMPLATE__STORE__REGION, TEMPLATE__STORE__BUCKET_NAME, TEMPLATE__TEMPLATE__STRUCTURED, etc.
            .add_source(
                Environment::with_prefix("TEMPLATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("template.structured", false)?
            .set_default("template.escape_html", false)?
            .set_default("deployment.require_credentials", true)
    }

    /// Validate the store section against the deployment schema.
    pub fn fetcher_config(&self) -> Result<FetcherConfig, AppError> {
        ConfigBuilder::new(self.deployment.schema())
            .with_options(self.template.clone())
            .build(&self.store)
    }
}
