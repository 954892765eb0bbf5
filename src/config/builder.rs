//! Validation of store configuration against a deployment schema.

use std::fmt;

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Raw, caller-supplied store configuration.
///
/// Every field is optional here; what is actually required depends on the
/// [`ConfigSchema`] it is validated against. camelCase names are accepted as
/// aliases, including their lowercased form since the `config` crate
/// lowercases keys read from files and the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    pub region: Option<String>,
    #[serde(alias = "accessKeyId", alias = "accesskeyid")]
    pub access_key_id: Option<String>,
    #[serde(alias = "secretAccessKey", alias = "secretaccesskey")]
    pub secret_access_key: Option<String>,
    #[serde(alias = "bucketName", alias = "bucketname")]
    pub bucket_name: Option<String>,
    #[serde(alias = "folderName", alias = "foldername")]
    pub folder_name: Option<String>,
    /// Custom endpoint for S3-compatible stores
    #[serde(alias = "endpointUrl", alias = "endpointurl")]
    pub endpoint_url: Option<String>,
}

/// Whether a storage location field comes from the caller or the deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationRule {
    /// Caller must supply a non-empty value.
    Required,
    /// Fixed at deploy time; caller-supplied values are ignored.
    Fixed(String),
}

/// Describes which configuration fields a deployment requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSchema {
    pub require_credentials: bool,
    pub bucket: LocationRule,
    pub folder: LocationRule,
}

impl ConfigSchema {
    /// Region, credentials, bucket and folder all supplied by the caller.
    pub fn explicit() -> Self {
        Self {
            require_credentials: true,
            bucket: LocationRule::Required,
            folder: LocationRule::Required,
        }
    }

    /// Bucket fixed at deploy time; caller supplies region and folder.
    /// Credentials may come from the environment.
    pub fn fixed_bucket(bucket: impl Into<String>) -> Self {
        Self {
            require_credentials: false,
            bucket: LocationRule::Fixed(bucket.into()),
            folder: LocationRule::Required,
        }
    }

    /// Bucket and key prefix both fixed; only the region is required.
    pub fn fixed_location(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            require_credentials: false,
            bucket: LocationRule::Fixed(bucket.into()),
            folder: LocationRule::Fixed(prefix.into()),
        }
    }
}

impl Default for ConfigSchema {
    fn default() -> Self {
        Self::explicit()
    }
}

/// Options controlling how fetched templates are interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FetchOptions {
    /// Try to parse payloads as `{"subject": .., "body": ..}` JSON
    #[serde(default)]
    pub structured: bool,
    /// HTML-escape values substituted through `{{name}}`
    #[serde(default)]
    pub escape_html: bool,
}

/// Static access key pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

/// Where templates live: bucket plus the key prefix under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub bucket: String,
    pub prefix: String,
}

/// Validated configuration owned by a fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub region: String,
    pub credentials: Option<Credentials>,
    pub location: Location,
    pub endpoint_url: Option<String>,
    pub options: FetchOptions,
}

/// Validates a [`StoreConfig`] against a [`ConfigSchema`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    schema: ConfigSchema,
    options: FetchOptions,
}

impl ConfigBuilder {
    pub fn new(schema: ConfigSchema) -> Self {
        Self {
            schema,
            options: FetchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate `config` and produce a [`FetcherConfig`].
    ///
    /// Fields are checked in order (region, access key, secret, bucket,
    /// folder) and the first missing one is reported.
    pub fn build(&self, config: &StoreConfig) -> Result<FetcherConfig> {
        let region = present(&config.region).ok_or(AppError::MissingConfig("region"))?;

        let access_key = present(&config.access_key_id);
        let secret = present(&config.secret_access_key);
        let credentials = match (access_key, secret) {
            (Some(access_key_id), Some(secret_access_key)) => Some(Credentials {
                access_key_id: access_key_id.to_string(),
                secret_access_key: secret_access_key.to_string(),
            }),
            (None, None) if !self.schema.require_credentials => None,
            (None, _) => return Err(AppError::MissingConfig("access key")),
            (Some(_), None) => return Err(AppError::MissingConfig("secret access")),
        };

        let bucket = match &self.schema.bucket {
            LocationRule::Required => present(&config.bucket_name)
                .ok_or(AppError::MissingBucket)?
                .to_string(),
            LocationRule::Fixed(bucket) => bucket.clone(),
        };

        let prefix = match &self.schema.folder {
            LocationRule::Required => present(&config.folder_name)
                .ok_or(AppError::MissingFolder)?
                .to_string(),
            LocationRule::Fixed(prefix) => prefix.clone(),
        };

        Ok(FetcherConfig {
            region: region.to_string(),
            credentials,
            location: Location { bucket, prefix },
            endpoint_url: present(&config.endpoint_url).map(str::to_string),
            options: self.options.clone(),
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
