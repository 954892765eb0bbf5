//! S3-backed object store.

use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;

use crate::config::FetcherConfig;

use super::{ObjectStore, StoreError};

const PROVIDER_NAME: &str = "ara-template-fetcher";

/// Object store backed by an `aws-sdk-s3` client.
///
/// The client is built once and reused for every fetch. SDK retries are
/// disabled: one `get` is one request.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    /// Wrap an already configured client.
    pub fn from_client(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Build a client from validated configuration.
    ///
    /// Static credentials are used when present; otherwise credentials come
    /// from the default provider chain (environment, profile, instance role).
    pub async fn connect(config: &FetcherConfig) -> Self {
        let region = Region::new(config.region.clone());

        let mut builder = match &config.credentials {
            Some(creds) => aws_sdk_s3::config::Builder::new()
                .behavior_version(BehaviorVersion::latest())
                .region(region)
                .credentials_provider(Credentials::new(
                    &creds.access_key_id,
                    &creds.secret_access_key,
                    None,
                    None,
                    PROVIDER_NAME,
                )),
            None => {
                let shared = aws_config::defaults(BehaviorVersion::latest())
                    .region(region)
                    .retry_config(RetryConfig::disabled())
                    .load()
                    .await;
                aws_sdk_s3::config::Builder::from(&shared)
            }
        };

        builder = builder.retry_config(RetryConfig::disabled());

        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(
            region = %config.region,
            bucket = %config.location.bucket,
            endpoint = config.endpoint_url.as_deref().unwrap_or("default"),
            static_credentials = config.credentials.is_some(),
            "S3 client configured"
        );

        Self::from_client(aws_sdk_s3::Client::from_conf(builder.build()))
    }
}

/// Map an SDK failure onto a [`StoreError`].
///
/// Service errors keep the S3 code and message. Construction, dispatch,
/// timeout and response failures carry no service metadata; their message
/// is the full source chain and they have no code.
fn store_error(err: SdkError<GetObjectError, HttpResponse>) -> StoreError {
    match err {
        SdkError::ServiceError(_) => {
            let service = err.into_service_error();
            let message = service
                .message()
                .map(str::to_owned)
                .unwrap_or_else(|| service.to_string());
            match service.code() {
                Some(code) => StoreError::new(message).with_code(code),
                None => StoreError::new(message),
            }
        }
        other => StoreError::new(DisplayErrorContext(&other).to_string()),
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(store_error)?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::new(format!("Failed to read object body: {e}")))?;

        Ok(body.into_bytes().to_vec())
    }

    fn backend_type(&self) -> &'static str {
        "s3"
    }
}
