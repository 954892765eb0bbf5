//! Fetcher integration tests
//!
//! These tests exercise the full validate → resolve → fetch → render
//! pipeline through the public API, using in-process stores instead of S3.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use ara_template_fetcher::config::{ConfigBuilder, ConfigSchema, FetchOptions, StoreConfig};
use ara_template_fetcher::error::AppError;
use ara_template_fetcher::store::{MemoryStore, ObjectStore, StoreError};
use ara_template_fetcher::template::{
    curate_file_location, render, TemplateContent, TemplateDescriptor, TemplateFetcher,
};

const ACCESS_DENIED: &str = "Access Denied";
const BUCKET: &str = "ara-templates";

/// Store that counts calls and always fails with the given error.
struct FailingStore {
    error: StoreError,
    calls: AtomicUsize,
}

impl FailingStore {
    fn new(error: StoreError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ObjectStore for FailingStore {
    async fn get(&self, _bucket: &str, _key: &str) -> Result<Vec<u8>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    fn backend_type(&self) -> &'static str {
        "failing"
    }
}

fn store_config() -> StoreConfig {
    StoreConfig {
        region: Some("eu-west-1".to_string()),
        access_key_id: Some("AKIDEXAMPLE".to_string()),
        secret_access_key: Some("secret".to_string()),
        bucket_name: Some(BUCKET.to_string()),
        folder_name: Some("templates".to_string()),
        endpoint_url: None,
    }
}

fn descriptor() -> TemplateDescriptor {
    TemplateDescriptor::new("partner", "partnerCode", "email", "verification", "fr")
}

/// Build a fetcher over a memory store seeded with one template.
fn create_test_fetcher(body: &str, options: FetchOptions) -> TemplateFetcher {
    let config = ConfigBuilder::new(ConfigSchema::explicit())
        .with_options(options)
        .build(&store_config())
        .unwrap();

    let store = MemoryStore::new();
    store.insert(
        BUCKET,
        &curate_file_location(&config.location.prefix, &descriptor()),
        body,
    );

    TemplateFetcher::new(config, Arc::new(store))
}

fn invalid_descriptors() -> Vec<(&'static str, TemplateDescriptor)> {
    let base = descriptor();
    vec![
        ("entity", TemplateDescriptor { entity: String::new(), ..base.clone() }),
        ("entityId", TemplateDescriptor { entity_id: String::new(), ..base.clone() }),
        ("category", TemplateDescriptor { category: String::new(), ..base.clone() }),
        ("type", TemplateDescriptor { kind: String::new(), ..base.clone() }),
        ("language", TemplateDescriptor { language: String::new(), ..base }),
    ]
}

#[tokio::test]
async fn test_fetch_raw_template() {
    let fetcher = create_test_fetcher("Bonjour {{username}}", FetchOptions::default());

    let template = fetcher.raw(&descriptor()).await.unwrap();
    assert_eq!(template, TemplateContent::Raw("Bonjour {{username}}".to_string()));
}

#[tokio::test]
async fn test_fetch_interpolated_template() {
    let fetcher = create_test_fetcher("Hello {{username}}", FetchOptions::default());

    let template = fetcher
        .interpolate(&descriptor(), &json!({"username": "rahul"}))
        .await
        .unwrap();
    assert_eq!(template.body(), "Hello rahul");
}

#[tokio::test]
async fn test_interpolate_with_empty_data() {
    let fetcher = create_test_fetcher("No placeholders here.", FetchOptions::default());

    let template = fetcher.interpolate(&descriptor(), &json!({})).await.unwrap();
    assert_eq!(template, TemplateContent::Raw("No placeholders here.".to_string()));
}

#[tokio::test]
async fn test_invalid_parameters_never_reach_store() {
    let config = ConfigBuilder::new(ConfigSchema::explicit())
        .build(&store_config())
        .unwrap();
    let store = Arc::new(FailingStore::new(StoreError::new("should not be called")));
    let fetcher = TemplateFetcher::new(config, store.clone());

    for (field, invalid) in invalid_descriptors() {
        let err = fetcher.raw(&invalid).await.unwrap_err();
        assert_eq!(err.code(), "MissingParam", "raw, field {}", field);
        assert_eq!(err.message(), format!("Invalid parameter - Missing {}", field));

        let err = fetcher
            .interpolate(&invalid, &json!({"username": "rahul"}))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "MissingParam", "interpolate, field {}", field);
    }

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_backend_failure_is_normalized() {
    let config = ConfigBuilder::new(ConfigSchema::explicit())
        .build(&store_config())
        .unwrap();
    let store = Arc::new(FailingStore::new(
        StoreError::new(ACCESS_DENIED).with_code("AccessDenied"),
    ));
    let fetcher = TemplateFetcher::new(config, store.clone());

    let err = fetcher.raw(&descriptor()).await.unwrap_err();
    assert!(matches!(err, AppError::Backend { .. }));
    assert_eq!(err.message(), ACCESS_DENIED);
    assert_eq!(err.code(), "AccessDenied");

    let err = fetcher
        .interpolate(&descriptor(), &json!({"username": "rahul"}))
        .await
        .unwrap_err();
    assert_eq!(err.message(), ACCESS_DENIED);

    // One call per request, no retries
    assert_eq!(store.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_backend_failure_without_code() {
    let config = ConfigBuilder::new(ConfigSchema::explicit())
        .build(&store_config())
        .unwrap();
    let fetcher = TemplateFetcher::new(
        config,
        Arc::new(FailingStore::new(StoreError::new(ACCESS_DENIED))),
    );

    let err = fetcher.raw(&descriptor()).await.unwrap_err();
    assert_eq!(err.message(), ACCESS_DENIED);
    assert_eq!(err.code(), "Unknown");
}

#[tokio::test]
async fn test_structured_template() {
    let options = FetchOptions {
        structured: true,
        escape_html: false,
    };
    let fetcher = create_test_fetcher(r#"{"subject":"S","body":"B {{x}}"}"#, options);

    let template = fetcher.interpolate(&descriptor(), &json!({"x": 1})).await.unwrap();
    assert_eq!(
        template,
        TemplateContent::Structured {
            subject: "S".to_string(),
            body: "B 1".to_string()
        }
    );
}

#[tokio::test]
async fn test_structured_subject_is_rendered() {
    let options = FetchOptions {
        structured: true,
        escape_html: false,
    };
    let fetcher = create_test_fetcher(
        r#"{"subject":"Welcome {{name}}","body":"Hi {{name}}, your code is {{code}}"}"#,
        options,
    );

    let template = fetcher
        .interpolate(&descriptor(), &json!({"name": "Alice", "code": 4711}))
        .await
        .unwrap();
    assert_eq!(template.subject(), Some("Welcome Alice"));
    assert_eq!(template.body(), "Hi Alice, your code is 4711");
}

#[tokio::test]
async fn test_structured_fallback_for_plain_text() {
    let options = FetchOptions {
        structured: true,
        escape_html: false,
    };
    let fetcher = create_test_fetcher("Hello {{username}}", options);

    let template = fetcher.raw(&descriptor()).await.unwrap();
    assert_eq!(
        template,
        TemplateContent::Structured {
            subject: String::new(),
            body: "Hello {{username}}".to_string()
        }
    );
}

#[tokio::test]
async fn test_html_escaping_option() {
    let options = FetchOptions {
        structured: false,
        escape_html: true,
    };
    let fetcher = create_test_fetcher("<p>{{name}}</p>{{{raw}}}", options);

    let template = fetcher
        .interpolate(&descriptor(), &json!({"name": "<Tom>", "raw": "<br>"}))
        .await
        .unwrap();
    assert_eq!(template.body(), "<p>&lt;Tom&gt;</p><br>");
}

#[tokio::test]
async fn test_independent_fetchers() {
    // Two configurations side by side; neither leaks into the other
    let a = create_test_fetcher("from a", FetchOptions::default());

    let mut other = store_config();
    other.folder_name = Some("other".to_string());
    let config = ConfigBuilder::new(ConfigSchema::explicit())
        .build(&other)
        .unwrap();
    let store = MemoryStore::new();
    store.insert(
        BUCKET,
        "other/partner/partnerCode/email/verification/fr.txt",
        "from b",
    );
    let b = TemplateFetcher::new(config, Arc::new(store));

    let (da, db) = (descriptor(), descriptor());
    let (ra, rb) = tokio::join!(a.raw(&da), b.raw(&db));
    assert_eq!(ra.unwrap().body(), "from a");
    assert_eq!(rb.unwrap().body(), "from b");
}

#[test]
fn test_missing_config() {
    let err = ConfigBuilder::new(ConfigSchema::explicit())
        .build(&StoreConfig::default())
        .unwrap_err();
    assert_eq!(err.code(), "MISSINGCONFIG");
}

#[test]
fn test_render_round_trip_without_placeholders() {
    let text = "Dear customer,\nThanks for joining.\n";
    assert_eq!(render(text, &json!({})), text);
}
