// Shared infrastructure
pub mod config;
pub mod error;
pub mod store;

// Domain layer
pub mod template;

pub use config::{ConfigBuilder, ConfigSchema, FetcherConfig, StoreConfig};
pub use error::AppError;
pub use template::{TemplateContent, TemplateDescriptor, TemplateFetcher};
