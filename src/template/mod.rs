//! Notification template fetching.
//!
//! This module provides:
//! - Template descriptors identifying one template in the store
//! - Deterministic storage key layout
//! - Fetching with optional subject/body parsing
//! - Variable substitution engine for rendering templates ({{variable}})
//!
//! # Example
//!
//! ```ignore
//! let config = ConfigBuilder::new(ConfigSchema::explicit()).build(&store_config)?;
//! let fetcher = TemplateFetcher::connect(config).await;
//!
//! let descriptor = TemplateDescriptor::new("partner", "partnerCode", "email", "verification", "fr");
//!
//! // Render with variables
//! let rendered = fetcher
//!     .interpolate(&descriptor, &json!({ "username": "rahul" }))
//!     .await?;
//! ```

mod fetcher;
mod key;
mod render;
mod types;

pub use fetcher::TemplateFetcher;
pub use key::curate_file_location;
pub use render::{render, render_with};
pub use types::{RenderedTemplate, TemplateContent, TemplateDescriptor};
