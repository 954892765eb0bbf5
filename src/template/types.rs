//! Template descriptor and content types

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Identifies one template within a store location.
///
/// All five fields are required; a field missing from serialized input
/// deserializes as empty and is rejected by [`TemplateDescriptor::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    /// Owning entity kind, e.g. `partner`
    #[serde(default)]
    pub entity: String,

    /// Identifier of the owning entity
    #[serde(default)]
    pub entity_id: String,

    /// Delivery channel, e.g. `email` or `sms`
    #[serde(default)]
    pub category: String,

    /// Template purpose, e.g. `verification`
    #[serde(default, rename = "type")]
    pub kind: String,

    /// Language code, e.g. `fr`
    #[serde(default)]
    pub language: String,
}

impl TemplateDescriptor {
    pub fn new(
        entity: impl Into<String>,
        entity_id: impl Into<String>,
        category: impl Into<String>,
        kind: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            entity: entity.into(),
            entity_id: entity_id.into(),
            category: category.into(),
            kind: kind.into(),
            language: language.into(),
        }
    }

    /// Validate the descriptor, failing on the first empty field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("entity", &self.entity),
            ("entityId", &self.entity_id),
            ("category", &self.category),
            ("type", &self.kind),
            ("language", &self.language),
        ];

        match fields.iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(AppError::MissingParam(*name)),
            None => Ok(()),
        }
    }
}

/// Fetched template content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TemplateContent {
    /// The payload as plain text
    Raw(String),

    /// A payload carrying a subject and body separately
    Structured { subject: String, body: String },
}

/// Template content after variable substitution. Same shape as the input.
pub type RenderedTemplate = TemplateContent;

#[derive(Deserialize)]
struct StructuredPayload {
    #[serde(default)]
    subject: String,
    body: String,
}

impl TemplateContent {
    /// Interpret fetched text.
    ///
    /// Without `structured`, the text is returned as-is. With it, a JSON
    /// object carrying a string `body` (and optionally `subject`) becomes
    /// [`TemplateContent::Structured`]; anything else becomes a body with an
    /// empty subject.
    pub fn parse(text: String, structured: bool) -> Self {
        if !structured {
            return TemplateContent::Raw(text);
        }

        match serde_json::from_str::<StructuredPayload>(&text) {
            Ok(payload) => TemplateContent::Structured {
                subject: payload.subject,
                body: payload.body,
            },
            Err(_) => TemplateContent::Structured {
                subject: String::new(),
                body: text,
            },
        }
    }

    pub fn body(&self) -> &str {
        match self {
            TemplateContent::Raw(text) => text,
            TemplateContent::Structured { body, .. } => body,
        }
    }

    pub fn subject(&self) -> Option<&str> {
        match self {
            TemplateContent::Raw(_) => None,
            TemplateContent::Structured { subject, .. } => Some(subject),
        }
    }

    /// Apply `f` to every text part, keeping the shape.
    pub fn map_text(self, mut f: impl FnMut(&str) -> String) -> Self {
        match self {
            TemplateContent::Raw(text) => TemplateContent::Raw(f(&text)),
            TemplateContent::Structured { subject, body } => TemplateContent::Structured {
                subject: f(&subject),
                body: f(&body),
            },
        }
    }
}
