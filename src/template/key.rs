//! Storage key layout

use super::types::TemplateDescriptor;

/// Storage key for a template:
/// `<prefix>/<entity>/<entityId>/<category>/<type>/<language>.txt`.
///
/// The descriptor must already be validated; empty fields produce an
/// ill-formed key.
pub fn curate_file_location(prefix: &str, descriptor: &TemplateDescriptor) -> String {
    format!(
        "{}/{}/{}/{}/{}/{}.txt",
        prefix,
        descriptor.entity,
        descriptor.entity_id,
        descriptor.category,
        descriptor.kind,
        descriptor.language
    )
}
