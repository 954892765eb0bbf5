//! Variable substitution engine for templates
//!
//! Supports the logic-less subset of mustache used by notification templates:
//!
//! - `{{name}}` substitutes a value (HTML-escaped when escaping is on)
//! - `{{{name}}}` and `{{& name}}` substitute the raw value
//! - `{{! comment}}` renders nothing
//! - `{{a.b}}` walks nested objects
//!
//! Missing names render as an empty string. Sections and partials are not
//! interpreted.

use serde_json::Value;

/// Render `template` with `data`, without HTML escaping.
pub fn render(template: &str, data: &Value) -> String {
    render_with(template, data, false)
}

/// Render `template` with `data`.
///
/// When `escape_html` is set, values substituted through `{{name}}` are
/// HTML-escaped. Triple-brace and `&` tags are never escaped.
pub fn render_with(template: &str, data: &Value, escape_html: bool) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        if let Some(inner) = after.strip_prefix('{') {
            if let Some(end) = inner.find("}}}") {
                result.push_str(&lookup_string(data, inner[..end].trim()));
                rest = &inner[end + 3..];
                continue;
            }
        }

        let Some(end) = after.find("}}") else {
            // Unterminated tag, keep the remainder verbatim
            result.push_str(&rest[start..]);
            rest = "";
            break;
        };

        let tag = after[..end].trim();
        rest = &after[end + 2..];

        if tag.starts_with('!') {
            continue;
        }

        if let Some(name) = tag.strip_prefix('&') {
            result.push_str(&lookup_string(data, name.trim()));
        } else if escape_html {
            result.push_str(&escape(&lookup_string(data, tag)));
        } else {
            result.push_str(&lookup_string(data, tag));
        }
    }

    result.push_str(rest);
    result
}

fn lookup<'a>(data: &'a Value, name: &str) -> Option<&'a Value> {
    if name.is_empty() {
        return None;
    }

    // An exact key wins over a dotted path
    if let Some(value) = data.as_object().and_then(|map| map.get(name)) {
        return Some(value);
    }

    name.split('.')
        .try_fold(data, |current, part| current.as_object()?.get(part))
}

fn lookup_string(data: &Value, name: &str) -> String {
    match lookup(data, name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null) | None => String::new(),
        // For arrays and objects, use JSON representation
        Some(value) => value.to_string(),
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '/' => escaped.push_str("&#x2F;"),
            '`' => escaped.push_str("&#x60;"),
            '=' => escaped.push_str("&#x3D;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
