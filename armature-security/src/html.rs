// HTML sanitizer seam, tag stripping and XSS cleaning of values

use crate::error::Result;
use crate::value::{into_text, map_strings};
use armature_xss::{SanitizeOptions, TagStripper, XssSanitizer};
use serde_json::Value;

/// Options used by `xss_clean`: remove active content, tolerate unbalanced input
pub const XSS_CLEAN_OPTIONS: SanitizeOptions = SanitizeOptions {
    safe: true,
    balanced: false,
};

/// HTML sanitization backend used by `xss_clean`
pub trait HtmlSanitizer: Send + Sync {
    fn sanitize_html(&self, html: &str, options: &SanitizeOptions) -> Result<String>;
}

impl HtmlSanitizer for XssSanitizer {
    fn sanitize_html(&self, html: &str, options: &SanitizeOptions) -> Result<String> {
        Ok(self.sanitize_with(html, options)?)
    }
}

/// Sanitize every string leaf of `value`
pub fn xss_clean_with(sanitizer: &dyn HtmlSanitizer, value: Value) -> Result<Value> {
    map_strings(value, |html| sanitizer.sanitize_html(html, &XSS_CLEAN_OPTIONS))
}

/// Strip markup from every scalar leaf; non-string scalars become strings
pub fn strip_tags(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(strip_tags).collect()),
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, item)| (key, strip_tags(item)))
                .collect(),
        ),
        scalar => Value::String(TagStripper::strip(&into_text(scalar))),
    }
}
