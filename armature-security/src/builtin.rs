// Filters available by name in `FilterRegistry::with_builtins`

use crate::error::{Result, SecurityError};
use crate::filter::{Cleanable, FilterHandle, FilterRegistry};
use crate::html::{HtmlSanitizer, strip_tags, xss_clean_with};
use crate::manager::SecurityManager;
use crate::value::map_strings;
use armature_xss::XssEncoder;
use serde_json::Value;
use std::sync::Arc;

pub const HTMLENTITIES: &str = "htmlentities";
pub const STRIP_TAGS: &str = "strip_tags";
pub const XSS_CLEAN: &str = "xss_clean";
pub const XSS: &str = "xss";

/// Entity-encodes every string leaf
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEntities;

impl Cleanable for HtmlEntities {
    fn clean(&self, value: Value) -> Result<Value> {
        map_strings(value, |s| Ok(XssEncoder::encode_html(s).into_owned()))
    }
}

/// Sanitizes every string leaf with the manager's HTML sanitizer
pub struct XssClean {
    sanitizer: Arc<dyn HtmlSanitizer>,
}

impl XssClean {
    pub fn new(sanitizer: Arc<dyn HtmlSanitizer>) -> Self {
        Self { sanitizer }
    }
}

impl Cleanable for XssClean {
    fn clean(&self, value: Value) -> Result<Value> {
        xss_clean_with(self.sanitizer.as_ref(), value)
    }
}

fn xss_factory(manager: &SecurityManager) -> Result<FilterHandle> {
    let sanitizer = manager
        .html_sanitizer()
        .ok_or(SecurityError::SanitizerUnavailable)?;
    Ok(FilterHandle::method(XssClean::new(sanitizer)))
}

pub(crate) fn register(registry: &FilterRegistry) {
    registry.register_cleanable(HTMLENTITIES, HtmlEntities);
    registry.register_fn(STRIP_TAGS, |value| Ok(strip_tags(value)));
    registry.register(XSS_CLEAN, xss_factory);
    registry.register(XSS, xss_factory);
}
