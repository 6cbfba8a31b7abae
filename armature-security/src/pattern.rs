// Character-class filters: every character of the class is removed

use crate::error::{Result, SecurityError};
use crate::value::map_strings;
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::borrow::Cow;

/// Strips every character matching a regex character class.
///
/// The specifier is the body of the class, e.g. `<>` or `\p{Cc}`; matching
/// is Unicode-aware and case-insensitive.
#[derive(Debug, Clone)]
pub struct CharClassFilter {
    class: String,
    regex: Regex,
}

impl CharClassFilter {
    pub fn new(class: &str) -> Result<Self> {
        let regex = RegexBuilder::new(&format!("[{}]", class))
            .case_insensitive(true)
            .unicode(true)
            .build()
            .map_err(|source| SecurityError::InvalidPattern {
                pattern: class.to_string(),
                source,
            })?;

        Ok(Self {
            class: class.to_string(),
            regex,
        })
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn strip<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.regex.replace_all(text, "")
    }

    /// Strip every string leaf of `value`
    pub fn apply(&self, value: Value) -> Result<Value> {
        map_strings(value, |s| Ok(self.strip(s).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_class_characters() {
        let filter = CharClassFilter::new("<>").unwrap();
        assert_eq!(filter.strip("<b>bold</b>"), "bbold/b");
    }

    #[test]
    fn test_case_insensitive() {
        let filter = CharClassFilter::new("a-c").unwrap();
        assert_eq!(filter.strip("AbCdef"), "def");
    }

    #[test]
    fn test_unicode_aware() {
        let filter = CharClassFilter::new("é").unwrap();
        assert_eq!(filter.strip("ÉcoLE é"), "coLE ");
    }

    #[test]
    fn test_nested_values_keep_keys() {
        let filter = CharClassFilter::new("'\"").unwrap();
        let output = filter
            .apply(json!({ "q": "it's", "tags": ["\"a\"", 7] }))
            .unwrap();

        assert_eq!(output, json!({ "q": "its", "tags": ["a", 7] }));
    }

    #[test]
    fn test_invalid_class() {
        let err = CharClassFilter::new("z-a").unwrap_err();
        assert!(matches!(err, SecurityError::InvalidPattern { ref pattern, .. } if pattern == "z-a"));
    }
}
