use crate::error::{Result, XssError};
use ammonia::Builder;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Elements removed in safe mode regardless of the allowlist.
const SAFE_MODE_DENIED_TAGS: &[&str] = &[
    "applet", "audio", "canvas", "embed", "iframe", "object", "script", "video",
];

/// URL schemes accepted in `href`/`src` in safe mode.
const SAFE_MODE_URL_SCHEMES: &[&str] = &["ftp", "http", "https", "mailto"];

/// Elements whose content ammonia always drops; they can never be allowlisted.
const CONTENT_STRIPPED_TAGS: &[&str] = &["script", "style"];

/// Options applied on top of an [`XssSanitizer`]'s allowlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeOptions {
    /// Remove active content (scripts, embeds, event handlers, inline styles,
    /// non-web URL schemes) even when the allowlist would admit it.
    pub safe: bool,

    /// Whether the caller requires balanced markup. Output is always
    /// re-serialized from a parsed tree, so it is balanced either way;
    /// `false` only means the caller does not depend on it.
    pub balanced: bool,
}

impl SanitizeOptions {
    pub fn new() -> Self {
        Self {
            safe: false,
            balanced: true,
        }
    }

    pub fn with_safe(mut self, safe: bool) -> Self {
        self.safe = safe;
        self
    }

    pub fn with_balanced(mut self, balanced: bool) -> Self {
        self.balanced = balanced;
        self
    }
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Allowlist-based HTML sanitizer backed by ammonia
#[derive(Debug, Clone)]
pub struct XssSanitizer {
    allowed_tags: Vec<String>,
    allowed_attributes: Vec<String>,
    strip_comments: bool,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl XssSanitizer {
    /// Common formatting markup, links and headings
    pub fn new() -> Self {
        Self {
            allowed_tags: owned(&[
                "a", "b", "br", "code", "div", "em", "h1", "h2", "h3", "h4", "h5", "h6", "i",
                "li", "ol", "p", "pre", "span", "strong", "ul",
            ]),
            allowed_attributes: owned(&["class", "href", "id", "title"]),
            strip_comments: true,
        }
    }

    /// Inline emphasis and paragraphs only, no attributes
    pub fn strict() -> Self {
        Self {
            allowed_tags: owned(&["b", "br", "em", "i", "p", "strong"]),
            allowed_attributes: Vec::new(),
            strip_comments: true,
        }
    }

    /// Tables, images, quotes and definition lists on top of the default set
    pub fn permissive() -> Self {
        Self {
            allowed_tags: owned(&[
                "a", "abbr", "b", "blockquote", "br", "cite", "code", "dd", "del", "div", "dl",
                "dt", "em", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "i", "img", "ins", "li",
                "ol", "p", "pre", "q", "small", "span", "strong", "sub", "sup", "table", "tbody",
                "td", "th", "thead", "tr", "ul",
            ]),
            allowed_attributes: owned(&["alt", "class", "href", "id", "src", "title"]),
            strip_comments: true,
        }
    }

    pub fn with_allowed_tags(mut self, tags: Vec<String>) -> Self {
        self.allowed_tags = tags;
        self
    }

    pub fn with_allowed_attributes(mut self, attributes: Vec<String>) -> Self {
        self.allowed_attributes = attributes;
        self
    }

    pub fn with_strip_comments(mut self, strip: bool) -> Self {
        self.strip_comments = strip;
        self
    }

    pub fn allowed_tags(&self) -> &[String] {
        &self.allowed_tags
    }

    /// Sanitize with default options
    pub fn sanitize(&self, html: &str) -> Result<String> {
        self.sanitize_with(html, &SanitizeOptions::default())
    }

    /// Sanitize HTML, applying `options` on top of the allowlist.
    ///
    /// Fails when the allowlist names an element whose content is always
    /// dropped (`script`, `style`) or the `rel` attribute, which ammonia
    /// manages itself on links.
    pub fn sanitize_with(&self, html: &str, options: &SanitizeOptions) -> Result<String> {
        if let Some(tag) = self
            .allowed_tags
            .iter()
            .find(|t| CONTENT_STRIPPED_TAGS.contains(&t.to_ascii_lowercase().as_str()))
        {
            return Err(XssError::InvalidConfiguration(format!(
                "tag '{}' cannot be allowed",
                tag
            )));
        }
        if self.allowed_attributes.iter().any(|a| a.eq_ignore_ascii_case("rel")) {
            return Err(XssError::InvalidConfiguration(
                "attribute 'rel' is managed by the sanitizer".to_string(),
            ));
        }

        let tags: HashSet<&str> = self
            .allowed_tags
            .iter()
            .map(String::as_str)
            .filter(|tag| !options.safe || !SAFE_MODE_DENIED_TAGS.contains(tag))
            .collect();

        let attributes: HashSet<&str> = self
            .allowed_attributes
            .iter()
            .map(String::as_str)
            .filter(|attr| !options.safe || !is_active_attribute(attr))
            .collect();

        let mut builder = Builder::default();
        builder
            .tags(tags)
            .generic_attributes(attributes)
            .strip_comments(self.strip_comments || options.safe);

        if options.safe {
            builder.url_schemes(SAFE_MODE_URL_SCHEMES.iter().copied().collect());
        }

        Ok(builder.clean(html).to_string())
    }
}

fn is_active_attribute(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.starts_with("on") || name == "style"
}

impl Default for XssSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn safe() -> SanitizeOptions {
        SanitizeOptions::new().with_safe(true).with_balanced(false)
    }

    #[test]
    fn test_sanitize_script_tag() {
        let sanitizer = XssSanitizer::new();
        let clean = sanitizer
            .sanitize(r#"<p>Hello</p><script>alert('XSS')</script>"#)
            .unwrap();

        assert!(!clean.contains("script"));
        assert!(!clean.contains("alert"));
        assert!(clean.contains("<p>Hello</p>"));
    }

    #[test]
    fn test_sanitize_onclick_attribute() {
        let sanitizer = XssSanitizer::new();
        let clean = sanitizer
            .sanitize("<a href=\"#\" onclick=\"alert('XSS')\">Click</a>")
            .unwrap();

        assert!(!clean.contains("onclick"));
        assert!(clean.contains("Click"));
    }

    #[test]
    fn test_strict_profile_drops_div() {
        let clean = XssSanitizer::strict()
            .sanitize("<div><p><strong>Bold</strong></p></div>")
            .unwrap();

        assert!(!clean.contains("<div>"));
        assert!(clean.contains("<strong>"));
    }

    #[test]
    fn test_profile_allowlists() {
        let strict = XssSanitizer::strict();
        assert!(strict.allowed_tags().iter().any(|t| t == "p"));
        assert!(!strict.allowed_tags().iter().any(|t| t == "div"));

        let permissive = XssSanitizer::permissive();
        assert!(permissive.allowed_tags().len() > XssSanitizer::new().allowed_tags().len());
    }

    #[test]
    fn test_comments_kept_only_outside_safe_mode() {
        let sanitizer = XssSanitizer::new().with_strip_comments(false);
        let html = "<p>a</p><!-- note -->";

        assert!(sanitizer.sanitize(html).unwrap().contains("<!-- note -->"));
        assert!(!sanitizer.sanitize_with(html, &safe()).unwrap().contains("note"));
        assert!(!XssSanitizer::new().sanitize(html).unwrap().contains("note"));
    }

    #[test]
    fn test_safe_mode_drops_iframe_even_when_allowed() {
        let sanitizer = XssSanitizer::new().with_allowed_tags(owned(&["p", "iframe"]));
        let html = r#"<p>ok</p><iframe src="https://evil.test"></iframe>"#;

        assert!(sanitizer.sanitize(html).unwrap().contains("<iframe"));
        assert!(!sanitizer.sanitize_with(html, &safe()).unwrap().contains("iframe"));
    }

    #[test]
    fn test_safe_mode_drops_style_attribute() {
        let sanitizer = XssSanitizer::new().with_allowed_attributes(owned(&["style"]));
        let html = r#"<p style="background:url(javascript:alert(1))">x</p>"#;

        let clean = sanitizer.sanitize_with(html, &safe()).unwrap();
        assert!(!clean.contains("style"));
        assert!(clean.contains(">x</p>"));
    }

    #[test]
    fn test_safe_mode_rejects_unusual_schemes() {
        let clean = XssSanitizer::new()
            .sanitize_with(r#"<a href="data:text/html,hi">x</a>"#, &safe())
            .unwrap();

        assert!(!clean.contains("data:"));
    }

    #[test]
    fn test_unbalanced_markup_is_closed() {
        let clean = XssSanitizer::new()
            .sanitize_with("<p><b>open", &safe())
            .unwrap();

        assert_eq!(clean, "<p><b>open</b></p>");
    }

    #[test]
    fn test_script_cannot_be_allowlisted() {
        let sanitizer = XssSanitizer::new().with_allowed_tags(owned(&["script"]));
        assert!(matches!(
            sanitizer.sanitize("<script></script>"),
            Err(XssError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rel_cannot_be_allowlisted() {
        let sanitizer = XssSanitizer::new().with_allowed_attributes(owned(&["rel"]));
        assert!(sanitizer.sanitize("<a>x</a>").is_err());
    }
}
