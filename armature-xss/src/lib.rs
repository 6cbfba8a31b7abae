//! # Armature XSS
//!
//! HTML-level primitives used by Armature's input/output sanitization.
//!
//! - **Sanitization** - allowlist-based HTML cleaning (ammonia), with a
//!   `safe` mode that removes active content regardless of the allowlist
//! - **Encoding** - HTML entity encoding
//! - **Tag stripping** - reduce markup to plain, quote-safe text
//!
//! ## Sanitization
//!
//! ```rust
//! use armature_xss::{SanitizeOptions, XssSanitizer};
//!
//! let sanitizer = XssSanitizer::new();
//! let clean = sanitizer.sanitize(r#"<p>Hello</p><script>alert('XSS')</script>"#).unwrap();
//! assert!(clean.contains("<p>"));
//! assert!(!clean.contains("<script>"));
//!
//! let safe = SanitizeOptions::new().with_safe(true).with_balanced(false);
//! let clean = sanitizer.sanitize_with("<p><b>unclosed", &safe).unwrap();
//! assert_eq!(clean, "<p><b>unclosed</b></p>");
//! ```
//!
//! ## Encoding
//!
//! ```rust
//! use armature_xss::XssEncoder;
//!
//! let encoded = XssEncoder::encode_html("<script>alert('XSS')</script>");
//! assert!(encoded.contains("&lt;"));
//! assert!(!encoded.contains("<script>"));
//! ```
//!
//! ## Tag stripping
//!
//! ```rust
//! use armature_xss::TagStripper;
//!
//! assert_eq!(TagStripper::strip("<b>Hi</b> \"you\""), "Hi &#34;you&#34;");
//! ```

pub mod encoder;
pub mod error;
pub mod sanitizer;
pub mod strip;

pub use encoder::XssEncoder;
pub use error::{Result, XssError};
pub use sanitizer::{SanitizeOptions, XssSanitizer};
pub use strip::TagStripper;
