// Request URI normalization

use once_cell::sync::Lazy;
use regex::Regex;

static DOT_SEGMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.+/").unwrap());

static REPEATED_SLASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"/+").unwrap());

/// Collapse traversal markers and repeated separators.
///
/// Every run of dots followed by `/` becomes `/`, then every run of `/`
/// becomes a single `/`.
pub fn normalize_path(uri: &str) -> String {
    let collapsed = DOT_SEGMENTS.replace_all(uri, "/");
    REPEATED_SLASHES.replace_all(&collapsed, "/").into_owned()
}
