use std::borrow::Cow;

/// HTML entity encoding
pub struct XssEncoder;

impl XssEncoder {
    /// Encode the characters that are significant in HTML text and quoted
    /// attribute values.
    pub fn encode_html(text: &str) -> Cow<'_, str> {
        if !text.contains(['<', '>', '"', '\'', '&', '/']) {
            return Cow::Borrowed(text);
        }

        let mut out = String::with_capacity(text.len() + 16);
        for c in text.chars() {
            match c {
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#x27;"),
                '&' => out.push_str("&amp;"),
                '/' => out.push_str("&#x2F;"),
                _ => out.push(c),
            }
        }
        Cow::Owned(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_html() {
        let output = XssEncoder::encode_html(r#"<script>alert("XSS")</script>"#);

        assert_eq!(
            output,
            "&lt;script&gt;alert(&quot;XSS&quot;)&lt;&#x2F;script&gt;"
        );
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(
            XssEncoder::encode_html("plain text"),
            Cow::Borrowed("plain text")
        ));
    }

    #[test]
    fn test_ampersand_is_encoded_once() {
        assert_eq!(XssEncoder::encode_html("a & b"), "a &amp; b");
        assert_eq!(XssEncoder::encode_html("&amp;"), "&amp;amp;");
    }
}
