/// Removes markup from text so it can be embedded anywhere as plain data.
///
/// Tags and comments are dropped (an unterminated tag swallows the rest of
/// the input; a comment ends at the first `>` preceded by two dashes), NUL
/// bytes are removed and both quote characters are encoded as numeric
/// entities. A `<` followed by whitespace or the end of input is
/// not a tag and is kept.
pub struct TagStripper;

#[derive(Clone, Copy)]
enum State {
    Text,
    Tag { quote: Option<char> },
    Comment,
}

impl TagStripper {
    pub fn strip(text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        let mut state = State::Text;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            match state {
                State::Text => match c {
                    '\0' => {}
                    '<' => match chars.get(i + 1) {
                        None => out.push('<'),
                        Some(next) if next.is_whitespace() => out.push('<'),
                        Some('!') if chars[i + 1..].starts_with(&['!', '-', '-']) => {
                            state = State::Comment;
                            i += 3;
                        }
                        Some(_) => state = State::Tag { quote: None },
                    },
                    '"' => out.push_str("&#34;"),
                    '\'' => out.push_str("&#39;"),
                    _ => out.push(c),
                },
                State::Tag { quote: Some(q) } => {
                    if c == q {
                        state = State::Tag { quote: None };
                    }
                }
                State::Tag { quote: None } => match c {
                    '"' | '\'' => state = State::Tag { quote: Some(c) },
                    '>' => state = State::Text,
                    _ => {}
                },
                State::Comment => {
                    // The dashes of the opening `<!--` count, so `<!-->` is a whole comment.
                    if c == '>' && chars[..i].ends_with(&['-', '-']) {
                        state = State::Text;
                    }
                }
            }
            i += 1;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags() {
        assert_eq!(TagStripper::strip("<b>bold</b> text"), "bold text");
        assert_eq!(
            TagStripper::strip("<script>alert(1)</script>"),
            "alert(1)"
        );
    }

    #[test]
    fn test_quoted_gt_inside_tag() {
        assert_eq!(TagStripper::strip(r#"<a title="a > b">link</a>"#), "link");
    }

    #[test]
    fn test_unterminated_tag_swallows_rest() {
        assert_eq!(TagStripper::strip("safe<img src=x onerror=alert(1)"), "safe");
    }

    #[test]
    fn test_comments_removed() {
        assert_eq!(TagStripper::strip("a<!-- <b>hidden</b> -->b"), "ab");
    }

    #[test]
    fn test_empty_comments_end_at_first_gt() {
        assert_eq!(TagStripper::strip("a<!-->visible text"), "avisible text");
        assert_eq!(TagStripper::strip("a<!--->b"), "ab");
        assert_eq!(TagStripper::strip("a<!-- -- > still -->b"), "ab");
    }

    #[test]
    fn test_quotes_encoded() {
        assert_eq!(TagStripper::strip(r#"say "hi" it's"#), "say &#34;hi&#34; it&#39;s");
    }

    #[test]
    fn test_lone_lt_kept_and_nul_dropped() {
        assert_eq!(TagStripper::strip("1 < 2\0"), "1 < 2");
        assert_eq!(TagStripper::strip("a<"), "a<");
    }
}
