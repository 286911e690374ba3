use std::borrow::Cow;

/// HTML-escape the given text for embedding in rendered output.
///
/// `<` and `>` become entities, `\` is doubled, and `&` becomes `&amp;`
/// unless it already begins an entity such as `&quot;`. Double quotes
/// pass through untouched.
///
/// Returns the input unchanged when nothing needs escaping.
pub fn escape(text: &str) -> Cow<'_, str> {
    let mut output: Option<String> = None;

    for (at, c) in text.char_indices() {
        let replacement = match c {
            '<' => Some("&lt;"),
            '>' => Some("&gt;"),
            '\\' => Some("\\\\"),
            '&' if !begins_entity(&text[at + 1..]) => Some("&amp;"),
            _ => None,
        };

        match replacement {
            Some(replacement) => {
                output
                    .get_or_insert_with(|| String::from(&text[..at]))
                    .push_str(replacement);
            }
            None => {
                if let Some(output) = output.as_mut() {
                    output.push(c);
                }
            }
        }
    }

    match output {
        Some(output) => Cow::Owned(output),
        None => Cow::Borrowed(text),
    }
}

/// Return true if the text begins with the remainder of an entity,
/// meaning one or more word characters followed by `;`.
fn begins_entity(text: &str) -> bool {
    let mut seen = 0;
    for c in text.chars() {
        match c {
            ';' => return seen > 0,
            c if is_word(c) => seen += 1,
            _ => return false,
        }
    }

    false
}

/// Return true if the given character is a word character, meaning an
/// ascii letter, digit, or underscore.
fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::escape;

    #[test]
    fn test_untouched() {
        assert_eq!(escape("hello, taylor"), "hello, taylor");
    }

    #[test]
    fn test_angle_brackets() {
        assert_eq!(escape("<b>x</b>"), "&lt;b&gt;x&lt;/b&gt;");
    }

    #[test]
    fn test_ampersand() {
        assert_eq!(escape("fish & chips"), "fish &amp; chips");
    }

    #[test]
    fn test_ampersand_entity() {
        // An ampersand that already begins an entity is left alone.
        assert_eq!(escape("&quot;&amp;"), "&quot;&amp;");
        assert_eq!(escape("&;"), "&amp;;");
    }

    #[test]
    fn test_backslash_doubled() {
        assert_eq!(escape(r"a\b"), r"a\\b");
    }

    #[test]
    fn test_quotes_untouched() {
        assert_eq!(escape(r#"say "hi""#), r#"say "hi""#);
    }
}
