//! Escaping for Pango markup.

/// Escapes the characters Pango treats as markup.
pub(crate) fn escape_pango(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::plain("12:00", "12:00")]
    #[case::ampersand("R&B", "R&amp;B")]
    #[case::tags("<b>up</b>", "&lt;b&gt;up&lt;/b&gt;")]
    #[case::quotes(r#"it's "on""#, "it&apos;s &quot;on&quot;")]
    #[case::already_escaped("&amp;", "&amp;amp;")]
    fn escapes_markup_characters(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_pango(input), expected);
    }
}
