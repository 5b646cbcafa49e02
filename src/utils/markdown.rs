//! Markdown escaping for WhatsApp message bodies.

/// Characters the backend's markdown parser treats as markup.
pub const MARKDOWN_SPECIAL_CHARS: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escape `text` so it renders literally.
///
/// Backslashes are doubled first, then every markup character is prefixed
/// with a backslash. The resulting wire format must stay byte-for-byte stable.
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if ch == '\\' {
            escaped.push_str("\\\\");
        } else if MARKDOWN_SPECIAL_CHARS.contains(&ch) {
            escaped.push('\\');
            escaped.push(ch);
        } else {
            escaped.push(ch);
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unescape(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            if ch == '\\'
                && let Some(next) = chars.next()
            {
                out.push(next);
                continue;
            }
            out.push(ch);
        }
        out
    }

    #[test]
    fn escapes_every_markup_character() {
        assert_eq!(
            escape_markdown("_*[]()~`>#+-=|{}.!"),
            "\\_\\*\\[\\]\\(\\)\\~\\`\\>\\#\\+\\-\\=\\|\\{\\}\\.\\!"
        );
    }

    #[test]
    fn backslashes_are_escaped_before_markup() {
        assert_eq!(escape_markdown("a\\b"), "a\\\\b");
        assert_eq!(escape_markdown("\\*"), "\\\\\\*");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(escape_markdown("Hello World 123 ñ 日本"), "Hello World 123 ñ 日本");
    }

    #[test]
    fn unescaping_recovers_the_original() {
        for original in [
            "Price: $4.99 (50% off!)",
            "path\\to\\file_name.txt",
            "**bold** and __under__ \\* literal",
            "a\\",
        ] {
            assert_eq!(unescape(&escape_markdown(original)), original);
        }
    }
}
