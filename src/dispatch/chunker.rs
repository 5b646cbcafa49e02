//! Splitting of oversized message bodies into backend-sized segments.
//!
//! All measurements use display width: East Asian wide characters count as
//! two columns, combining marks as zero, anything without a defined width
//! (control characters) as one.

use unicode_width::UnicodeWidthChar;

/// Segment limit used when no positive size is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Reserved marker inserted at word-wrap points. Text containing it verbatim
/// is split there as well.
pub const CHUNK_SEPARATOR: &str = "%#TGMSG#%";

/// Resolve the segment limit: a positive configured size wins over the default.
#[must_use]
pub fn effective_chunk_size(configured: usize) -> usize {
    if configured > 0 {
        configured
    } else {
        DEFAULT_CHUNK_SIZE
    }
}

#[must_use]
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(1)
}

#[must_use]
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Split `text` into segments no wider than `limit`.
///
/// Text that already fits is returned as a single untouched segment. Longer
/// text is wrapped at spaces; if that produces a single segment (one
/// unbroken token) the raw text is sliced at fixed widths instead. Wrapped
/// segments that are still too wide are sliced the same way.
///
/// Every segment is at most `limit` columns wide, with one exception: a
/// limit of 1 cannot hold a double-width character, which then gets a
/// two-column segment of its own.
///
/// Empty segments are kept; callers decide whether to drop them.
#[must_use]
pub fn chunk_text(text: &str, limit: usize) -> Vec<String> {
    let limit = effective_chunk_size(limit);

    if display_width(text) <= limit {
        return vec![text.to_string()];
    }

    let wrapped = wrap_words(text, limit);
    let segments: Vec<&str> = wrapped.split(CHUNK_SEPARATOR).collect();

    if segments.len() <= 1 {
        return slice_by_width(text, limit);
    }

    segments
        .into_iter()
        .flat_map(|segment| {
            if display_width(segment) > limit {
                slice_by_width(segment, limit)
            } else {
                vec![segment.to_string()]
            }
        })
        .collect()
}

/// Greedy word wrap: each space that would push the current line past
/// `limit` is replaced by [`CHUNK_SEPARATOR`]. Words are never cut, so a
/// single word wider than `limit` stays on its own line.
#[must_use]
pub fn wrap_words(text: &str, limit: usize) -> String {
    let mut wrapped = String::with_capacity(text.len());
    let mut line_width = 0usize;

    for (index, word) in text.split(' ').enumerate() {
        let word_width = display_width(word);

        if index == 0 {
            line_width = word_width;
        } else if line_width + 1 + word_width <= limit {
            wrapped.push(' ');
            line_width += 1 + word_width;
        } else {
            wrapped.push_str(CHUNK_SEPARATOR);
            line_width = word_width;
        }

        wrapped.push_str(word);
    }

    wrapped
}

/// Cut `text` into consecutive pieces of at most `limit` columns, ignoring
/// word boundaries. A single character wider than `limit` gets a piece of
/// its own.
#[must_use]
pub fn slice_by_width(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for ch in text.chars() {
        let width = char_width(ch);
        if !current.is_empty() && current_width + width > limit {
            segments.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(ch);
        current_width += width;
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_size_overrides_default_only_when_positive() {
        assert_eq!(effective_chunk_size(0), DEFAULT_CHUNK_SIZE);
        assert_eq!(effective_chunk_size(160), 160);
    }

    #[test]
    fn text_within_limit_is_returned_unchanged() {
        let text = "hello world, this fits";
        assert_eq!(chunk_text(text, 100), vec![text.to_string()]);
    }

    #[test]
    fn empty_text_is_a_single_empty_segment() {
        assert_eq!(chunk_text("", 10), vec![String::new()]);
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本語"), 6);
        assert_eq!(chunk_text("日本語", 6).len(), 1);
        assert_eq!(chunk_text("日本語", 5), vec!["日本", "語"]);
    }

    #[test]
    fn words_are_wrapped_at_spaces() {
        let segments = chunk_text("the quick brown fox jumps", 10);
        assert_eq!(segments, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn rejoining_wrapped_segments_restores_text() {
        let text = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod";
        let wrapped = wrap_words(text, 12);
        assert_eq!(wrapped.replace(CHUNK_SEPARATOR, " "), text);

        let segments = chunk_text(text, 12);
        assert!(segments.len() > 1);
        assert_eq!(segments.join(" "), text);
    }

    #[test]
    fn every_segment_respects_the_width_bound() {
        let text = "Grüße aus Köln! 日本語のテキスト mixed with ascii words and ünïcödé ".repeat(20);
        for limit in [7, 13, 40, 101] {
            for segment in chunk_text(&text, limit) {
                assert!(
                    display_width(&segment) <= limit,
                    "segment {segment:?} exceeds {limit}"
                );
            }
        }
    }

    #[test]
    fn unbroken_token_falls_back_to_fixed_width_slices() {
        let text = "A".repeat(5000);
        let segments = chunk_text(&text, 4096);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 4096);
        assert_eq!(segments[1].len(), 904);
        assert_eq!(segments.concat(), text);
    }

    #[test]
    fn long_word_inside_wrapped_text_is_sliced() {
        let text = format!("short {} tail", "x".repeat(25));
        let segments = chunk_text(&text, 10);
        assert_eq!(
            segments,
            vec!["short", "xxxxxxxxxx", "xxxxxxxxxx", "xxxxx", "tail"]
        );
    }

    #[test]
    fn fixed_width_slicing_reconstructs_multibyte_text() {
        let text = "ああいいううええおお";
        let slices = slice_by_width(text, 3);
        assert!(slices.iter().all(|s| display_width(s) <= 3));
        assert_eq!(slices.concat(), text);
    }

    #[test]
    fn character_wider_than_limit_gets_its_own_slice() {
        assert_eq!(slice_by_width("日本", 1), vec!["日", "本"]);
    }

    #[test]
    fn single_column_limit_only_overflows_on_wide_characters() {
        let segments = chunk_text("ab日c", 1);
        assert_eq!(segments, vec!["a", "b", "日", "c"]);
        for segment in &segments {
            let width = display_width(segment);
            assert!(width <= 1 || (width == 2 && segment.chars().count() == 1));
        }
    }
}
