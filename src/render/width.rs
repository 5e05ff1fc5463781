//! Monospace width measurement
//!
//! Measures how many terminal columns a string occupies. Color-control
//! sequences (`ESC [ ... m`) are invisible and count as zero columns.
//! ASCII and Latin-1 code points are one column; everything else, CJK
//! ideographs included, is two.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use unicode_width::UnicodeWidthChar;

static ANSI_SGR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid regex"));

/// Remove every color-control sequence from `s`
pub fn strip_ansi(s: &str) -> String {
    ANSI_SGR.replace_all(s, "").into_owned()
}

/// Highest code point that is a single column wide
const LATIN1_MAX: u32 = 0xFF;

/// Width used when the precise classifier has no answer for a code point:
/// anything beyond ASCII is treated as a wide glyph.
pub fn fallback_width(c: char) -> usize {
    if c.is_ascii() {
        1
    } else {
        2
    }
}

/// Latin-1 code points are narrow and East Asian wide glyphs are double.
/// Anything else is left to `fallback_width`.
fn classify(c: char) -> Option<usize> {
    if u32::from(c) <= LATIN1_MAX {
        return Some(1);
    }
    match UnicodeWidthChar::width(c) {
        Some(2) => Some(2),
        _ => None,
    }
}

/// Column width of a single character
pub fn char_width(c: char) -> usize {
    match c {
        '\n' | '\r' => 0,
        _ => classify(c).unwrap_or_else(|| fallback_width(c)),
    }
}

fn line_width(line: &str) -> usize {
    if line.is_empty() {
        return 0;
    }
    strip_ansi(line).chars().map(char_width).sum()
}

/// Widest line of `s`, in terminal columns
pub fn string_width(s: &str) -> usize {
    s.split('\n').map(line_width).max().unwrap_or(0)
}

/// Append spaces until `s` is `width` columns wide. Never truncates.
pub fn pad_right(s: &str, width: usize) -> String {
    let current = string_width(s);
    if current >= width {
        return s.to_string();
    }
    let mut padded = String::with_capacity(s.len() + width - current);
    padded.push_str(s);
    padded.extend(std::iter::repeat(' ').take(width - current));
    padded
}

/// Byte offset in `line` where display column `column` begins.
///
/// Existing control sequences are stepped over, so an offset always lands
/// after any markers that precede the visible character. Returns `None` when
/// the column is past the end of the line or falls inside a wide glyph.
pub fn byte_offset_at_column(line: &str, column: usize) -> Option<usize> {
    let mut col = 0;
    let mut idx = 0;
    while idx <= line.len() {
        if let Some(m) = ANSI_SGR.find_at(line, idx).filter(|m| m.start() == idx) {
            idx = m.end();
            continue;
        }
        if col == column {
            return Some(idx);
        }
        if col > column || idx == line.len() {
            return None;
        }
        let c = line[idx..].chars().next()?;
        col += char_width(c);
        idx += c.len_utf8();
    }
    None
}

/// Byte range of the `width` columns starting at `column`.
///
/// The range starts after any markers preceding the first glyph and ends
/// right after the last glyph, so markers that follow are left outside.
pub fn span_byte_range(line: &str, column: usize, width: usize) -> Option<Range<usize>> {
    let start = byte_offset_at_column(line, column)?;
    let mut end = start;
    let mut covered = 0;
    while covered < width {
        if let Some(m) = ANSI_SGR.find_at(line, end).filter(|m| m.start() == end) {
            end = m.end();
            continue;
        }
        let c = line[end..].chars().next()?;
        covered += char_width(c);
        end += c.len_utf8();
    }
    (covered == width).then_some(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: &str = "\x1b[38;2;255;0;0m";
    const RESET: &str = "\x1b[0m";

    // ========== string_width ==========

    #[test]
    fn test_width_ascii_equals_length() {
        for s in ["", "a", "hello", "The quick brown fox"] {
            assert_eq!(string_width(s), s.len());
        }
    }

    #[test]
    fn test_width_wide_script_is_double() {
        for s in ["中", "中文", "初一廿九", "立冬小雪大雪"] {
            assert_eq!(string_width(s), 2 * s.chars().count());
        }
    }

    #[test]
    fn test_width_mixed() {
        assert_eq!(string_width("A中"), 3);
        assert_eq!(string_width("2025 年 11 月"), 13);
    }

    #[test]
    fn test_width_multiline_takes_max() {
        assert_eq!(string_width("ab\n中文"), 4);
        assert_eq!(string_width("abcdef\n中"), 6);
    }

    #[test]
    fn test_width_ignores_control_sequences() {
        assert_eq!(string_width(&format!("A{}B", RED)), string_width("AB"));
        assert_eq!(string_width(&format!("{}中{}文", RED, RESET)), 4);
        assert_eq!(string_width("\x1b[1;38;2;254;194;96m标题\x1b[0m"), 4);
    }

    #[test]
    fn test_width_only_control_sequences_is_zero() {
        assert_eq!(string_width(&format!("{}{}", RED, RESET)), 0);
    }

    #[test]
    fn test_width_empty() {
        assert_eq!(string_width(""), 0);
        assert_eq!(string_width("\n"), 0);
    }

    // ========== fallback classification ==========

    #[test]
    fn test_fallback_width_rule() {
        assert_eq!(fallback_width('a'), 1);
        assert_eq!(fallback_width('\u{7f}'), 1);
        assert_eq!(fallback_width('é'), 2);
        assert_eq!(fallback_width('中'), 2);
    }

    #[test]
    fn test_latin1_is_narrow() {
        assert_eq!(char_width('\u{7}'), 1);
        assert_eq!(char_width('\u{85}'), 1);
        assert_eq!(char_width('é'), 1);
        assert_eq!(char_width('ÿ'), 1);
        assert_eq!(string_width("café"), 4);
    }

    #[test]
    fn test_beyond_latin1_is_wide() {
        for c in ['Я', 'Ω', '─', '○', '\u{200B}', '\u{301}', 'Ā'] {
            assert_eq!(char_width(c), 2, "{:?}", c);
        }
        assert_eq!(string_width("Я─○\u{200B}"), 8);
    }

    #[test]
    fn test_carriage_return_is_invisible() {
        assert_eq!(string_width("ab\r"), 2);
    }

    // ========== pad_right ==========

    #[test]
    fn test_pad_right_wide_char() {
        let padded = pad_right("中", 4);
        assert_eq!(padded, "中  ");
        assert_eq!(string_width(&padded), 4);
    }

    #[test]
    fn test_pad_right_noop_when_wide_enough() {
        assert_eq!(pad_right("hello", 3), "hello");
        assert_eq!(pad_right("中文", 4), "中文");
    }

    #[test]
    fn test_pad_right_width_is_max() {
        for (s, w) in [("", 3), ("ab", 5), ("中文字", 4), ("x", 1)] {
            assert_eq!(string_width(&pad_right(s, w)), string_width(s).max(w));
        }
    }

    #[test]
    fn test_pad_right_idempotent() {
        for (s, w) in [("", 3), ("初一", 6), ("abc", 2)] {
            let once = pad_right(s, w);
            assert_eq!(pad_right(&once, w), once);
        }
    }

    #[test]
    fn test_pad_right_ignores_control_sequences() {
        let styled = format!("{}1{}", RED, RESET);
        assert_eq!(pad_right(&styled, 3), format!("{}  ", styled));
    }

    // ========== byte_offset_at_column ==========

    #[test]
    fn test_byte_offset_ascii() {
        assert_eq!(byte_offset_at_column("abc", 0), Some(0));
        assert_eq!(byte_offset_at_column("abc", 2), Some(2));
        assert_eq!(byte_offset_at_column("abc", 3), Some(3));
        assert_eq!(byte_offset_at_column("abc", 4), None);
    }

    #[test]
    fn test_byte_offset_wide_chars() {
        // each ideograph is 3 bytes and 2 columns
        assert_eq!(byte_offset_at_column("初一 x", 2), Some(3));
        assert_eq!(byte_offset_at_column("初一 x", 4), Some(6));
        assert_eq!(byte_offset_at_column("初一 x", 5), Some(7));
        assert_eq!(byte_offset_at_column("初一 x", 1), None);
    }

    #[test]
    fn test_byte_offset_skips_markers() {
        let line = format!("{}ab{}c", RED, RESET);
        assert_eq!(byte_offset_at_column(&line, 0), Some(RED.len()));
        assert_eq!(byte_offset_at_column(&line, 2), Some(RED.len() + 2 + RESET.len()));
    }

    // ========== span_byte_range ==========

    #[test]
    fn test_span_range_stops_before_trailing_marker() {
        let line = format!("ab{}c", RED);
        assert_eq!(span_byte_range(&line, 0, 2), Some(0..2));
    }

    #[test]
    fn test_span_range_wide_glyphs() {
        assert_eq!(span_byte_range(" 初一 ", 1, 4), Some(1..7));
        assert_eq!(span_byte_range(" 初一 ", 1, 3), None);
    }

    #[test]
    fn test_span_range_past_end() {
        assert_eq!(span_byte_range("abc", 2, 2), None);
        assert_eq!(span_byte_range("abc", 5, 1), None);
    }
}
