use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminal columns occupied by `s` (CJK and emoji count double).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: char = '…';

/// Shorten `s` to at most `max_width` columns, ending in `…` when cut.
///
/// Borrows when `s` already fits. A width of 1 leaves room only for the
/// ellipsis itself.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::with_capacity(s.len().min(max_width * 4));
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

/// Remove terminal control characters and escape sequences from catalog text.
///
/// CSI (`ESC [ ... final`) and OSC (`ESC ] ... BEL|ST`) sequences are dropped
/// whole; other control characters are dropped individually, except that
/// tabs and newlines become a single space so a card line stays one line.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(char::is_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\u{1b}' => match chars.peek() {
                Some('[') => {
                    chars.next();
                    for c in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == '\u{7}' {
                            break;
                        }
                        if c == '\u{1b}' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            '\t' | '\n' | '\r' => {
                if !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("Snake"), 5);
        assert_eq!(display_width("日本"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn test_truncate_fits_borrows() {
        assert!(matches!(truncate_to_width("Chess", 5), Cow::Borrowed("Chess")));
        assert!(matches!(truncate_to_width("Chess", 20), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("Space Invaders", 8), "Space I…");
        assert_eq!(display_width(&truncate_to_width("Space Invaders", 8)), 8);
    }

    #[test]
    fn test_truncate_wide_chars_never_overflow() {
        // Each kanji is 2 columns; 5 columns fits two kanji plus the ellipsis.
        let out = truncate_to_width("日本語のゲーム", 5);
        assert_eq!(out, "日本…");
        let out = truncate_to_width("日本語のゲーム", 4);
        assert_eq!(out, "日…");
        assert!(display_width(&out) <= 4);
    }

    #[test]
    fn test_truncate_tiny_widths() {
        assert_eq!(truncate_to_width("Tetris", 0), "");
        assert_eq!(truncate_to_width("Tetris", 1), "…");
        assert_eq!(truncate_to_width("Tetris", 2), "T…");
    }

    #[test]
    fn test_strip_clean_text_borrows() {
        assert!(matches!(
            strip_control_chars("Pac-Man • arcade"),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_strip_csi_sequence() {
        assert_eq!(strip_control_chars("\x1b[31mRed\x1b[0m Game"), "Red Game");
    }

    #[test]
    fn test_strip_osc_sequences() {
        assert_eq!(
            strip_control_chars("\x1b]0;pwned\x07Title"),
            "Title"
        );
        assert_eq!(
            strip_control_chars("\x1b]8;;http://evil\x1b\\Link"),
            "Link"
        );
    }

    #[test]
    fn test_strip_bare_controls() {
        assert_eq!(strip_control_chars("Go\x00al\x7f!"), "Goal!");
        assert_eq!(strip_control_chars("Line one\nline two"), "Line one line two");
        assert_eq!(strip_control_chars("a\r\n\tb"), "a b");
    }

    #[test]
    fn test_strip_unterminated_sequence() {
        assert_eq!(strip_control_chars("Fine\x1b[12"), "Fine");
    }
}
