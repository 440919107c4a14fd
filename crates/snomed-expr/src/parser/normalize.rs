//! Caption stripping.
//!
//! Every identifier may carry a trailing human-readable caption between
//! pipes, `260686004 |Associated morphology|`. Normalization removes the
//! captions and all spaces, leaving the machine-readable text.
//!
//! A caption ends at the first caption terminator after its opening pipe,
//! not at the closing pipe. A caption that itself contains `:`, `+`, `{`,
//! `,` or `}` is therefore cut short and its tail stays in the output. This
//! matches how existing authoring sheets have always been read and is kept
//! as a known limitation.

use crate::parser::scanner::Scanner;

const CAPTION_DELIMITER: u8 = b'|';

/// Returns true for bytes that end a caption.
#[inline]
fn is_caption_terminator(b: u8) -> bool {
    matches!(b, b'|' | b':' | b'+' | b'{' | b',' | b'}')
}

/// Strips captions and spaces from raw expression text.
///
/// From each pipe, text is dropped up to the next caption terminator. A
/// closing pipe is dropped as well; any other terminator is kept. A caption
/// with no terminator runs to the end of the text.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut scanner = Scanner::new(raw);

    while let Some(kept) = scanner.take_until(CAPTION_DELIMITER) {
        out.push_str(kept);
        if !scanner.skip_to(is_caption_terminator) {
            break;
        }
        scanner.eat_byte(CAPTION_DELIMITER);
    }
    out.push_str(scanner.take_rest());

    out.retain(|c| c != ' ');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_captions_and_spaces() {
        let raw = "<<< 71388002 |Some finding (finding)| : { 260686004 |Associated morphology|=129264002 |Abc (disorder)| }";
        assert_eq!(normalize(raw), "<<<71388002:{260686004=129264002}");
    }

    #[test]
    fn test_caption_ended_by_terminator_keeps_terminator() {
        assert_eq!(normalize("123|abc:456"), "123:456");
        assert_eq!(normalize("1|a+2|b"), "1+2");
    }

    #[test]
    fn test_unterminated_caption_runs_to_end() {
        assert_eq!(normalize("===123 |Open caption"), "===123");
    }

    #[test]
    fn test_caption_with_comma_is_truncated() {
        // The comma ends the caption early. The pipe after "b" then opens a
        // new caption that ends at ':'.
        let raw = "===1 |a, b| :{2=3}";
        assert_eq!(normalize(raw), "===1,b:{2=3}");
    }

    #[test]
    fn test_idempotent_on_normalized_text() {
        let normalized = "===71388002:{260686004=129264002}";
        assert_eq!(normalize(normalized), normalized);
    }

    #[test]
    fn test_only_spaces_are_removed() {
        assert_eq!(normalize("=== 1\t2"), "===1\t2");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("|"), "");
    }
}
