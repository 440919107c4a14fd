//! Forward-only cursor over expression text.
//!
//! Every delimiter in the authoring format is ASCII, so byte offsets found
//! by the scanner always fall on `char` boundaries.

/// Cursor over an immutable string slice.
///
/// Wraps a `&str` and a read position. Returned slices borrow from the
/// original text, not from the scanner.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Returns the current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the unread text.
    pub fn remaining(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Returns true if all text has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Returns the next byte without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    /// Consumes `prefix` if the unread text starts with it.
    pub fn eat(&mut self, prefix: &str) -> bool {
        if self.remaining().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    /// Consumes one byte if it equals `byte`.
    pub fn eat_byte(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Returns the text up to the next `delim` and consumes it together with
    /// the delimiter. Returns `None` and consumes nothing if `delim` does not
    /// occur.
    pub fn take_until(&mut self, delim: u8) -> Option<&'a str> {
        let offset = self.remaining().bytes().position(|b| b == delim)?;
        let start = self.pos;
        self.pos += offset + 1;
        Some(&self.text[start..start + offset])
    }

    /// Consumes and returns all unread text.
    pub fn take_rest(&mut self) -> &'a str {
        let rest = self.remaining();
        self.pos = self.text.len();
        rest
    }

    /// Moves to the next byte matching `pred` without consuming it.
    ///
    /// Returns false and moves to the end if no byte matches.
    pub fn skip_to(&mut self, pred: impl Fn(u8) -> bool) -> bool {
        match self.remaining().bytes().position(pred) {
            Some(offset) => {
                self.pos += offset;
                true
            }
            None => {
                self.pos = self.text.len();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_until_consumes_delimiter() {
        let mut s = Scanner::new("abc:def");
        assert_eq!(s.take_until(b':'), Some("abc"));
        assert_eq!(s.remaining(), "def");
        assert_eq!(s.take_until(b':'), None);
        assert_eq!(s.position(), 4);
        assert_eq!(s.take_rest(), "def");
        assert!(s.is_empty());
    }

    #[test]
    fn test_eat() {
        let mut s = Scanner::new("===123");
        assert!(!s.eat("<<<"));
        assert!(s.eat("==="));
        assert!(!s.eat_byte(b'{'));
        assert!(s.eat_byte(b'1'));
        assert_eq!(s.remaining(), "23");
    }

    #[test]
    fn test_skip_to() {
        let mut s = Scanner::new("caption, rest");
        assert!(s.skip_to(|b| b == b','));
        assert_eq!(s.peek(), Some(b','));
        assert!(!s.skip_to(|b| b == b'|'));
        assert!(s.is_empty());
        assert_eq!(s.peek(), None);
    }

    #[test]
    fn test_multibyte_text_is_preserved() {
        let mut s = Scanner::new("Ménière|x");
        assert_eq!(s.take_until(b'|'), Some("Ménière"));
        assert_eq!(s.remaining(), "x");
    }
}
