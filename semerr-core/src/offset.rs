//! Byte → character offset conversion.
//!
//! `regex` reports byte offsets; mentions carry character offsets. The
//! converter pre-computes a lookup table once per text so each conversion is
//! O(1). ASCII texts (the common case) skip the table entirely.

/// Converter for many byte offsets into the same text.
#[derive(Debug, Clone)]
pub struct SpanConverter {
    byte_to_char: Vec<usize>,
    is_ascii: bool,
}

impl SpanConverter {
    /// Create a converter for the given text.
    #[must_use]
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self {
                byte_to_char: Vec::new(),
                is_ascii: true,
            };
        }

        // One entry per byte plus one for the end-of-text offset. Bytes inside
        // a multi-byte character map to that character's index.
        let mut byte_to_char = vec![0; text.len() + 1];
        let mut char_idx = 0;
        for (byte_idx, ch) in text.char_indices() {
            for slot in byte_to_char
                .iter_mut()
                .skip(byte_idx)
                .take(ch.len_utf8())
            {
                *slot = char_idx;
            }
            char_idx += 1;
        }
        byte_to_char[text.len()] = char_idx;

        Self {
            byte_to_char,
            is_ascii: false,
        }
    }

    /// Convert a byte offset to a character offset.
    ///
    /// Offsets past the end clamp to the character length of the text.
    #[must_use]
    pub fn byte_to_char(&self, byte_idx: usize) -> usize {
        if self.is_ascii {
            byte_idx
        } else {
            self.byte_to_char
                .get(byte_idx)
                .copied()
                .unwrap_or_else(|| self.byte_to_char.last().copied().unwrap_or(0))
        }
    }

    /// True when the text is pure ASCII.
    #[must_use]
    pub const fn is_ascii(&self) -> bool {
        self.is_ascii
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_identity() {
        let conv = SpanConverter::new("The Eagle");
        assert!(conv.is_ascii());
        assert_eq!(conv.byte_to_char(4), 4);
    }

    #[test]
    fn pound_sign_counts_as_one_char() {
        // '£' is two bytes
        let text = "under £20 here";
        let conv = SpanConverter::new(text);
        let byte_start = text.find("20").unwrap();
        assert_eq!(byte_start, 8);
        assert_eq!(conv.byte_to_char(byte_start), 7);
        assert_eq!(conv.byte_to_char(text.len()), text.chars().count());
    }

    #[test]
    fn cafe_offsets() {
        let text = "Café Rouge";
        let conv = SpanConverter::new(text);
        let end = text.len();
        assert_eq!(conv.byte_to_char(end), 10);
        assert_eq!(conv.byte_to_char(text.find("Rouge").unwrap()), 5);
    }
}
