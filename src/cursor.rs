//! Binary cursor — owns the raw 32-bit-word buffer and the current read
//! position of the opcode walk.
//!
//! Chart scripts are flat arrays of little-endian signed 32-bit words.
//! The cursor advances by `1 + argument count` words per opcode; all reads
//! are bounds-checked so a truncated file surfaces as a typed error with
//! the offending word index rather than a panic.

use crate::error::DecodeError;

/// Word buffer plus read position.
#[derive(Debug, Clone)]
pub struct WordCursor {
    words: Vec<i32>,
    pos: usize,
}

impl WordCursor {
    /// Build a cursor from a raw byte buffer.
    /// Fails with `MalformedStream` unless the length is word-aligned.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() % 4 != 0 {
            return Err(DecodeError::MalformedStream { len: data.len() });
        }
        let words = data
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Self { words, pos: 0 })
    }

    /// Build a cursor from words already in memory (tests, synthetic streams).
    pub fn from_words(words: Vec<i32>) -> Self {
        Self { words, pos: 0 }
    }

    /// Total number of words in the buffer.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Current word index.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the read position to an absolute word index.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// True while the position still addresses a word.
    pub fn remaining(&self) -> bool {
        self.pos < self.words.len()
    }

    /// Read the word at an absolute index.
    pub fn word_at(&self, index: usize) -> Result<i32, DecodeError> {
        self.words
            .get(index)
            .copied()
            .ok_or(DecodeError::TruncatedStream {
                word_index: index,
                byte_offset: index * 4,
            })
    }

    /// The `count` argument words following the current position.
    /// Fails with `TruncatedStream` if they run past the buffer end.
    pub fn args(&self, count: usize) -> Result<&[i32], DecodeError> {
        let start = self.pos + 1;
        let end = start + count;
        if end > self.words.len() {
            return Err(DecodeError::TruncatedStream {
                word_index: self.words.len(),
                byte_offset: self.words.len() * 4,
            });
        }
        Ok(&self.words[start..end])
    }

    /// Advance past the opcode at the current position and its arguments.
    pub fn advance(&mut self, arg_count: usize) {
        self.pos += arg_count + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_decodes_little_endian_words() {
        let cursor = WordCursor::from_bytes(&[0x01, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff])
            .expect("aligned buffer should parse");
        assert_eq!(cursor.word_count(), 2);
        assert_eq!(cursor.word_at(0).unwrap(), 1);
        assert_eq!(cursor.word_at(1).unwrap(), -1);
    }

    #[test]
    fn from_bytes_rejects_unaligned_length() {
        let err = WordCursor::from_bytes(&[0, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedStream { len: 5 }));
    }

    #[test]
    fn args_past_end_is_truncated_stream() {
        let mut cursor = WordCursor::from_words(vec![1, 500]);
        assert_eq!(cursor.args(1).unwrap(), &[500]);
        cursor.advance(1);
        assert!(!cursor.remaining());

        let cursor = WordCursor::from_words(vec![1]);
        let err = cursor.args(1).unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedStream { word_index: 1, .. }));
    }
}
