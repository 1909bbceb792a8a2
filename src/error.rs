//! Error taxonomy for chart-script decoding.
//!
//! Fatal errors carry the word index and byte offset of the failure so a
//! conversion failure can be traced back into the input file. Value-range
//! issues inside a recognized opcode (unexpected shape or mode values) are
//! not errors: they are logged and decoding continues with a fallback.

use thiserror::Error;

/// Errors that abort decoding of one input stream.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Input length is not a multiple of the 4-byte word size.
    #[error("malformed stream: length {len} bytes is not a multiple of 4")]
    MalformedStream { len: usize },

    /// An opcode id was read that the active schema table does not know.
    /// Fatal: without a length the decoder cannot advance past it.
    #[error(
        "unknown opcode {opcode} at word {word_index} (byte offset 0x{byte_offset:x})"
    )]
    UnknownOpcode {
        opcode: i32,
        word_index: usize,
        byte_offset: usize,
    },

    /// An argument read would run past the end of the buffer.
    #[error("truncated stream: read past end at word {word_index} (byte offset 0x{byte_offset:x})")]
    TruncatedStream { word_index: usize, byte_offset: usize },

    /// The opcode schema document could not be parsed.
    #[error("opcode schema parse error: {0}")]
    SchemaParse(#[from] serde_json::Error),

    /// No opcode in the schema document carries the requested variant key.
    #[error("opcode schema has no entries for variant key '{key}'")]
    UnknownVariant { key: String },

    /// Reading the input or schema file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
