//! chartlib — binary chart-script (.dsc) decoder for rhythm-game charts.
//!
//! Walks a flat buffer of little-endian 32-bit opcode words, reconstructs
//! playback state (current time, hold-note memory, lyric spans), and
//! produces an ordered [`Chart`] of note / timing / lyric records, which
//! can be serialized to the XML document the game loads or to JSON.
//!
//! # Example
//! ```
//! use chartlib::{decode_words, FormatVariant, OpcodeTable, WordCursor};
//!
//! let table = OpcodeTable::builtin("info_f").unwrap();
//! let variant = FormatVariant::future();
//!
//! // header word, TIME(500000), END
//! let cursor = WordCursor::from_words(vec![0, 1, 500_000, 0]);
//! let chart = decode_words(cursor, &table, &variant).unwrap();
//! assert_eq!(chart.duration, Some(5.0));
//! ```

pub mod chart;
pub mod cursor;
pub mod decoder;
pub mod error;
pub mod opcodes;
pub mod variant;
pub mod xml;

use std::path::Path;

pub use chart::{Chart, ChartEvent, LyricSpan, Note, NoteShape, NoteType};
pub use cursor::WordCursor;
pub use decoder::{decode_bytes, decode_words};
pub use error::DecodeError;
pub use opcodes::OpcodeTable;
pub use variant::{BarTimePolicy, BoundaryPolicy, FormatVariant, TargetLayout};
pub use xml::{chart_to_xml, lyrics_to_xml};

/// Decode a chart-script file from a file path.
/// The whole file is read into memory before decoding starts; the walk
/// itself performs no I/O.
pub fn decode_file<P: AsRef<Path>>(
    path: P,
    table: &OpcodeTable,
    variant: &FormatVariant,
) -> Result<Chart, DecodeError> {
    let data = std::fs::read(path)?;
    decode_bytes(&data, table, variant)
}

/// Convert a decoded chart to a JSON string.
/// Useful for tooling that wants the structured model rather than the XML.
pub fn chart_to_json(chart: &Chart) -> Result<String, String> {
    serde_json::to_string_pretty(chart).map_err(|e| format!("JSON serialization error: {e}"))
}
