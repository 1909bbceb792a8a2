//! Opcode table — maps an opcode id to its schema name and fixed
//! argument-word count.
//!
//! The schema is an associative JSON document: opcode name → variant key
//! (e.g. `info_f`, `info_dt`) → `{ "id": …, "len": … }`. Different stream
//! format generations use different variant keys and the keys must not be
//! cross-applied, so the caller always supplies the key explicitly. After
//! construction the table is a pure lookup.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::error::DecodeError;

/// Opcode schema bundled with the crate, covering the `info_f` and
/// `info_dt` namespaces. External schema files use the same layout.
pub const BUILTIN_SCHEMA: &str = include_str!("../data/opcode_db.json");

/// One `{id, len}` record inside the schema document.
#[derive(Debug, Clone, Deserialize)]
struct OpcodeRecord {
    id: i32,
    len: u32,
}

/// Schema document: opcode name → variant key → record.
/// BTreeMap keeps diagnostics output in a stable order.
type SchemaDoc = BTreeMap<String, BTreeMap<String, OpcodeRecord>>;

/// Lookup table for one schema variant.
#[derive(Debug, Clone)]
pub struct OpcodeTable {
    variant_key: String,
    lengths: HashMap<i32, u32>,
    names: HashMap<i32, String>,
}

impl OpcodeTable {
    /// Load the entries carrying `variant_key` from a schema JSON string.
    /// Fails if the document does not parse or the key matches nothing.
    pub fn from_json(json: &str, variant_key: &str) -> Result<Self, DecodeError> {
        let doc: SchemaDoc = serde_json::from_str(json)?;

        let mut lengths = HashMap::new();
        let mut names = HashMap::new();
        for (name, variants) in &doc {
            if let Some(record) = variants.get(variant_key) {
                lengths.insert(record.id, record.len);
                names.insert(record.id, name.clone());
            }
        }

        if lengths.is_empty() {
            return Err(DecodeError::UnknownVariant {
                key: variant_key.to_string(),
            });
        }

        Ok(Self {
            variant_key: variant_key.to_string(),
            lengths,
            names,
        })
    }

    /// Load a schema file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P, variant_key: &str) -> Result<Self, DecodeError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json, variant_key)
    }

    /// The schema bundled with the crate.
    pub fn builtin(variant_key: &str) -> Result<Self, DecodeError> {
        Self::from_json(BUILTIN_SCHEMA, variant_key)
    }

    /// Variant key this table was loaded for.
    pub fn variant_key(&self) -> &str {
        &self.variant_key
    }

    /// Argument-word count for an opcode id, or `None` if the id is not in
    /// this variant's table (the decoder must then fail: without a length
    /// it cannot advance).
    pub fn length_of(&self, opcode: i32) -> Option<u32> {
        self.lengths.get(&opcode).copied()
    }

    /// Schema name for an opcode id.
    pub fn name_of(&self, opcode: i32) -> Option<&str> {
        self.names.get(&opcode).map(|s| s.as_str())
    }

    /// Number of opcodes in this variant.
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// All `(id, name, len)` entries sorted by id. Used by the CLI's
    /// opcode listing.
    pub fn entries(&self) -> Vec<(i32, &str, u32)> {
        let mut entries: Vec<(i32, &str, u32)> = self
            .lengths
            .iter()
            .map(|(&id, &len)| (id, self.names[&id].as_str(), len))
            .collect();
        entries.sort_by_key(|e| e.0);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"{
        "END":    { "info_f": { "id": 0, "len": 0 }, "info_dt": { "id": 0, "len": 0 } },
        "TIME":   { "info_f": { "id": 1, "len": 1 }, "info_dt": { "id": 1, "len": 1 } },
        "TARGET": { "info_f": { "id": 6, "len": 10 }, "info_dt": { "id": 6, "len": 7 } },
        "PV_END": { "info_dt": { "id": 30, "len": 0 } }
    }"#;

    #[test]
    fn variant_key_selects_distinct_tables() {
        let f = OpcodeTable::from_json(SCHEMA, "info_f").unwrap();
        let dt = OpcodeTable::from_json(SCHEMA, "info_dt").unwrap();

        assert_eq!(f.length_of(6), Some(10));
        assert_eq!(dt.length_of(6), Some(7));
        assert_eq!(f.length_of(30), None);
        assert_eq!(dt.length_of(30), Some(0));
        assert_eq!(f.name_of(1), Some("TIME"));
        assert_eq!(f.len(), 3);
        assert_eq!(dt.len(), 4);
    }

    #[test]
    fn unknown_variant_key_is_an_error() {
        let err = OpcodeTable::from_json(SCHEMA, "info_x").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownVariant { .. }));
    }

    #[test]
    fn entries_are_sorted_by_id() {
        let dt = OpcodeTable::from_json(SCHEMA, "info_dt").unwrap();
        let ids: Vec<i32> = dt.entries().iter().map(|e| e.0).collect();
        assert_eq!(ids, vec![0, 1, 6, 30]);
    }

    #[test]
    fn builtin_schema_parses_in_both_namespaces() {
        for key in ["info_f", "info_dt"] {
            let table = OpcodeTable::builtin(key).unwrap();
            for name in ["END", "TIME", "TARGET", "LYRIC", "MUSIC_PLAY", "MODE_SELECT", "BAR_TIME_SET"] {
                assert!(
                    table.entries().iter().any(|e| e.1 == name),
                    "builtin {key} table should contain {name}"
                );
            }
        }
    }
}
