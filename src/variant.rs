//! Format variant configuration.
//!
//! The observed chart-script format generations all run the same decode
//! algorithm with different parameters: which schema namespace to read,
//! where the opcode walk starts, how TARGET lays out its arguments, how
//! many shape buckets exist, and whether END/MUSIC_PLAY become document
//! attributes or event records. One configuration struct covers all of
//! them; no per-generation decoder implementations.

/// Word-offset convention inside TARGET arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetLayout {
    /// Argument index where the coordinate block (x, y, angle, frequency,
    /// distance, amplitude) begins. The shape word is always argument 0;
    /// padded layouts leave unused words between it and the coordinates.
    pub coord_offset: usize,
    /// Whether a note-approach-time word follows the coordinate block.
    pub has_note_time: bool,
}

/// How BAR_TIME_SET is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarTimePolicy {
    /// Emit a note-time change carrying the derived beat length
    /// `60 / bpm * 4`.
    DeriveNoteTime,
    /// Emit a structured BPM / beats-per-bar event.
    Structured,
}

/// How END and MUSIC_PLAY are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Set document-level Duration / MusicStart attributes.
    Attributes,
    /// Emit SongEnd / MusicStart event records.
    Events,
}

/// Decoder parameterization for one stream format generation.
#[derive(Debug, Clone)]
pub struct FormatVariant {
    /// Schema namespace to load the opcode table from.
    pub schema_key: String,
    /// Word index where the opcode walk starts: 1 skips the header/offset
    /// word, 0 for generations whose stream begins directly with opcodes.
    pub first_opcode_word: usize,
    /// TARGET argument layout.
    pub target: TargetLayout,
    /// Number of note shapes (4, or 5 with Star).
    pub shape_buckets: i32,
    /// Whether the raw shape word also encodes the note type in bands of
    /// `shape_buckets`: band 0 Normal, band 1 Double, band 2 HoldStart.
    pub hold_bands: bool,
    /// Whether MODE_SELECT carries a leading difficulty-flag word that
    /// gates event emission on bit 0.
    pub mode_select_difficulty_gate: bool,
    /// BAR_TIME_SET emission policy.
    pub bar_time: BarTimePolicy,
    /// Whether the structured beats-per-bar value is stored as `raw + 1`
    /// (the off-by-one generation; kept exactly as the format expects).
    pub beats_per_bar_offset: bool,
    /// END / MUSIC_PLAY emission policy.
    pub boundary: BoundaryPolicy,
}

impl FormatVariant {
    /// The `info_f` generation as consumed by the chart converter:
    /// padded TARGET layout, hold bands, difficulty-gated MODE_SELECT,
    /// attribute-style Duration/MusicStart.
    pub fn future() -> Self {
        Self {
            schema_key: "info_f".to_string(),
            first_opcode_word: 1,
            target: TargetLayout {
                coord_offset: 3,
                has_note_time: true,
            },
            shape_buckets: 4,
            hold_bands: true,
            mode_select_difficulty_gate: true,
            bar_time: BarTimePolicy::DeriveNoteTime,
            beats_per_bar_offset: false,
            boundary: BoundaryPolicy::Attributes,
        }
    }

    /// The `info_f` generation with event-stream emission: identical
    /// decode, but END/MUSIC_PLAY become records instead of attributes
    /// and BAR_TIME_SET stays structured.
    pub fn future_events() -> Self {
        Self {
            bar_time: BarTimePolicy::Structured,
            boundary: BoundaryPolicy::Events,
            ..Self::future()
        }
    }

    /// The `info_dt` generation: stream starts at word 0, compact TARGET
    /// layout, Star bucket, no hold bands, ungated MODE_SELECT, and the
    /// beats-per-bar off-by-one.
    pub fn classic() -> Self {
        Self {
            schema_key: "info_dt".to_string(),
            first_opcode_word: 0,
            target: TargetLayout {
                coord_offset: 1,
                has_note_time: false,
            },
            shape_buckets: 5,
            hold_bands: false,
            mode_select_difficulty_gate: false,
            bar_time: BarTimePolicy::Structured,
            beats_per_bar_offset: true,
            boundary: BoundaryPolicy::Events,
        }
    }

    /// Look up a preset by its CLI name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "f" => Some(Self::future()),
            "f-events" => Some(Self::future_events()),
            "dt" => Some(Self::classic()),
            _ => None,
        }
    }

    /// CLI names of all presets.
    pub fn preset_names() -> &'static [&'static str] {
        &["f", "f-events", "dt"]
    }
}
