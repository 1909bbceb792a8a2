//! Data model for a decoded chart.
//!
//! These structures capture everything the decoder reconstructs from the
//! opcode stream: timed note placements, note-timing and BPM changes,
//! named gameplay events, and lyric display spans. All times are seconds
//! (raw time units divided by 100 000).

use serde::{Deserialize, Serialize};

/// On-screen shape of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteShape {
    Triangle,
    Circle,
    Cross,
    Square,
    /// Only present in 5-bucket format variants.
    Star,
}

impl NoteShape {
    /// Name used in the XML output.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteShape::Triangle => "Triangle",
            NoteShape::Circle => "Circle",
            NoteShape::Cross => "Cross",
            NoteShape::Square => "Square",
            NoteShape::Star => "Star",
        }
    }
}

/// Gameplay type of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteType {
    Normal,
    Double,
    HoldStart,
    /// Never encoded directly: a HoldStart is reclassified to HoldEnd when
    /// the previously emitted note was a HoldStart of the same shape.
    HoldEnd,
}

impl NoteType {
    /// Name used in the XML output.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteType::Normal => "Normal",
            NoteType::Double => "Double",
            NoteType::HoldStart => "HoldStart",
            NoteType::HoldEnd => "HoldEnd",
        }
    }
}

/// A single note placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Appear time in seconds
    pub time: f64,
    pub shape: NoteShape,
    pub note_type: NoteType,
    /// Screen position (affine-mapped from the raw coordinate domain)
    pub x: f64,
    pub y: f64,
    /// Approach angle in degrees
    pub angle: f64,
    /// Approach wave frequency (unscaled raw value)
    pub frequency: i32,
    /// Approach wave amplitude (unscaled raw value)
    pub amplitude: i32,
    /// Approach distance
    pub distance: f64,
}

/// A lyric display span: one lyric line shown from `start` to `end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricSpan {
    /// Display start in seconds
    pub start: f64,
    /// Display end in seconds. The first span of a stream opens with
    /// `start - 0.001` here (the stream format's own quirk, kept as-is);
    /// a span stays at 0.0 until the next LYRIC opcode closes it.
    pub end: f64,
    /// Display color, raw word reinterpreted as unsigned 32-bit
    pub color: u32,
    /// Index into the external lyric text source
    pub index: i32,
    /// Resolved lyric text. The stream itself carries no text; see
    /// [`Chart::resolve_lyrics`].
    pub text: Option<String>,
}

/// One decoded record, in stream emission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChartEvent {
    Note(Note),
    /// Note approach-duration change (from TARGET note-time words or
    /// derived from BAR_TIME_SET, depending on variant).
    SetNoteTime { time: f64, value: f64 },
    /// Structured tempo change (BAR_TIME_SET in event-stream variants).
    BarTime { time: f64, bpm: i32, beats_per_bar: i32 },
    ChanceTimeStart { time: f64 },
    ChanceTimeEnd { time: f64 },
    /// Music playback start (event-stream variants only; attribute
    /// variants set [`Chart::music_start`] instead).
    MusicStart { time: f64 },
    /// Song end (event-stream variants only; attribute variants set
    /// [`Chart::duration`] instead).
    SongEnd { time: f64 },
}

impl ChartEvent {
    /// Time of this record in seconds.
    pub fn time(&self) -> f64 {
        match *self {
            ChartEvent::Note(ref n) => n.time,
            ChartEvent::SetNoteTime { time, .. }
            | ChartEvent::BarTime { time, .. }
            | ChartEvent::ChanceTimeStart { time }
            | ChartEvent::ChanceTimeEnd { time }
            | ChartEvent::MusicStart { time }
            | ChartEvent::SongEnd { time } => time,
        }
    }
}

/// A fully decoded chart: document-level attributes, the event sequence,
/// and the lyric span list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chart {
    /// Song duration in seconds (attribute-policy variants)
    pub duration: Option<f64>,
    /// Music start time in seconds (attribute-policy variants)
    pub music_start: Option<f64>,
    /// Decoded records in emission order
    pub events: Vec<ChartEvent>,
    /// Lyric display spans in stream order
    pub lyrics: Vec<LyricSpan>,
}

impl Chart {
    /// Create a new empty chart.
    pub fn new() -> Self {
        Self {
            duration: None,
            music_start: None,
            events: Vec::new(),
            lyrics: Vec::new(),
        }
    }

    /// All note records, in emission order.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.events.iter().filter_map(|e| match e {
            ChartEvent::Note(n) => Some(n),
            _ => None,
        })
    }

    /// Number of note records.
    pub fn note_count(&self) -> usize {
        self.notes().count()
    }

    /// Fill in lyric text from an external source keyed by lyric index.
    /// Spans whose index the source does not know keep `text: None`.
    pub fn resolve_lyrics<F>(&mut self, mut source: F)
    where
        F: FnMut(i32) -> Option<String>,
    {
        for span in &mut self.lyrics {
            span.text = source(span.index);
        }
    }
}

impl Default for Chart {
    fn default() -> Self {
        Self::new()
    }
}
