//! Opcode decoder — the core walk over the chart-script word stream.
//!
//! At every step the loop reads one opcode id, looks up its argument count
//! in the active opcode table, hands the argument words to a handler
//! selected by the opcode's schema name, and advances by
//! `argument count + 1` words. Interpreter state (current playback time,
//! previous-note memory for hold detection, lyric span chaining) is
//! threaded through one `ChartState` value per decode, so multi-file
//! conversions can run decodes independently.
//!
//! The walk ends when the position reaches the word count. A terminator
//! opcode does not stop it: truncated streams and clean streams end the
//! same way, and callers treat both as end of decode.

use log::{debug, warn};

use crate::chart::{Chart, ChartEvent, LyricSpan, Note, NoteShape, NoteType};
use crate::cursor::WordCursor;
use crate::error::DecodeError;
use crate::opcodes::OpcodeTable;
use crate::variant::{BarTimePolicy, BoundaryPolicy, FormatVariant};

/// Raw time units per second.
const TIME_UNITS_PER_SECOND: f64 = 100_000.0;

/// Gap subtracted from the closing time of a lyric span, in seconds.
const LYRIC_CLOSE_GAP: f64 = 0.001;

/// Interpreter state accumulated across the walk. Initialized at decode
/// start, discarded at decode end; never persisted or shared.
#[derive(Debug)]
struct ChartState {
    /// Current playback time in raw units, set by TIME opcodes.
    time_units: i32,
    /// Shape and type of the most recently *emitted* note (not the most
    /// recent TARGET opcode) — hold detection compares emitted notes.
    prev_note_shape: Option<NoteShape>,
    prev_note_type: Option<NoteType>,
    /// Note-approach-time word of the previous note.
    prev_note_time: i32,
    /// Whether the next opened lyric span is the stream's first.
    first_lyric: bool,
}

impl ChartState {
    fn new() -> Self {
        Self {
            time_units: 0,
            prev_note_shape: None,
            prev_note_type: None,
            prev_note_time: 0,
            first_lyric: true,
        }
    }

    /// Current playback time in seconds.
    fn seconds(&self) -> f64 {
        self.time_units as f64 / TIME_UNITS_PER_SECOND
    }
}

/// Decode a raw chart-script byte buffer.
pub fn decode_bytes(
    data: &[u8],
    table: &OpcodeTable,
    variant: &FormatVariant,
) -> Result<Chart, DecodeError> {
    let cursor = WordCursor::from_bytes(data)?;
    decode_words(cursor, table, variant)
}

/// Decode a word buffer already in memory.
pub fn decode_words(
    mut cursor: WordCursor,
    table: &OpcodeTable,
    variant: &FormatVariant,
) -> Result<Chart, DecodeError> {
    let mut chart = Chart::new();
    let mut state = ChartState::new();

    cursor.seek(variant.first_opcode_word);
    while cursor.remaining() {
        let word_index = cursor.position();
        let opcode = cursor.word_at(word_index)?;
        let arg_count = table
            .length_of(opcode)
            .ok_or(DecodeError::UnknownOpcode {
                opcode,
                word_index,
                byte_offset: word_index * 4,
            })? as usize;

        let args = cursor.args(arg_count)?;
        // length_of and name_of are built from the same schema records,
        // so a known id always has a name.
        if let Some(name) = table.name_of(opcode) {
            dispatch(name, args, word_index, variant, &mut state, &mut chart)?;
        }

        cursor.advance(arg_count);
    }

    Ok(chart)
}

/// Route one opcode to its handler. Opcodes the converter has no use for
/// are skipped here; the loop still advances by their declared length.
fn dispatch(
    name: &str,
    args: &[i32],
    word_index: usize,
    variant: &FormatVariant,
    state: &mut ChartState,
    chart: &mut Chart,
) -> Result<(), DecodeError> {
    // Argument access relative to the opcode's declared extent. A miss
    // means the schema declares fewer words than the layout needs, which
    // reads past the opcode exactly like a truncated buffer would.
    let arg = |idx: usize| -> Result<i32, DecodeError> {
        args.get(idx).copied().ok_or(DecodeError::TruncatedStream {
            word_index: word_index + 1 + idx,
            byte_offset: (word_index + 1 + idx) * 4,
        })
    };

    match name {
        "END" => match variant.boundary {
            BoundaryPolicy::Attributes => chart.duration = Some(state.seconds()),
            BoundaryPolicy::Events => chart.events.push(ChartEvent::SongEnd {
                time: state.seconds(),
            }),
        },

        "TIME" => {
            state.time_units = arg(0)?;
        }

        "TARGET" => {
            let raw_shape = arg(0)?;
            let (shape, mut note_type) = classify_note(raw_shape, variant);

            // Hold continuation: a second HoldStart of the same shape
            // closes the hold rather than opening another one.
            if note_type == NoteType::HoldStart
                && state.prev_note_type == Some(NoteType::HoldStart)
                && state.prev_note_shape == Some(shape)
            {
                note_type = NoteType::HoldEnd;
            }
            state.prev_note_shape = Some(shape);
            state.prev_note_type = Some(note_type);

            let off = variant.target.coord_offset;
            let raw_x = arg(off)?;
            let raw_y = arg(off + 1)?;
            let angle = arg(off + 2)?;
            let frequency = arg(off + 3)?;
            let distance = arg(off + 4)?;
            let amplitude = arg(off + 5)?;

            if variant.target.has_note_time {
                let note_time = arg(off + 6)?;
                if note_time != state.prev_note_time {
                    chart.events.push(ChartEvent::SetNoteTime {
                        time: state.seconds(),
                        value: note_time as f64 / 1000.0,
                    });
                }
                state.prev_note_time = note_time;
            }

            chart.events.push(ChartEvent::Note(Note {
                time: state.seconds(),
                shape,
                note_type,
                x: raw_x as f64 * 960.0 / 480_000.0 + 160.0,
                y: raw_y as f64 * 540.0 / 272_000.0 + 90.0,
                angle: angle as f64 / 1000.0,
                frequency,
                amplitude,
                distance: distance as f64 / 1000.0 * 4.0,
            }));
        }

        "MUSIC_PLAY" => match variant.boundary {
            BoundaryPolicy::Attributes => chart.music_start = Some(state.seconds()),
            BoundaryPolicy::Events => chart.events.push(ChartEvent::MusicStart {
                time: state.seconds(),
            }),
        },

        "MODE_SELECT" => {
            let mode = if variant.mode_select_difficulty_gate {
                let difficulty = arg(0)?;
                if difficulty & 1 == 0 {
                    return Ok(());
                }
                arg(1)?
            } else {
                arg(0)?
            };

            match mode {
                1 => chart.events.push(ChartEvent::ChanceTimeStart {
                    time: state.seconds(),
                }),
                3 => chart.events.push(ChartEvent::ChanceTimeEnd {
                    time: state.seconds(),
                }),
                other => debug!("MODE_SELECT mode {other} has no chart event, skipping"),
            }
        }

        "BAR_TIME_SET" => {
            let bpm = arg(0)?;
            let beats_per_bar = arg(1)?;
            if bpm <= 0 {
                warn!("BAR_TIME_SET with non-positive bpm {bpm} at word {word_index}, skipping");
                return Ok(());
            }
            match variant.bar_time {
                BarTimePolicy::DeriveNoteTime => chart.events.push(ChartEvent::SetNoteTime {
                    time: state.seconds(),
                    value: 60.0 / bpm as f64 * 4.0,
                }),
                BarTimePolicy::Structured => {
                    let offset = if variant.beats_per_bar_offset { 1 } else { 0 };
                    chart.events.push(ChartEvent::BarTime {
                        time: state.seconds(),
                        bpm,
                        beats_per_bar: beats_per_bar + offset,
                    });
                }
            }
        }

        "LYRIC" => {
            let lyric_index = arg(0)?;
            let color_raw = arg(1)?;
            let now = state.seconds();

            // Every LYRIC closes the span currently on display, including
            // a negative-index "clear" that opens nothing.
            if let Some(last) = chart.lyrics.last_mut() {
                last.end = now - LYRIC_CLOSE_GAP;
            }

            if lyric_index >= 0 {
                // The stream's first span opens already "closed" at its
                // own start minus the gap; the next LYRIC rewrites it.
                // Kept exactly as the format's consumers expect it.
                let end = if state.first_lyric {
                    now - LYRIC_CLOSE_GAP
                } else {
                    0.0
                };
                chart.lyrics.push(LyricSpan {
                    start: now,
                    end,
                    color: color_raw as u32,
                    index: lyric_index,
                    text: None,
                });
                state.first_lyric = false;
            }
        }

        other => debug!("opcode {other} not used by the converter, skipping"),
    }

    Ok(())
}

/// Bucket a raw shape word into shape and type.
///
/// The shape index is `raw % buckets`; in hold-band variants the band
/// `raw / buckets` selects Normal, Double, or HoldStart. Values outside
/// the expected range are a data-quality issue, not a decode failure:
/// warn and fall back to the documented defaults.
fn classify_note(raw: i32, variant: &FormatVariant) -> (NoteShape, NoteType) {
    let buckets = variant.shape_buckets;
    let bands = if variant.hold_bands { 3 } else { 1 };

    if raw < 0 || raw >= buckets * bands {
        warn!("unrecognized note shape value {raw}, defaulting to Circle/Normal");
        return (NoteShape::Circle, NoteType::Normal);
    }

    let shape = match raw % buckets {
        0 => NoteShape::Triangle,
        1 => NoteShape::Circle,
        2 => NoteShape::Cross,
        3 => NoteShape::Square,
        _ => NoteShape::Star,
    };
    let note_type = match raw / buckets {
        0 => NoteType::Normal,
        1 => NoteType::Double,
        _ => NoteType::HoldStart,
    };
    (shape, note_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_four_bucket_hold_bands() {
        let v = FormatVariant::future();
        assert_eq!(classify_note(0, &v), (NoteShape::Triangle, NoteType::Normal));
        assert_eq!(classify_note(3, &v), (NoteShape::Square, NoteType::Normal));
        assert_eq!(classify_note(5, &v), (NoteShape::Circle, NoteType::Double));
        assert_eq!(classify_note(10, &v), (NoteShape::Cross, NoteType::HoldStart));
        // Out of range falls back, never aborts
        assert_eq!(classify_note(12, &v), (NoteShape::Circle, NoteType::Normal));
        assert_eq!(classify_note(-1, &v), (NoteShape::Circle, NoteType::Normal));
    }

    #[test]
    fn classify_five_bucket_no_bands() {
        let v = FormatVariant::classic();
        assert_eq!(classify_note(4, &v), (NoteShape::Star, NoteType::Normal));
        // Without hold bands only one band of values is valid
        assert_eq!(classify_note(5, &v), (NoteShape::Circle, NoteType::Normal));
    }

    #[test]
    fn time_units_convert_to_seconds() {
        let mut state = ChartState::new();
        state.time_units = 5_000_000;
        assert_eq!(state.seconds(), 50.0);
    }
}
