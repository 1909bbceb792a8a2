//! XML emitter — accumulates elements and produces the final document.
//!
//! The formatting is part of the external contract consumed by the game's
//! chart loader: one-tab indentation, self-closing childless elements, no
//! XML declaration, 3-decimal fixed point for times / coordinates / angle
//! / distance, plain integers for frequency / amplitude / bpm, and
//! lowercase hex (minimum 4 digits) for lyric colors.

use crate::chart::{Chart, ChartEvent, LyricSpan};

// ═══════════════════════════════════════════════════════════════════════
// XmlBuilder
// ═══════════════════════════════════════════════════════════════════════

pub(crate) struct XmlBuilder {
    tag: &'static str,
    attrs: Vec<(String, String)>,
    children: Vec<String>,
}

impl XmlBuilder {
    pub(crate) fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add a root-element attribute.
    pub(crate) fn attr(&mut self, name: &str, value: String) {
        self.attrs.push((name.to_string(), value));
    }

    /// Add a self-closing child element.
    pub(crate) fn element(&mut self, tag: &str, attrs: &[(&str, String)]) {
        self.children
            .push(format!("<{}{} />", tag, render_attrs(attrs)));
    }

    /// Add a child element with text content.
    pub(crate) fn element_with_text(&mut self, tag: &str, attrs: &[(&str, String)], text: &str) {
        self.children.push(format!(
            "<{0}{1}>{2}</{0}>",
            tag,
            render_attrs(attrs),
            escape_text(text)
        ));
    }

    pub(crate) fn build(self) -> String {
        let attrs: Vec<(&str, String)> = self
            .attrs
            .iter()
            .map(|(n, v)| (n.as_str(), v.clone()))
            .collect();

        if self.children.is_empty() {
            return format!("<{}{} />\n", self.tag, render_attrs(&attrs));
        }

        let mut xml = format!("<{}{}>\n", self.tag, render_attrs(&attrs));
        for child in &self.children {
            xml.push('\t');
            xml.push_str(child);
            xml.push('\n');
        }
        xml.push_str(&format!("</{}>\n", self.tag));
        xml
    }
}

fn render_attrs(attrs: &[(&str, String)]) -> String {
    let mut out = String::new();
    for (name, value) in attrs {
        out.push_str(&format!(r#" {}="{}""#, name, value));
    }
    out
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ═══════════════════════════════════════════════════════════════════════
// Formatting helpers
// ═══════════════════════════════════════════════════════════════════════

/// 3-decimal fixed point used for all time/coordinate-domain values.
fn fixed3(value: f64) -> String {
    format!("{value:.3}")
}

/// Lyric color: lowercase hex, at least 4 digits.
fn color_hex(color: u32) -> String {
    format!("{color:04x}")
}

// ═══════════════════════════════════════════════════════════════════════
// Document rendering
// ═══════════════════════════════════════════════════════════════════════

/// Render the chart document: a `<Chart>` root with optional `Duration` /
/// `MusicStart` attributes and one child per event in emission order.
pub fn chart_to_xml(chart: &Chart) -> String {
    let mut doc = XmlBuilder::new("Chart");

    if let Some(duration) = chart.duration {
        doc.attr("Duration", fixed3(duration));
    }
    if let Some(music_start) = chart.music_start {
        doc.attr("MusicStart", fixed3(music_start));
    }

    for event in &chart.events {
        match event {
            ChartEvent::Note(note) => doc.element(
                "Note",
                &[
                    ("Time", fixed3(note.time)),
                    ("Shape", note.shape.as_str().to_string()),
                    ("Type", note.note_type.as_str().to_string()),
                    ("X", fixed3(note.x)),
                    ("Y", fixed3(note.y)),
                    ("Angle", fixed3(note.angle)),
                    ("Frequency", note.frequency.to_string()),
                    ("Amplitude", note.amplitude.to_string()),
                    ("Distance", fixed3(note.distance)),
                ],
            ),
            ChartEvent::SetNoteTime { time, value } => doc.element(
                "SetNoteTime",
                &[("Time", fixed3(*time)), ("Value", fixed3(*value))],
            ),
            ChartEvent::BarTime {
                time,
                bpm,
                beats_per_bar,
            } => doc.element(
                "BarTime",
                &[
                    ("Time", fixed3(*time)),
                    ("Bpm", bpm.to_string()),
                    ("BeatsPerBar", beats_per_bar.to_string()),
                ],
            ),
            ChartEvent::ChanceTimeStart { time } => {
                doc.element("ChanceTimeStart", &[("Time", fixed3(*time))])
            }
            ChartEvent::ChanceTimeEnd { time } => {
                doc.element("ChanceTimeEnd", &[("Time", fixed3(*time))])
            }
            ChartEvent::MusicStart { time } => {
                doc.element("MusicStart", &[("Time", fixed3(*time))])
            }
            ChartEvent::SongEnd { time } => doc.element("SongEnd", &[("Time", fixed3(*time))]),
        }
    }

    doc.build()
}

/// Render the lyric document: a `<Lyrics>` root with one `<Lyric>` child
/// per span. Spans with resolved text carry it as element text; the
/// stream itself has none, so unresolved spans render self-closing.
pub fn lyrics_to_xml(spans: &[LyricSpan]) -> String {
    let mut doc = XmlBuilder::new("Lyrics");

    for span in spans {
        let attrs = [
            ("Start", fixed3(span.start)),
            ("End", fixed3(span.end)),
            ("Color", color_hex(span.color)),
        ];
        match &span.text {
            Some(text) => doc.element_with_text("Lyric", &attrs, text),
            None => doc.element("Lyric", &attrs),
        }
    }

    doc.build()
}
