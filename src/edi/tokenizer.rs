//! Record tokenizer: raw text → ordered segments.
//!
//! Two layouts show up in practice. Most feeds put one `~`-terminated
//! segment per physical line. Some deliver the whole record as a single line
//! where a multi-byte marker (`…` by default) stands in for the terminator.

use std::str::FromStr;

use tracing::debug;

use crate::edi::segment::Segment;

/// Terminator closing a segment in the line layout.
pub const SEGMENT_TERMINATOR: char = '~';

/// Marker the single-line feeds use in place of the terminator.
pub const DEFAULT_CONTINUATION_MARKER: &str = "\u{2026}";

/// How segments are laid out in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordLayout {
    /// Continuation layout for a single line carrying the marker, line layout
    /// otherwise.
    #[default]
    Auto,
    /// One segment per physical line (several `~`-terminated segments on one
    /// line are also split apart).
    Lines,
    /// Segments separated by the continuation marker.
    Continuation,
}

impl RecordLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Lines => "lines",
            Self::Continuation => "continuation",
        }
    }
}

impl FromStr for RecordLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "lines" | "line" => Ok(Self::Lines),
            "continuation" | "marker" => Ok(Self::Continuation),
            other => Err(format!(
                "unknown layout '{other}' (expected auto, lines or continuation)"
            )),
        }
    }
}

/// Splits record text into segments according to a layout.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    layout: RecordLayout,
    marker: String,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(RecordLayout::Auto)
    }
}

impl Tokenizer {
    pub fn new(layout: RecordLayout) -> Self {
        Self {
            layout,
            marker: DEFAULT_CONTINUATION_MARKER.to_string(),
        }
    }

    /// Use a different continuation marker. An empty marker is ignored.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        if !marker.is_empty() {
            self.marker = marker;
        }
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Concrete layout used for `text` (never `Auto`).
    ///
    /// `Auto` picks the continuation layout only for a body that is a single
    /// non-empty line carrying the marker; a marker inside a field of a
    /// multi-line record does not count.
    pub fn resolve(&self, text: &str) -> RecordLayout {
        match self.layout {
            RecordLayout::Auto if self.is_packed(text) => RecordLayout::Continuation,
            RecordLayout::Auto => RecordLayout::Lines,
            layout => layout,
        }
    }

    fn is_packed(&self, text: &str) -> bool {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        match (lines.next(), lines.next()) {
            (Some(line), None) => line.contains(self.marker.as_str()),
            _ => false,
        }
    }

    /// Tokenize one record. Blank segments are dropped; nothing else fails.
    pub fn tokenize(&self, text: &str) -> Vec<Segment> {
        let layout = self.resolve(text);
        let mut segments = Vec::new();

        for line in text.lines() {
            match layout {
                RecordLayout::Continuation => {
                    for chunk in line.split(self.marker.as_str()) {
                        push_chunk(&mut segments, chunk);
                    }
                }
                _ => {
                    for chunk in line.split(SEGMENT_TERMINATOR) {
                        push_chunk(&mut segments, chunk);
                    }
                }
            }
        }

        debug!(
            layout = layout.as_str(),
            segments = segments.len(),
            "Tokenized record"
        );
        segments
    }
}

/// Strip terminators from a chunk and keep it if anything is left.
fn push_chunk(segments: &mut Vec<Segment>, chunk: &str) {
    let chunk = chunk.trim_matches(['\r', '\n']);
    let chunk = chunk.strip_suffix(SEGMENT_TERMINATOR).unwrap_or(chunk);
    if chunk.trim().is_empty() {
        return;
    }
    segments.push(Segment::parse(chunk));
}
