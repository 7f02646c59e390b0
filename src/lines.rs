//! Display line grouping
//!
//! Splits the flat word sequence into readable lines: a new line starts
//! when the current one is full or when there is a noticeable silence
//! before the next word. Pure data transformation, runs once per track.

use serde::{Deserialize, Serialize};

use crate::resolve::TimeSpan;
use crate::segment::WordSegment;

/// Tuning for the greedy line partition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupingConfig {
    /// Words per line before a forced break
    pub max_words_per_line: usize,
    /// Silence between consecutive words that forces a break, in seconds
    pub gap_threshold_s: f64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            max_words_per_line: 8,
            gap_threshold_s: 0.9,
        }
    }
}

/// A word inside a display line
///
/// `word_index` is the word's position in the original flat sequence, so
/// the presentation layer can map a globally active word index back into
/// its containing line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineWord {
    pub segment: WordSegment,
    pub word_index: usize,
}

/// A run of consecutive words shown together in the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayLine {
    pub id: String,
    /// First word's start time in seconds
    pub start_s: f64,
    /// Last word's stop time in seconds
    pub stop_s: f64,
    pub words: Vec<LineWord>,
}

impl DisplayLine {
    /// Build a line from a non-empty word buffer
    fn from_words(ordinal: usize, words: Vec<LineWord>) -> Self {
        let start_s = words.first().map(|w| w.segment.start_s).unwrap_or(0.0);
        let stop_s = words.last().map(|w| w.segment.stop_s).unwrap_or(start_s);
        Self {
            id: format!("line-{ordinal}"),
            start_s,
            stop_s,
            words,
        }
    }

    /// Get the full line text by joining all words
    pub fn to_line(&self) -> String {
        self.words
            .iter()
            .map(|w| w.segment.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl TimeSpan for DisplayLine {
    fn start_s(&self) -> f64 {
        self.start_s
    }

    fn stop_s(&self) -> f64 {
        self.stop_s
    }
}

/// Partition word segments into display lines
///
/// Single left-to-right greedy pass with no lookahead: flush the current
/// buffer whenever it already holds `max_words_per_line` words, or when
/// the silence between the previous word's stop and the next word's
/// start reaches `gap_threshold_s`. Order-preserving: concatenating the
/// lines' words reproduces the input exactly.
pub fn group_into_lines(segments: &[WordSegment], config: &GroupingConfig) -> Vec<DisplayLine> {
    let mut lines = Vec::new();
    let mut buffer: Vec<LineWord> = Vec::new();

    for (word_index, segment) in segments.iter().enumerate() {
        if let Some(previous) = buffer.last() {
            let gap = segment.start_s - previous.segment.stop_s;
            if buffer.len() >= config.max_words_per_line || gap >= config.gap_threshold_s {
                lines.push(DisplayLine::from_words(
                    lines.len(),
                    std::mem::take(&mut buffer),
                ));
            }
        }
        buffer.push(LineWord {
            segment: segment.clone(),
            word_index,
        });
    }

    if !buffer.is_empty() {
        lines.push(DisplayLine::from_words(lines.len(), buffer));
    }

    lines
}
