//! Wire-level lyric data
//!
//! Owned segment types matching the transcription backend's
//! `lyrics_with_timestamps` payload. Segments arrive already sorted by
//! `start_s`; nothing here depends on playback.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::resolve::TimeSpan;

/// A single transcribed word with its time span in seconds
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WordSegment {
    /// The word text
    pub text: String,
    /// Start time in seconds
    pub start_s: f64,
    /// Stop time in seconds
    pub stop_s: f64,
}

impl WordSegment {
    pub fn new(text: impl Into<String>, start_s: f64, stop_s: f64) -> Self {
        Self {
            text: text.into(),
            start_s,
            stop_s,
        }
    }

    /// Check if the word is empty (whitespace only)
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn duration_s(&self) -> f64 {
        (self.stop_s - self.start_s).max(0.0)
    }
}

impl TimeSpan for WordSegment {
    fn start_s(&self) -> f64 {
        self.start_s
    }

    fn stop_s(&self) -> f64 {
        self.stop_s
    }
}

/// Parse the job layer's `lyrics_with_timestamps` JSON payload
pub fn parse_timestamps(payload: &str) -> anyhow::Result<Vec<WordSegment>> {
    serde_json::from_str(payload).context("invalid lyrics_with_timestamps payload")
}

/// Clamp out-of-range timestamps in place: non-finite or negative times
/// become 0, and a stop before its start is pulled up to the start.
///
/// The resolver tolerates un-sanitized data either way; this pass just
/// keeps obviously broken transcription output from producing negative
/// durations downstream.
pub fn sanitize_segments(segments: &mut [WordSegment]) {
    for segment in segments.iter_mut() {
        if !segment.start_s.is_finite() || segment.start_s < 0.0 {
            tracing::warn!(text = %segment.text, start_s = segment.start_s, "clamping bad start time");
            segment.start_s = 0.0;
        }
        if !segment.stop_s.is_finite() || segment.stop_s < 0.0 {
            tracing::warn!(text = %segment.text, stop_s = segment.stop_s, "clamping bad stop time");
            segment.stop_s = 0.0;
        }
        if segment.stop_s < segment.start_s {
            segment.stop_s = segment.start_s;
        }
    }
}
