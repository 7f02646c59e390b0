//! Published synchronization state
//!
//! The snapshot the presentation layer consumes: which word and which
//! line are active right now, plus the line cursor used to classify
//! lines that have already been sung even while no line is active.

/// Per-line display classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Past,
    Active,
    Future,
}

/// Per-word display classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Active,
    Plain,
}

/// Active indices for the current playback position
///
/// `None` is the "nothing active" sentinel. Reset to all-`None` whenever
/// the segment source changes; recomputed on every tick and on every
/// seek/pause/resume; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveState {
    /// Index into the flat word sequence
    pub active_word: Option<usize>,
    /// Index into the display line sequence
    pub active_line: Option<usize>,
    /// Rightmost line whose start time has been reached, regardless of
    /// whether it is still playing
    pub line_cursor: Option<usize>,
}

impl ActiveState {
    /// Classify a line for rendering
    ///
    /// While some line is active, everything before it is past. In a gap
    /// between lines the cursor takes over, so finished lines do not
    /// revert to future.
    pub fn line_class(&self, index: usize) -> LineClass {
        match self.active_line {
            Some(active) if index == active => LineClass::Active,
            Some(active) if index < active => LineClass::Past,
            Some(_) => LineClass::Future,
            None => match self.line_cursor {
                Some(cursor) if index <= cursor => LineClass::Past,
                _ => LineClass::Future,
            },
        }
    }

    /// Classify a word for rendering
    pub fn word_class(&self, index: usize) -> WordClass {
        if self.active_word == Some(index) {
            WordClass::Active
        } else {
            WordClass::Plain
        }
    }
}
