/*!
 * Clip window selection over a transcript.
 *
 * Only words lying entirely inside the window are kept; a word straddling
 * either bound is dropped, never trimmed. Kept words are rebased so the
 * clip's own timeline starts at zero.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::transcript::{Transcript, Word};

/// A `[start, end)` range of the source timeline, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipWindow {
    pub start: f64,
    pub end: f64,
}

impl ClipWindow {
    /// Create a window, rejecting negative, non-finite or empty ranges.
    ///
    /// `end` may be `f64::INFINITY` to select everything from `start` on.
    pub fn new(start: f64, end: f64) -> Result<Self, SubtitleError> {
        if !start.is_finite() || start < 0.0 {
            return Err(SubtitleError::InvalidTimestamp(start));
        }
        if end.is_nan() || end <= start {
            return Err(SubtitleError::InvalidTimestamp(end));
        }
        Ok(Self { start, end })
    }

    /// Window covering the whole transcript
    pub fn full() -> Self {
        Self {
            start: 0.0,
            end: f64::INFINITY,
        }
    }

    /// Length of the window in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether the word lies entirely inside the window
    pub fn contains(&self, word: &Word) -> bool {
        word.start >= self.start && word.end <= self.end
    }
}

/// Select the words of `transcript` inside `window`, rebased to the window start.
///
/// Segments ending before the window are skipped, and scanning stops at the
/// first segment starting after the window: segment starts are assumed to be
/// non-decreasing. Within a segment no ordering is assumed. An empty result
/// is a valid outcome.
pub fn extract(transcript: &Transcript, window: ClipWindow) -> Vec<Word> {
    let mut words = Vec::new();

    for segment in &transcript.segments {
        if segment.end < window.start {
            continue;
        }
        if segment.start > window.end {
            break;
        }

        words.extend(
            segment
                .words
                .iter()
                .filter(|word| window.contains(word))
                .map(|word| word.rebased(window.start)),
        );
    }

    debug!(
        "Selected {} words in window [{:.2}, {:.2})",
        words.len(),
        window.start,
        window.end
    );

    words
}
