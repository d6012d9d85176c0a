/*!
 * Transcript data model.
 *
 * A transcript is an ordered list of segments, each an ordered list of timed
 * words. The same plain values are used by the analysis and render paths;
 * the persisted record only carries `{word, start, end}` per word plus the
 * segment bounds and, when the engine supplied it, the segment text.
 */

use serde::{Deserialize, Serialize};

/// A single timed word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Word text, trimmed
    #[serde(rename = "word")]
    pub text: String,

    /// Start in seconds
    pub start: f64,

    /// End in seconds
    pub end: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Character count used for line budgeting
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Copy of this word shifted so that `origin` becomes zero
    pub fn rebased(&self, origin: f64) -> Self {
        Self {
            text: self.text.clone(),
            start: self.start - origin,
            end: self.end - origin,
        }
    }
}

/// Ordered words with their segment bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    /// Text as written by the transcription engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Segment {
    /// Build a segment whose bounds come from its first and last word
    pub fn from_words(words: Vec<Word>) -> Self {
        let start = words.first().map(|w| w.start).unwrap_or(0.0);
        let end = words.last().map(|w| w.end).unwrap_or(start);
        Self {
            start,
            end,
            text: None,
            words,
        }
    }

    /// Display text: the engine's own text when present, otherwise the
    /// words joined by single spaces
    pub fn text(&self) -> String {
        match self.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => self
                .words
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Full transcript of one source media file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Transcript {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Every word in transcript order
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.segments.iter().flat_map(|s| s.words.iter())
    }

    pub fn word_count(&self) -> usize {
        self.segments.iter().map(|s| s.words.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.word_count() == 0
    }

    /// Segment texts joined into the full spoken text
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(Segment::text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parse the JSON output of a transcription engine.
    ///
    /// Unknown fields are ignored. Word text is trimmed and words that are
    /// empty after trimming are dropped.
    pub fn from_engine_json(json: &str) -> serde_json::Result<Self> {
        let raw: RawTranscript = serde_json::from_str(json)?;
        Ok(raw.into())
    }
}

#[derive(Debug, Deserialize)]
struct RawTranscript {
    #[serde(default)]
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    start: Option<f64>,
    end: Option<f64>,
    text: Option<String>,
    #[serde(default)]
    words: Vec<RawWord>,
}

#[derive(Debug, Deserialize)]
struct RawWord {
    word: String,
    start: f64,
    end: f64,
}

impl From<RawTranscript> for Transcript {
    fn from(raw: RawTranscript) -> Self {
        let segments = raw
            .segments
            .into_iter()
            .map(|seg| {
                let words: Vec<Word> = seg
                    .words
                    .into_iter()
                    .filter_map(|w| {
                        let text = w.word.trim();
                        (!text.is_empty()).then(|| Word::new(text, w.start, w.end))
                    })
                    .collect();
                let derived = Segment::from_words(words);
                Segment {
                    start: seg.start.unwrap_or(derived.start),
                    end: seg.end.unwrap_or(derived.end),
                    text: seg
                        .text
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty()),
                    words: derived.words,
                }
            })
            .collect();

        Transcript { segments }
    }
}
