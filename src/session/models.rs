/*!
 * Session request and report models.
 *
 * These are the values exchanged with the calling pipeline: what it asks
 * for, and the JSON reports written back for each phase.
 */

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::encoder::EncodeJob;
use crate::transcript::Transcript;

/// Number of characters of the full text included in an analysis report
const EXCERPT_CHARS: usize = 500;

/// Parameters of one clip render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Session to render from
    pub session_id: String,
    /// Clip start in source seconds
    pub window_start: f64,
    /// Clip end in source seconds
    pub window_end: f64,
    /// Style identifier, or `none` to skip subtitles
    pub style_id: String,
    /// File name of the rendered clip inside the session directory
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
}

impl RenderRequest {
    pub fn new(session_id: impl Into<String>, window_start: f64, window_end: f64, style_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            window_start,
            window_end,
            style_id: style_id.into(),
            output_filename: default_output_filename(),
        }
    }

    pub fn with_output_filename(mut self, output_filename: impl Into<String>) -> Self {
        self.output_filename = output_filename.into();
        self
    }
}

fn default_output_filename() -> String {
    "clip.mp4".to_string()
}

/// Segment summary for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub id: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Result of the analysis phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub status: String,
    pub session_id: String,
    pub word_count: usize,
    pub transcription_excerpt: String,
    pub transcription_segments: Vec<SegmentSummary>,
    pub srt_content: String,
}

impl AnalysisReport {
    pub fn new(session_id: &str, transcript: &Transcript, srt_content: String) -> Self {
        let full_text = transcript.full_text();
        let mut excerpt: String = full_text.chars().take(EXCERPT_CHARS).collect();
        excerpt.push_str("...");

        let transcription_segments = transcript
            .segments
            .iter()
            .enumerate()
            .map(|(id, segment)| SegmentSummary {
                id,
                start: segment.start,
                end: segment.end,
                text: segment.text(),
            })
            .collect();

        Self {
            status: "success".to_string(),
            session_id: session_id.to_string(),
            word_count: transcript.word_count(),
            transcription_excerpt: excerpt,
            transcription_segments,
            srt_content,
        }
    }
}

/// Result of a clip render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderReport {
    pub status: String,
    /// Rendered media, absent when encoding was skipped
    pub file_path: Option<PathBuf>,
    /// Subtitle track written for the clip, absent when none was needed
    pub subtitle_path: Option<PathBuf>,
    /// Words captioned in the clip
    pub word_count: usize,
    /// The job handed to the encoder
    pub job: EncodeJob,
}

/// Machine-readable failure report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub status: String,
    pub code: String,
    pub message: String,
}

impl ErrorReport {
    pub fn new(code: &str, message: String) -> Self {
        Self {
            status: "error".to_string(),
            code: code.to_string(),
            message,
        }
    }
}
