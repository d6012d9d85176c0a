use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::timecode::{format_srt_millis, seconds_to_millis};
use crate::transcript::Transcript;

// @module: SRT export of a full transcript

// @struct: Single SRT cue
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Sequence number, 1-based
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Cue text
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        format_srt_millis(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        format_srt_millis(self.end_time_ms)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// SRT cues for a whole transcript, one per segment
#[derive(Debug, Clone, Default)]
pub struct SubtitleCollection {
    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Build one cue per transcript segment, numbered in transcript order
    pub fn from_transcript(transcript: &Transcript) -> Result<Self, SubtitleError> {
        let entries = transcript
            .segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                Ok(SubtitleEntry::new(
                    i + 1,
                    seconds_to_millis(segment.start)?,
                    seconds_to_millis(segment.end)?,
                    segment.text().trim().to_string(),
                ))
            })
            .collect::<Result<Vec<_>, SubtitleError>>()?;

        debug!("Built {} SRT cues from transcript", entries.len());

        Ok(Self { entries })
    }

    /// Render all cues as SRT text
    pub fn to_srt_string(&self) -> String {
        self.entries.iter().map(|entry| entry.to_string()).collect()
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        FileManager::atomic_write(path, &self.to_srt_string())
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))
    }
}
