/*!
 * Karaoke subtitle track synthesis.
 *
 * Each wrapped line becomes one dialogue event spanning its first word's
 * start to its last word's end. Karaoke styles prefix every word with a
 * `{\kNN}` tag carrying its duration in centiseconds; other styles emit the
 * plain words.
 */

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::line_wrapper::Line;
use crate::styles::{self, SubtitleStyle};
use crate::timecode::{duration_centis_for, format_timecode};

/// Alignment override placed at the start of every event (middle centre)
const ALIGNMENT_DIRECTIVE: &str = r"{\an5}";

/// A single `Dialogue:` event
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueEvent {
    /// Formatted start time code
    pub start: String,
    /// Formatted end time code
    pub end: String,
    pub style: SubtitleStyle,
    /// Text payload including override tags
    pub text: String,
    /// Words carried by the event
    pub word_count: usize,
}

impl fmt::Display for DialogueEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Dialogue: 0,{},{},{},,0,0,0,,{}{}",
            self.start, self.end, self.style, ALIGNMENT_DIRECTIVE, self.text
        )
    }
}

/// Complete ASS document: header plus events in line order
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleDocument {
    pub style: SubtitleStyle,
    pub events: Vec<DialogueEvent>,
}

impl SubtitleDocument {
    /// Whether the document carries no dialogue
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Words captioned across all events
    pub fn word_count(&self) -> usize {
        self.events.iter().map(|event| event.word_count).sum()
    }

    /// Document preamble for this document's style
    pub fn header(&self) -> String {
        styles::header_for(self.style)
    }

    /// Write the document to an ASS file atomically
    pub fn write_to_ass<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        FileManager::atomic_write(path, &self.to_string())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.header())?;
        for event in &self.events {
            write!(f, "{}", event)?;
        }
        Ok(())
    }
}

/// Build a subtitle document from wrapped lines.
///
/// Fails only when a line bound cannot be formatted as a time code.
pub fn build(lines: &[Line], style_id: &str) -> Result<SubtitleDocument, SubtitleError> {
    let style = SubtitleStyle::resolve(style_id);
    let karaoke = style.is_karaoke();

    let mut events = Vec::with_capacity(lines.len());

    for line in lines {
        let (Some(first), Some(last)) = (line.first(), line.last()) else {
            continue;
        };

        // An event never ends before it starts
        let end_secs = if last.end < first.start {
            warn!(
                "Line ending with '{}' ends at {:.3}s before its start {:.3}s, clamping",
                last.text, last.end, first.start
            );
            first.start
        } else {
            last.end
        };

        let start = format_timecode(first.start)?;
        let end = format_timecode(end_secs)?;

        let mut text = String::new();
        for (i, word) in line.iter().enumerate() {
            if karaoke {
                let centis = duration_centis_for(&word.text, word.start, word.end);
                text.push_str(&format!("{{\\k{}}}", centis));
            }
            text.push_str(&word.text);
            if i + 1 < line.len() {
                text.push(' ');
            }
        }

        events.push(DialogueEvent {
            start,
            end,
            style,
            text,
            word_count: line.len(),
        });
    }

    debug!("Built {} dialogue events in style {}", events.len(), style);

    Ok(SubtitleDocument { style, events })
}
