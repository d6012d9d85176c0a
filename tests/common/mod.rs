/*!
 * Common test utilities for the clipsub test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;

use clipsub::app_config::Config;
use clipsub::transcript::{Segment, Transcript, Word};
use clipsub::Controller;


use mock_encoder::MockEncoder;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// The three-word transcript used across the render scenarios
pub fn hello_world_transcript() -> Transcript {
    Transcript::new(vec![Segment::from_words(vec![
        Word::new("Hello", 0.0, 0.5),
        Word::new("world", 0.5, 1.2),
        Word::new("foo", 1.2, 1.9),
    ])])
}

/// A transcript with two segments and a gap between them
pub fn two_segment_transcript() -> Transcript {
    Transcript::new(vec![
        Segment::from_words(vec![
            Word::new("Hello", 0.0, 0.5),
            Word::new("world", 0.5, 1.2),
            Word::new("foo", 1.2, 1.9),
        ]),
        Segment::from_words(vec![
            Word::new("second", 3.0, 3.4),
            Word::new("segment", 3.4, 4.0),
            Word::new("here", 4.0, 4.3),
        ]),
    ])
}

/// Transcription engine output for `two_segment_transcript`
pub fn engine_json() -> &'static str {
    r#"{
  "text": " Hello world foo second segment here",
  "segments": [
    {"id": 0, "start": 0.0, "end": 1.9, "text": " Hello world foo",
     "words": [
       {"word": " Hello", "start": 0.0, "end": 0.5, "probability": 0.98},
       {"word": " world", "start": 0.5, "end": 1.2, "probability": 0.95},
       {"word": " foo", "start": 1.2, "end": 1.9, "probability": 0.91}
     ]},
    {"id": 1, "start": 3.0, "end": 4.3, "text": " second segment here",
     "words": [
       {"word": " second", "start": 3.0, "end": 3.4},
       {"word": " segment", "start": 3.4, "end": 4.0},
       {"word": " here", "start": 4.0, "end": 4.3}
     ]}
  ]
}"#
}

/// Configuration with its sessions directory inside `dir`
pub fn test_config(dir: &Path) -> Config {
    Config {
        sessions_dir: dir.join("sessions"),
        ..Config::default()
    }
}

/// Controller over a temporary sessions directory with a recording encoder
pub fn create_test_controller(dir: &Path) -> Result<(Controller, Arc<MockEncoder>)> {
    let encoder = Arc::new(MockEncoder::new());
    let controller = Controller::with_encoder(test_config(dir), encoder.clone())?;
    Ok((controller, encoder))
}
