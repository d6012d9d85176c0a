/*!
 * Error types for the clipsub application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while synthesizing subtitle tracks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubtitleError {
    /// A timestamp was negative or not a finite number
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(f64),

    /// A word ends before it starts; recovered by clamping its duration to zero
    #[error("Word '{text}' ends before it starts ({start:.3}s > {end:.3}s)")]
    NonMonotonicWord {
        /// Text of the offending word
        text: String,
        /// Word start in seconds
        start: f64,
        /// Word end in seconds
        end: f64,
    },
}

/// Errors that can occur when reading or writing session state
#[derive(Error, Debug)]
pub enum SessionError {
    /// No transcript record exists for the session
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The session id cannot be used as a directory name
    #[error("Invalid session id: '{0}'")]
    InvalidSessionId(String),

    /// Writing the transcript record failed; no partial record is left behind
    #[error("Failed to persist session {session_id}: {source}")]
    PersistFailure {
        /// Session being written
        session_id: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The transcript record exists but cannot be read back
    #[error("Corrupt transcript record at {path:?}: {message}")]
    CorruptRecord {
        /// Location of the record
        path: PathBuf,
        /// Parser or I/O message
        message: String,
    },

    /// The session has no source media file
    #[error("Video file not found in session {0}")]
    MediaNotFound(String),
}

impl SessionError {
    /// Whether the error should be reported as a missing session rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound(_))
    }
}

/// Errors that can occur while handing a clip to the encoder
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The encoder process could not be started
    #[error("Failed to start encoder: {0}")]
    Spawn(String),

    /// The encoder exited with a failure status
    #[error("Encoder failed: {0}")]
    Failed(String),

    /// The encoder did not finish in time
    #[error("Encoder timed out after {0} seconds")]
    Timeout(u64),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transcription engine output that cannot be parsed
    #[error("Invalid transcript: {0}")]
    Transcript(String),

    /// Error from subtitle synthesis
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the session store
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Error from the encoder
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Stable status code for machine-readable reports
    pub fn code(&self) -> &'static str {
        match self {
            Self::File(_) => "FILE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Transcript(_) => "INVALID_TRANSCRIPT",
            Self::Subtitle(SubtitleError::InvalidTimestamp(_)) => "INVALID_TIMESTAMP",
            Self::Subtitle(SubtitleError::NonMonotonicWord { .. }) => "NON_MONOTONIC_WORD",
            Self::Session(SessionError::SessionNotFound(_)) => "SESSION_NOT_FOUND",
            Self::Session(SessionError::InvalidSessionId(_)) => "INVALID_SESSION_ID",
            Self::Session(SessionError::PersistFailure { .. }) => "PERSIST_FAILURE",
            Self::Session(SessionError::CorruptRecord { .. }) => "CORRUPT_RECORD",
            Self::Session(SessionError::MediaNotFound(_)) => "MEDIA_NOT_FOUND",
            Self::Encode(_) => "ENCODE_FAILURE",
            Self::Unknown(_) => "UNKNOWN",
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        // Keep typed causes visible when they were wrapped with context
        match error.downcast::<SessionError>() {
            Ok(session) => Self::Session(session),
            Err(error) => match error.downcast::<SubtitleError>() {
                Ok(subtitle) => Self::Subtitle(subtitle),
                Err(error) => Self::Unknown(format!("{:#}", error)),
            },
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
