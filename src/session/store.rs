/*!
 * File-backed session store.
 *
 * This module handles:
 * - Persisting a full transcript once, after analysis
 * - Loading it back for any number of later clip renders
 * - Locating the session's source media
 * - Listing known sessions
 *
 * Each session is a directory under the store root named by its id, holding
 * `transcript.json` and the source media.
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::errors::SessionError;
use crate::file_utils::FileManager;
use crate::transcript::Transcript;

/// File name of the persisted transcript record
pub const TRANSCRIPT_FILE: &str = "transcript.json";

// @const: Filesystem-safe session id
static SESSION_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+$").expect("session id pattern is valid")
});

/// Generate a fresh session id
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Check that a session id can be used as a single directory name
pub fn validate_session_id(session_id: &str) -> Result<(), SessionError> {
    if session_id == "." || session_id == ".." || !SESSION_ID_REGEX.is_match(session_id) {
        return Err(SessionError::InvalidSessionId(session_id.to_string()));
    }
    Ok(())
}

fn short_id(session_id: &str) -> &str {
    session_id.get(..8).unwrap_or(session_id)
}

/// Store of analyzed sessions rooted at one directory
#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at `root`; the directory is created lazily
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a session
    pub fn session_dir(&self, session_id: &str) -> Result<PathBuf, SessionError> {
        validate_session_id(session_id)?;
        Ok(self.root.join(session_id))
    }

    /// Location of a session's transcript record
    pub fn transcript_path(&self, session_id: &str) -> Result<PathBuf, SessionError> {
        Ok(self.session_dir(session_id)?.join(TRANSCRIPT_FILE))
    }

    /// Whether a transcript record exists for the session
    pub fn exists(&self, session_id: &str) -> bool {
        self.transcript_path(session_id)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    /// Persist a transcript under `session_id`.
    ///
    /// Re-persisting replaces the previous record. The record is written to a
    /// temporary file and renamed into place, so a failure never leaves a
    /// partial record.
    pub fn persist(&self, session_id: &str, transcript: &Transcript) -> Result<(), SessionError> {
        let path = self.transcript_path(session_id)?;

        let json = serde_json::to_string(transcript).map_err(|e| SessionError::PersistFailure {
            session_id: session_id.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        FileManager::atomic_write(&path, &json).map_err(|source| SessionError::PersistFailure {
            session_id: session_id.to_string(),
            source,
        })?;

        info!(
            "Saved session {} ({} segments, {} words)",
            short_id(session_id),
            transcript.segments.len(),
            transcript.word_count()
        );

        Ok(())
    }

    /// Load the transcript persisted under `session_id`
    pub fn load(&self, session_id: &str) -> Result<Transcript, SessionError> {
        let path = self.transcript_path(session_id)?;

        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SessionError::SessionNotFound(session_id.to_string()));
            }
            Err(e) => {
                return Err(SessionError::CorruptRecord {
                    path,
                    message: e.to_string(),
                });
            }
        };

        let transcript: Transcript =
            serde_json::from_str(&json).map_err(|e| SessionError::CorruptRecord {
                path: path.clone(),
                message: e.to_string(),
            })?;

        debug!(
            "Loaded session {} ({} words)",
            short_id(session_id),
            transcript.word_count()
        );

        Ok(transcript)
    }

    /// Source media of a session
    pub fn find_video(&self, session_id: &str) -> Result<PathBuf, SessionError> {
        let dir = self.session_dir(session_id)?;

        match FileManager::find_session_video(&dir) {
            Ok(Some(path)) => Ok(path),
            Ok(None) => Err(SessionError::MediaNotFound(session_id.to_string())),
            Err(e) => {
                warn!("Failed to scan session {}: {:#}", short_id(session_id), e);
                Err(SessionError::MediaNotFound(session_id.to_string()))
            }
        }
    }

    /// Delete a session directory and everything in it
    pub fn remove(&self, session_id: &str) -> Result<(), SessionError> {
        let dir = self.session_dir(session_id)?;

        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                info!("Removed session {}", short_id(session_id));
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::PersistFailure {
                session_id: session_id.to_string(),
                source,
            }),
        }
    }

    /// Ids of all sessions that have a transcript record, sorted
    pub fn list(&self) -> io::Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<String> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().join(TRANSCRIPT_FILE).is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|id| validate_session_id(id).is_ok())
            .collect();

        ids.sort();
        Ok(ids)
    }
}
