/*!
 * Tests for the file-backed session store
 */

use std::fs;

use anyhow::Result;
use clipsub::errors::SessionError;
use clipsub::session::{SessionStore, generate_session_id, validate_session_id};
use clipsub::session::store::TRANSCRIPT_FILE;

use crate::common;

#[test]
fn test_persistThenLoad_shouldReproduceTranscript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = SessionStore::new(temp_dir.path());
    let transcript = common::two_segment_transcript();

    store.persist("session-1", &transcript)?;
    let loaded = store.load("session-1")?;

    assert_eq!(loaded, transcript);
    assert!(temp_dir.path().join("session-1").join(TRANSCRIPT_FILE).is_file());
    Ok(())
}

#[test]
fn test_persist_twice_shouldOverwriteCleanly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = SessionStore::new(temp_dir.path());

    store.persist("s", &common::two_segment_transcript())?;
    store.persist("s", &common::hello_world_transcript())?;

    assert_eq!(store.load("s")?, common::hello_world_transcript());

    // Only the record itself, no temporary files left behind
    let entries: Vec<_> = fs::read_dir(temp_dir.path().join("s"))?.collect();
    assert_eq!(entries.len(), 1);
    Ok(())
}

#[test]
fn test_load_withUnknownSession_shouldReturnNotFound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = SessionStore::new(temp_dir.path());

    let result = store.load("missing");

    assert!(matches!(result, Err(SessionError::SessionNotFound(ref id)) if id == "missing"));
    Ok(())
}

#[test]
fn test_load_withGarbledRecord_shouldReturnCorrupt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let session_dir = temp_dir.path().join("bad");
    fs::create_dir_all(&session_dir)?;
    common::create_test_file(&session_dir, TRANSCRIPT_FILE, "{not json")?;

    let store = SessionStore::new(temp_dir.path());

    assert!(matches!(store.load("bad"), Err(SessionError::CorruptRecord { .. })));
    Ok(())
}

#[test]
fn test_load_shouldOnlyNeedFlatWordFields() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let session_dir = temp_dir.path().join("flat");
    fs::create_dir_all(&session_dir)?;
    common::create_test_file(
        &session_dir,
        TRANSCRIPT_FILE,
        r#"{"segments":[{"start":0.0,"end":1.0,"words":[{"word":"hi","start":0.0,"end":1.0}]}]}"#,
    )?;

    let transcript = SessionStore::new(temp_dir.path()).load("flat")?;

    assert_eq!(transcript.word_count(), 1);
    assert_eq!(transcript.segments[0].words[0].text, "hi");
    Ok(())
}

#[test]
fn test_sessionIds_shouldRejectPathTraversal() {
    for bad in ["", ".", "..", "../etc", "a/b", "a b", "a\\b"] {
        assert!(validate_session_id(bad).is_err(), "accepted {:?}", bad);
    }
    for good in ["abc", "a.b-c_d", "0f8c"] {
        assert!(validate_session_id(good).is_ok(), "rejected {:?}", good);
    }
    assert!(validate_session_id(&generate_session_id()).is_ok());
}

#[test]
fn test_persist_withInvalidId_shouldNotWrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = SessionStore::new(temp_dir.path().join("root"));

    let result = store.persist("../escape", &common::hello_world_transcript());

    assert!(matches!(result, Err(SessionError::InvalidSessionId(_))));
    assert!(!temp_dir.path().join("escape").exists());
    Ok(())
}

#[test]
fn test_list_shouldReturnSortedSessionsWithRecords() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = SessionStore::new(temp_dir.path());

    store.persist("b", &common::hello_world_transcript())?;
    store.persist("a", &common::hello_world_transcript())?;
    fs::create_dir_all(temp_dir.path().join("empty"))?;

    assert_eq!(store.list()?, vec!["a".to_string(), "b".to_string()]);
    assert!(SessionStore::new(temp_dir.path().join("nothing")).list()?.is_empty());
    Ok(())
}

#[test]
fn test_findVideo_shouldLocateSessionMedia() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = SessionStore::new(temp_dir.path());
    store.persist("s", &common::hello_world_transcript())?;

    assert!(matches!(store.find_video("s"), Err(SessionError::MediaNotFound(_))));

    let video = common::create_test_file(&temp_dir.path().join("s"), "video.mkv", "")?;
    assert_eq!(store.find_video("s")?, video);
    Ok(())
}
