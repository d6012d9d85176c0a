/*!
 * Integration tests for clip rendering
 */

use std::fs;
use std::sync::Arc;

use anyhow::Result;
use clipsub::clip_range::ClipWindow;
use clipsub::errors::{AppError, EncodeError, SessionError};
use clipsub::session::RenderRequest;
use clipsub::styles::emit_header;
use clipsub::transcript::{Segment, Transcript, Word};
use clipsub::Controller;

use crate::common;
use crate::common::mock_encoder::MockEncoder;

const EXPECTED_EVENT: &str = "Dialogue: 0,0:00:00.00,0:00:01.90,Karaoke_Green,,0,0,0,,{\\an5}{\\k50}Hello {\\k70}world {\\k70}foo\n";

#[test]
fn test_clipSubtitles_withFullWindow_shouldEmitOneKaraokeEvent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (controller, _) = common::create_test_controller(temp_dir.path())?;
    let window = ClipWindow::new(0.0, 2.0)?;

    let document = controller
        .clip_subtitles(&common::hello_world_transcript(), window, "Karaoke_Green")?
        .expect("words inside the window");

    assert_eq!(document.events.len(), 1);
    assert_eq!(
        document.to_string(),
        format!("{}{}", emit_header("Karaoke_Green"), EXPECTED_EVENT)
    );
    Ok(())
}

#[test]
fn test_clipSubtitles_withShiftedWindow_shouldRebaseKeptWords() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (controller, _) = common::create_test_controller(temp_dir.path())?;
    let window = ClipWindow::new(0.6, 2.0)?;

    let document = controller
        .clip_subtitles(&common::hello_world_transcript(), window, "Karaoke_Green")?
        .expect("foo is inside the window");

    let event = &document.events[0];
    assert_eq!(event.start, "0:00:00.60");
    assert_eq!(event.end, "0:00:01.30");
    assert_eq!(event.text, "{\\k70}foo");
    Ok(())
}

#[test]
fn test_clipSubtitles_withNoneStyle_shouldProduceNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (controller, _) = common::create_test_controller(temp_dir.path())?;

    let document =
        controller.clip_subtitles(&common::hello_world_transcript(), ClipWindow::full(), "none")?;

    assert!(document.is_none());
    Ok(())
}

#[test]
fn test_clipSubtitles_withNarrowBudget_shouldSplitLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path());
    config.subtitles.max_chars_per_line = 11;
    let controller = Controller::with_encoder(config, Arc::new(MockEncoder::new()))?;

    let document = controller
        .clip_subtitles(&common::hello_world_transcript(), ClipWindow::full(), "Clean")?
        .expect("words inside the window");

    let texts: Vec<&str> = document.events.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["Hello world", "foo"]);
    assert_eq!(document.events[1].start, "0:00:01.20");
    Ok(())
}

#[test]
fn test_clipSubtitles_withReversedWordAtWindowStart_shouldClampEventEnd() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path());
    config.subtitles.max_chars_per_line = 2;
    let controller = Controller::with_encoder(config, Arc::new(MockEncoder::new()))?;
    let transcript = Transcript::new(vec![Segment::from_words(vec![
        Word::new("so", 4.5, 4.499),
        Word::new("yes", 4.6, 5.0),
    ])]);

    let document = controller
        .clip_subtitles(&transcript, ClipWindow::new(4.5, 10.0)?, "Karaoke_Green")?
        .expect("both words start inside the window");

    assert_eq!(document.events.len(), 2);
    assert_eq!(document.events[0].start, "0:00:00.00");
    assert_eq!(document.events[0].end, "0:00:00.00");
    assert_eq!(document.events[0].text, "{\\k0}so");
    assert_eq!(document.events[1].start, "0:00:00.10");
    Ok(())
}

#[tokio::test]
async fn test_render_shouldWriteSubtitlesAndEncode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (controller, encoder) = common::create_test_controller(temp_dir.path())?;
    let media = common::create_test_file(temp_dir.path(), "source.webm", "video")?;
    controller.analyze(&common::hello_world_transcript(), Some("s1"), Some(&media))?;

    let request = RenderRequest::new("s1", 0.0, 2.0, "Karaoke_Green");
    let report = controller.render(&request, false).await?;

    let session_dir = controller.store().session_dir("s1")?;
    let ass_path = session_dir.join("clip.ass");

    assert_eq!(report.status, "success");
    assert_eq!(report.word_count, 3);
    assert_eq!(report.file_path, Some(session_dir.join("clip.mp4")));
    assert_eq!(report.subtitle_path, Some(ass_path.clone()));
    assert!(fs::read_to_string(&ass_path)?.ends_with(EXPECTED_EVENT));

    let jobs = encoder.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].input, session_dir.join("video.webm"));
    assert_eq!(jobs[0].start, 0.0);
    assert_eq!(jobs[0].duration, 2.0);
    assert!(jobs[0].burns_subtitles());
    Ok(())
}

#[tokio::test]
async fn test_render_withNoneStyle_shouldStreamCopy() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (controller, encoder) = common::create_test_controller(temp_dir.path())?;
    let media = common::create_test_file(temp_dir.path(), "source.mp4", "video")?;
    controller.analyze(&common::hello_world_transcript(), Some("s2"), Some(&media))?;

    let request = RenderRequest::new("s2", 0.0, 2.0, "none").with_output_filename("plain.mp4");
    let report = controller.render(&request, false).await?;

    assert_eq!(report.subtitle_path, None);
    assert_eq!(report.word_count, 0);
    assert!(!encoder.jobs()[0].burns_subtitles());
    assert!(!controller.store().session_dir("s2")?.join("plain.ass").exists());
    Ok(())
}

#[tokio::test]
async fn test_render_withNoneStyleAfterKaraoke_shouldRemoveStaleTrack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (controller, encoder) = common::create_test_controller(temp_dir.path())?;
    let media = common::create_test_file(temp_dir.path(), "source.mp4", "video")?;
    controller.analyze(&common::hello_world_transcript(), Some("redo"), Some(&media))?;
    let ass_path = controller.store().session_dir("redo")?.join("clip.ass");

    let karaoke = RenderRequest::new("redo", 0.0, 2.0, "Karaoke_Green");
    controller.render(&karaoke, false).await?;
    assert!(ass_path.is_file());

    let plain = RenderRequest::new("redo", 0.0, 2.0, "none");
    let report = controller.render(&plain, false).await?;

    assert_eq!(report.subtitle_path, None);
    assert!(!ass_path.exists());
    assert!(!encoder.jobs()[1].burns_subtitles());
    Ok(())
}

#[tokio::test]
async fn test_render_withEmptyWindow_shouldStillEncode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (controller, encoder) = common::create_test_controller(temp_dir.path())?;
    let media = common::create_test_file(temp_dir.path(), "source.mp4", "video")?;
    controller.analyze(&common::two_segment_transcript(), Some("gap"), Some(&media))?;

    let request = RenderRequest::new("gap", 2.0, 2.9, "Karaoke_Yellow");
    let report = controller.render(&request, false).await?;

    assert_eq!(report.subtitle_path, None);
    assert_eq!(encoder.jobs().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_render_withSkipEncode_shouldNotNeedMedia() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (controller, encoder) = common::create_test_controller(temp_dir.path())?;
    controller.analyze(&common::hello_world_transcript(), Some("dry"), None)?;

    let request = RenderRequest::new("dry", 0.0, 2.0, "Clean");
    let report = controller.render(&request, true).await?;

    assert_eq!(report.file_path, None);
    assert!(report.subtitle_path.is_some());
    assert!(encoder.jobs().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_render_withoutMedia_shouldReportMediaNotFound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (controller, encoder) = common::create_test_controller(temp_dir.path())?;
    controller.analyze(&common::hello_world_transcript(), Some("nomedia"), None)?;

    let request = RenderRequest::new("nomedia", 0.0, 2.0, "Clean");
    let result = controller.render(&request, false).await;

    assert!(matches!(result, Err(AppError::Session(SessionError::MediaNotFound(_)))));
    assert!(encoder.jobs().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_render_withUnknownSession_shouldReportNotFound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (controller, _) = common::create_test_controller(temp_dir.path())?;

    let request = RenderRequest::new("ghost", 0.0, 2.0, "Clean");
    let error = controller.render(&request, true).await.unwrap_err();

    assert_eq!(error.code(), "SESSION_NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn test_render_withInvalidWindow_shouldFailBeforeLoading() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (controller, _) = common::create_test_controller(temp_dir.path())?;

    let request = RenderRequest::new("ghost", 5.0, 1.0, "Clean");
    let error = controller.render(&request, true).await.unwrap_err();

    assert_eq!(error.code(), "INVALID_TIMESTAMP");
    Ok(())
}

#[tokio::test]
async fn test_render_withFailingEncoder_shouldSurfaceEncodeError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let encoder = Arc::new(MockEncoder::failing("boom"));
    let controller = Controller::with_encoder(common::test_config(temp_dir.path()), encoder)?;
    let media = common::create_test_file(temp_dir.path(), "source.mp4", "video")?;
    controller.analyze(&common::hello_world_transcript(), Some("f"), Some(&media))?;

    let request = RenderRequest::new("f", 0.0, 2.0, "Clean");
    let result = controller.render(&request, false).await;

    assert!(matches!(result, Err(AppError::Encode(EncodeError::Failed(ref m))) if m == "boom"));
    Ok(())
}

#[tokio::test]
async fn test_render_repeatedClips_shouldReuseOneSession() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (controller, encoder) = common::create_test_controller(temp_dir.path())?;
    let media = common::create_test_file(temp_dir.path(), "source.mp4", "video")?;
    controller.analyze(&common::two_segment_transcript(), Some("multi"), Some(&media))?;

    let first = RenderRequest::new("multi", 0.0, 2.0, "Karaoke_Green").with_output_filename("a.mp4");
    let second = RenderRequest::new("multi", 3.0, 4.5, "Karaoke_Yellow").with_output_filename("b.mp4");

    assert_eq!(controller.render(&first, false).await?.word_count, 3);
    assert_eq!(controller.render(&second, false).await?.word_count, 3);

    let second_track = fs::read_to_string(controller.store().session_dir("multi")?.join("b.ass"))?;
    assert!(second_track.contains("Dialogue: 0,0:00:00.00,0:00:01.30,Karaoke_Yellow"));
    assert_eq!(encoder.jobs().len(), 2);
    Ok(())
}
