use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::clip_range::{self, ClipWindow};
use crate::encoder::{ClipEncoder, EncodeJob, FfmpegEncoder};
use crate::errors::{AppError, SessionError, SubtitleError};
use crate::file_utils::{FileManager, SESSION_VIDEO_STEM, VIDEO_EXTENSIONS};
use crate::karaoke::{self, SubtitleDocument};
use crate::line_wrapper;
use crate::session::{
    generate_session_id, validate_session_id, AnalysisReport, RenderReport, RenderRequest,
    SessionStore,
};
use crate::subtitle_processor::SubtitleCollection;
use crate::transcript::Transcript;

// @module: Application controller for session analysis and clip rendering

/// SRT export of the full transcript, written next to the transcript record
pub const SRT_FILE: &str = "transcript.srt";

/// Main application controller tying the session store, subtitle synthesis
/// and the encoder together
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Persisted sessions
    store: SessionStore,

    // @field: Encode/mux collaborator
    encoder: Arc<dyn ClipEncoder>,
}

impl Controller {
    // @method: Create a new controller with the given configuration and ffmpeg
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let encoder = Arc::new(FfmpegEncoder::new(config.encoder.clone()));
        Self::with_encoder(config, encoder)
    }

    /// Create a controller with a custom encoder
    pub fn with_encoder(config: Config, encoder: Arc<dyn ClipEncoder>) -> Result<Self, AppError> {
        config
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let store = SessionStore::new(config.sessions_dir.clone());

        Ok(Self {
            config,
            store,
            encoder,
        })
    }

    /// Session store used by this controller
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Analysis
    // =========================================================================

    /// Persist a transcript as a session and report on it.
    ///
    /// When `media` is given it is copied into the session directory as
    /// `video.<ext>` so later renders can find it. Inputs are checked before
    /// anything is written; a new session that fails part way is removed.
    pub fn analyze(
        &self,
        transcript: &Transcript,
        session_id: Option<&str>,
        media: Option<&Path>,
    ) -> Result<AnalysisReport, AppError> {
        let start_time = Instant::now();

        let session_id = match session_id {
            Some(id) => {
                validate_session_id(id)?;
                id.to_string()
            }
            None => generate_session_id(),
        };

        if transcript.is_empty() {
            warn!("Transcript for session {} contains no words", session_id);
        }

        let media = match media {
            Some(media) if !media.is_file() => {
                return Err(AppError::File(format!("Media file does not exist: {:?}", media)));
            }
            Some(media) => Some((media, self.session_media_path(&session_id, media)?)),
            None => None,
        };
        let srt = SubtitleCollection::from_transcript(transcript)?;

        let existed = self.store.exists(&session_id);
        self.store.persist(&session_id, transcript)?;

        if let Err(e) = self.store_session_files(&session_id, media, &srt) {
            if !existed {
                if let Err(cleanup) = self.store.remove(&session_id) {
                    warn!("Failed to remove incomplete session {}: {}", session_id, cleanup);
                }
            }
            return Err(e);
        }

        let report = AnalysisReport::new(&session_id, transcript, srt.to_srt_string());

        info!(
            "Analysis of session {} completed in {}",
            session_id,
            Self::format_duration(start_time.elapsed())
        );

        Ok(report)
    }

    fn store_session_files(
        &self,
        session_id: &str,
        media: Option<(&Path, PathBuf)>,
        srt: &SubtitleCollection,
    ) -> Result<(), AppError> {
        if let Some((media, target)) = media {
            FileManager::copy_file(media, &target)?;
            info!("Source media stored at {}", target.display());
        }

        srt.write_to_srt(self.store.session_dir(session_id)?.join(SRT_FILE))?;
        Ok(())
    }

    /// Read a transcription engine's JSON output and analyze it
    pub fn analyze_file(
        &self,
        transcript_path: &Path,
        session_id: Option<&str>,
        media: Option<&Path>,
    ) -> Result<AnalysisReport, AppError> {
        let json = FileManager::read_to_string(transcript_path)?;
        let transcript = Transcript::from_engine_json(&json)
            .map_err(|e| AppError::Transcript(format!("{}: {}", transcript_path.display(), e)))?;

        self.analyze(&transcript, session_id, media)
    }

    fn session_media_path(&self, session_id: &str, media: &Path) -> Result<PathBuf, AppError> {
        let ext = media
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .filter(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| {
                AppError::File(format!(
                    "Unsupported media file {:?}, expected one of: {}",
                    media,
                    VIDEO_EXTENSIONS.join(", ")
                ))
            })?;

        Ok(self
            .store
            .session_dir(session_id)?
            .join(format!("{}.{}", SESSION_VIDEO_STEM, ext)))
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Synthesize the subtitle document for one clip window.
    ///
    /// Returns `None` when the style is `none` or when no word lies entirely
    /// inside the window; both are valid "no captions" outcomes.
    pub fn clip_subtitles(
        &self,
        transcript: &Transcript,
        window: ClipWindow,
        style_id: &str,
    ) -> Result<Option<SubtitleDocument>, AppError> {
        if style_id == crate::styles::NO_SUBTITLES {
            debug!("Subtitles disabled for this clip");
            return Ok(None);
        }

        let words = clip_range::extract(transcript, window);
        if words.is_empty() {
            info!(
                "No words inside [{:.2}, {:.2}), rendering without subtitles",
                window.start, window.end
            );
            return Ok(None);
        }

        let lines = line_wrapper::wrap(&words, self.config.subtitles.max_chars_per_line);
        let document = karaoke::build(&lines, style_id)?;

        Ok(Some(document))
    }

    /// Load the session, write the clip's subtitle track and describe the
    /// encode job, without encoding.
    pub fn prepare_render(&self, request: &RenderRequest, require_media: bool) -> Result<(EncodeJob, usize), AppError> {
        // An open-ended window is fine for extraction but not for an encode job
        if !request.window_end.is_finite() {
            return Err(SubtitleError::InvalidTimestamp(request.window_end).into());
        }
        let window = ClipWindow::new(request.window_start, request.window_end)?;
        let output_name = Self::checked_output_name(&request.output_filename)?;

        let transcript = self.store.load(&request.session_id)?;
        let session_dir = self.store.session_dir(&request.session_id)?;

        let input = match self.store.find_video(&request.session_id) {
            Ok(path) => path,
            Err(e @ SessionError::MediaNotFound(_)) if require_media => return Err(e.into()),
            Err(_) => {
                debug!("No media in session {}, job input left at its default", request.session_id);
                session_dir.join(format!("{}.{}", SESSION_VIDEO_STEM, VIDEO_EXTENSIONS[0]))
            }
        };

        let output = session_dir.join(output_name);
        let ass_path = output.with_extension("ass");

        info!(
            "Rendering clip [{:.2}-{:.2}] with style {}...",
            window.start, window.end, request.style_id
        );

        let mut word_count = 0;
        let subtitles = match self.clip_subtitles(&transcript, window, &request.style_id)? {
            Some(document) => {
                word_count = document.word_count();
                document.write_to_ass(&ass_path)?;
                debug!("Subtitle track written to {}", ass_path.display());
                Some(ass_path)
            }
            None => {
                // A track left by an earlier render of the same output is stale now
                if ass_path.is_file() {
                    FileManager::remove_file(&ass_path)?;
                    debug!("Removed stale subtitle track {}", ass_path.display());
                }
                None
            }
        };

        let job = EncodeJob {
            input,
            output,
            start: window.start,
            duration: window.duration(),
            subtitles,
        };

        Ok((job, word_count))
    }

    /// Render one clip: subtitles, then the encode job unless `skip_encode`
    pub async fn render(&self, request: &RenderRequest, skip_encode: bool) -> Result<RenderReport, AppError> {
        let start_time = Instant::now();

        let (job, word_count) = self.prepare_render(request, !skip_encode)?;

        let file_path = if skip_encode {
            info!("Encoding skipped");
            None
        } else {
            Some(self.encoder.encode(&job).await?)
        };

        info!("Render finished in {}", Self::format_duration(start_time.elapsed()));

        Ok(RenderReport {
            status: "success".to_string(),
            file_path,
            subtitle_path: job.subtitles.clone(),
            word_count,
            job,
        })
    }

    fn checked_output_name(name: &str) -> Result<&str, AppError> {
        let is_plain_name = Path::new(name).file_name().map(|n| n == name).unwrap_or(false);
        if !is_plain_name {
            return Err(AppError::File(format!(
                "Output filename must be a plain file name: '{}'",
                name
            )));
        }
        if Path::new(name).extension().map(|ext| ext == "ass").unwrap_or(false) {
            return Err(AppError::File(format!(
                "Output filename would collide with its subtitle track: '{}'",
                name
            )));
        }
        Ok(name)
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
