/*!
 * Encode/mux seam.
 *
 * The subtitle engine only produces an `EncodeJob`: the source media, the
 * clip range and an optional subtitle track to burn in. A `ClipEncoder`
 * turns that job into a media file. `FfmpegEncoder` is the production
 * implementation; tests substitute their own.
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info};
use serde::Serialize;
use tokio::process::Command;

use crate::app_config::EncoderConfig;
use crate::errors::EncodeError;

/// Everything an encoder needs to cut one clip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodeJob {
    /// Source media
    pub input: PathBuf,
    /// Output media file
    pub output: PathBuf,
    /// Clip start in source seconds
    pub start: f64,
    /// Clip length in seconds
    pub duration: f64,
    /// ASS track to burn in; `None` means a plain stream copy
    pub subtitles: Option<PathBuf>,
}

impl EncodeJob {
    /// Whether the job re-encodes to burn in subtitles
    pub fn burns_subtitles(&self) -> bool {
        self.subtitles.is_some()
    }
}

/// Something that can render an `EncodeJob` to a file
#[async_trait]
pub trait ClipEncoder: Send + Sync {
    /// Encode the clip and return the written path
    async fn encode(&self, job: &EncodeJob) -> Result<PathBuf, EncodeError>;
}

/// Encoder backed by the ffmpeg command line tool
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    config: EncoderConfig,
}

impl FfmpegEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Command line arguments for a job, without the program name
    pub fn build_args(&self, job: &EncodeJob) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-loglevel".into(),
            "error".into(),
            "-ss".into(),
            format!("{:.3}", job.start),
            "-t".into(),
            format!("{:.3}", job.duration),
            "-i".into(),
            job.input.to_string_lossy().into_owned(),
        ];

        match &job.subtitles {
            Some(subtitles) => {
                args.push("-vf".into());
                args.push(format!("ass={}", escape_filter_path(subtitles)));
                args.push("-c:v".into());
                args.push(self.config.video_codec.clone());
                args.push("-c:a".into());
                args.push(self.config.audio_codec.clone());
            }
            None => {
                args.push("-c".into());
                args.push("copy".into());
            }
        }

        args.push(job.output.to_string_lossy().into_owned());
        args
    }
}

#[async_trait]
impl ClipEncoder for FfmpegEncoder {
    async fn encode(&self, job: &EncodeJob) -> Result<PathBuf, EncodeError> {
        let args = self.build_args(job);
        debug!("Running {} {}", self.config.ffmpeg_path, args.join(" "));

        let ffmpeg_future = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .kill_on_drop(true)
            .output();

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let output = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| EncodeError::Spawn(format!("{}: {}", self.config.ffmpeg_path, e)))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(EncodeError::Timeout(self.config.timeout_secs));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let filtered = filter_ffmpeg_stderr(&stderr);
            error!("Clip encode failed: {}", filtered);
            return Err(EncodeError::Failed(filtered));
        }

        info!("Clip rendered to: {}", job.output.display());
        Ok(job.output.clone())
    }
}

/// Escape a path for use inside an ffmpeg filter argument
fn escape_filter_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | ':' | '\'' | ',' | '[' | ']' | ';') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
