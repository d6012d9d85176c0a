/*!
 * Time-code formatting for subtitle tracks.
 *
 * All conversions truncate toward zero: sub-centisecond (or sub-millisecond
 * for SRT) precision is discarded, never rounded.
 */

use log::warn;

use crate::errors::SubtitleError;

/// Absorbs binary representation error before truncating, so that values
/// like `1.9` or `1.9 - 0.6` land on the centisecond they denote.
const TRUNCATION_EPSILON: f64 = 1e-6;

fn checked_seconds(seconds: f64) -> Result<f64, SubtitleError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(SubtitleError::InvalidTimestamp(seconds));
    }
    Ok(seconds)
}

fn truncate_scaled(seconds: f64, scale: f64) -> u64 {
    (seconds * scale + TRUNCATION_EPSILON).floor() as u64
}

/// Format seconds as an ASS time code (`H:MM:SS.cs`)
pub fn format_timecode(seconds: f64) -> Result<String, SubtitleError> {
    let total_cs = truncate_scaled(checked_seconds(seconds)?, 100.0);

    let hours = total_cs / 360_000;
    let minutes = (total_cs % 360_000) / 6_000;
    let secs = (total_cs % 6_000) / 100;
    let centis = total_cs % 100;

    Ok(format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, centis))
}

/// Whole milliseconds in `seconds`, truncated
pub fn seconds_to_millis(seconds: f64) -> Result<u64, SubtitleError> {
    Ok(truncate_scaled(checked_seconds(seconds)?, 1000.0))
}

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`)
pub fn format_srt_timestamp(seconds: f64) -> Result<String, SubtitleError> {
    Ok(format_srt_millis(seconds_to_millis(seconds)?))
}

/// Format milliseconds as an SRT timestamp (`HH:MM:SS,mmm`)
pub fn format_srt_millis(total_ms: u64) -> String {
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Duration between two timestamps in whole centiseconds.
///
/// Fails with `NonMonotonicWord` when `end < start`. Non-finite bounds are
/// treated as a zero-length span.
pub fn try_duration_centis(text: &str, start: f64, end: f64) -> Result<u32, SubtitleError> {
    if end < start {
        return Err(SubtitleError::NonMonotonicWord {
            text: text.to_string(),
            start,
            end,
        });
    }

    let span = end - start;
    if !span.is_finite() {
        return Ok(0);
    }

    Ok(truncate_scaled(span, 100.0).min(u32::MAX as u64) as u32)
}

/// Duration between two timestamps in whole centiseconds, clamped to zero.
///
/// A word ending before it starts is logged and recovered as a zero-length
/// karaoke step.
pub fn duration_centis(start: f64, end: f64) -> u32 {
    duration_centis_for("", start, end)
}

/// Same as [`duration_centis`], naming the word in the warning
pub fn duration_centis_for(text: &str, start: f64, end: f64) -> u32 {
    match try_duration_centis(text, start, end) {
        Ok(centis) => centis,
        Err(e) => {
            warn!("{}; clamping duration to 0", e);
            0
        }
    }
}
