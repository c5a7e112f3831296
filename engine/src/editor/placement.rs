//! Pure clip placement math shared by committed edit operations and
//! interactive previews. Every function takes the clip by reference and
//! returns the re-placed copy, or a validation error; nothing here touches
//! engine state.

use crate::constants::{FRAME_EPSILON, MIN_DURATION};
use crate::error::EngineError;
use crate::model::Clip;
use crate::time::snap_to_frame;

/// Validate a clip's media window against its source bounds.
pub fn validate_media_window(clip: &Clip) -> Result<(), EngineError> {
    if clip.media_offset < 0.0 {
        return Err(EngineError::Validation(
            "Media offset cannot be negative".to_string(),
        ));
    }
    let duration = clip.duration();
    if duration < MIN_DURATION - FRAME_EPSILON {
        return Err(EngineError::Validation(format!(
            "Clip duration {:.3}s is below the {:.1}s minimum",
            duration, MIN_DURATION
        )));
    }
    if duration > clip.media_duration + FRAME_EPSILON {
        return Err(EngineError::Validation(format!(
            "Clip duration {:.3}s exceeds available media {:.3}s",
            duration, clip.media_duration
        )));
    }
    if clip.original_duration > 0.0 && clip.media_offset > clip.original_duration + FRAME_EPSILON {
        return Err(EngineError::Validation(
            "Media offset is beyond the source media duration".to_string(),
        ));
    }
    Ok(())
}

/// Move a clip to a new start time, duration-preserving. The media offset
/// follows the same delta so source-content alignment is preserved; the
/// media window size is unchanged, so only the offset sign needs checking.
pub fn moved_clip(clip: &Clip, new_start: f64, fps: f64) -> Result<Clip, EngineError> {
    let constrained = snap_to_frame(new_start.max(0.0), fps);
    let delta = constrained - clip.start_time;

    let mut moved = clip.clone();
    moved.start_time = constrained;
    moved.end_time = clip.end_time + delta;
    moved.media_offset = clip.media_offset + delta;
    validate_media_window(&moved)?;
    Ok(moved)
}

/// Trim the start handle (normal mode): start time and media offset move
/// together, clamped so the offset stays non-negative and at least
/// `MIN_DURATION` of clip remains. The media window's end in source time is
/// unchanged.
pub fn trimmed_start(clip: &Clip, new_start: f64, fps: f64) -> Result<Clip, EngineError> {
    let min_start = clip.start_time - clip.media_offset;
    let max_start = clip.end_time - MIN_DURATION;
    let constrained = snap_to_frame(new_start.clamp(min_start, max_start), fps);
    let delta = constrained - clip.start_time;

    let mut trimmed = clip.clone();
    trimmed.start_time = constrained;
    trimmed.media_offset = clip.media_offset + delta;
    trimmed.media_duration = clip.media_duration - delta;
    validate_media_window(&trimmed)?;
    Ok(trimmed)
}

/// Trim the end handle: the end time moves alone, clamped between
/// `start + MIN_DURATION` and the end of available media. Ripple and normal
/// mode produce the same clip; ripple only changes what happens to
/// subsequent clips.
pub fn trimmed_end(clip: &Clip, new_end: f64, fps: f64) -> Result<Clip, EngineError> {
    let min_end = clip.start_time + MIN_DURATION;
    let max_end = clip.start_time + clip.media_duration;
    let constrained = snap_to_frame(new_end.clamp(min_end, max_end), fps);

    let mut trimmed = clip.clone();
    trimmed.end_time = constrained;
    validate_media_window(&trimmed)?;
    Ok(trimmed)
}

/// Slip the media window by `offset_delta` seconds without moving the clip
/// on the timeline. The window is clamped to stay inside the source media.
pub fn slipped(clip: &Clip, offset_delta: f64) -> Result<Clip, EngineError> {
    let duration = clip.duration();
    let max_offset = if clip.original_duration > 0.0 {
        (clip.original_duration - duration).max(0.0)
    } else {
        clip.media_offset + clip.media_duration - duration
    };
    let new_offset = (clip.media_offset + offset_delta).clamp(0.0, max_offset);

    let mut slipped = clip.clone();
    slipped.media_offset = new_offset;
    slipped.media_duration = if clip.original_duration > 0.0 {
        clip.original_duration - new_offset
    } else {
        clip.media_duration + (clip.media_offset - new_offset)
    };
    validate_media_window(&slipped)?;
    Ok(slipped)
}

/// Split a clip at `split_time`. Returns `None` (no-op) when the quantized
/// split point is not strictly inside `(start_time, end_time)`; returns an
/// error when either resulting part would violate media bounds.
///
/// The first part keeps the original id and full media window (it can be
/// re-extended later); the second part gets the remainder of the window,
/// preserving media-offset continuity.
pub fn split_parts(clip: &Clip, split_time: f64, fps: f64) -> Result<Option<(Clip, Clip)>, EngineError> {
    let t = snap_to_frame(split_time, fps);
    if t <= clip.start_time || t >= clip.end_time {
        return Ok(None);
    }

    let first_duration = t - clip.start_time;

    let mut first = clip.clone();
    first.end_time = t;

    let mut second = clip.clone();
    second.id = uuid::Uuid::new_v4();
    second.start_time = t;
    second.media_offset = clip.media_offset + first_duration;
    second.media_duration = clip.media_duration - first_duration;

    validate_media_window(&first)?;
    validate_media_window(&second)?;
    Ok(Some((first, second)))
}
