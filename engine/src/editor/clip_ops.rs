//! Committed clip operations: resolve targets, validate, mutate, record.
//! Every operation quantizes boundary times to the frame grid, refuses
//! locked tracks, and either fully applies or leaves the state untouched.

use uuid::Uuid;

use crate::editor::editor_engine::EditorEngine;
use crate::editor::placement;
use crate::error::EngineError;
use crate::history::PatchOp;
use crate::model::Clip;
use crate::time::snap_to_frame;

impl EditorEngine {
    /// Add a clip to a track. Start/end are quantized; on no-overlap tracks
    /// the clip is rejected if it would collide with an existing one.
    pub fn add_clip(&self, track_id: Uuid, mut clip: Clip) -> Result<Uuid, EngineError> {
        let (snapshot, forward, inverse) = {
            let mut state = self.write_state()?;
            let fps = state.fps;
            let track = state
                .get_track_mut(track_id)
                .ok_or_else(|| EngineError::NotFound(format!("Track {} not found", track_id)))?;
            Self::ensure_unlocked(track)?;

            clip.start_time = snap_to_frame(clip.start_time.max(0.0), fps);
            clip.end_time = snap_to_frame(clip.end_time, fps);
            placement::validate_media_window(&clip)?;

            if !track.allow_overlap && track.would_overlap(&clip, None) {
                log::warn!(
                    "Rejected clip '{}': overlaps an existing clip on track '{}'",
                    clip.name,
                    track.name
                );
                return Err(EngineError::Validation(format!(
                    "Clip overlaps an existing clip on track '{}'",
                    track.name
                )));
            }

            let index = track.clips.len();
            track.clips.push(clip.clone());
            log::debug!("Added clip '{}' to track '{}'", clip.name, track.name);

            (
                state.clone(),
                vec![PatchOp::InsertClip {
                    track_id,
                    index,
                    clip: clip.clone(),
                }],
                vec![PatchOp::RemoveClip {
                    track_id,
                    clip_id: clip.id,
                }],
            )
        };
        self.record_full("Add clip", forward, inverse, snapshot)?;
        Ok(clip.id)
    }

    pub fn delete_clip(&self, track_id: Uuid, clip_id: Uuid) -> Result<(), EngineError> {
        let (snapshot, forward, inverse) = {
            let mut state = self.write_state()?;
            let track = state
                .get_track_mut(track_id)
                .ok_or_else(|| EngineError::NotFound(format!("Track {} not found", track_id)))?;
            Self::ensure_unlocked(track)?;

            let index = track
                .clip_index(clip_id)
                .ok_or_else(|| EngineError::NotFound(format!("Clip {} not found", clip_id)))?;
            let removed = track.clips.remove(index);
            log::debug!("Deleted clip '{}' from track '{}'", removed.name, track.name);

            (
                state.clone(),
                vec![PatchOp::RemoveClip { track_id, clip_id }],
                vec![PatchOp::InsertClip {
                    track_id,
                    index,
                    clip: removed,
                }],
            )
        };
        self.record_full("Delete clip", forward, inverse, snapshot)
    }

    /// Move a clip to a new start time. Duration is preserved and the media
    /// offset follows the move so source alignment is unchanged.
    pub fn move_clip(&self, track_id: Uuid, clip_id: Uuid, new_start: f64) -> Result<(), EngineError> {
        self.replace_clip_op(track_id, clip_id, "Move clip", |clip, fps| {
            placement::moved_clip(clip, new_start, fps)
        })
    }

    /// Trim the start handle, clamped to available leading media and the
    /// minimum duration.
    pub fn trim_clip_start(
        &self,
        track_id: Uuid,
        clip_id: Uuid,
        new_start: f64,
    ) -> Result<(), EngineError> {
        self.replace_clip_op(track_id, clip_id, "Trim clip start", |clip, fps| {
            placement::trimmed_start(clip, new_start, fps)
        })
    }

    /// Trim the end handle, clamped to the available media window.
    pub fn trim_clip_end(
        &self,
        track_id: Uuid,
        clip_id: Uuid,
        new_end: f64,
    ) -> Result<(), EngineError> {
        self.replace_clip_op(track_id, clip_id, "Trim clip end", |clip, fps| {
            placement::trimmed_end(clip, new_end, fps)
        })
    }

    /// Slip the media window within the source without moving the clip on
    /// the timeline.
    pub fn slip_clip(
        &self,
        track_id: Uuid,
        clip_id: Uuid,
        offset_delta: f64,
    ) -> Result<(), EngineError> {
        self.replace_clip_op(track_id, clip_id, "Slip clip", |clip, _fps| {
            placement::slipped(clip, offset_delta)
        })
    }

    /// Split a clip at `split_time`. Quantized split points outside the open
    /// interval `(start, end)` are a no-op returning `Ok(None)`; otherwise
    /// the id of the newly created second part is returned.
    pub fn split_clip(
        &self,
        track_id: Uuid,
        clip_id: Uuid,
        split_time: f64,
    ) -> Result<Option<Uuid>, EngineError> {
        let (snapshot, forward, inverse, second_id) = {
            let mut state = self.write_state()?;
            let fps = state.fps;
            let track = state
                .get_track_mut(track_id)
                .ok_or_else(|| EngineError::NotFound(format!("Track {} not found", track_id)))?;
            Self::ensure_unlocked(track)?;

            let index = track
                .clip_index(clip_id)
                .ok_or_else(|| EngineError::NotFound(format!("Clip {} not found", clip_id)))?;
            let original = track.clips[index].clone();

            let Some((first, second)) = placement::split_parts(&original, split_time, fps)? else {
                log::debug!(
                    "Split at {:.3}s ignored: outside clip '{}' interval",
                    split_time,
                    original.name
                );
                return Ok(None);
            };

            let second_id = second.id;
            track.clips[index] = first.clone();
            track.clips.insert(index + 1, second.clone());
            log::debug!(
                "Split clip '{}' at {:.3}s into {} / {}",
                original.name,
                second.start_time,
                first.id,
                second.id
            );

            (
                state.clone(),
                vec![
                    PatchOp::ReplaceClip { track_id, clip: first },
                    PatchOp::InsertClip {
                        track_id,
                        index: index + 1,
                        clip: second,
                    },
                ],
                vec![
                    PatchOp::RemoveClip {
                        track_id,
                        clip_id: second_id,
                    },
                    PatchOp::ReplaceClip {
                        track_id,
                        clip: original,
                    },
                ],
                second_id,
            )
        };
        self.record_full("Split clip", forward, inverse, snapshot)?;
        Ok(Some(second_id))
    }

    /// Shared shape of the single-clip replace operations: resolve the clip,
    /// compute its re-placement, check overlap policy, swap, record.
    fn replace_clip_op<F>(
        &self,
        track_id: Uuid,
        clip_id: Uuid,
        description: &str,
        rework: F,
    ) -> Result<(), EngineError>
    where
        F: FnOnce(&Clip, f64) -> Result<Clip, EngineError>,
    {
        let (forward, inverse) = {
            let mut state = self.write_state()?;
            let fps = state.fps;
            let track = state
                .get_track_mut(track_id)
                .ok_or_else(|| EngineError::NotFound(format!("Track {} not found", track_id)))?;
            Self::ensure_unlocked(track)?;

            let original = track
                .get_clip(clip_id)
                .ok_or_else(|| EngineError::NotFound(format!("Clip {} not found", clip_id)))?
                .clone();
            let reworked = rework(&original, fps)?;

            if !track.allow_overlap && track.would_overlap(&reworked, Some(clip_id)) {
                log::warn!(
                    "Rejected {}: clip '{}' would overlap on track '{}'",
                    description.to_lowercase(),
                    original.name,
                    track.name
                );
                return Err(EngineError::Validation(format!(
                    "Clip overlaps an existing clip on track '{}'",
                    track.name
                )));
            }

            let slot = track
                .get_clip_mut(clip_id)
                .ok_or_else(|| EngineError::NotFound(format!("Clip {} not found", clip_id)))?;
            *slot = reworked.clone();
            log::debug!(
                "{}: '{}' now [{:.3}, {:.3})",
                description,
                reworked.name,
                reworked.start_time,
                reworked.end_time
            );

            (
                vec![PatchOp::ReplaceClip {
                    track_id,
                    clip: reworked,
                }],
                vec![PatchOp::ReplaceClip {
                    track_id,
                    clip: original,
                }],
            )
        };
        self.record_partial(description, forward, inverse)
    }
}
