//! Ripple operations: edits that also shift the clips downstream of the
//! edit point, keeping relative gaps intact.
//!
//! Ripple shifts are pure timeline translations: only `start_time` and
//! `end_time` move, the media window stays put. Total occupied duration
//! therefore changes by exactly the edit delta.

use uuid::Uuid;

use crate::constants::FRAME_EPSILON;
use crate::editor::editor_engine::EditorEngine;
use crate::editor::placement;
use crate::error::EngineError;
use crate::history::PatchOp;
use crate::model::Clip;
use crate::time::snap_to_frame;

fn shifted(clip: &Clip, delta: f64) -> Clip {
    let mut moved = clip.clone();
    moved.start_time = clip.start_time + delta;
    moved.end_time = clip.end_time + delta;
    moved
}

impl EditorEngine {
    /// Delete a clip and close the gap: every clip starting after it shifts
    /// left by exactly the deleted duration.
    pub fn ripple_delete(&self, track_id: Uuid, clip_id: Uuid) -> Result<(), EngineError> {
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
            let delta = -removed.duration();

            let mut forward = vec![PatchOp::RemoveClip { track_id, clip_id }];
            let mut inverse = vec![PatchOp::InsertClip {
                track_id,
                index,
                clip: removed.clone(),
            }];

            for clip in track.clips.iter_mut() {
                if clip.start_time > removed.start_time {
                    let original = clip.clone();
                    *clip = shifted(&original, delta);
                    forward.push(PatchOp::ReplaceClip {
                        track_id,
                        clip: clip.clone(),
                    });
                    inverse.push(PatchOp::ReplaceClip {
                        track_id,
                        clip: original,
                    });
                }
            }
            log::debug!(
                "Ripple delete '{}': downstream shifted by {:.3}s",
                removed.name,
                delta
            );

            (state.clone(), forward, inverse)
        };
        self.record_full("Ripple delete clip", forward, inverse, snapshot)
    }

    /// Insert a clip at `insert_time`, pushing every clip that starts at or
    /// after that point right by the inserted duration.
    pub fn ripple_insert(
        &self,
        track_id: Uuid,
        mut clip: Clip,
        insert_time: f64,
    ) -> Result<Uuid, EngineError> {
        let (snapshot, forward, inverse) = {
            let mut state = self.write_state()?;
            let fps = state.fps;
            let track = state
                .get_track_mut(track_id)
                .ok_or_else(|| EngineError::NotFound(format!("Track {} not found", track_id)))?;
            Self::ensure_unlocked(track)?;

            let duration = clip.duration();
            let insert_at = snap_to_frame(insert_time.max(0.0), fps);
            clip.start_time = insert_at;
            clip.end_time = snap_to_frame(insert_at + duration, fps);
            // Downstream clips shift by the quantized duration so every
            // boundary stays on the frame grid.
            let delta = clip.duration();
            placement::validate_media_window(&clip)?;

            // Clips starting at or after the insert point move out of the
            // way; a clip straddling it cannot. Reject before anything
            // mutates.
            if !track.allow_overlap
                && track
                    .clips
                    .iter()
                    .any(|c| c.start_time < insert_at && c.end_time > insert_at)
            {
                log::warn!(
                    "Rejected ripple insert: '{}' would overlap on track '{}'",
                    clip.name,
                    track.name
                );
                return Err(EngineError::Validation(format!(
                    "Clip overlaps an existing clip on track '{}'",
                    track.name
                )));
            }

            let mut forward = Vec::new();
            let mut inverse = Vec::new();
            for existing in track.clips.iter_mut() {
                if existing.start_time >= insert_at {
                    let original = existing.clone();
                    *existing = shifted(&original, delta);
                    forward.push(PatchOp::ReplaceClip {
                        track_id,
                        clip: existing.clone(),
                    });
                    inverse.push(PatchOp::ReplaceClip {
                        track_id,
                        clip: original,
                    });
                }
            }

            let index = track.clips.len();
            track.clips.push(clip.clone());
            forward.push(PatchOp::InsertClip {
                track_id,
                index,
                clip: clip.clone(),
            });
            inverse.push(PatchOp::RemoveClip {
                track_id,
                clip_id: clip.id,
            });
            log::debug!(
                "Ripple insert '{}' at {:.3}s: downstream shifted by {:.3}s",
                clip.name,
                insert_at,
                delta
            );

            (state.clone(), forward, inverse)
        };
        self.record_full("Ripple insert clip", forward, inverse, snapshot)?;
        Ok(clip.id)
    }

    /// Trim a clip's end handle and shift every later clip by the same
    /// delta, keeping downstream gaps intact. The new end is clamped to the
    /// media window first, so a clip with no trailing media left is a no-op.
    pub fn ripple_trim_end(
        &self,
        track_id: Uuid,
        clip_id: Uuid,
        new_end: f64,
    ) -> Result<(), EngineError> {
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
            let trimmed = placement::trimmed_end(&original, new_end, fps)?;
            let delta = trimmed.end_time - original.end_time;
            if delta.abs() < FRAME_EPSILON {
                log::debug!("Ripple trim on '{}' clamped to a no-op", original.name);
                return Ok(());
            }

            let mut forward = vec![PatchOp::ReplaceClip {
                track_id,
                clip: trimmed.clone(),
            }];
            let mut inverse = vec![PatchOp::ReplaceClip {
                track_id,
                clip: original.clone(),
            }];

            for clip in track.clips.iter_mut() {
                if clip.id == clip_id {
                    *clip = trimmed.clone();
                } else if clip.start_time > original.start_time {
                    let before = clip.clone();
                    *clip = shifted(&before, delta);
                    forward.push(PatchOp::ReplaceClip {
                        track_id,
                        clip: clip.clone(),
                    });
                    inverse.push(PatchOp::ReplaceClip {
                        track_id,
                        clip: before,
                    });
                }
            }
            log::debug!(
                "Ripple trim '{}': end {:.3} -> {:.3}, downstream shifted by {:.3}s",
                original.name,
                original.end_time,
                trimmed.end_time,
                delta
            );

            (forward, inverse)
        };
        self.record_partial("Ripple trim clip end", forward, inverse)
    }
}
