//! Committed track, marker and timeline-level operations.

use uuid::Uuid;

use crate::editor::editor_engine::EditorEngine;
use crate::error::EngineError;
use crate::history::PatchOp;
use crate::model::{Marker, Track, TrackKind};
use crate::time::snap_to_frame;

impl EditorEngine {
    pub fn add_track(&self, name: &str, kind: TrackKind) -> Result<Uuid, EngineError> {
        let track = Track::new(name, kind);
        let track_id = track.id;
        let (snapshot, forward, inverse) = {
            let mut state = self.write_state()?;
            let index = state.tracks.len();
            state.tracks.push(track.clone());
            log::debug!("Added {} track '{}'", kind, name);
            (
                state.clone(),
                vec![PatchOp::InsertTrack { index, track }],
                vec![PatchOp::RemoveTrack { track_id }],
            )
        };
        self.record_full("Add track", forward, inverse, snapshot)?;
        Ok(track_id)
    }

    pub fn remove_track(&self, track_id: Uuid) -> Result<(), EngineError> {
        let (snapshot, forward, inverse) = {
            let mut state = self.write_state()?;
            let index = state
                .track_index(track_id)
                .ok_or_else(|| EngineError::NotFound(format!("Track {} not found", track_id)))?;
            Self::ensure_unlocked(&state.tracks[index])?;
            let removed = state.tracks.remove(index);
            log::debug!("Removed track '{}'", removed.name);
            (
                state.clone(),
                vec![PatchOp::RemoveTrack { track_id }],
                vec![PatchOp::InsertTrack {
                    index,
                    track: removed,
                }],
            )
        };
        self.record_full("Remove track", forward, inverse, snapshot)
    }

    /// Reorder a track. Track order is meaningful: earlier tracks win
    /// active-clip ties during playback.
    pub fn move_track(&self, track_id: Uuid, new_index: usize) -> Result<(), EngineError> {
        let (snapshot, forward, inverse) = {
            let mut state = self.write_state()?;
            let from = state
                .track_index(track_id)
                .ok_or_else(|| EngineError::NotFound(format!("Track {} not found", track_id)))?;
            let to = new_index.min(state.tracks.len() - 1);
            if from == to {
                return Ok(());
            }
            let track = state.tracks.remove(from);
            log::debug!("Moved track '{}' from {} to {}", track.name, from, to);
            state.tracks.insert(to, track);
            (
                state.clone(),
                vec![PatchOp::MoveTrack { from, to }],
                vec![PatchOp::MoveTrack { from: to, to: from }],
            )
        };
        self.record_full("Reorder tracks", forward, inverse, snapshot)
    }

    pub fn set_track_visible(&self, track_id: Uuid, visible: bool) -> Result<(), EngineError> {
        self.replace_track_op(track_id, "Toggle track visibility", |track| {
            track.is_visible = visible;
        })
    }

    pub fn set_track_muted(&self, track_id: Uuid, muted: bool) -> Result<(), EngineError> {
        self.replace_track_op(track_id, "Toggle track mute", |track| {
            track.is_muted = muted;
        })
    }

    /// Allowed even on a locked track, otherwise a locked track could never
    /// be unlocked.
    pub fn set_track_locked(&self, track_id: Uuid, locked: bool) -> Result<(), EngineError> {
        self.replace_track_op(track_id, "Toggle track lock", |track| {
            track.is_locked = locked;
        })
    }

    pub fn set_track_overlap(&self, track_id: Uuid, allow_overlap: bool) -> Result<(), EngineError> {
        self.replace_track_op(track_id, "Toggle track overlap", |track| {
            track.allow_overlap = allow_overlap;
        })
    }

    fn replace_track_op<F>(&self, track_id: Uuid, description: &str, apply: F) -> Result<(), EngineError>
    where
        F: FnOnce(&mut Track),
    {
        let (forward, inverse) = {
            let mut state = self.write_state()?;
            let track = state
                .get_track_mut(track_id)
                .ok_or_else(|| EngineError::NotFound(format!("Track {} not found", track_id)))?;
            let original = track.clone();
            apply(track);
            if *track == original {
                return Ok(());
            }
            log::debug!("{} on '{}'", description, track.name);
            (
                vec![PatchOp::ReplaceTrack { track: track.clone() }],
                vec![PatchOp::ReplaceTrack { track: original }],
            )
        };
        self.record_partial(description, forward, inverse)
    }

    /// Add a marker at a frame-quantized time.
    pub fn add_marker(&self, time: f64, label: &str) -> Result<Uuid, EngineError> {
        let (marker_id, forward, inverse) = {
            let mut state = self.write_state()?;
            let fps = state.fps;
            let marker = Marker::new(snap_to_frame(time.max(0.0), fps), label);
            let marker_id = marker.id;
            state.markers.push(marker.clone());
            (
                marker_id,
                vec![PatchOp::InsertMarker { marker }],
                vec![PatchOp::RemoveMarker { marker_id }],
            )
        };
        self.record_partial("Add marker", forward, inverse)?;
        Ok(marker_id)
    }

    pub fn remove_marker(&self, marker_id: Uuid) -> Result<(), EngineError> {
        let (forward, inverse) = {
            let mut state = self.write_state()?;
            let index = state
                .markers
                .iter()
                .position(|m| m.id == marker_id)
                .ok_or_else(|| EngineError::NotFound(format!("Marker {} not found", marker_id)))?;
            let removed = state.markers.remove(index);
            (
                vec![PatchOp::RemoveMarker { marker_id }],
                vec![PatchOp::InsertMarker { marker: removed }],
            )
        };
        self.record_partial("Remove marker", forward, inverse)
    }

    pub fn move_marker(&self, marker_id: Uuid, new_time: f64) -> Result<(), EngineError> {
        let (forward, inverse) = {
            let mut state = self.write_state()?;
            let fps = state.fps;
            let marker = state
                .get_marker_mut(marker_id)
                .ok_or_else(|| EngineError::NotFound(format!("Marker {} not found", marker_id)))?;
            let original = marker.clone();
            marker.time = snap_to_frame(new_time.max(0.0), fps);
            (
                vec![PatchOp::ReplaceMarker {
                    marker: marker.clone(),
                }],
                vec![PatchOp::ReplaceMarker { marker: original }],
            )
        };
        self.record_partial("Move marker", forward, inverse)
    }

    /// Change the timeline frame rate. Clip boundary times are not
    /// re-quantized retroactively; new edits snap to the new grid.
    pub fn set_fps(&self, fps: f64) -> Result<(), EngineError> {
        if fps <= 0.0 || !fps.is_finite() {
            return Err(EngineError::Validation(format!(
                "Invalid frame rate: {}",
                fps
            )));
        }
        let (forward, inverse) = {
            let mut state = self.write_state()?;
            let previous = state.fps;
            if (previous - fps).abs() < f64::EPSILON {
                return Ok(());
            }
            state.fps = fps;
            log::debug!("Frame rate changed {} -> {}", previous, fps);
            (
                vec![PatchOp::SetFps { fps }],
                vec![PatchOp::SetFps { fps: previous }],
            )
        };
        self.record_partial("Change frame rate", forward, inverse)
    }
}
