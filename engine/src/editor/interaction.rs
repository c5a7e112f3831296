//! Interactive edit sessions: pointer-down starts a session, every
//! pointer-move recomputes a preview from the immutable original, and
//! pointer-up commits the whole gesture as a single history entry. Dropping
//! the session (or calling [`EditSession::cancel`]) discards it without
//! touching engine state.

use uuid::Uuid;

use crate::editor::editor_engine::EditorEngine;
use crate::editor::placement;
use crate::error::EngineError;
use crate::model::Clip;
use crate::snap::{find_nearest_snap_point, SnapPoint};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EditGesture {
    /// Reposition the whole clip; with [`EditMode::Slip`] the pointer delta
    /// slips the media window instead.
    Drag,
    TrimStart,
    TrimEnd,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EditMode {
    Normal,
    /// End trims shift downstream clips by the trim delta on commit.
    Ripple,
    /// Drags re-point the media window, leaving timeline position fixed.
    Slip,
}

/// One in-flight gesture on one clip. The preview is always derived from the
/// original captured at pointer-down, never from the previous preview, so
/// pointer jitter cannot accumulate drift.
pub struct EditSession {
    track_id: Uuid,
    gesture: EditGesture,
    mode: EditMode,
    fps: f64,
    original: Clip,
    preview: Clip,
}

impl EditSession {
    pub fn gesture(&self) -> EditGesture {
        self.gesture
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn original(&self) -> &Clip {
        &self.original
    }

    pub fn preview(&self) -> &Clip {
        &self.preview
    }

    /// Recompute the preview for a new pointer position. `proposed` is the
    /// target time for drags and trims, or the offset delta in seconds for
    /// slip drags. A validation failure leaves the previous preview intact.
    pub fn update(&mut self, proposed: f64) -> Result<&Clip, EngineError> {
        self.preview = match (self.gesture, self.mode) {
            (EditGesture::Drag, EditMode::Slip) => placement::slipped(&self.original, proposed)?,
            (EditGesture::Drag, _) => placement::moved_clip(&self.original, proposed, self.fps)?,
            (EditGesture::TrimStart, _) => {
                placement::trimmed_start(&self.original, proposed, self.fps)?
            }
            (EditGesture::TrimEnd, _) => placement::trimmed_end(&self.original, proposed, self.fps)?,
        };
        Ok(&self.preview)
    }

    /// Like [`update`], but gravitates the proposed time to the nearest snap
    /// point within `threshold` first. The edited clip's own points are
    /// ignored so it does not snap to itself. Slip drags never snap.
    ///
    /// [`update`]: EditSession::update
    pub fn update_snapped(
        &mut self,
        proposed: f64,
        points: &[SnapPoint],
        threshold: f64,
    ) -> Result<&Clip, EngineError> {
        if self.gesture == EditGesture::Drag && self.mode == EditMode::Slip {
            return self.update(proposed);
        }
        let own_source = self.original.id.to_string();
        let candidates: Vec<SnapPoint> = points
            .iter()
            .filter(|p| p.source != own_source)
            .cloned()
            .collect();
        let target = find_nearest_snap_point(proposed, &candidates, threshold, &[], self.fps)
            .map(|p| p.time)
            .unwrap_or(proposed);
        self.update(target)
    }

    /// Discard the gesture without committing.
    pub fn cancel(self) {
        log::debug!(
            "Cancelled {:?} gesture on clip '{}'",
            self.gesture,
            self.original.name
        );
    }
}

impl EditorEngine {
    /// Start a gesture on a clip. Fails up front on locked tracks so the UI
    /// never shows a preview it cannot commit.
    pub fn begin_edit(
        &self,
        track_id: Uuid,
        clip_id: Uuid,
        gesture: EditGesture,
        mode: EditMode,
    ) -> Result<EditSession, EngineError> {
        let state = self.read_state()?;
        let track = state
            .get_track(track_id)
            .ok_or_else(|| EngineError::NotFound(format!("Track {} not found", track_id)))?;
        Self::ensure_unlocked(track)?;
        let original = track
            .get_clip(clip_id)
            .ok_or_else(|| EngineError::NotFound(format!("Clip {} not found", clip_id)))?
            .clone();
        Ok(EditSession {
            track_id,
            gesture,
            mode,
            fps: state.fps,
            preview: original.clone(),
            original,
        })
    }

    /// Commit a finished gesture as a single history entry. A gesture whose
    /// preview never diverged from the original records nothing.
    pub fn commit_edit(&self, session: EditSession) -> Result<(), EngineError> {
        if session.preview == session.original {
            log::debug!(
                "Gesture on clip '{}' ended where it started; nothing to commit",
                session.original.name
            );
            return Ok(());
        }
        let clip_id = session.original.id;
        match (session.gesture, session.mode) {
            (EditGesture::Drag, EditMode::Slip) => self.slip_clip(
                session.track_id,
                clip_id,
                session.preview.media_offset - session.original.media_offset,
            ),
            (EditGesture::Drag, _) => {
                self.move_clip(session.track_id, clip_id, session.preview.start_time)
            }
            (EditGesture::TrimStart, _) => {
                self.trim_clip_start(session.track_id, clip_id, session.preview.start_time)
            }
            (EditGesture::TrimEnd, EditMode::Ripple) => {
                self.ripple_trim_end(session.track_id, clip_id, session.preview.end_time)
            }
            (EditGesture::TrimEnd, _) => {
                self.trim_clip_end(session.track_id, clip_id, session.preview.end_time)
            }
        }
    }
}
