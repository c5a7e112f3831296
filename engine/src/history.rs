//! History engine: an explicit operation log.
//!
//! Every committed mutation records a pair of patch lists: forward ops that
//! reproduce the mutation and inverse ops that revert it. Structural actions
//! (add/remove track, add/remove/split clip, track reorder) are checkpoints
//! that additionally carry a full state snapshot, making restoration of that
//! index O(1) instead of requiring patch replay.
//!
//! Undo/redo apply patches against a scratch copy of the state and swap on
//! success: a corrupt entry aborts only that call and leaves the state at its
//! last known-good point.

use std::time::SystemTime;

use uuid::Uuid;

use crate::constants::history::MAX_HISTORY_SIZE;
use crate::error::EngineError;
use crate::model::{Clip, Marker, TimelineState, Track};

/// One reversible state mutation. Each edit operation knows its own inverse,
/// so entries store `(forward, inverse)` op pairs directly rather than a
/// generic structural diff.
#[derive(Clone, PartialEq, Debug)]
pub enum PatchOp {
    ReplaceClip { track_id: Uuid, clip: Clip },
    InsertClip { track_id: Uuid, index: usize, clip: Clip },
    RemoveClip { track_id: Uuid, clip_id: Uuid },
    InsertTrack { index: usize, track: Track },
    RemoveTrack { track_id: Uuid },
    ReplaceTrack { track: Track },
    MoveTrack { from: usize, to: usize },
    InsertMarker { marker: Marker },
    RemoveMarker { marker_id: Uuid },
    ReplaceMarker { marker: Marker },
    SetFps { fps: f64 },
}

/// Apply a single patch to the state. A patch that references a missing
/// track/clip/marker indicates history corruption and fails with
/// [`EngineError::History`].
pub fn apply_patch(state: &mut TimelineState, op: &PatchOp) -> Result<(), EngineError> {
    match op {
        PatchOp::ReplaceClip { track_id, clip } => {
            let existing = state.get_clip_mut(*track_id, clip.id).ok_or_else(|| {
                EngineError::History(format!("Clip {} not found during patch replay", clip.id))
            })?;
            *existing = clip.clone();
        }
        PatchOp::InsertClip { track_id, index, clip } => {
            let track = state.get_track_mut(*track_id).ok_or_else(|| {
                EngineError::History(format!("Track {} not found during patch replay", track_id))
            })?;
            let index = (*index).min(track.clips.len());
            track.clips.insert(index, clip.clone());
        }
        PatchOp::RemoveClip { track_id, clip_id } => {
            let track = state.get_track_mut(*track_id).ok_or_else(|| {
                EngineError::History(format!("Track {} not found during patch replay", track_id))
            })?;
            track.remove_clip(*clip_id).ok_or_else(|| {
                EngineError::History(format!("Clip {} not found during patch replay", clip_id))
            })?;
        }
        PatchOp::InsertTrack { index, track } => {
            let index = (*index).min(state.tracks.len());
            state.tracks.insert(index, track.clone());
        }
        PatchOp::RemoveTrack { track_id } => {
            let index = state.track_index(*track_id).ok_or_else(|| {
                EngineError::History(format!("Track {} not found during patch replay", track_id))
            })?;
            state.tracks.remove(index);
        }
        PatchOp::ReplaceTrack { track } => {
            let existing = state.get_track_mut(track.id).ok_or_else(|| {
                EngineError::History(format!("Track {} not found during patch replay", track.id))
            })?;
            *existing = track.clone();
        }
        PatchOp::MoveTrack { from, to } => {
            if *from >= state.tracks.len() || *to >= state.tracks.len() {
                return Err(EngineError::History(format!(
                    "Track move {} -> {} out of bounds during patch replay",
                    from, to
                )));
            }
            let track = state.tracks.remove(*from);
            state.tracks.insert(*to, track);
        }
        PatchOp::InsertMarker { marker } => {
            state.markers.push(marker.clone());
        }
        PatchOp::RemoveMarker { marker_id } => {
            let index = state
                .markers
                .iter()
                .position(|m| m.id == *marker_id)
                .ok_or_else(|| {
                    EngineError::History(format!(
                        "Marker {} not found during patch replay",
                        marker_id
                    ))
                })?;
            state.markers.remove(index);
        }
        PatchOp::ReplaceMarker { marker } => {
            let existing = state.get_marker_mut(marker.id).ok_or_else(|| {
                EngineError::History(format!(
                    "Marker {} not found during patch replay",
                    marker.id
                ))
            })?;
            *existing = marker.clone();
        }
        PatchOp::SetFps { fps } => {
            state.fps = *fps;
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EntryKind {
    /// Simple property update; forward/inverse patches only.
    Partial,
    /// Structural change; carries a full snapshot of the post-entry state.
    Full,
}

/// Append-only record of one committed mutation. Entries are never mutated
/// after creation, only traversed.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub kind: EntryKind,
    pub description: String,
    pub timestamp: SystemTime,
    /// Ops that reproduce the mutation, in application order.
    pub forward: Vec<PatchOp>,
    /// Ops that revert the mutation, in application order.
    pub inverse: Vec<PatchOp>,
    /// Post-entry state for `Full` entries.
    pub snapshot: Option<TimelineState>,
}

impl HistoryEntry {
    pub fn partial(description: &str, forward: Vec<PatchOp>, inverse: Vec<PatchOp>) -> Self {
        Self {
            kind: EntryKind::Partial,
            description: description.to_string(),
            timestamp: SystemTime::now(),
            forward,
            inverse,
            snapshot: None,
        }
    }

    pub fn full(
        description: &str,
        forward: Vec<PatchOp>,
        inverse: Vec<PatchOp>,
        snapshot: TimelineState,
    ) -> Self {
        Self {
            kind: EntryKind::Full,
            description: description.to_string(),
            timestamp: SystemTime::now(),
            forward,
            inverse,
            snapshot: Some(snapshot),
        }
    }
}

/// Entry list with an index cursor. `current_index == -1` means "before the
/// first entry"; entry `i` describes the transition from state `i-1` to
/// state `i`.
pub struct HistoryEngine {
    entries: Vec<HistoryEntry>,
    current_index: isize,
    max_entries: usize,
}

impl Default for HistoryEngine {
    fn default() -> Self {
        Self::new(MAX_HISTORY_SIZE)
    }
}

impl HistoryEngine {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            current_index: -1,
            max_entries,
        }
    }

    /// Record a new entry at the cursor, discarding any redo tail and
    /// enforcing the size cap.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate((self.current_index + 1) as usize);
        log::debug!(
            "History push: '{}' kind={:?} entries={}",
            entry.description,
            entry.kind,
            self.entries.len() + 1
        );
        self.entries.push(entry);
        self.current_index = self.entries.len() as isize - 1;

        while self.entries.len() > self.max_entries {
            self.entries.remove(0);
            self.current_index -= 1;
        }
    }

    pub fn can_undo(&self) -> bool {
        self.current_index >= 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index < self.entries.len() as isize - 1
    }

    pub fn current_index(&self) -> isize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn description(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.description.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_index = -1;
    }

    /// Revert the entry at the cursor. Returns `Ok(false)` when there is
    /// nothing to undo. All inverse patches are applied to a scratch copy;
    /// the live state is replaced only on success.
    pub fn undo(&mut self, state: &mut TimelineState) -> Result<bool, EngineError> {
        if self.current_index < 0 {
            return Ok(false);
        }
        let entry = &self.entries[self.current_index as usize];
        let mut scratch = state.clone();
        for op in &entry.inverse {
            apply_patch(&mut scratch, op)?;
        }
        log::debug!(
            "Undo '{}' -> index {}",
            entry.description,
            self.current_index - 1
        );
        *state = scratch;
        self.current_index -= 1;
        Ok(true)
    }

    /// Re-apply the entry after the cursor. Returns `Ok(false)` when there
    /// is nothing to redo.
    pub fn redo(&mut self, state: &mut TimelineState) -> Result<bool, EngineError> {
        if !self.can_redo() {
            return Ok(false);
        }
        let entry = &self.entries[(self.current_index + 1) as usize];
        let mut scratch = state.clone();
        for op in &entry.forward {
            apply_patch(&mut scratch, op)?;
        }
        log::debug!(
            "Redo '{}' -> index {}",
            entry.description,
            self.current_index + 1
        );
        *state = scratch;
        self.current_index += 1;
        Ok(true)
    }

    /// Reconstruct the state at an arbitrary history index (`-1` is the
    /// state before the first entry). Checkpoint indices restore from their
    /// snapshot in O(1); other indices replay patches forward or inverse
    /// from the current cursor.
    pub fn state_at(
        &self,
        index: isize,
        current_state: &TimelineState,
    ) -> Result<TimelineState, EngineError> {
        if index < -1 || index >= self.entries.len() as isize {
            return Err(EngineError::NotFound(format!(
                "History index {} out of range",
                index
            )));
        }
        if index == self.current_index {
            return Ok(current_state.clone());
        }
        if index >= 0 {
            let entry = &self.entries[index as usize];
            if entry.kind == EntryKind::Full {
                let snapshot = entry.snapshot.as_ref().ok_or_else(|| {
                    EngineError::History(format!(
                        "Checkpoint entry '{}' is missing its snapshot",
                        entry.description
                    ))
                })?;
                return Ok(snapshot.clone());
            }
        }

        let mut state = current_state.clone();
        if index < self.current_index {
            for i in ((index + 1)..=self.current_index).rev() {
                for op in &self.entries[i as usize].inverse {
                    apply_patch(&mut state, op)?;
                }
            }
        } else {
            for i in (self.current_index + 1)..=index {
                for op in &self.entries[i as usize].forward {
                    apply_patch(&mut state, op)?;
                }
            }
        }
        Ok(state)
    }
}
