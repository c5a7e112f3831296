//! Active-clip resolution for playback: which clip is playing on each kind
//! of track, what source offset to decode at, and when to preload or
//! cross-fade into the next clip.

use uuid::Uuid;

use crate::constants::sync::PRELOAD_LOOKAHEAD;
use crate::model::{Clip, Track, TrackKind};

/// A resolved playing clip and the track it lives on.
#[derive(Clone, PartialEq, Debug)]
pub struct ActiveClip {
    pub track_id: Uuid,
    pub clip: Clip,
}

/// An overlap between the active clip and its successor, interpreted as a
/// cross-fade. `progress` runs 0 -> 1 over the overlapped span.
#[derive(Clone, PartialEq, Debug)]
pub struct ClipTransition {
    pub from: Clip,
    pub to: Clip,
    pub progress: f64,
}

/// Tracks which clip is active per track kind as the playhead moves.
/// Holds its own copy of the visible tracks, refreshed by the caller on
/// state-change notifications.
pub struct ClipSyncManager {
    tracks: Vec<Track>,
    current_time: f64,
}

impl Default for ClipSyncManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipSyncManager {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            current_time: 0.0,
        }
    }

    /// Refresh from the timeline's track list. Hidden tracks are dropped;
    /// order is preserved because earlier tracks win active-clip ties.
    pub fn update_tracks(&mut self, tracks: &[Track]) {
        self.tracks = tracks.iter().filter(|t| t.is_visible).cloned().collect();
        log::debug!("Clip sync tracking {} visible track(s)", self.tracks.len());
    }

    pub fn set_time(&mut self, time: f64) {
        self.current_time = time;
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// The clip under the playhead for a track kind. When several visible
    /// tracks have a clip at the current time, the first track in timeline
    /// order wins.
    pub fn active_clip(&self, kind: TrackKind) -> Option<ActiveClip> {
        self.tracks
            .iter()
            .filter(|t| t.kind == kind)
            .find_map(|t| {
                t.clip_at(self.current_time).map(|clip| ActiveClip {
                    track_id: t.id,
                    clip: clip.clone(),
                })
            })
    }

    /// Source-media time to decode for a clip at the current playhead.
    pub fn clip_offset(&self, clip: &Clip) -> f64 {
        clip.media_offset + (self.current_time - clip.start_time)
    }

    /// The earliest upcoming clip of a kind: minimum start time after the
    /// active clip's start (so an overlapping successor is found), or after
    /// the playhead when nothing is active. The active clip itself is
    /// excluded by id.
    pub fn next_clip(&self, kind: TrackKind) -> Option<ActiveClip> {
        let (horizon, active_id) = match self.active_clip(kind) {
            Some(active) => (active.clip.start_time, Some(active.clip.id)),
            None => (self.current_time, None),
        };

        let mut next: Option<ActiveClip> = None;
        for track in self.tracks.iter().filter(|t| t.kind == kind) {
            for clip in &track.clips {
                if clip.start_time > horizon && Some(clip.id) != active_id {
                    let is_earlier = next
                        .as_ref()
                        .map(|n| clip.start_time < n.clip.start_time)
                        .unwrap_or(true);
                    if is_earlier {
                        next = Some(ActiveClip {
                            track_id: track.id,
                            clip: clip.clone(),
                        });
                    }
                }
            }
        }
        next
    }

    /// Whether the active clip's remaining duration is within the preload
    /// lookahead window. False when nothing is active.
    pub fn should_preload_next(&self, kind: TrackKind) -> bool {
        self.active_clip(kind)
            .map(|active| active.clip.end_time - self.current_time <= PRELOAD_LOOKAHEAD)
            .unwrap_or(false)
    }

    /// The in-progress cross-fade, if the active clip overlaps its successor
    /// and the playhead is inside the overlapped span.
    pub fn active_transition(&self, kind: TrackKind) -> Option<ClipTransition> {
        let active = self.active_clip(kind)?;
        let next = self.next_clip(kind)?;

        if active.clip.end_time <= next.clip.start_time {
            return None;
        }
        if self.current_time < next.clip.start_time {
            return None;
        }

        let span = active.clip.end_time - next.clip.start_time;
        let progress = if span > 0.0 {
            ((self.current_time - next.clip.start_time) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        Some(ClipTransition {
            from: active.clip,
            to: next.clip,
            progress,
        })
    }
}
