use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clip::{Clip, TrackKind};

/// A track owns its clips. Clip order in the vector is insertion order and
/// carries no temporal meaning; clips are positioned by time. Tracks earlier
/// in the timeline's track list win active-clip ties during playback.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Track {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TrackKind,
    #[serde(default)]
    pub clips: Vec<Clip>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_muted: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub allow_overlap: bool,
}

fn default_visible() -> bool {
    true
}

impl Track {
    pub fn new(name: &str, kind: TrackKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind,
            clips: Vec::new(),
            is_visible: true,
            is_muted: false,
            is_locked: false,
            allow_overlap: false,
        }
    }

    pub fn get_clip(&self, clip_id: Uuid) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == clip_id)
    }

    pub fn get_clip_mut(&mut self, clip_id: Uuid) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == clip_id)
    }

    pub fn clip_index(&self, clip_id: Uuid) -> Option<usize> {
        self.clips.iter().position(|c| c.id == clip_id)
    }

    /// Remove a clip by id, returning it if present.
    pub fn remove_clip(&mut self, clip_id: Uuid) -> Option<Clip> {
        let index = self.clip_index(clip_id)?;
        Some(self.clips.remove(index))
    }

    /// First clip whose `[start_time, end_time)` contains the given time.
    pub fn clip_at(&self, time: f64) -> Option<&Clip> {
        self.clips.iter().find(|c| c.contains(time))
    }

    /// Whether the candidate would overlap any existing clip, ignoring the
    /// clip with `exclude` id (used when repositioning an existing clip).
    pub fn would_overlap(&self, candidate: &Clip, exclude: Option<Uuid>) -> bool {
        self.clips
            .iter()
            .filter(|c| Some(c.id) != exclude)
            .any(|c| c.overlaps(candidate))
    }

    /// End time of the last clip, or 0 for an empty track.
    pub fn span(&self) -> f64 {
        self.clips
            .iter()
            .map(|c| c.end_time)
            .fold(0.0, f64::max)
    }
}
