use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clip::Clip;
use super::marker::Marker;
use super::track::Track;
use crate::constants::DEFAULT_FPS;

/// The authoritative timeline model: tracks (which own their clips), markers
/// and the configured frame rate. Plain structured data; persistence of the
/// encoding is a host concern.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct TimelineState {
    pub name: String,
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

fn default_fps() -> f64 {
    DEFAULT_FPS
}

impl TimelineState {
    pub fn new(name: &str, fps: f64) -> Self {
        Self {
            name: name.to_string(),
            fps,
            tracks: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn load(json_str: &str) -> Result<Self, serde_json::Error> {
        let state: TimelineState = serde_json::from_str(json_str)?;
        Ok(state)
    }

    pub fn save(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn get_track(&self, track_id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    pub fn get_track_mut(&mut self, track_id: Uuid) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == track_id)
    }

    pub fn track_index(&self, track_id: Uuid) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == track_id)
    }

    /// Helper to get a clip inside a track.
    pub fn get_clip(&self, track_id: Uuid, clip_id: Uuid) -> Option<&Clip> {
        self.get_track(track_id)?.get_clip(clip_id)
    }

    /// Helper to get a mutable clip inside a track.
    pub fn get_clip_mut(&mut self, track_id: Uuid, clip_id: Uuid) -> Option<&mut Clip> {
        self.get_track_mut(track_id)?.get_clip_mut(clip_id)
    }

    pub fn get_marker(&self, marker_id: Uuid) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == marker_id)
    }

    pub fn get_marker_mut(&mut self, marker_id: Uuid) -> Option<&mut Marker> {
        self.markers.iter_mut().find(|m| m.id == marker_id)
    }

    /// Total timeline duration: the latest clip end across all tracks.
    pub fn duration(&self) -> f64 {
        self.tracks.iter().map(|t| t.span()).fold(0.0, f64::max)
    }
}
