use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")] // Serialize as "video", "audio", "caption"
pub enum TrackKind {
    Video,
    Audio,
    Caption,
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TrackKind::Video => "video",
            TrackKind::Audio => "audio",
            TrackKind::Caption => "caption",
        };
        write!(f, "{}", s)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Default for Vec2 {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Visual placement of a video clip on the canvas.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Transform {
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub position: Vec2,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: 0.0,
            position: Vec2::default(),
            opacity: 1.0,
        }
    }
}

/// A single timed caption cue.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct CaptionCue {
    pub id: Uuid,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Type-specific clip payload, discriminated by capability.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClipPayload {
    Video {
        src: String,
        #[serde(default)]
        transform: Transform,
    },
    Audio {
        src: String,
        #[serde(default = "default_volume")]
        volume: f64,
        #[serde(default)]
        is_muted: bool,
    },
    Caption {
        #[serde(default)]
        text: String,
        #[serde(default)]
        cues: Vec<CaptionCue>,
    },
}

/// A time-bounded reference to a segment of source media placed on a track.
///
/// Timeline placement is `[start_time, end_time)` in seconds; the clip's
/// content begins `media_offset` seconds into the source, with
/// `media_duration` seconds of source media available from that offset.
/// `layer` is derived by layer assignment and never authoritative.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Clip {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default)]
    pub media_offset: f64,
    pub media_duration: f64,
    /// Full duration of the source media, for trim-extension limits.
    #[serde(default)]
    pub original_duration: f64,
    /// Duration the clip had when first placed on the timeline.
    #[serde(default)]
    pub initial_duration: f64,
    #[serde(default)]
    pub layer: u32,
    #[serde(flatten)]
    pub payload: ClipPayload,
}

impl Clip {
    pub fn video(name: &str, src: &str, start_time: f64, media_duration: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            start_time,
            end_time: start_time + media_duration,
            media_offset: 0.0,
            media_duration,
            original_duration: media_duration,
            initial_duration: media_duration,
            layer: 0,
            payload: ClipPayload::Video {
                src: src.to_string(),
                transform: Transform::default(),
            },
        }
    }

    pub fn audio(name: &str, src: &str, start_time: f64, media_duration: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            start_time,
            end_time: start_time + media_duration,
            media_offset: 0.0,
            media_duration,
            original_duration: media_duration,
            initial_duration: media_duration,
            layer: 0,
            payload: ClipPayload::Audio {
                src: src.to_string(),
                volume: 1.0,
                is_muted: false,
            },
        }
    }

    pub fn caption(name: &str, text: &str, start_time: f64, duration: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            start_time,
            end_time: start_time + duration,
            media_offset: 0.0,
            media_duration: duration,
            original_duration: duration,
            initial_duration: duration,
            layer: 0,
            payload: ClipPayload::Caption {
                text: text.to_string(),
                cues: Vec::new(),
            },
        }
    }

    pub fn kind(&self) -> TrackKind {
        match self.payload {
            ClipPayload::Video { .. } => TrackKind::Video,
            ClipPayload::Audio { .. } => TrackKind::Audio,
            ClipPayload::Caption { .. } => TrackKind::Caption,
        }
    }

    /// Duration on the timeline in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// End of the media window in source-media time.
    pub fn media_end(&self) -> f64 {
        self.media_offset + self.media_duration
    }

    /// Whether a timeline position falls within `[start_time, end_time)`.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time
    }

    /// Whether this clip overlaps another in timeline space.
    /// Adjacent clips (touching at boundaries) do not overlap.
    pub fn overlaps(&self, other: &Clip) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

const fn default_scale() -> f64 {
    1.0
}

const fn default_opacity() -> f64 {
    1.0
}

const fn default_volume() -> f64 {
    1.0
}
