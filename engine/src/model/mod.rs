pub mod clip;
pub mod marker;
pub mod timeline;
pub mod track;

pub use clip::{CaptionCue, Clip, ClipPayload, TrackKind, Transform, Vec2};
pub use marker::Marker;
pub use timeline::TimelineState;
pub use track::Track;
