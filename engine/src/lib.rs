pub mod constants;
pub mod editor;
pub mod error;
pub mod history;
pub mod layers;
pub mod model;
pub mod snap;
pub mod sync;
pub mod time;

pub use editor::{EditGesture, EditMode, EditSession, EditorEngine, EngineEvent};
pub use error::EngineError;
pub use history::{apply_patch, EntryKind, HistoryEngine, HistoryEntry, PatchOp};
pub use model::{
    CaptionCue, Clip, ClipPayload, Marker, TimelineState, Track, TrackKind, Transform, Vec2,
};
pub use snap::{SnapKind, SnapPoint};
pub use sync::{ActiveClip, ClipSyncManager, ClipTransition, SyncManager, SyncState};
