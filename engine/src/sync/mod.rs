//! Playback synchronization: the frame-quantized playback clock and
//! active-clip resolution.

mod clip_sync;
mod sync_manager;

pub use clip_sync::{ActiveClip, ClipSyncManager, ClipTransition};
pub use sync_manager::{SyncManager, SyncState};
