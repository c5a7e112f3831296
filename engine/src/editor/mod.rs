//! The editing side of the engine: the owned editor context, committed clip
//! and track operations, ripple edits, and interactive gesture sessions.

mod clip_ops;
mod editor_engine;
mod interaction;
pub mod placement;
mod ripple_ops;
mod track_ops;

pub use editor_engine::{EditorEngine, EngineEvent};
pub use interaction::{EditGesture, EditMode, EditSession};
