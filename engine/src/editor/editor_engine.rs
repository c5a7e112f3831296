//! Owned editing context: timeline state, history and change subscribers
//! behind one handle. All committed mutations go through the operation
//! methods so that every change is recorded and announced.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::EngineError;
use crate::history::{HistoryEngine, HistoryEntry, PatchOp};
use crate::model::{TimelineState, Track};

/// Notification emitted after a committed mutation or a history traversal.
#[derive(Clone, Debug)]
pub enum EngineEvent {
    /// A committed edit changed the timeline state.
    StateChanged { description: String },
    /// Undo/redo moved the history cursor to `index` (`-1` = initial state).
    HistoryMoved { index: isize },
}

type EventCallback = Box<dyn Fn(&EngineEvent) + Send + Sync>;

/// The editing engine. Cheap to clone state handles out of, safe to share
/// across threads; consumers subscribe for change notifications instead of
/// polling.
pub struct EditorEngine {
    state: Arc<RwLock<TimelineState>>,
    history: RwLock<HistoryEngine>,
    subscribers: RwLock<Vec<(u64, EventCallback)>>,
    next_subscriber_id: AtomicU64,
}

impl EditorEngine {
    pub fn new(state: TimelineState) -> Self {
        Self::from_shared(Arc::new(RwLock::new(state)))
    }

    /// Build around an existing shared state, e.g. one also handed to a
    /// playback sync manager.
    pub fn from_shared(state: Arc<RwLock<TimelineState>>) -> Self {
        Self {
            state,
            history: RwLock::new(HistoryEngine::default()),
            subscribers: RwLock::new(Vec::new()),
            next_subscriber_id: AtomicU64::new(0),
        }
    }

    /// Shared handle to the timeline state for read-side consumers.
    pub fn state_handle(&self) -> Arc<RwLock<TimelineState>> {
        Arc::clone(&self.state)
    }

    /// Run a closure against the current state.
    pub fn with_state<F, R>(&self, f: F) -> Result<R, EngineError>
    where
        F: FnOnce(&TimelineState) -> R,
    {
        let state = self.read_state()?;
        Ok(f(&state))
    }

    pub(crate) fn read_state(&self) -> Result<RwLockReadGuard<'_, TimelineState>, EngineError> {
        self.state
            .read()
            .map_err(|_| EngineError::Runtime("Timeline state lock poisoned".to_string()))
    }

    pub(crate) fn write_state(&self) -> Result<RwLockWriteGuard<'_, TimelineState>, EngineError> {
        self.state
            .write()
            .map_err(|_| EngineError::Runtime("Timeline state lock poisoned".to_string()))
    }

    pub(crate) fn ensure_unlocked(track: &Track) -> Result<(), EngineError> {
        if track.is_locked {
            log::warn!("Rejected edit on locked track '{}'", track.name);
            return Err(EngineError::LockedTrack(track.name.clone()));
        }
        Ok(())
    }

    /// Record a property-level edit and notify subscribers.
    pub(crate) fn record_partial(
        &self,
        description: &str,
        forward: Vec<PatchOp>,
        inverse: Vec<PatchOp>,
    ) -> Result<(), EngineError> {
        self.push_entry(HistoryEntry::partial(description, forward, inverse))?;
        self.publish(&EngineEvent::StateChanged {
            description: description.to_string(),
        });
        Ok(())
    }

    /// Record a structural edit with its checkpoint snapshot and notify
    /// subscribers.
    pub(crate) fn record_full(
        &self,
        description: &str,
        forward: Vec<PatchOp>,
        inverse: Vec<PatchOp>,
        snapshot: TimelineState,
    ) -> Result<(), EngineError> {
        self.push_entry(HistoryEntry::full(description, forward, inverse, snapshot))?;
        self.publish(&EngineEvent::StateChanged {
            description: description.to_string(),
        });
        Ok(())
    }

    fn push_entry(&self, entry: HistoryEntry) -> Result<(), EngineError> {
        let mut history = self
            .history
            .write()
            .map_err(|_| EngineError::Runtime("History lock poisoned".to_string()))?;
        history.push(entry);
        Ok(())
    }

    /// Register a change listener. Returns an id for [`unsubscribe`].
    ///
    /// [`unsubscribe`]: EditorEngine::unsubscribe
    pub fn subscribe<F>(&self, callback: F) -> u64
    where
        F: Fn(&EngineEvent) + Send + Sync + 'static,
    {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut subscribers) = self.subscribers.write() {
            subscribers.push((id, Box::new(callback)));
        }
        id
    }

    pub fn unsubscribe(&self, id: u64) {
        if let Ok(mut subscribers) = self.subscribers.write() {
            subscribers.retain(|(sub_id, _)| *sub_id != id);
        }
    }

    fn publish(&self, event: &EngineEvent) {
        if let Ok(subscribers) = self.subscribers.read() {
            for (_, callback) in subscribers.iter() {
                callback(event);
            }
        }
    }

    /// Revert the most recent committed edit. `Ok(false)` when the history
    /// is already at the initial state.
    pub fn undo(&self) -> Result<bool, EngineError> {
        let mut history = self
            .history
            .write()
            .map_err(|_| EngineError::Runtime("History lock poisoned".to_string()))?;
        let mut state = self.write_state()?;
        let moved = history.undo(&mut state)?;
        let index = history.current_index();
        drop(state);
        drop(history);
        if moved {
            self.publish(&EngineEvent::HistoryMoved { index });
        }
        Ok(moved)
    }

    /// Re-apply the next edit after the cursor. `Ok(false)` when there is
    /// nothing to redo.
    pub fn redo(&self) -> Result<bool, EngineError> {
        let mut history = self
            .history
            .write()
            .map_err(|_| EngineError::Runtime("History lock poisoned".to_string()))?;
        let mut state = self.write_state()?;
        let moved = history.redo(&mut state)?;
        let index = history.current_index();
        drop(state);
        drop(history);
        if moved {
            self.publish(&EngineEvent::HistoryMoved { index });
        }
        Ok(moved)
    }

    pub fn can_undo(&self) -> bool {
        self.history.read().map(|h| h.can_undo()).unwrap_or(false)
    }

    pub fn can_redo(&self) -> bool {
        self.history.read().map(|h| h.can_redo()).unwrap_or(false)
    }

    pub fn history_len(&self) -> usize {
        self.history.read().map(|h| h.len()).unwrap_or(0)
    }

    pub fn history_index(&self) -> isize {
        self.history.read().map(|h| h.current_index()).unwrap_or(-1)
    }

    pub fn history_description(&self, index: usize) -> Option<String> {
        self.history
            .read()
            .ok()
            .and_then(|h| h.description(index).map(str::to_string))
    }

    /// Reconstruct the timeline as it was at a given history index without
    /// moving the cursor (history inspection / preview).
    pub fn state_at(&self, index: isize) -> Result<TimelineState, EngineError> {
        let history = self
            .history
            .read()
            .map_err(|_| EngineError::Runtime("History lock poisoned".to_string()))?;
        let state = self.read_state()?;
        history.state_at(index, &state)
    }

    pub fn clear_history(&self) -> Result<(), EngineError> {
        let mut history = self
            .history
            .write()
            .map_err(|_| EngineError::Runtime("History lock poisoned".to_string()))?;
        history.clear();
        Ok(())
    }
}
