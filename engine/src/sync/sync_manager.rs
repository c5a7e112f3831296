//! Playback clock: frame-quantized time, dropped-frame accounting and drift
//! compensation.
//!
//! Timestamps are injected as milliseconds rather than read from a system
//! clock, so drift logic is deterministic under test and the caller decides
//! which clock drives playback.

use crate::constants::sync::{DRIFT_THRESHOLD_MS, MAX_DRIFT_COMPENSATION};
use crate::error::EngineError;
use crate::time::snap_to_frame;

/// Observable playback state. Every field is frame-rate aware:
/// `current_time` is always frame-quantized.
#[derive(Clone, PartialEq, Debug)]
pub struct SyncState {
    pub current_time: f64,
    pub is_playing: bool,
    pub frame_rate: f64,
    pub dropped_frames: u64,
    /// Timestamp of the last clock update, in milliseconds. Zero until the
    /// first update after `start`.
    pub last_frame_timestamp: f64,
}

type SyncCallback = Box<dyn Fn(&SyncState) + Send>;

/// The playback clock. Owned by the playback loop; not a shared service.
pub struct SyncManager {
    state: SyncState,
    subscribers: Vec<(u64, SyncCallback)>,
    next_subscriber_id: u64,
}

impl SyncManager {
    pub fn new(frame_rate: f64) -> Self {
        Self {
            state: SyncState {
                current_time: 0.0,
                is_playing: false,
                frame_rate,
                dropped_frames: 0,
                last_frame_timestamp: 0.0,
            },
            subscribers: Vec::new(),
            next_subscriber_id: 0,
        }
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.state.frame_rate
    }

    /// Begin playback at the injected timestamp. Dropped-frame accounting
    /// restarts from here.
    pub fn start(&mut self, timestamp_ms: f64) {
        self.state.is_playing = true;
        self.state.last_frame_timestamp = timestamp_ms;
        self.state.dropped_frames = 0;
        log::debug!("Playback started at {:.3}s", self.state.current_time);
        self.notify();
    }

    pub fn stop(&mut self) {
        self.state.is_playing = false;
        log::debug!(
            "Playback stopped at {:.3}s (dropped frames: {})",
            self.state.current_time,
            self.state.dropped_frames
        );
        self.notify();
    }

    /// Seek to a time; the target is quantized to the frame grid.
    pub fn set_time(&mut self, time: f64) {
        self.state.current_time = snap_to_frame(time.max(0.0), self.state.frame_rate);
        self.notify();
    }

    /// Advance the clock to `new_time` at the injected timestamp. While
    /// playing, compares frames elapsed on the wall clock against frames
    /// actually advanced and accumulates the shortfall as dropped frames.
    pub fn update_time(&mut self, new_time: f64, timestamp_ms: f64) {
        let snapped = snap_to_frame(new_time.max(0.0), self.state.frame_rate);

        if self.state.is_playing && self.state.last_frame_timestamp > 0.0 {
            let elapsed_ms = timestamp_ms - self.state.last_frame_timestamp;
            let expected = (elapsed_ms / self.frame_interval_ms()).floor() as i64;
            let actual = ((snapped - self.state.current_time).abs() * self.state.frame_rate)
                .round() as i64;
            if expected > actual {
                let dropped = (expected - actual) as u64;
                self.state.dropped_frames += dropped;
                log::warn!(
                    "Dropped {} frame(s): expected {} advanced {} over {:.1}ms",
                    dropped,
                    expected,
                    actual,
                    elapsed_ms
                );
            }
        }

        self.state.current_time = snapped;
        self.state.last_frame_timestamp = timestamp_ms;
        self.notify();
    }

    pub fn set_frame_rate(&mut self, frame_rate: f64) -> Result<(), EngineError> {
        if frame_rate <= 0.0 || !frame_rate.is_finite() {
            return Err(EngineError::Validation(format!(
                "Invalid frame rate: {}",
                frame_rate
            )));
        }
        self.state.frame_rate = frame_rate;
        self.state.current_time = snap_to_frame(self.state.current_time, frame_rate);
        self.notify();
        Ok(())
    }

    pub fn reset_dropped_frames(&mut self) {
        self.state.dropped_frames = 0;
    }

    /// Whether the gap since the last update deviates from one frame
    /// interval by more than the drift threshold, in either direction.
    pub fn needs_drift_compensation(&self, now_ms: f64) -> bool {
        if !self.state.is_playing || self.state.last_frame_timestamp <= 0.0 {
            return false;
        }
        let elapsed_ms = now_ms - self.state.last_frame_timestamp;
        (elapsed_ms - self.frame_interval_ms()).abs() > DRIFT_THRESHOLD_MS
    }

    /// Seconds to nudge the clock to re-align with the wall clock. Positive
    /// for a late tick, negative for an early one, clamped to a small step
    /// so neither a stall nor a clock jump causes a visible skip.
    pub fn drift_compensation(&self, now_ms: f64) -> f64 {
        let elapsed_ms = now_ms - self.state.last_frame_timestamp;
        let drift_ms = elapsed_ms - self.frame_interval_ms();
        (drift_ms / 1000.0).clamp(-MAX_DRIFT_COMPENSATION, MAX_DRIFT_COMPENSATION)
    }

    /// Register a state listener. Returns an id for [`unsubscribe`].
    ///
    /// [`unsubscribe`]: SyncManager::unsubscribe
    pub fn subscribe<F>(&mut self, callback: F) -> u64
    where
        F: Fn(&SyncState) + Send + 'static,
    {
        let id = self.next_subscriber_id;
        self.next_subscriber_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: u64) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    fn notify(&self) {
        for (_, callback) in &self.subscribers {
            callback(&self.state);
        }
    }
}
