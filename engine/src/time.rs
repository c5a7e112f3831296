//! Frame-accurate time math: second/frame/pixel conversions and timecode
//! formatting. All functions are pure and total over their inputs; committed
//! edit operations route boundary times through [`snap_to_frame`].

use crate::constants::{scale, FRAME_EPSILON};

/// Convert a time in seconds to the nearest frame index.
pub fn time_to_frame(time: f64, fps: f64) -> i64 {
    (time * fps).round() as i64
}

/// Convert a frame index to a time in seconds.
pub fn frame_to_time(frame: i64, fps: f64) -> f64 {
    frame as f64 / fps
}

/// Check whether a time value lies on a frame boundary, within epsilon.
pub fn is_frame_aligned(time: f64, fps: f64) -> bool {
    (time - snap_to_frame(time, fps)).abs() < FRAME_EPSILON
}

/// Quantize a time value to the nearest frame boundary. Idempotent.
pub fn snap_to_frame(time: f64, fps: f64) -> f64 {
    frame_to_time(time_to_frame(time, fps), fps)
}

/// Convert timeline time to display pixels at the given zoom level.
pub fn time_to_pixels(time: f64, zoom: f64) -> f64 {
    time * scale::PIXELS_PER_SECOND * zoom
}

/// Convert display pixels to timeline time at the given zoom level.
pub fn pixels_to_time(pixels: f64, zoom: f64) -> f64 {
    pixels / (scale::PIXELS_PER_SECOND * zoom)
}

/// Format a time value as `HH:MM:SS:FF`.
pub fn format_timecode(time: f64, fps: f64) -> String {
    let time = time.max(0.0);
    let total_frames = time_to_frame(time, fps);
    let frames = total_frames % fps.round() as i64;
    let total_seconds = (total_frames as f64 / fps).floor() as i64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}:{:02}", hours, minutes, seconds, frames)
}

/// Parse a timecode string into seconds. Accepts `HH:MM:SS:FF`, `HH:MM:SS`,
/// `MM:SS` and plain `SS`; returns `None` for anything else.
pub fn parse_timecode(input: &str, fps: f64) -> Option<f64> {
    if input.is_empty() {
        return None;
    }
    let parts: Vec<f64> = input
        .split(':')
        .map(|p| p.trim().parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;
    let seconds = match parts.as_slice() {
        [h, m, s, f] => h * 3600.0 + m * 60.0 + s + f / fps,
        [h, m, s] => h * 3600.0 + m * 60.0 + s,
        [m, s] => m * 60.0 + s,
        [s] => *s,
        _ => return None,
    };
    Some(seconds)
}
