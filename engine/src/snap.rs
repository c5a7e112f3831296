//! Snap engine: candidate snap-point generation and nearest-point queries
//! used by interactive dragging.

use ordered_float::OrderedFloat;

use crate::constants::snapping;
use crate::model::{Clip, Marker, Track};
use crate::time::{is_frame_aligned, snap_to_frame, time_to_frame};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SnapKind {
    ClipStart,
    ClipEnd,
    TrimStart,
    TrimEnd,
    Marker,
    Playhead,
    Frame,
}

impl std::fmt::Display for SnapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SnapKind::ClipStart => "clip-start",
            SnapKind::ClipEnd => "clip-end",
            SnapKind::TrimStart => "trim-start",
            SnapKind::TrimEnd => "trim-end",
            SnapKind::Marker => "marker",
            SnapKind::Playhead => "playhead",
            SnapKind::Frame => "frame",
        };
        write!(f, "{}", s)
    }
}

/// A candidate time value that interactive dragging gravitates to.
#[derive(Clone, PartialEq, Debug)]
pub struct SnapPoint {
    pub time: f64,
    pub kind: SnapKind,
    /// Id of the clip/marker that produced the point, or a synthetic
    /// `frame-N`/`playhead` label.
    pub source: String,
}

fn frame_point(time: f64, fps: f64) -> SnapPoint {
    SnapPoint {
        time,
        kind: SnapKind::Frame,
        source: format!("frame-{}", time_to_frame(time, fps)),
    }
}

/// Start/end points for a clip, plus trim points surfacing hidden media when
/// the clip does not consume its full source window.
pub fn clip_snap_points(clip: &Clip) -> Vec<SnapPoint> {
    let mut points = vec![
        SnapPoint {
            time: clip.start_time,
            kind: SnapKind::ClipStart,
            source: clip.id.to_string(),
        },
        SnapPoint {
            time: clip.end_time,
            kind: SnapKind::ClipEnd,
            source: clip.id.to_string(),
        },
    ];

    if clip.media_offset > 0.0 {
        points.push(SnapPoint {
            time: clip.start_time + clip.media_offset,
            kind: SnapKind::TrimStart,
            source: clip.id.to_string(),
        });
    }

    if clip.media_end() < clip.original_duration {
        points.push(SnapPoint {
            time: clip.start_time + clip.media_end(),
            kind: SnapKind::TrimEnd,
            source: clip.id.to_string(),
        });
    }

    points
}

/// Frame snap points in a bounded window around the current time. Skipped
/// entirely when the zoom is too high or the frames are packed too tightly,
/// which bounds point count at high zoom-out.
fn frame_snap_points(current_time: f64, zoom: f64, pixels_per_frame: f64, fps: f64) -> Vec<SnapPoint> {
    if zoom > snapping::MAX_FRAME_SNAP_ZOOM || pixels_per_frame < snapping::MIN_FRAME_PIXEL_SPACING {
        return Vec::new();
    }

    let current_frame = time_to_frame(current_time, fps);
    let mut points = Vec::new();
    for offset in -snapping::FRAME_SNAP_WINDOW..=snapping::FRAME_SNAP_WINDOW {
        let frame = current_frame + offset;
        if frame >= 0 {
            points.push(frame_point(frame as f64 / fps, fps));
        }
    }
    points
}

/// All snap candidates: clip points first, then markers, the playhead and
/// the bounded frame window. Generation order is the tie-break for
/// equal-distance matches in [`find_nearest_snap_point`].
pub fn all_snap_points(
    tracks: &[Track],
    markers: &[Marker],
    current_time: f64,
    zoom: f64,
    pixels_per_frame: f64,
    fps: f64,
) -> Vec<SnapPoint> {
    let mut points: Vec<SnapPoint> = tracks
        .iter()
        .flat_map(|track| track.clips.iter().flat_map(clip_snap_points))
        .collect();

    points.extend(markers.iter().map(|m| SnapPoint {
        time: m.time,
        kind: SnapKind::Marker,
        source: m.id.to_string(),
    }));

    points.push(SnapPoint {
        time: current_time,
        kind: SnapKind::Playhead,
        source: "playhead".to_string(),
    });

    points.extend(frame_snap_points(current_time, zoom, pixels_per_frame, fps));

    log::debug!(
        "Snap points generated: total={} zoom={} pixels_per_frame={}",
        points.len(),
        zoom,
        pixels_per_frame
    );

    points
}

/// Find the nearest snap point within `threshold` seconds of `time`.
///
/// Short-circuits to an exact frame point when `time` is already
/// frame-aligned. Otherwise the excluded kinds are filtered out, the
/// remaining points stably sorted by absolute distance (generation order
/// wins equal-distance ties) and the first within threshold returned,
/// falling back to the nearest frame boundary when that is within
/// threshold.
pub fn find_nearest_snap_point(
    time: f64,
    points: &[SnapPoint],
    threshold: f64,
    exclude: &[SnapKind],
    fps: f64,
) -> Option<SnapPoint> {
    if is_frame_aligned(time, fps) {
        return Some(frame_point(time, fps));
    }

    let mut candidates: Vec<&SnapPoint> = points
        .iter()
        .filter(|p| !exclude.contains(&p.kind))
        .collect();
    candidates.sort_by_key(|p| OrderedFloat((p.time - time).abs()));

    if let Some(nearest) = candidates.first() {
        if (nearest.time - time).abs() <= threshold {
            return Some((*nearest).clone());
        }
    }

    // No candidate in range: fall back to the frame grid.
    let rounded = snap_to_frame(time, fps);
    if (rounded - time).abs() < threshold {
        return Some(frame_point(rounded, fps));
    }

    None
}
