//! Layer assignment: resolves overlapping clips on a track into
//! non-overlapping render layers via greedy graph coloring.
//!
//! The heuristic is largest-degree-first greedy coloring: deterministic and
//! bounded by `MAX_LAYERS`, but not guaranteed to reach the minimum chromatic
//! number.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::constants::layers::{LAYER_SPACING, MAX_LAYERS, MIN_LAYER_HEIGHT};
use crate::model::{Clip, Track};

struct LayerGroup {
    end_time: f64,
    clips: Vec<Clip>,
}

/// Assign a render layer to every clip. Output preserves the input ordering;
/// `layer` is view metadata, not position.
///
/// Tracks with `allow_overlap == false` place every clip on layer 0; their
/// clips cannot overlap by construction.
pub fn assign_layers(clips: &[Clip], track: &Track) -> Vec<Clip> {
    if !track.allow_overlap {
        return clips
            .iter()
            .map(|clip| Clip { layer: 0, ..clip.clone() })
            .collect();
    }

    let mut sorted: Vec<Clip> = clips.to_vec();
    sorted.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    // Group temporally-connected clips: a clip joins a group when it starts
    // before the group's current max end.
    let mut groups: Vec<LayerGroup> = Vec::new();
    for clip in sorted {
        let mut added = false;
        for group in groups.iter_mut() {
            if clip.start_time < group.end_time {
                group.end_time = group.end_time.max(clip.end_time);
                group.clips.push(clip.clone());
                added = true;
                break;
            }
        }
        if !added {
            groups.push(LayerGroup {
                end_time: clip.end_time,
                clips: vec![clip],
            });
        }
    }

    // Merge transitively-overlapping groups.
    let mut merged: Vec<LayerGroup> = Vec::new();
    for group in groups {
        let start_time = group
            .clips
            .iter()
            .map(|c| c.start_time)
            .fold(f64::INFINITY, f64::min);
        let mut absorbed = false;
        for existing in merged.iter_mut() {
            if start_time < existing.end_time {
                existing.end_time = existing.end_time.max(group.end_time);
                existing.clips.extend(group.clips.iter().cloned());
                absorbed = true;
                break;
            }
        }
        if !absorbed {
            merged.push(group);
        }
    }

    let mut assigned: HashMap<Uuid, u32> = HashMap::new();
    for group in &merged {
        color_group(&group.clips, &mut assigned);
    }

    // Emit in original input order with layers applied.
    clips
        .iter()
        .map(|clip| Clip {
            layer: assigned.get(&clip.id).copied().unwrap_or(0),
            ..clip.clone()
        })
        .collect()
}

/// Greedy coloring of one connected group, most-constrained clips first.
fn color_group(clips: &[Clip], assigned: &mut HashMap<Uuid, u32>) {
    let mut adjacency: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for clip in clips {
        adjacency.entry(clip.id).or_default();
    }
    for a in clips {
        for b in clips {
            if a.id != b.id && a.overlaps(b) {
                adjacency.entry(a.id).or_default().insert(b.id);
                adjacency.entry(b.id).or_default().insert(a.id);
            }
        }
    }

    let mut order: Vec<&Clip> = clips.iter().collect();
    order.sort_by(|a, b| {
        let da = adjacency.get(&a.id).map_or(0, HashSet::len);
        let db = adjacency.get(&b.id).map_or(0, HashSet::len);
        db.cmp(&da)
            .then_with(|| a.start_time.total_cmp(&b.start_time))
    });

    for clip in order {
        let used: HashSet<u32> = adjacency
            .get(&clip.id)
            .map(|neighbors| {
                neighbors
                    .iter()
                    .filter_map(|id| assigned.get(id).copied())
                    .collect()
            })
            .unwrap_or_default();

        // Lowest free layer, saturating at the maximum (degraded layering
        // rather than an error).
        let mut layer = 0u32;
        while used.contains(&layer) && layer < MAX_LAYERS - 1 {
            layer += 1;
        }
        assigned.insert(clip.id, layer);
    }

    log::debug!(
        "Layer assignment: clips={} max_layer={}",
        clips.len(),
        assigned.values().copied().max().unwrap_or(0)
    );
}

/// Track display height derived from the highest assigned layer.
pub fn track_height(clips: &[Clip]) -> f64 {
    let max_layer = clips.iter().map(|c| c.layer).max().unwrap_or(0) as f64;
    (max_layer + 1.0) * MIN_LAYER_HEIGHT + max_layer * LAYER_SPACING
}

/// Vertical offset of a clip within its track, derived from its layer.
pub fn clip_top(layer: u32) -> f64 {
    layer as f64 * (MIN_LAYER_HEIGHT + LAYER_SPACING)
}
