use std::env;
use std::error::Error;
use std::fs;

use engine::layers::assign_layers;
use engine::model::TimelineState;
use engine::time::format_timecode;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err("Please provide the path to a timeline JSON file.".into());
    }

    let json_str = fs::read_to_string(&args[1])?;
    let state = TimelineState::load(&json_str)?;

    println!("Timeline: {} ({} fps)", state.name, state.fps);
    println!("Duration: {}", format_timecode(state.duration(), state.fps));

    for track in &state.tracks {
        let layered = assign_layers(&track.clips, track);
        let layer_count = layered.iter().map(|c| c.layer).max().unwrap_or(0) + 1;
        println!(
            "  [{}] {}: {} clip(s), {} layer(s)",
            track.kind,
            track.name,
            layered.len(),
            layer_count
        );
        for clip in &layered {
            println!(
                "    {} [{} - {}] layer {}",
                clip.name,
                format_timecode(clip.start_time, state.fps),
                format_timecode(clip.end_time, state.fps),
                clip.layer
            );
        }
    }

    if !state.markers.is_empty() {
        println!("Markers:");
        for marker in &state.markers {
            println!(
                "  {} {}",
                format_timecode(marker.time, state.fps),
                marker.label
            );
        }
    }

    Ok(())
}
