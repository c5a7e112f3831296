use std::sync::{Arc, Mutex};

use engine::editor::{EditGesture, EditMode, EditorEngine, EngineEvent};
use engine::error::EngineError;
use engine::model::{Clip, TimelineState, Track, TrackKind};
use engine::time::is_frame_aligned;
use uuid::Uuid;

fn engine_with_clip() -> (EditorEngine, Uuid, Uuid) {
    let mut state = TimelineState::new("Test", 30.0);
    let mut track = Track::new("Video 1", TrackKind::Video);
    let clip = Clip::video("A", "a.mp4", 1.0, 5.0);
    let (track_id, clip_id) = (track.id, clip.id);
    track.clips.push(clip);
    state.tracks.push(track);
    (EditorEngine::new(state), track_id, clip_id)
}

fn get_clip(engine: &EditorEngine, track_id: Uuid, clip_id: Uuid) -> Clip {
    engine
        .with_state(|s| s.get_clip(track_id, clip_id).cloned())
        .unwrap()
        .expect("clip should exist")
}

#[test]
fn test_move_clip_shifts_times_and_offset() {
    let (engine, track_id, clip_id) = engine_with_clip();
    engine.move_clip(track_id, clip_id, 3.0).unwrap();

    let clip = get_clip(&engine, track_id, clip_id);
    assert_eq!(clip.start_time, 3.0);
    assert_eq!(clip.end_time, 8.0);
    assert_eq!(clip.media_offset, 2.0); // offset follows the move delta
    assert_eq!(clip.duration(), 5.0);
}

#[test]
fn test_move_clip_rejects_negative_media_offset() {
    let (engine, track_id, clip_id) = engine_with_clip();
    // Clip starts at 1.0 with offset 0; moving left would need offset -0.5.
    let result = engine.move_clip(track_id, clip_id, 0.5);
    assert!(matches!(result, Err(EngineError::Validation(_))));

    // Failed operations leave no trace: state and history untouched.
    let clip = get_clip(&engine, track_id, clip_id);
    assert_eq!(clip.start_time, 1.0);
    assert_eq!(engine.history_len(), 0);
}

#[test]
fn test_move_clip_quantizes_to_frame_grid() {
    let (engine, track_id, clip_id) = engine_with_clip();
    // 2.004s at 30fps rounds to frame 60 = 2.0s.
    engine.move_clip(track_id, clip_id, 2.004).unwrap();
    let clip = get_clip(&engine, track_id, clip_id);
    assert_eq!(clip.start_time, 2.0);
}

#[test]
fn test_locked_track_rejects_edits() {
    let (engine, track_id, clip_id) = engine_with_clip();
    engine.set_track_locked(track_id, true).unwrap();

    let result = engine.move_clip(track_id, clip_id, 3.0);
    assert!(matches!(result, Err(EngineError::LockedTrack(_))));
    assert!(matches!(
        engine.delete_clip(track_id, clip_id),
        Err(EngineError::LockedTrack(_))
    ));

    // Unlocking always works, even though the track is locked.
    engine.set_track_locked(track_id, false).unwrap();
    engine.move_clip(track_id, clip_id, 3.0).unwrap();
}

#[test]
fn test_missing_targets_are_not_found() {
    let (engine, track_id, _) = engine_with_clip();
    assert!(matches!(
        engine.move_clip(track_id, Uuid::new_v4(), 3.0),
        Err(EngineError::NotFound(_))
    ));
    assert!(matches!(
        engine.move_clip(Uuid::new_v4(), Uuid::new_v4(), 3.0),
        Err(EngineError::NotFound(_))
    ));
}

#[test]
fn test_add_clip_rejects_overlap_on_no_overlap_track() {
    let (engine, track_id, _) = engine_with_clip();
    let result = engine.add_clip(track_id, Clip::video("B", "b.mp4", 3.0, 2.0));
    assert!(matches!(result, Err(EngineError::Validation(_))));

    // Adjacent placement is allowed; the interval is half-open.
    engine
        .add_clip(track_id, Clip::video("B", "b.mp4", 6.0, 2.0))
        .unwrap();
}

#[test]
fn test_overlap_allowed_when_track_opts_in() {
    let (engine, track_id, _) = engine_with_clip();
    engine.set_track_overlap(track_id, true).unwrap();
    engine
        .add_clip(track_id, Clip::video("B", "b.mp4", 3.0, 2.0))
        .unwrap();
    let count = engine
        .with_state(|s| s.get_track(track_id).unwrap().clips.len())
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_trim_start_clamps_to_leading_media_and_min_duration() {
    let (engine, track_id, clip_id) = engine_with_clip();

    // Trim in: start 1 -> 2 consumes one second of leading media.
    engine.trim_clip_start(track_id, clip_id, 2.0).unwrap();
    let clip = get_clip(&engine, track_id, clip_id);
    assert_eq!(clip.start_time, 2.0);
    assert_eq!(clip.end_time, 6.0);
    assert_eq!(clip.media_offset, 1.0);
    assert_eq!(clip.media_duration, 4.0);

    // Trim back out: clamped at the original media start (offset 0).
    engine.trim_clip_start(track_id, clip_id, 0.25).unwrap();
    let clip = get_clip(&engine, track_id, clip_id);
    assert_eq!(clip.start_time, 1.0);
    assert_eq!(clip.media_offset, 0.0);
    assert_eq!(clip.media_duration, 5.0);
}

#[test]
fn test_trim_end_clamps_to_available_media() {
    let (engine, track_id, clip_id) = engine_with_clip();
    // Clip [1, 6) with exactly 5s of media: extending to 8 clamps to 6.
    engine.trim_clip_end(track_id, clip_id, 8.0).unwrap();
    let clip = get_clip(&engine, track_id, clip_id);
    assert_eq!(clip.end_time, 6.0);

    // Shortening works and can be re-extended up to the media window.
    engine.trim_clip_end(track_id, clip_id, 4.0).unwrap();
    engine.trim_clip_end(track_id, clip_id, 10.0).unwrap();
    let clip = get_clip(&engine, track_id, clip_id);
    assert_eq!(clip.end_time, 6.0);
}

#[test]
fn test_slip_repositions_media_window_without_moving_clip() {
    let (engine, track_id, _) = engine_with_clip();
    let mut clip = Clip::video("B", "b.mp4", 10.0, 5.0);
    clip.end_time = 13.0; // 3s placed, 5s of source available
    let clip_id = engine.add_clip(track_id, clip).unwrap();

    engine.slip_clip(track_id, clip_id, 1.0).unwrap();
    let clip = get_clip(&engine, track_id, clip_id);
    assert_eq!(clip.start_time, 10.0);
    assert_eq!(clip.end_time, 13.0);
    assert_eq!(clip.media_offset, 1.0);
    assert_eq!(clip.media_duration, 4.0);

    // Slipping past the source end clamps to the last valid window.
    engine.slip_clip(track_id, clip_id, 10.0).unwrap();
    let clip = get_clip(&engine, track_id, clip_id);
    assert_eq!(clip.media_offset, 2.0);
    assert_eq!(clip.media_duration, 3.0);
}

#[test]
fn test_split_clip_divides_media_window() {
    let mut state = TimelineState::new("Test", 30.0);
    let mut track = Track::new("Video 1", TrackKind::Video);
    let clip = Clip::video("A", "a.mp4", 0.0, 6.0);
    let (track_id, clip_id) = (track.id, clip.id);
    track.clips.push(clip);
    state.tracks.push(track);
    let engine = EditorEngine::new(state);

    let second_id = engine.split_clip(track_id, clip_id, 2.0).unwrap().unwrap();

    let first = get_clip(&engine, track_id, clip_id);
    assert_eq!(first.start_time, 0.0);
    assert_eq!(first.end_time, 2.0);
    assert_eq!(first.media_offset, 0.0);
    assert_eq!(first.media_duration, 6.0); // keeps the full window

    let second = get_clip(&engine, track_id, second_id);
    assert_eq!(second.start_time, 2.0);
    assert_eq!(second.end_time, 6.0);
    assert_eq!(second.media_offset, 2.0);
    assert_eq!(second.media_duration, 4.0);

    // Offset continuity: second part resumes where the first leaves off.
    assert_eq!(second.media_offset, first.media_offset + first.duration());
}

#[test]
fn test_split_outside_clip_is_a_noop() {
    let (engine, track_id, clip_id) = engine_with_clip();
    assert_eq!(engine.split_clip(track_id, clip_id, 1.0).unwrap(), None); // at start
    assert_eq!(engine.split_clip(track_id, clip_id, 6.0).unwrap(), None); // at end
    assert_eq!(engine.split_clip(track_id, clip_id, 9.0).unwrap(), None);
    assert_eq!(engine.history_len(), 0);
}

#[test]
fn test_ripple_delete_closes_the_gap() {
    let mut state = TimelineState::new("Test", 30.0);
    let mut track = Track::new("Video 1", TrackKind::Video);
    let a = Clip::video("A", "a.mp4", 0.0, 2.0);
    let b = Clip::video("B", "b.mp4", 2.0, 3.0);
    let c = Clip::video("C", "c.mp4", 5.0, 3.0);
    let (track_id, a_id, b_id, c_id) = (track.id, a.id, b.id, c.id);
    track.clips.extend([a, b, c]);
    state.tracks.push(track);
    let engine = EditorEngine::new(state);

    engine.ripple_delete(track_id, b_id).unwrap();

    let a = get_clip(&engine, track_id, a_id);
    assert_eq!((a.start_time, a.end_time), (0.0, 2.0)); // before the cut: unchanged

    let c = get_clip(&engine, track_id, c_id);
    assert_eq!((c.start_time, c.end_time), (2.0, 5.0)); // shifted left by 3
    assert_eq!(c.media_offset, 0.0); // ripple shifts never touch the media window

    assert_eq!(engine.with_state(|s| s.duration()).unwrap(), 5.0);
}

#[test]
fn test_ripple_insert_pushes_downstream_clips() {
    let mut state = TimelineState::new("Test", 30.0);
    let mut track = Track::new("Video 1", TrackKind::Video);
    let a = Clip::video("A", "a.mp4", 0.0, 2.0);
    let b = Clip::video("B", "b.mp4", 2.0, 3.0);
    let (track_id, a_id, b_id) = (track.id, a.id, b.id);
    track.clips.extend([a, b]);
    state.tracks.push(track);
    let engine = EditorEngine::new(state);

    let new_id = engine
        .ripple_insert(track_id, Clip::video("N", "n.mp4", 0.0, 1.0), 2.0)
        .unwrap();

    let a = get_clip(&engine, track_id, a_id);
    assert_eq!((a.start_time, a.end_time), (0.0, 2.0));
    let n = get_clip(&engine, track_id, new_id);
    assert_eq!((n.start_time, n.end_time), (2.0, 3.0));
    let b = get_clip(&engine, track_id, b_id);
    assert_eq!((b.start_time, b.end_time), (3.0, 6.0));
}

#[test]
fn test_rejected_ripple_insert_leaves_state_untouched() {
    let mut state = TimelineState::new("Test", 30.0);
    let mut track = Track::new("Video 1", TrackKind::Video);
    let a = Clip::video("A", "a.mp4", 0.0, 4.0);
    let b = Clip::video("B", "b.mp4", 6.0, 3.0);
    let (track_id, a_id, b_id) = (track.id, a.id, b.id);
    track.clips.extend([a, b]);
    state.tracks.push(track);
    let engine = EditorEngine::new(state);

    // 2.0 falls inside A, which cannot be shifted out of the way.
    let result = engine.ripple_insert(track_id, Clip::video("N", "n.mp4", 0.0, 2.0), 2.0);
    assert!(matches!(result, Err(EngineError::Validation(_))));

    // The rejection leaves nothing behind: no shift, no insert, no entry.
    let a = get_clip(&engine, track_id, a_id);
    assert_eq!((a.start_time, a.end_time), (0.0, 4.0));
    let b = get_clip(&engine, track_id, b_id);
    assert_eq!((b.start_time, b.end_time), (6.0, 9.0));
    assert_eq!(
        engine.with_state(|s| s.get_track(track_id).unwrap().clips.len()).unwrap(),
        2
    );
    assert_eq!(engine.history_len(), 0);
}

#[test]
fn test_ripple_insert_quantizes_duration_and_shift() {
    let mut state = TimelineState::new("Test", 30.0);
    let mut track = Track::new("Video 1", TrackKind::Video);
    let a = Clip::video("A", "a.mp4", 0.0, 2.0);
    let b = Clip::video("B", "b.mp4", 3.0, 3.0);
    let (track_id, b_id) = (track.id, b.id);
    track.clips.extend([a, b]);
    state.tracks.push(track);
    let engine = EditorEngine::new(state);

    // 2.03s is not a whole number of frames at 30fps.
    let mut clip = Clip::video("N", "n.mp4", 0.0, 3.0);
    clip.end_time = 2.03;
    let new_id = engine.ripple_insert(track_id, clip, 2.0).unwrap();

    let n = get_clip(&engine, track_id, new_id);
    assert_eq!(n.start_time, 2.0);
    assert!(is_frame_aligned(n.end_time, 30.0));

    // Downstream clips shift by the quantized duration and stay aligned.
    let b = get_clip(&engine, track_id, b_id);
    assert!(is_frame_aligned(b.start_time, 30.0));
    assert!(is_frame_aligned(b.end_time, 30.0));
    assert!((b.start_time - (3.0 + n.duration())).abs() < 1e-9);
}

#[test]
fn test_ripple_trim_end_shifts_downstream_by_delta() {
    let mut state = TimelineState::new("Test", 30.0);
    let mut track = Track::new("Video 1", TrackKind::Video);
    let a = Clip::video("A", "a.mp4", 0.0, 2.0);
    let b = Clip::video("B", "b.mp4", 2.0, 3.0);
    let c = Clip::video("C", "c.mp4", 5.0, 3.0);
    let (track_id, b_id, c_id) = (track.id, b.id, c.id);
    track.clips.extend([a, b, c]);
    state.tracks.push(track);
    let engine = EditorEngine::new(state);

    // Shorten B by one second: C follows, the gap structure is preserved.
    engine.ripple_trim_end(track_id, b_id, 4.0).unwrap();
    let b = get_clip(&engine, track_id, b_id);
    assert_eq!((b.start_time, b.end_time), (2.0, 4.0));
    let c = get_clip(&engine, track_id, c_id);
    assert_eq!((c.start_time, c.end_time), (4.0, 7.0));
}

#[test]
fn test_ripple_trim_with_no_trailing_media_is_a_noop() {
    // Clip [0, 5) backed by exactly 5s of media cannot be extended; the
    // target clamps back to the current end and nothing moves.
    let mut state = TimelineState::new("Test", 30.0);
    let mut track = Track::new("Video 1", TrackKind::Video);
    let a = Clip::video("A", "a.mp4", 0.0, 5.0);
    let b = Clip::video("B", "b.mp4", 5.0, 3.0);
    let (track_id, a_id, b_id) = (track.id, a.id, b.id);
    track.clips.extend([a, b]);
    state.tracks.push(track);
    let engine = EditorEngine::new(state);

    engine.ripple_trim_end(track_id, a_id, 7.0).unwrap();

    let a = get_clip(&engine, track_id, a_id);
    assert_eq!((a.start_time, a.end_time), (0.0, 5.0));
    let b = get_clip(&engine, track_id, b_id);
    assert_eq!((b.start_time, b.end_time), (5.0, 8.0));
    assert_eq!(engine.history_len(), 0);
}

#[test]
fn test_track_lifecycle_and_reorder() {
    let engine = EditorEngine::new(TimelineState::new("Test", 30.0));
    let video = engine.add_track("Video 1", TrackKind::Video).unwrap();
    let audio = engine.add_track("Audio 1", TrackKind::Audio).unwrap();
    let captions = engine.add_track("Captions", TrackKind::Caption).unwrap();

    engine.move_track(captions, 0).unwrap();
    let order = engine
        .with_state(|s| s.tracks.iter().map(|t| t.id).collect::<Vec<_>>())
        .unwrap();
    assert_eq!(order, vec![captions, video, audio]);

    engine.remove_track(audio).unwrap();
    assert_eq!(engine.with_state(|s| s.tracks.len()).unwrap(), 2);
}

#[test]
fn test_markers_snap_to_frame_grid() {
    let engine = EditorEngine::new(TimelineState::new("Test", 30.0));
    let marker_id = engine.add_marker(1.004, "Beat").unwrap();
    let time = engine
        .with_state(|s| s.get_marker(marker_id).unwrap().time)
        .unwrap();
    assert_eq!(time, 1.0);

    engine.move_marker(marker_id, 2.5).unwrap();
    let time = engine
        .with_state(|s| s.get_marker(marker_id).unwrap().time)
        .unwrap();
    assert_eq!(time, 2.5);

    engine.remove_marker(marker_id).unwrap();
    assert!(engine
        .with_state(|s| s.get_marker(marker_id).is_none())
        .unwrap());
}

#[test]
fn test_set_fps_validation() {
    let engine = EditorEngine::new(TimelineState::new("Test", 30.0));
    assert!(matches!(
        engine.set_fps(0.0),
        Err(EngineError::Validation(_))
    ));
    assert!(matches!(
        engine.set_fps(f64::NAN),
        Err(EngineError::Validation(_))
    ));
    engine.set_fps(24.0).unwrap();
    assert_eq!(engine.with_state(|s| s.fps).unwrap(), 24.0);
}

#[test]
fn test_drag_session_commits_as_single_entry() {
    let (engine, track_id, clip_id) = engine_with_clip();
    let mut session = engine
        .begin_edit(track_id, clip_id, EditGesture::Drag, EditMode::Normal)
        .unwrap();

    // Every pointer move derives from the pointer-down original, so the
    // intermediate positions never accumulate.
    session.update(2.0).unwrap();
    session.update(4.0).unwrap();
    let preview = session.update(3.0).unwrap();
    assert_eq!(preview.start_time, 3.0);

    engine.commit_edit(session).unwrap();
    assert_eq!(engine.history_len(), 1);
    let clip = get_clip(&engine, track_id, clip_id);
    assert_eq!(clip.start_time, 3.0);
}

#[test]
fn test_unchanged_session_commits_nothing() {
    let (engine, track_id, clip_id) = engine_with_clip();
    let session = engine
        .begin_edit(track_id, clip_id, EditGesture::TrimEnd, EditMode::Normal)
        .unwrap();
    engine.commit_edit(session).unwrap();
    assert_eq!(engine.history_len(), 0);
}

#[test]
fn test_cancelled_session_leaves_state_untouched() {
    let (engine, track_id, clip_id) = engine_with_clip();
    let mut session = engine
        .begin_edit(track_id, clip_id, EditGesture::Drag, EditMode::Normal)
        .unwrap();
    session.update(4.0).unwrap();
    session.cancel();

    let clip = get_clip(&engine, track_id, clip_id);
    assert_eq!(clip.start_time, 1.0);
    assert_eq!(engine.history_len(), 0);
}

#[test]
fn test_begin_edit_rejects_locked_track() {
    let (engine, track_id, clip_id) = engine_with_clip();
    engine.set_track_locked(track_id, true).unwrap();
    assert!(matches!(
        engine.begin_edit(track_id, clip_id, EditGesture::Drag, EditMode::Normal),
        Err(EngineError::LockedTrack(_))
    ));
}

#[test]
fn test_slip_session_interprets_input_as_offset_delta() {
    let (engine, track_id, _) = engine_with_clip();
    let mut clip = Clip::video("B", "b.mp4", 10.0, 5.0);
    clip.end_time = 13.0;
    let clip_id = engine.add_clip(track_id, clip).unwrap();

    let mut session = engine
        .begin_edit(track_id, clip_id, EditGesture::Drag, EditMode::Slip)
        .unwrap();
    session.update(1.5).unwrap();
    engine.commit_edit(session).unwrap();

    let clip = get_clip(&engine, track_id, clip_id);
    assert_eq!(clip.start_time, 10.0); // timeline position is fixed
    assert_eq!(clip.media_offset, 1.5);
}

#[test]
fn test_subscribers_observe_commits_and_history_moves() {
    let (engine, track_id, clip_id) = engine_with_clip();
    let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let sub_id = engine.subscribe(move |event| {
        let label = match event {
            EngineEvent::StateChanged { description } => format!("changed:{}", description),
            EngineEvent::HistoryMoved { index } => format!("moved:{}", index),
        };
        sink.lock().unwrap().push(label);
    });

    engine.move_clip(track_id, clip_id, 3.0).unwrap();
    engine.undo().unwrap();
    assert_eq!(
        *events.lock().unwrap(),
        vec!["changed:Move clip".to_string(), "moved:-1".to_string()]
    );

    engine.unsubscribe(sub_id);
    engine.redo().unwrap();
    assert_eq!(events.lock().unwrap().len(), 2); // no longer notified
}
