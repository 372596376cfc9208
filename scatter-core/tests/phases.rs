use scatter_core::{
    boundary_masks, classify, entry_frames, frame_phases, phase_masks, project_frame,
    transition_keyframes, ImageScale, Phase, PlotConfig, TransitionKeyframe,
};
use timeline::FrameWindow;

const SIGNAL: [f64; 6] = [1.0, 10.0, 2.0, 5.0, 15.0, 3.0];
const TIMES: [f64; 6] = [-2.0, -1.01, 0.0, 1.1, 1.18, 1.2];

fn config() -> PlotConfig {
    PlotConfig {
        origin: [1.0, 2.0, 3.0],
        scale: [10.0, 4.0, 1.0],
        image_scale: ImageScale {
            time_halfwidth: 1.0,
            value_span: 20.0,
        },
        window: FrameWindow::new(0, 100, 0.0, 100.0).unwrap(),
    }
}

#[test]
fn entry_frames_round_to_nearest() {
    let config = config();
    let entry = entry_frames(&config.window, config.half_width(), &TIMES);
    assert_eq!(entry, vec![-3, -2, -1, 0, 0, 0]);
    assert_eq!(config.window_frames(), 2.0);
}

#[test]
fn phase_masks_partition_samples_on_every_frame() {
    let config = config();
    for frame in -5..=105 {
        let phases = frame_phases(&config, &TIMES, frame);
        assert_eq!(phases.len(), TIMES.len());
        let masks = phase_masks(&phases);
        for idx in 0..TIMES.len() {
            let hits = masks.iter().filter(|mask| mask[idx]).count();
            assert_eq!(hits, 1, "sample {idx} at frame {frame}");
        }
    }
}

#[test]
fn boundary_samples_mirror_their_neighbour() {
    let config = config();
    let entry = entry_frames(&config.window, config.half_width(), &TIMES);
    let n = entry.len();
    for frame in -5..=10 {
        let masks = boundary_masks(&entry, config.window_frames(), frame);
        assert_eq!(masks.waiting[0], masks.waiting[1], "frame {frame}");
        assert_eq!(masks.exited[n - 1], masks.exited[n - 2], "frame {frame}");
    }
}

#[test]
fn sample_at_frame_time_is_centered() {
    let config = config();
    let phases = frame_phases(&config, &TIMES, 0);
    assert_eq!(phases[2], Phase::Inside);

    let points = project_frame(&config, &SIGNAL, &TIMES, 0);
    let [x, y, z] = points[2];
    assert_eq!(x, 1.0 + 10.0 / 2.0);
    assert!((y - (2.0 + 2.0 / 20.0 * 4.0)).abs() < 1e-12);
    assert_eq!(z, 3.0);
}

#[test]
fn phases_before_and_after_entry() {
    let entry = [-3, -2, -1, 0, 0, 0];
    assert_eq!(
        classify(&entry, 2.0, -3),
        vec![
            Phase::Inside,
            Phase::Entering,
            Phase::Waiting,
            Phase::Waiting,
            Phase::Waiting,
            Phase::Waiting,
        ]
    );
    assert_eq!(
        classify(&entry, 2.0, 0),
        vec![
            Phase::Exited,
            Phase::Exiting,
            Phase::Inside,
            Phase::Inside,
            Phase::Inside,
            Phase::Inside,
        ]
    );
    assert!(classify(&entry, 2.0, 2).iter().all(|p| *p == Phase::Exited));
}

#[test]
fn sample_entering_on_target_frame_is_inside() {
    let phases = classify(&[-1, 0, 3], 2.0, 0);
    assert_eq!(phases, vec![Phase::Inside, Phase::Inside, Phase::Waiting]);
}

#[test]
fn pinned_samples_take_edge_values() {
    let config = config();
    let points = project_frame(&config, &SIGNAL, &TIMES, 0);

    // exited: left edge, value of the next sample
    assert_eq!(points[0][0], 1.0);
    assert!((points[0][1] - (2.0 + 10.0 / 20.0 * 4.0)).abs() < 1e-12);

    // exiting: left edge, trace interpolated at the left edge time
    let edge = 10.0 + 0.01 * (2.0 - 10.0) / 1.01;
    assert_eq!(points[1][0], 1.0);
    assert!((points[1][1] - (2.0 + edge / 20.0 * 4.0)).abs() < 1e-9);

    let phases = frame_phases(&config, &TIMES, -3);
    let early = scatter_core::project(&config, &SIGNAL, &TIMES, -3, &phases);
    // entering and waiting samples sit on the right edge
    assert_eq!(early[1][0], 11.0);
    assert_eq!(early[2][0], 11.0);
    // waiting takes the previous sample's value
    assert!((early[2][1] - (2.0 + 10.0 / 20.0 * 4.0)).abs() < 1e-12);
}

#[test]
fn keyframes_follow_phase_changes() {
    let config = config();
    let keyframes = transition_keyframes(&config, &SIGNAL, &TIMES);
    let frames: Vec<i64> = keyframes.iter().map(|k| k.frame).collect();
    let mut expected = vec![0; 6];
    expected.extend([1; 5]);
    expected.extend([2; 4]);
    expected.extend([100; 6]);
    assert_eq!(frames, expected);

    let changed: Vec<usize> = keyframes[6..15].iter().map(|k| k.point).collect();
    assert_eq!(changed, vec![1, 2, 3, 4, 5, 2, 3, 4, 5]);
    assert_eq!(keyframes[6].phase, Phase::Exited);
    assert_eq!(keyframes[7].phase, Phase::Exiting);
    // held at its inside location until it leaves on frame 2
    assert_eq!(keyframes[8].phase, Phase::Inside);
    assert_eq!(keyframes[12].phase, Phase::Exited);

    for keyframe in &keyframes[15..] {
        assert_eq!(keyframe.phase, Phase::Exited);
        assert_eq!(keyframe.location[0], 1.0);
    }
}

fn lerp_location(keyframes: &[&TransitionKeyframe], frame: i64) -> [f64; 3] {
    let after = keyframes
        .iter()
        .position(|k| k.frame >= frame)
        .expect("keyframe at or after frame");
    let next = keyframes[after];
    if next.frame == frame || after == 0 {
        return next.location;
    }
    let prev = keyframes[after - 1];
    let w = (frame - prev.frame) as f64 / (next.frame - prev.frame) as f64;
    let mut location = [0.0; 3];
    for axis in 0..3 {
        location[axis] = prev.location[axis] + w * (next.location[axis] - prev.location[axis]);
    }
    location
}

#[test]
fn linear_keyframes_match_every_projected_frame() {
    let config = PlotConfig {
        origin: [0.0, 0.0, 0.0],
        scale: [10.0, 5.0, 1.0],
        image_scale: ImageScale {
            time_halfwidth: 5.0,
            value_span: 2.0,
        },
        window: FrameWindow::new(0, 200, 0.0, 100.0).unwrap(),
    };
    let times: Vec<f64> = (0..40).map(|k| k as f64 * 2.5).collect();
    let signal: Vec<f64> = times.iter().map(|t| (t / 7.0).sin()).collect();
    let keyframes = transition_keyframes(&config, &signal, &times);

    for point in 0..times.len() {
        let track: Vec<&TransitionKeyframe> =
            keyframes.iter().filter(|k| k.point == point).collect();
        assert_eq!(track.first().map(|k| k.frame), Some(0));
        assert_eq!(track.last().map(|k| k.frame), Some(200));
        for frame in config.window.frames() {
            let expected = project_frame(&config, &signal, &times, frame)[point];
            let animated = lerp_location(&track, frame);
            for axis in 0..3 {
                assert!(
                    (animated[axis] - expected[axis]).abs() < 1e-9,
                    "point {point} frame {frame} axis {axis}: {} != {}",
                    animated[axis],
                    expected[axis]
                );
            }
        }
    }
}

#[test]
fn empty_trace_has_no_keyframes() {
    let config = config();
    assert!(transition_keyframes(&config, &[], &[]).is_empty());
    assert!(frame_phases(&config, &[], 0).is_empty());
}
