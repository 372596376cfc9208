use crate::config::PlotConfig;
use crate::phases::{classify, entry_frames, Phase};
use crate::projection::project;
use serde::{Deserialize, Serialize};

/// Location of one scatter point at one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionKeyframe {
    pub point: usize,
    pub frame: i64,
    pub phase: Phase,
    pub location: [f64; 3],
}

/// Keyframes that reproduce the sliding window when the host interpolates
/// linearly between them.
///
/// Within a single phase a point either stays put or moves at a constant rate,
/// but consecutive phases do not meet: an inside point keeps its own value while
/// the first exiting frame already shows the trace at the edge. A phase change
/// at frame `f` is therefore pinned twice, at `f - 1` with the old location and
/// at `f` with the new one. Every point also gets a keyframe on the first and on
/// the last frame of the window. Keyframes are ordered by frame, then by point.
pub fn transition_keyframes(config: &PlotConfig, signal: &[f64], times: &[f64]) -> Vec<TransitionKeyframe> {
    let window = &config.window;
    let entry = entry_frames(window, config.half_width(), times);
    let window_frames = config.window_frames();
    let last_frame = window.f_stop();

    let mut keyframes = Vec::new();
    let mut latest: Vec<Option<i64>> = vec![None; signal.len()];
    let mut previous: Option<(Vec<Phase>, Vec<[f64; 3]>)> = None;
    for frame in window.frames() {
        let phases = classify(&entry, window_frames, frame);
        let locations = project(config, signal, times, frame, &phases);
        for point in 0..phases.len() {
            let changed = match &previous {
                Some((before, before_locations)) => {
                    let changed = before[point] != phases[point];
                    if changed && latest[point] != Some(frame - 1) {
                        keyframes.push(TransitionKeyframe {
                            point,
                            frame: frame - 1,
                            phase: before[point],
                            location: before_locations[point],
                        });
                    }
                    changed
                }
                None => true,
            };
            if changed || frame == last_frame {
                keyframes.push(TransitionKeyframe {
                    point,
                    frame,
                    phase: phases[point],
                    location: locations[point],
                });
                latest[point] = Some(frame);
            }
        }
        previous = Some((phases, locations));
    }
    keyframes.sort_by_key(|k| (k.frame, k.point));
    log::debug!(
        "{} transition keyframes for {} points over {} frames",
        keyframes.len(),
        signal.len(),
        window.frame_count()
    );
    keyframes
}
