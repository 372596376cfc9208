use crate::config::PlotConfig;
use crate::phases::{frame_phases, Phase};

/// Linear interpolation of `(xp, fp)` at `x`, holding the end values outside
/// the sampled range. `xp` must be non-decreasing and non-empty.
pub(crate) fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let last = xp.len() - 1;
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[last] {
        return fp[last];
    }
    let upper = xp.partition_point(|v| *v <= x).clamp(1, last);
    let lower = upper - 1;
    fp[lower] + (x - xp[lower]) * (fp[upper] - fp[lower]) / (xp[upper] - xp[lower])
}

/// Plot coordinates of every sample at `frame`, given the phases at that frame.
///
/// Samples inside the window slide from the right edge to the left edge as the
/// frame advances. Samples outside are pinned to the nearest edge: samples about
/// to enter or just left take the trace's value at the edge, samples further away
/// take the value of their neighbour towards the window.
pub fn project(
    config: &PlotConfig,
    signal: &[f64],
    times: &[f64],
    frame: i64,
    phases: &[Phase],
) -> Vec<[f64; 3]> {
    let [ox, oy, oz] = config.origin;
    let [sx, sy, _] = config.scale;
    let half_width = config.half_width();
    let value_span = config.image_scale.value_span;
    let now = config.window.frame_time(frame);
    let y = |value: f64| oy + value / value_span * sy;
    let offsets: Vec<f64> = times.iter().map(|t| t - now).collect();
    let last = signal.len().saturating_sub(1);

    phases
        .iter()
        .enumerate()
        .map(|(idx, phase)| {
            let (x, value) = match phase {
                Phase::Waiting => (ox + sx, signal[idx.saturating_sub(1)]),
                Phase::Entering => (ox + sx, interp(half_width, &offsets, signal)),
                Phase::Inside => (
                    ox + sx / 2.0 + offsets[idx] / (2.0 * half_width) * sx,
                    signal[idx],
                ),
                Phase::Exiting => (ox, interp(-half_width, &offsets, signal)),
                Phase::Exited => (ox, signal[(idx + 1).min(last)]),
            };
            [x, y(value), oz]
        })
        .collect()
}

pub fn project_frame(config: &PlotConfig, signal: &[f64], times: &[f64], frame: i64) -> Vec<[f64; 3]> {
    let phases = frame_phases(config, times, frame);
    project(config, signal, times, frame, &phases)
}
