//! Where each sample sits relative to the sliding window at a given frame.
//!
//! The window is `2 * time_halfwidth` wide and its right edge shows the newest
//! time. A sample's entry frame is the frame at which it crosses the right edge,
//! `get_frame(time - time_halfwidth)`; it stays visible for `window_frames`
//! frames after that.

use crate::config::PlotConfig;
use serde::{Deserialize, Serialize};
use timeline::FrameWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Phase {
    /// Not entered yet, and neither has the previous sample.
    Waiting = 0,
    /// About to enter on the right edge.
    Entering = 1,
    Inside = 2,
    /// Just left on the left edge.
    Exiting = 3,
    /// Left the window, and so has the next sample.
    Exited = 4,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Waiting,
        Phase::Entering,
        Phase::Inside,
        Phase::Exiting,
        Phase::Exited,
    ];

    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Pinned to the right edge of the plot.
    pub fn is_right_of_window(self) -> bool {
        matches!(self, Phase::Waiting | Phase::Entering)
    }

    /// Pinned to the left edge of the plot.
    pub fn is_left_of_window(self) -> bool {
        matches!(self, Phase::Exiting | Phase::Exited)
    }
}

pub fn entry_frames(window: &FrameWindow, half_width: f64, times: &[f64]) -> Vec<i64> {
    times
        .iter()
        .map(|t| window.get_frame(t - half_width))
        .collect()
}

/// Neighbour tests that decide the outer phases.
///
/// `exited[i]` tests the entry frame of sample `i + 1` and `waiting[i]` the entry
/// frame of sample `i - 1`. The last and first samples have no such neighbour and
/// repeat the test of index `n - 2` and `1` respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryMasks {
    pub exited: Vec<bool>,
    pub waiting: Vec<bool>,
}

pub fn boundary_masks(entry: &[i64], window_frames: f64, frame: i64) -> BoundaryMasks {
    let n = entry.len();
    let target = frame as f64;
    let exited = (0..n)
        .map(|idx| entry[(idx + 1).min(n - 1)] as f64 + window_frames <= target)
        .collect();
    let waiting = (0..n)
        .map(|idx| entry[idx.saturating_sub(1)] > frame)
        .collect();
    BoundaryMasks { exited, waiting }
}

/// Phase of every sample at `frame`. The checks run in a fixed priority order
/// (exited, exiting, inside, waiting, entering) and the first match wins.
///
/// A sample whose entry frame equals `frame` is therefore `Inside`. Writing
/// the masks one after another, with later masks overwriting earlier ones,
/// would leave that sample `Entering` instead.
pub fn classify(entry: &[i64], window_frames: f64, frame: i64) -> Vec<Phase> {
    let masks = boundary_masks(entry, window_frames, frame);
    let target = frame as f64;
    entry
        .iter()
        .enumerate()
        .map(|(idx, eb)| {
            let start = *eb as f64;
            if masks.exited[idx] {
                Phase::Exited
            } else if start + window_frames <= target {
                Phase::Exiting
            } else if *eb <= frame {
                Phase::Inside
            } else if masks.waiting[idx] {
                Phase::Waiting
            } else {
                Phase::Entering
            }
        })
        .collect()
}

pub fn frame_phases(config: &PlotConfig, times: &[f64], frame: i64) -> Vec<Phase> {
    let entry = entry_frames(&config.window, config.half_width(), times);
    classify(&entry, config.window_frames(), frame)
}

/// One membership mask per phase, indexed by [`Phase::tag`].
pub fn phase_masks(phases: &[Phase]) -> [Vec<bool>; 5] {
    Phase::ALL.map(|phase| phases.iter().map(|p| *p == phase).collect())
}
