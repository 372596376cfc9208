use crate::{KeyFrames, TimelineError};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Plain window bounds as they appear in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowBounds {
    #[serde(alias = "t0")]
    pub t_start: f64,
    #[serde(alias = "tn")]
    pub t_stop: f64,
    #[serde(alias = "f0")]
    pub f_start: i64,
    #[serde(alias = "fn")]
    pub f_stop: i64,
}

/// Affine mapping between simulation time and animation frames.
///
/// Frame `f_start` shows time `t_start` and frame `f_stop` shows time `t_stop`.
/// Frame membership is always decided by [`FrameWindow::get_frame`], which rounds
/// to the nearest frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds", into = "WindowBounds")]
pub struct FrameWindow {
    t0: f64,
    tn: f64,
    f0: i64,
    fn_: i64,
    a: f64,
}

impl FrameWindow {
    pub fn new(f_start: i64, f_stop: i64, t_start: f64, t_stop: f64) -> Result<Self, TimelineError> {
        if !t_start.is_finite() || !t_stop.is_finite() {
            return Err(TimelineError::InvalidWindow(
                "window times must be finite".to_string(),
            ));
        }
        if t_stop == t_start {
            return Err(TimelineError::InvalidWindow(format!(
                "window has zero width (t_start == t_stop == {t_start})"
            )));
        }
        let a = (f_stop - f_start) as f64 / (t_stop - t_start);
        if !a.is_finite() || a <= 0.0 {
            return Err(TimelineError::InvalidWindow(format!(
                "frames {f_start}..{f_stop} must increase with time {t_start}..{t_stop}"
            )));
        }
        log::debug!("frame window {f_start}..={f_stop} over t={t_start}..{t_stop} ({a} frames/unit)");
        Ok(Self {
            t0: t_start,
            tn: t_stop,
            f0: f_start,
            fn_: f_stop,
            a,
        })
    }

    /// Window spanning `[t_start, t_stop]` played back at `fps` frames per time unit.
    pub fn with_fps(f_start: i64, t_start: f64, t_stop: f64, fps: f64) -> Result<Self, TimelineError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(TimelineError::InvalidWindow(format!(
                "frame rate must be positive, got {fps}"
            )));
        }
        let frames = ((t_stop - t_start) * fps).round() as i64;
        Self::new(f_start, f_start + frames, t_start, t_stop)
    }

    pub fn t_start(&self) -> f64 {
        self.t0
    }

    pub fn t_stop(&self) -> f64 {
        self.tn
    }

    pub fn f_start(&self) -> i64 {
        self.f0
    }

    pub fn f_stop(&self) -> i64 {
        self.fn_
    }

    /// Frames per time unit.
    pub fn scale(&self) -> f64 {
        self.a
    }

    pub fn get_frame(&self, t: f64) -> i64 {
        ((t - self.t0) * self.a).round() as i64 + self.f0
    }

    /// The simulation time shown at frame `frame`.
    pub fn frame_time(&self, frame: i64) -> f64 {
        self.t0 + (frame - self.f0) as f64 / self.a
    }

    pub fn frames(&self) -> RangeInclusive<i64> {
        self.f0..=self.fn_
    }

    pub fn frame_count(&self) -> usize {
        (self.fn_ - self.f0 + 1) as usize
    }

    /// One `(frame, value)` pair per sample, in sample order. Samples sharing a
    /// frame are all yielded.
    pub fn iterate_keyframes<'a>(
        &'a self,
        keyframes: &'a KeyFrames,
    ) -> impl Iterator<Item = (i64, f64)> + 'a {
        keyframes
            .time()
            .iter()
            .zip(keyframes.signal())
            .map(move |(t, value)| (self.get_frame(*t), *value))
    }
}

impl TryFrom<WindowBounds> for FrameWindow {
    type Error = TimelineError;

    fn try_from(bounds: WindowBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.f_start, bounds.f_stop, bounds.t_start, bounds.t_stop)
    }
}

impl From<FrameWindow> for WindowBounds {
    fn from(window: FrameWindow) -> Self {
        Self {
            t_start: window.t0,
            t_stop: window.tn,
            f_start: window.f0,
            f_stop: window.fn_,
        }
    }
}
