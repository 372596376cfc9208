pub mod signal;
pub mod window;

pub use signal::{rtime, time, PeriodicTimeSignal, TimeAxis, TimeSignal};
pub use window::{FrameWindow, WindowBounds};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    #[error("invalid frame window: {0}")]
    InvalidWindow(String),
    #[error("invalid periodic time signal: {0}")]
    InvalidPeriod(String),
    #[error("mask has {mask} entries but the backing has {values}")]
    MaskLength { mask: usize, values: usize },
    #[error("signal has {signal} values but time has {time}")]
    LengthMismatch { signal: usize, time: usize },
}

/// A trace of values paired with the time each value was sampled at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyFrames {
    signal: Vec<f64>,
    time: Vec<f64>,
}

impl KeyFrames {
    pub fn new(signal: Vec<f64>, time: Vec<f64>) -> Result<Self, TimelineError> {
        if signal.len() != time.len() {
            return Err(TimelineError::LengthMismatch {
                signal: signal.len(),
                time: time.len(),
            });
        }
        Ok(Self { signal, time })
    }

    pub fn from_axis<T: TimeAxis + ?Sized>(
        signal: Vec<f64>,
        time: &T,
    ) -> Result<Self, TimelineError> {
        Self::new(signal, time.to_vec())
    }

    pub fn signal(&self) -> &[f64] {
        &self.signal
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Replaces the values, keeping the timestamps. The frame count must not change.
    pub fn set_signal(&mut self, signal: Vec<f64>) -> Result<(), TimelineError> {
        if signal.len() != self.signal.len() {
            return Err(TimelineError::LengthMismatch {
                signal: signal.len(),
                time: self.time.len(),
            });
        }
        self.signal = signal;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.signal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal.is_empty()
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.signal, self.time)
    }
}
