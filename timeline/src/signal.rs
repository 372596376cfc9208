use crate::TimelineError;
use std::sync::Arc;

/// Ordered timestamps of a trace, either stored or generated.
pub trait TimeAxis {
    fn iter(&self) -> Box<dyn Iterator<Item = f64> + '_>;

    fn len(&self) -> usize {
        self.iter().count()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

/// Timestamps backed by one shared array. Many traces recorded on the same clock
/// can share the backing, and `window` narrows the visible samples with a mask
/// instead of copying.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSignal {
    values: Arc<[f64]>,
    mask: Option<Arc<[bool]>>,
}

impl TimeSignal {
    pub fn new(values: impl Into<Arc<[f64]>>) -> Self {
        Self {
            values: values.into(),
            mask: None,
        }
    }

    pub fn with_mask(
        values: impl Into<Arc<[f64]>>,
        mask: impl Into<Arc<[bool]>>,
    ) -> Result<Self, TimelineError> {
        let values = values.into();
        let mask = mask.into();
        if mask.len() != values.len() {
            return Err(TimelineError::MaskLength {
                mask: mask.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            values,
            mask: Some(mask),
        })
    }

    /// The visible timestamp at `index`, counting only unmasked samples.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.iter().nth(index)
    }

    pub fn backing(&self) -> &Arc<[f64]> {
        &self.values
    }

    pub fn mask(&self) -> Vec<bool> {
        match &self.mask {
            Some(mask) => mask.to_vec(),
            None => vec![true; self.values.len()],
        }
    }

    pub fn is_masked(&self) -> bool {
        self.mask.is_some()
    }

    /// A view of the samples within `[start, stop]`, sharing the same backing.
    pub fn window(&self, start: f64, stop: f64) -> Self {
        let mask: Arc<[bool]> = self
            .values
            .iter()
            .enumerate()
            .map(|(idx, t)| {
                let visible = self.mask.as_ref().map(|m| m[idx]).unwrap_or(true);
                visible && *t >= start && *t <= stop
            })
            .collect();
        Self {
            values: Arc::clone(&self.values),
            mask: Some(mask),
        }
    }
}

impl TimeAxis for TimeSignal {
    fn iter(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match &self.mask {
            None => Box::new(self.values.iter().copied()),
            Some(mask) => Box::new(
                self.values
                    .iter()
                    .zip(mask.iter())
                    .filter(|(_, visible)| **visible)
                    .map(|(t, _)| *t),
            ),
        }
    }

    fn len(&self) -> usize {
        match &self.mask {
            None => self.values.len(),
            Some(mask) => mask.iter().filter(|visible| **visible).count(),
        }
    }
}

impl From<Vec<f64>> for TimeSignal {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

/// Evenly spaced timestamps `start, start + step, ...` up to and including `stop`,
/// generated on every iteration without storage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicTimeSignal {
    start: f64,
    stop: f64,
    step: f64,
}

impl PeriodicTimeSignal {
    pub fn new(start: f64, stop: f64, step: f64) -> Result<Self, TimelineError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(TimelineError::InvalidPeriod(format!(
                "step must be a positive number, got {step}"
            )));
        }
        if !start.is_finite() || !stop.is_finite() {
            return Err(TimelineError::InvalidPeriod(
                "start and stop must be finite".to_string(),
            ));
        }
        Ok(Self { start, stop, step })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Narrows the range to `[start, stop]`, staying on the original sampling grid.
    pub fn window(&self, start: f64, stop: f64) -> Self {
        let skipped = ((start - self.start) / self.step).ceil().max(0.0);
        Self {
            start: self.start + skipped * self.step,
            stop: stop.min(self.stop),
            step: self.step,
        }
    }

    fn count(&self) -> usize {
        if self.stop < self.start {
            return 0;
        }
        // Tolerate accumulated error so that e.g. (0, 1, 0.1) includes 1.0.
        let span = (self.stop - self.start) / self.step;
        (span + 1e-9).floor() as usize + 1
    }
}

impl TimeAxis for PeriodicTimeSignal {
    fn iter(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        let start = self.start;
        let step = self.step;
        Box::new((0..self.count()).map(move |k| start + k as f64 * step))
    }

    fn len(&self) -> usize {
        self.count()
    }
}

pub fn time(values: Vec<f64>) -> TimeSignal {
    TimeSignal::new(values)
}

pub fn rtime(start: f64, stop: f64, step: f64) -> Result<PeriodicTimeSignal, TimelineError> {
    PeriodicTimeSignal::new(start, stop, step)
}
