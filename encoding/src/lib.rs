use serde::{Deserialize, Serialize};
use timeline::{FrameWindow, KeyFrames, TimelineError};

pub mod decimate;
pub mod rdp;
pub mod scaling;

pub use decimate::{decimate_indices, Survivor};
pub use rdp::simplify;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EncodingError {
    #[error(transparent)]
    Timeline(#[from] TimelineError),
    #[error("invalid {encoder} encoder: {reason}")]
    InvalidConfig {
        encoder: &'static str,
        reason: String,
    },
    #[error("{encoder} encoder does not support calibration")]
    CalibrationNotSupported { encoder: &'static str },
    #[error("{encoder} encoder cannot rescale a degenerate signal: {reason}")]
    DegenerateSignal {
        encoder: &'static str,
        reason: String,
    },
}

/// Reference range used by a calibrated normalize encoder in place of the
/// minimum and maximum of each encoded signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeCalibration {
    pub min: f64,
    pub max: f64,
}

/// Reference statistics used by a calibrated standard deviation encoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsCalibration {
    pub mean: f64,
    pub stdev: f64,
}

fn one() -> f64 {
    1.0
}

/// A transformation of a `(signal, time)` trace.
///
/// Every variant is pure apart from its optional calibration, which is fixed
/// once through [`Encoder::calibrate`] and then used for every encoded trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Encoder {
    Normalize {
        #[serde(default)]
        min: f64,
        #[serde(default = "one")]
        max: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        calibration: Option<RangeCalibration>,
    },
    Clip {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    StdDev {
        #[serde(default = "one")]
        mean: f64,
        #[serde(default = "one")]
        scale: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        calibration: Option<StatsCalibration>,
    },
    Sum {
        value: f64,
    },
    Mult {
        value: f64,
    },
    Rdp {
        #[serde(default)]
        epsilon: f64,
    },
    WindowDecimate {
        window: FrameWindow,
        #[serde(default)]
        survivor: Survivor,
    },
    Pipe {
        encoders: Vec<Encoder>,
    },
}

impl Encoder {
    pub fn normalize(min: f64, max: f64) -> Self {
        Self::Normalize {
            min,
            max,
            calibration: None,
        }
    }

    pub fn clip(min: Option<f64>, max: Option<f64>) -> Self {
        Self::Clip { min, max }
    }

    pub fn std_dev(mean: f64, scale: f64) -> Self {
        Self::StdDev {
            mean,
            scale,
            calibration: None,
        }
    }

    pub fn sum(value: f64) -> Self {
        Self::Sum { value }
    }

    pub fn mult(value: f64) -> Self {
        Self::Mult { value }
    }

    pub fn rdp(epsilon: f64) -> Self {
        Self::Rdp { epsilon }
    }

    pub fn window_decimate(window: FrameWindow) -> Self {
        Self::WindowDecimate {
            window,
            survivor: Survivor::default(),
        }
    }

    pub fn window_decimate_with(window: FrameWindow, survivor: Survivor) -> Self {
        Self::WindowDecimate { window, survivor }
    }

    /// Appends `next` so that it runs on the output of `self`.
    pub fn pipe(self, next: Encoder) -> Self {
        match self {
            Self::Pipe { mut encoders } => {
                encoders.push(next);
                Self::Pipe { encoders }
            }
            first => Self::Pipe {
                encoders: vec![first, next],
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Normalize { .. } => "normalize",
            Self::Clip { .. } => "clip",
            Self::StdDev { .. } => "std_dev",
            Self::Sum { .. } => "sum",
            Self::Mult { .. } => "mult",
            Self::Rdp { .. } => "rdp",
            Self::WindowDecimate { .. } => "window_decimate",
            Self::Pipe { .. } => "pipe",
        }
    }

    /// Fixes the reference values of a normalize (`min`, `max`) or standard
    /// deviation (`mean`, `stdev`) encoder.
    pub fn calibrate(&mut self, first: f64, second: f64) -> Result<(), EncodingError> {
        let encoder = self.name();
        match self {
            Self::Normalize { calibration, .. } => {
                if !first.is_finite() || !second.is_finite() {
                    return Err(EncodingError::InvalidConfig {
                        encoder,
                        reason: "calibration range must be finite".to_string(),
                    });
                }
                *calibration = Some(RangeCalibration {
                    min: first,
                    max: second,
                });
                Ok(())
            }
            Self::StdDev { calibration, .. } => {
                if second == 0.0 || !second.is_finite() || !first.is_finite() {
                    return Err(EncodingError::DegenerateSignal {
                        encoder,
                        reason: format!("calibrated stdev {second} cannot be used as a divisor"),
                    });
                }
                *calibration = Some(StatsCalibration {
                    mean: first,
                    stdev: second,
                });
                Ok(())
            }
            _ => Err(EncodingError::CalibrationNotSupported { encoder }),
        }
    }

    /// Rejects parameter combinations that can never encode a trace.
    pub fn validate(&self) -> Result<(), EncodingError> {
        let encoder = self.name();
        let invalid = |reason: &str| {
            Err(EncodingError::InvalidConfig {
                encoder,
                reason: reason.to_string(),
            })
        };
        match self {
            Self::Normalize { min, max, .. } => {
                if !min.is_finite() || !max.is_finite() {
                    return invalid("min and max must be finite");
                }
            }
            Self::Clip { min, max } => {
                if let (Some(min), Some(max)) = (min, max) {
                    if min > max {
                        return invalid("min is greater than max");
                    }
                }
            }
            Self::StdDev {
                mean,
                scale,
                calibration,
            } => {
                if !mean.is_finite() || !scale.is_finite() {
                    return invalid("mean and scale must be finite");
                }
                if calibration.map(|c| c.stdev == 0.0).unwrap_or(false) {
                    return Err(EncodingError::DegenerateSignal {
                        encoder,
                        reason: "calibrated stdev is zero".to_string(),
                    });
                }
            }
            Self::Sum { value } | Self::Mult { value } => {
                if !value.is_finite() {
                    return invalid("value must be finite");
                }
            }
            Self::Rdp { epsilon } => {
                if !epsilon.is_finite() || *epsilon < 0.0 {
                    return invalid("epsilon must be a non-negative number");
                }
            }
            Self::WindowDecimate { .. } => {}
            Self::Pipe { encoders } => {
                if encoders.is_empty() {
                    return invalid("a pipeline needs at least one encoder");
                }
                for inner in encoders {
                    inner.validate()?;
                }
            }
        }
        Ok(())
    }

    pub fn encode(&self, frames: KeyFrames) -> Result<KeyFrames, EncodingError> {
        match self {
            Self::Normalize {
                min,
                max,
                calibration,
            } => {
                let (mut signal, time) = frames.into_parts();
                scaling::normalize(&mut signal, *min, *max, calibration.as_ref());
                Ok(KeyFrames::new(signal, time)?)
            }
            Self::Clip { min, max } => {
                let (mut signal, time) = frames.into_parts();
                scaling::clip(&mut signal, *min, *max);
                Ok(KeyFrames::new(signal, time)?)
            }
            Self::StdDev {
                mean,
                scale,
                calibration,
            } => {
                let (mut signal, time) = frames.into_parts();
                scaling::std_dev(&mut signal, *mean, *scale, calibration.as_ref())?;
                Ok(KeyFrames::new(signal, time)?)
            }
            Self::Sum { value } => {
                let (mut signal, time) = frames.into_parts();
                signal.iter_mut().for_each(|v| *v += value);
                Ok(KeyFrames::new(signal, time)?)
            }
            Self::Mult { value } => {
                let (mut signal, time) = frames.into_parts();
                signal.iter_mut().for_each(|v| *v *= value);
                Ok(KeyFrames::new(signal, time)?)
            }
            Self::Rdp { epsilon } => {
                self.validate()?;
                let (signal, time) = frames.into_parts();
                let points: Vec<[f64; 2]> =
                    time.iter().zip(&signal).map(|(t, v)| [*t, *v]).collect();
                let simplified = simplify(&points, *epsilon);
                log::debug!(
                    "rdp(epsilon={epsilon}) kept {} of {} points",
                    simplified.len(),
                    points.len()
                );
                let (time, signal): (Vec<f64>, Vec<f64>) = simplified.into_iter().map(|[t, v]| (t, v)).unzip();
                Ok(KeyFrames::new(signal, time)?)
            }
            Self::WindowDecimate { window, survivor } => {
                let Some(keep) = decimate_indices(frames.time(), window, *survivor) else {
                    return Ok(frames);
                };
                log::debug!(
                    "window decimation kept {} of {} samples",
                    keep.len(),
                    frames.len()
                );
                let signal = keep.iter().map(|idx| frames.signal()[*idx]).collect();
                let time = keep.iter().map(|idx| frames.time()[*idx]).collect();
                Ok(KeyFrames::new(signal, time)?)
            }
            Self::Pipe { encoders } => encoders
                .iter()
                .try_fold(frames, |frames, encoder| encoder.encode(frames)),
        }
    }
}

/// Composes `encoders` into one pipeline applied in the given order.
pub fn pipe(encoders: Vec<Encoder>) -> Result<Encoder, EncodingError> {
    let pipeline = Encoder::Pipe { encoders };
    pipeline.validate()?;
    Ok(pipeline)
}

/// Encodes a trace, logging how the pipeline changed its length.
pub fn encode_trace(
    encoder: &Encoder,
    signal: Vec<f64>,
    time: Vec<f64>,
) -> Result<KeyFrames, EncodingError> {
    let frames = KeyFrames::new(signal, time)?;
    let before = frames.len();
    let encoded = encoder.encode(frames)?;
    log::info!(
        "{} encoder: {before} samples in, {} out",
        encoder.name(),
        encoded.len()
    );
    Ok(encoded)
}
