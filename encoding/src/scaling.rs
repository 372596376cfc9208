use crate::{EncodingError, RangeCalibration, StatsCalibration};

/// Shifts the signal to start at zero and divides by its peak, or by the
/// calibrated range when one is set. A zero divisor leaves the shifted values
/// undivided. The result is then offset by `min` and multiplied by `max`.
pub fn normalize(signal: &mut [f64], min: f64, max: f64, calibration: Option<&RangeCalibration>) {
    if signal.is_empty() {
        return;
    }
    let offset = match calibration {
        Some(c) => c.min,
        None => signal.iter().copied().fold(f64::INFINITY, f64::min),
    };
    signal.iter_mut().for_each(|v| *v -= offset);
    let divisor = match calibration {
        Some(c) => c.max,
        None => signal.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    };
    if divisor != 0.0 {
        signal.iter_mut().for_each(|v| *v /= divisor);
    } else {
        log::warn!("normalize: signal range is zero, values are only shifted");
    }
    signal.iter_mut().for_each(|v| *v = (*v + min) * max);
}

pub fn clip(signal: &mut [f64], min: Option<f64>, max: Option<f64>) {
    if let Some(min) = min {
        signal.iter_mut().filter(|v| **v < min).for_each(|v| *v = min);
    }
    if let Some(max) = max {
        signal.iter_mut().filter(|v| **v > max).for_each(|v| *v = max);
    }
}

/// Population mean and standard deviation.
pub fn mean_stdev(signal: &[f64]) -> (f64, f64) {
    let n = signal.len() as f64;
    let mean = signal.iter().sum::<f64>() / n;
    let variance = signal.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

pub fn std_dev(
    signal: &mut [f64],
    mean: f64,
    scale: f64,
    calibration: Option<&StatsCalibration>,
) -> Result<(), EncodingError> {
    if signal.is_empty() {
        return Ok(());
    }
    let (actual_mean, actual_stdev) = match calibration {
        Some(c) => (c.mean, c.stdev),
        None => mean_stdev(signal),
    };
    if actual_stdev == 0.0 || !actual_stdev.is_finite() {
        return Err(EncodingError::DegenerateSignal {
            encoder: "std_dev",
            reason: format!("standard deviation is {actual_stdev}"),
        });
    }
    signal
        .iter_mut()
        .for_each(|v| *v = mean + (*v - actual_mean) * scale / actual_stdev);
    Ok(())
}
