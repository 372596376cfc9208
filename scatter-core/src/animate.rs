use crate::backend::BackendError;
use crate::ScatterError;
use encoding::Encoder;
use timeline::{FrameWindow, KeyFrames, TimeAxis};

/// A scalar property of a host object that can be keyframed.
pub trait PropertySink {
    fn keyframe_insert(&mut self, frame: i64, value: f64) -> Result<(), BackendError>;
}

impl PropertySink for Vec<(i64, f64)> {
    fn keyframe_insert(&mut self, frame: i64, value: f64) -> Result<(), BackendError> {
        self.push((frame, value));
        Ok(())
    }
}

/// Drives a single property from a trace: encode, map every sample to its frame,
/// insert one keyframe per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Animator {
    encoder: Encoder,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            encoder: Encoder::normalize(0.0, 1.0),
        }
    }
}

impl Animator {
    pub fn new(encoder: Encoder) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Returns the number of keyframes inserted.
    pub fn animate<T: TimeAxis + ?Sized>(
        &self,
        sink: &mut dyn PropertySink,
        window: &FrameWindow,
        signal: Vec<f64>,
        time: &T,
    ) -> Result<usize, ScatterError> {
        let frames = KeyFrames::from_axis(signal, time)?;
        let encoded = self.encoder.encode(frames)?;
        let mut inserted = 0;
        for (frame, value) in window.iterate_keyframes(&encoded) {
            sink.keyframe_insert(frame, value)?;
            inserted += 1;
        }
        log::debug!("{} animator inserted {inserted} keyframes", self.encoder.name());
        Ok(inserted)
    }
}
