use std::path::Path;

use crate::audio_io;
use crate::error::{Result, SpliceError};

/// Decoded mono audio for one source file. Immutable once constructed;
/// loading a different file replaces the buffer wholesale.
#[derive(Clone, Debug)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Decode the audio container at `path` into a mono buffer. Multi-channel
    /// sources are reduced by arithmetic mean across channels.
    pub fn load(path: &Path) -> Result<Self> {
        let (samples, sample_rate) =
            audio_io::decode_audio_mono(path).map_err(|e| SpliceError::Decode(e.to_string()))?;
        Self::from_samples(samples, sample_rate)
    }

    /// Construct from already-decoded samples. Fails when `sample_rate` is
    /// zero; an empty sample vector is allowed.
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(SpliceError::Decode("sample rate is zero".to_string()));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_ms(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64 * 1000.0
    }
}
