use crate::buffer::SampleBuffer;
use crate::selection::Selection;

/// Fixed silence pad duration when padding is enabled.
pub const PAD_MS: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionKind {
    Silence,
    Audio,
}

/// One labeled sub-range of the output buffer, for preview shading only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub kind: RegionKind,
    pub start_ms: f64,
    pub end_ms: f64,
}

/// The exact bytes a save will write: the selected slice, optionally wrapped
/// in two equal silence pads. Deterministic for identical inputs, so the
/// preview pane and the save path share one build.
#[derive(Clone, Debug, PartialEq)]
pub struct SpliceResult {
    samples: Vec<f32>,
    sample_rate: u32,
    pad_samples: usize,
}

impl SpliceResult {
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn pad_samples(&self) -> usize {
        self.pad_samples
    }

    pub fn pad_ms(&self) -> f64 {
        self.pad_samples as f64 / self.sample_rate as f64 * 1000.0
    }

    pub fn duration_ms(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64 * 1000.0
    }

    /// Silence/audio breakdown of the output, recomputed from length and pad
    /// count alone. Three regions when padded, one when not.
    pub fn regions(&self) -> Vec<Region> {
        let total_ms = self.duration_ms();
        if self.pad_samples == 0 {
            return vec![Region {
                kind: RegionKind::Audio,
                start_ms: 0.0,
                end_ms: total_ms,
            }];
        }
        let pad_ms = self.pad_ms();
        vec![
            Region {
                kind: RegionKind::Silence,
                start_ms: 0.0,
                end_ms: pad_ms,
            },
            Region {
                kind: RegionKind::Audio,
                start_ms: pad_ms,
                end_ms: total_ms - pad_ms,
            },
            Region {
                kind: RegionKind::Silence,
                start_ms: total_ms - pad_ms,
                end_ms: total_ms,
            },
        ]
    }
}

/// Apply the padding transform to the selected range. Returns `None` when the
/// selection is empty; callers must not attempt to save in that case.
pub fn build(buffer: &SampleBuffer, selection: &Selection, pad_enabled: bool) -> Option<SpliceResult> {
    let slice = selection.slice(buffer)?;
    let pad_samples = if pad_enabled {
        (PAD_MS as f64 / 1000.0 * buffer.sample_rate() as f64).round() as usize
    } else {
        0
    };
    let mut samples = Vec::with_capacity(slice.len() + 2 * pad_samples);
    samples.resize(pad_samples, 0.0);
    samples.extend_from_slice(slice);
    samples.resize(samples.len() + pad_samples, 0.0);
    Some(SpliceResult {
        samples,
        sample_rate: buffer.sample_rate(),
        pad_samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(sr: u32, len: usize) -> SampleBuffer {
        SampleBuffer::from_samples(vec![0.5; len], sr).expect("buffer")
    }

    #[test]
    fn unpadded_region_map_is_single_audio_span() {
        let buf = buffer(1000, 1000);
        let sel = Selection::from_time_range(&buf, 100.0, 400.0);
        let out = build(&buf, &sel, false).expect("splice");
        let regions = out.regions();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].kind, RegionKind::Audio);
        assert_eq!(regions[0].start_ms, 0.0);
        assert!((regions[0].end_ms - 300.0).abs() < 1e-9);
    }

    #[test]
    fn padded_region_map_has_symmetric_silence() {
        let buf = buffer(1000, 1000);
        let sel = Selection::from_time_range(&buf, 100.0, 400.0);
        let out = build(&buf, &sel, true).expect("splice");
        let regions = out.regions();
        assert_eq!(regions.len(), 3);
        assert_eq!(regions[0].kind, RegionKind::Silence);
        assert_eq!(regions[1].kind, RegionKind::Audio);
        assert_eq!(regions[2].kind, RegionKind::Silence);
        assert!((regions[0].end_ms - 100.0).abs() < 1e-9);
        assert!((regions[2].end_ms - regions[2].start_ms - 100.0).abs() < 1e-9);
        assert!((out.duration_ms() - 500.0).abs() < 1e-9);
    }
}
