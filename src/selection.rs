use crate::buffer::SampleBuffer;

/// A validated sample range on one buffer, derived from a time-domain drag.
/// `start <= end <= buffer.len()` always holds; an empty range is the valid
/// "no selection" state, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    start_sample: usize,
    end_sample: usize,
}

fn ms_to_sample(ms: f64, sample_rate: u32, len: usize) -> usize {
    let raw = (ms * sample_rate as f64 / 1000.0).round();
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    (raw as usize).min(len)
}

impl Selection {
    /// Map a raw `(start_ms, end_ms)` drag onto the buffer. Total: arguments
    /// may arrive in either order (drag-to-left) and out-of-range values are
    /// clamped, never rejected. The UI's handles enforce bounds visually but
    /// caller-supplied ms values are not trusted here.
    pub fn from_time_range(buffer: &SampleBuffer, start_ms: f64, end_ms: f64) -> Self {
        let a = ms_to_sample(start_ms, buffer.sample_rate(), buffer.len());
        let b = ms_to_sample(end_ms, buffer.sample_rate(), buffer.len());
        Self {
            start_sample: a.min(b),
            end_sample: a.max(b),
        }
    }

    pub fn empty() -> Self {
        Self {
            start_sample: 0,
            end_sample: 0,
        }
    }

    pub fn start_sample(&self) -> usize {
        self.start_sample
    }

    pub fn end_sample(&self) -> usize {
        self.end_sample
    }

    pub fn sample_count(&self) -> usize {
        self.end_sample - self.start_sample
    }

    pub fn is_empty(&self) -> bool {
        self.start_sample == self.end_sample
    }

    pub fn duration_ms(&self, buffer: &SampleBuffer) -> f64 {
        self.sample_count() as f64 / buffer.sample_rate() as f64 * 1000.0
    }

    /// The selected sub-range, or `None` when nothing is selected. Callers
    /// must treat `None` as "nothing to output".
    pub fn slice<'a>(&self, buffer: &'a SampleBuffer) -> Option<&'a [f32]> {
        if self.is_empty() {
            return None;
        }
        let end = self.end_sample.min(buffer.len());
        let start = self.start_sample.min(end);
        if start == end {
            return None;
        }
        Some(&buffer.samples()[start..end])
    }
}
