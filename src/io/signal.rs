//! Owned mono signal passed between pipeline stages

use std::ops::Range;

/// Mono audio signal
///
/// Each pipeline stage takes its input by value and returns a new signal, so a
/// signal is never aliased across stages.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioSignal {
    /// Wrap samples at the given sample rate
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Samples as a slice
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Mutable access to the samples
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the signal holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Peak absolute amplitude (0.0 for an empty signal)
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max)
    }

    /// Keep only `range`, clamped to the signal bounds
    pub fn slice(mut self, range: Range<usize>) -> Self {
        let end = range.end.min(self.samples.len());
        let start = range.start.min(end);
        self.samples.truncate(end);
        self.samples.drain(..start);
        self
    }

    /// Keep at most the first `len` samples
    pub fn truncate(mut self, len: usize) -> Self {
        self.samples.truncate(len);
        self
    }

    /// Replace the samples, keeping the sample rate
    pub fn with_samples(self, samples: Vec<f32>) -> Self {
        Self {
            samples,
            sample_rate: self.sample_rate,
        }
    }
}
