//! Chroma extraction modules
//!
//! Extract pitch-class distribution (12 semitones) from audio:
//! - Chroma vector computation from the STFT power spectrum
//! - Normalization strategies (max, L1, L2, CENS quantization)
//! - Temporal smoothing

pub mod extractor;
pub mod normalization;
pub mod smoothing;

pub use extractor::extract_chroma;

use crate::config::ComparisonConfig;
use crate::error::ComparisonError;

/// Number of pitch classes
pub const NUM_PITCH_CLASSES: usize = 12;

/// 12-bin chroma matrix over time frames
#[derive(Debug, Clone, PartialEq)]
pub struct ChromaProfile {
    /// One 12-element vector per frame, index 0 = C
    pub frames: Vec<[f32; NUM_PITCH_CLASSES]>,
}

impl ChromaProfile {
    /// Number of frames
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// True when there are no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Per-pitch-class mean over all frames (zeros when empty)
    pub fn mean_profile(&self) -> [f32; NUM_PITCH_CLASSES] {
        let mut mean = [0.0f32; NUM_PITCH_CLASSES];
        if self.frames.is_empty() {
            return mean;
        }
        for frame in &self.frames {
            for (m, &v) in mean.iter_mut().zip(frame.iter()) {
                *m += v;
            }
        }
        let n = self.frames.len() as f32;
        for m in mean.iter_mut() {
            *m /= n;
        }
        mean
    }

    /// All values, frame-major
    pub fn flatten(&self) -> Vec<f32> {
        self.frames.iter().flat_map(|f| f.iter().copied()).collect()
    }

    /// Keep only the first `num_frames` frames
    pub fn truncate(&mut self, num_frames: usize) {
        self.frames.truncate(num_frames);
    }
}

/// Chroma Energy Normalized Statistics of a sample window
///
/// STFT chroma → L1 per frame → quantization → Hann smoothing → L2 per frame.
/// Robust to dynamics and timbre; used for window and segment similarity.
pub fn chroma_cens(
    samples: &[f32],
    config: &ComparisonConfig,
) -> Result<ChromaProfile, ComparisonError> {
    let mut chroma = extract_chroma(
        samples,
        config.sample_rate,
        config.chroma_frame_size,
        config.chroma_hop_size,
        config.reference_frequency,
    )?;
    normalization::normalize_l1(&mut chroma);
    normalization::quantize_cens(&mut chroma);
    let mut smoothed = smoothing::smooth_chroma(&chroma, config.cens_smoothing_frames);
    normalization::normalize_l2(&mut smoothed);
    Ok(smoothed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / 48_000.0).sin())
            .collect()
    }

    #[test]
    fn test_cens_unit_norm_and_peak_class() {
        let config = ComparisonConfig::default();
        let cens = chroma_cens(&tone(440.0, 48_000), &config).unwrap();
        assert!(!cens.is_empty());
        for frame in &cens.frames {
            let norm: f32 = frame.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-4);
        }
        let mean = cens.mean_profile();
        let peak = (0..12)
            .max_by(|&a, &b| mean[a].partial_cmp(&mean[b]).unwrap())
            .unwrap();
        assert_eq!(peak, 9, "A should dominate");
    }

    #[test]
    fn test_cens_of_silence_is_zero() {
        let config = ComparisonConfig::default();
        let cens = chroma_cens(&vec![0.0; 4800], &config).unwrap();
        assert!(cens.flatten().iter().all(|&x| x == 0.0));
    }
}
