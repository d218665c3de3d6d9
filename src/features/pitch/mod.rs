//! Fundamental frequency tracking
//!
//! Frame-wise YIN over centred, zero-padded frames. Frame `i` is centred on sample
//! `i * hop_size`, so a signal of `n` samples yields `1 + n / hop_size` estimates.
//! Unvoiced or silent frames report 0 Hz.

pub mod yin;

pub use yin::YinAnalyzer;

use crate::config::ComparisonConfig;
use crate::error::ComparisonError;

/// Per-frame f0 estimates
#[derive(Debug, Clone, PartialEq)]
pub struct PitchTrack {
    /// f0 in Hz per frame, 0.0 where unvoiced
    pub frequencies: Vec<f32>,
    /// Hop between frame centres in samples
    pub hop_size: usize,
    /// Sample rate of the analyzed signal
    pub sample_rate: u32,
}

impl PitchTrack {
    /// Number of frames
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// True if no frames were analyzed
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Frequencies above `threshold_hz` (voiced frames only)
    pub fn voiced(&self, threshold_hz: f32) -> Vec<f32> {
        self.frequencies
            .iter()
            .copied()
            .filter(|&f| f > threshold_hz)
            .collect()
    }
}

/// Track f0 across `samples`
///
/// Search range is `[config.min_f0, config.max_f0]`; lags are
/// `floor(sr / max_f0) ..= ceil(sr / min_f0)`.
///
/// # Errors
///
/// Returns `ComparisonError::InvalidInput` for a zero sample rate, a zero hop, or an
/// f0 range that does not fit in the frame.
pub fn track_f0(
    samples: &[f32],
    sample_rate: u32,
    config: &ComparisonConfig,
) -> Result<PitchTrack, ComparisonError> {
    let frame_size = config.pitch_frame_size;
    let hop_size = config.pitch_hop_size;

    if sample_rate == 0 || hop_size == 0 {
        return Err(ComparisonError::InvalidInput(format!(
            "Invalid pitch tracking parameters: sample_rate={}, hop={}",
            sample_rate, hop_size
        )));
    }
    if config.min_f0 <= 0.0 || config.max_f0 <= config.min_f0 {
        return Err(ComparisonError::InvalidInput(format!(
            "Invalid f0 range: {}..{} Hz",
            config.min_f0, config.max_f0
        )));
    }

    let max_tau = (sample_rate as f32 / config.min_f0).ceil() as usize;
    let min_tau = (sample_rate as f32 / config.max_f0).floor() as usize;
    if frame_size / 2 + max_tau > frame_size {
        return Err(ComparisonError::InvalidInput(format!(
            "Frame size {} too small for minimum f0 {} Hz",
            frame_size, config.min_f0
        )));
    }

    if samples.is_empty() {
        return Ok(PitchTrack {
            frequencies: Vec::new(),
            hop_size,
            sample_rate,
        });
    }

    let num_frames = 1 + samples.len() / hop_size;
    let half = (frame_size / 2) as isize;
    let mut analyzer = YinAnalyzer::new(frame_size, min_tau, max_tau, config.yin_threshold);
    let mut frame = vec![0.0f32; analyzer.frame_size()];
    let mut frequencies = Vec::with_capacity(num_frames);

    log::debug!(
        "Tracking f0 over {} frames (lags {}..={})",
        num_frames,
        min_tau,
        max_tau
    );

    for t in 0..num_frames {
        let start = (t * hop_size) as isize - half;
        for (i, slot) in frame.iter_mut().enumerate() {
            let idx = start + i as isize;
            *slot = if idx >= 0 && (idx as usize) < samples.len() {
                samples[idx as usize]
            } else {
                0.0
            };
        }
        let f0 = analyzer.estimate(&frame, sample_rate);
        frequencies.push(if f0.is_finite() && f0 > 0.0 { f0 } else { 0.0 });
    }

    Ok(PitchTrack {
        frequencies,
        hop_size,
        sample_rate,
    })
}
