//! Harmonic-percussive source separation (HPSS)
//!
//! Median-filtering separation of the magnitude spectrogram: harmonic content is
//! smooth along time, percussive content is smooth along frequency. Soft
//! (Wiener-style) masks split the complex STFT and each part is inverted separately.
//!
//! # Reference
//!
//! Fitzgerald, D. (2010). Harmonic/Percussive Separation using Median Filtering.
//! *Proceedings of the 13th International Conference on Digital Audio Effects (DAFx-10)*.

use super::median::median_filter;
use super::stft::{istft, stft, Spectrogram};
use crate::config::ComparisonConfig;
use crate::error::ComparisonError;
use crate::io::AudioSignal;

/// Numerical floor under which both filtered magnitudes count as silent
const TINY: f32 = 1e-20;

/// HPSS parameters
#[derive(Debug, Clone, Copy)]
pub struct HpssParams {
    /// STFT frame size
    pub frame_size: usize,
    /// STFT hop size
    pub hop_size: usize,
    /// Median filter length in frames (harmonic) and bins (percussive)
    pub kernel_size: usize,
    /// Soft mask exponent
    pub power: f32,
}

impl Default for HpssParams {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            kernel_size: 31,
            power: 2.0,
        }
    }
}

impl From<&ComparisonConfig> for HpssParams {
    fn from(config: &ComparisonConfig) -> Self {
        Self {
            frame_size: config.hpss_frame_size,
            hop_size: config.hpss_hop_size,
            kernel_size: config.hpss_kernel_size,
            power: config.hpss_mask_power,
        }
    }
}

/// Separate `samples` into `(harmonic, percussive)`, both the same length as the input
///
/// # Errors
///
/// Returns `ComparisonError::InvalidInput` for invalid STFT parameters.
pub fn hpss(samples: &[f32], params: &HpssParams) -> Result<(Vec<f32>, Vec<f32>), ComparisonError> {
    if samples.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let spec = stft(samples, params.frame_size, params.hop_size)?;
    let mags = spec.magnitudes();
    let num_frames = spec.num_frames();
    let num_bins = spec.num_bins();

    log::debug!(
        "HPSS: {} frames x {} bins, kernel={}",
        num_frames,
        num_bins,
        params.kernel_size
    );

    // Harmonic: median along time for each bin
    let mut harmonic_mags = vec![vec![0.0f32; num_bins]; num_frames];
    let mut series = vec![0.0f32; num_frames];
    for bin in 0..num_bins {
        for (t, frame) in mags.iter().enumerate() {
            series[t] = frame[bin];
        }
        for (t, v) in median_filter(&series, params.kernel_size).into_iter().enumerate() {
            harmonic_mags[t][bin] = v;
        }
    }

    // Percussive: median along frequency for each frame
    let percussive_mags: Vec<Vec<f32>> = mags
        .iter()
        .map(|frame| median_filter(frame, params.kernel_size))
        .collect();

    let mut harmonic_spec = Spectrogram {
        frames: Vec::with_capacity(num_frames),
        frame_size: spec.frame_size,
        hop_size: spec.hop_size,
    };
    let mut percussive_spec = harmonic_spec.clone();

    for (t, frame) in spec.frames.iter().enumerate() {
        let mut h_frame = Vec::with_capacity(num_bins);
        let mut p_frame = Vec::with_capacity(num_bins);
        for (bin, &c) in frame.iter().enumerate() {
            let (h_mask, p_mask) = soft_masks(
                harmonic_mags[t][bin],
                percussive_mags[t][bin],
                params.power,
            );
            h_frame.push(c * h_mask);
            p_frame.push(c * p_mask);
        }
        harmonic_spec.frames.push(h_frame);
        percussive_spec.frames.push(p_frame);
    }

    let harmonic = istft(&harmonic_spec, samples.len())?;
    let percussive = istft(&percussive_spec, samples.len())?;
    Ok((harmonic, percussive))
}

/// Wiener-style masks `H^p / (H^p + P^p)` and `P^p / (H^p + P^p)`
///
/// Where both magnitudes are negligible the bin is split evenly.
fn soft_masks(h: f32, p: f32, power: f32) -> (f32, f32) {
    let z = h.max(p);
    if z < TINY {
        return (0.5, 0.5);
    }
    let hp = (h / z).powf(power);
    let pp = (p / z).powf(power);
    let denom = hp + pp;
    (hp / denom, pp / denom)
}

/// Split a signal and remix `harmonic_weight * H + percussive_weight * P`
pub fn harmonic_percussive_mix(
    signal: AudioSignal,
    config: &ComparisonConfig,
) -> Result<AudioSignal, ComparisonError> {
    let (harmonic, percussive) = hpss(signal.samples(), &HpssParams::from(config))?;
    let mix: Vec<f32> = harmonic
        .iter()
        .zip(percussive.iter())
        .map(|(&h, &p)| config.harmonic_weight * h + config.percussive_weight * p)
        .collect();
    Ok(signal.with_samples(mix))
}
