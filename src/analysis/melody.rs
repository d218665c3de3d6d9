//! Melody proxy resynthesis
//!
//! The f0 track of a signal is smoothed, gap-filled and rendered as a pure tone of the
//! same length. Comparing proxies instead of raw audio discards timbre and
//! arrangement and keeps only the melodic shape.

use std::f64::consts::PI;

use crate::config::ComparisonConfig;
use crate::error::ComparisonError;
use crate::features::median::median_filter;
use crate::features::pitch::track_f0;
use crate::io::AudioSignal;
use crate::preprocessing::normalization::normalize_peak_in_place;

/// Replace unvoiced frames (f0 <= `threshold`) with the previous frame's value
///
/// The first frame is never changed, so leading unvoiced frames stay unvoiced.
pub fn forward_fill_unvoiced(f0: &mut [f32], threshold: f32) {
    for i in 1..f0.len() {
        if f0[i] <= threshold {
            f0[i] = f0[i - 1];
        }
    }
}

/// Linearly interpolate per-frame values to `len` samples
///
/// Frame `i` sits at sample `i * hop`; positions past the last frame hold its value.
pub fn interpolate_frames(values: &[f32], hop: usize, len: usize) -> Vec<f32> {
    if values.is_empty() || hop == 0 {
        return vec![0.0; len];
    }
    let last = values.len() - 1;
    (0..len)
        .map(|t| {
            let idx = t / hop;
            if idx >= last {
                return values[last];
            }
            let frac = (t - idx * hop) as f32 / hop as f32;
            values[idx] + frac * (values[idx + 1] - values[idx])
        })
        .collect()
}

/// Render an instantaneous-frequency curve as a unit-amplitude sine
///
/// Phase is the running sum of `2π f / sr`, accumulated in f64 so long signals do not
/// drift.
pub fn synthesize_tone(frequencies: &[f32], sample_rate: u32) -> Vec<f32> {
    let step = 2.0 * PI / sample_rate as f64;
    let mut phase = 0.0f64;
    frequencies
        .iter()
        .map(|&f| {
            phase += step * f as f64;
            phase.sin() as f32
        })
        .collect()
}

/// Extract the melody proxy of `signal`
///
/// Same length and sample rate as the input. A signal with no voiced frames yields
/// silence.
///
/// # Errors
///
/// Returns `ComparisonError` if f0 tracking fails.
pub fn extract_melody(
    signal: &AudioSignal,
    config: &ComparisonConfig,
) -> Result<AudioSignal, ComparisonError> {
    if signal.is_empty() {
        return Ok(AudioSignal::new(Vec::new(), signal.sample_rate()));
    }

    let track = track_f0(signal.samples(), signal.sample_rate(), config)?;
    let mut f0 = median_filter(&track.frequencies, config.f0_median_window);
    forward_fill_unvoiced(&mut f0, config.unvoiced_threshold_hz);

    let curve = interpolate_frames(&f0, track.hop_size, signal.len());
    let tone = synthesize_tone(&curve, signal.sample_rate());
    let mut melody = median_filter(&tone, config.melody_median_window);
    let peak = normalize_peak_in_place(&mut melody);

    log::debug!(
        "Melody proxy: {} frames, {} voiced, peak before normalization {:.3}",
        track.len(),
        track.voiced(config.unvoiced_threshold_hz).len(),
        peak
    );

    Ok(AudioSignal::new(melody, signal.sample_rate()))
}
