//! Peak normalization
//!
//! # Example
//!
//! ```
//! use cover_compare::io::AudioSignal;
//! use cover_compare::preprocessing::normalization::normalize;
//!
//! let signal = AudioSignal::new(vec![0.25, -0.5, 0.1], 48_000);
//! let normalized = normalize(signal);
//! assert_eq!(normalized.peak(), 1.0);
//! ```

use crate::io::AudioSignal;

/// Scale `samples` in place so the peak absolute amplitude becomes 1.0
///
/// Each sample is divided by the peak, so the peak sample lands on exactly 1.0.
/// A zero-peak (silent or empty) buffer is left untouched.
///
/// # Returns
///
/// The peak found before scaling (0.0 when nothing was changed)
pub fn normalize_peak_in_place(samples: &mut [f32]) -> f32 {
    let peak = samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max);

    if peak == 0.0 || !peak.is_finite() {
        if !samples.is_empty() {
            log::warn!("Signal peak is {}, skipping normalization", peak);
        }
        return 0.0;
    }

    for sample in samples.iter_mut() {
        *sample /= peak;
    }

    log::debug!(
        "Peak normalization: peak={:.4} ({:.2} dB)",
        peak,
        20.0 * peak.log10()
    );

    peak
}

/// Normalize a signal to unit peak amplitude
///
/// A silent signal is returned unchanged; this never divides by zero.
pub fn normalize(mut signal: AudioSignal) -> AudioSignal {
    normalize_peak_in_place(signal.samples_mut());
    signal
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generate a test signal: sine wave at 440 Hz
    fn generate_test_signal(length: usize, amplitude: f32, sample_rate: f32) -> Vec<f32> {
        let freq = 440.0;
        (0..length)
            .map(|i| {
                let t = i as f32 / sample_rate;
                amplitude * (2.0 * std::f32::consts::PI * freq * t).sin()
            })
            .collect()
    }

    #[test]
    fn test_peak_is_exactly_one() {
        for amplitude in [1e-4, 0.3, 0.5, 2.5] {
            let signal = AudioSignal::new(generate_test_signal(4_800, amplitude, 48_000.0), 48_000);
            let normalized = normalize(signal);
            assert_eq!(
                normalized.peak(),
                1.0,
                "peak should be exactly 1.0 for amplitude {}",
                amplitude
            );
        }
    }

    #[test]
    fn test_negative_peak() {
        let normalized = normalize(AudioSignal::new(vec![0.1, -0.4, 0.2], 48_000));
        assert_eq!(normalized.samples()[1], -1.0);
        assert!((normalized.samples()[0] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_silent_audio_unchanged() {
        let signal = AudioSignal::new(vec![0.0f32; 1000], 48_000);
        let normalized = normalize(signal.clone());
        assert_eq!(normalized, signal);
    }

    #[test]
    fn test_empty_samples() {
        let mut samples: Vec<f32> = vec![];
        assert_eq!(normalize_peak_in_place(&mut samples), 0.0);
    }
}
