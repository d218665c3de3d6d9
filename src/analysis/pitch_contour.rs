//! Melody-shape comparison
//!
//! f0 tracks of two melody proxies are converted to semitones relative to A4,
//! standardized, and correlated. Standardizing removes any constant transposition
//! and range difference, so only the contour matters.

use super::melody::extract_melody;
use super::sync::AlignedPair;
use crate::config::ComparisonConfig;
use crate::error::ComparisonError;
use crate::features::correlation::{mean, pearson, std_dev};
use crate::features::pitch::track_f0;

/// `12 * log2(max(f, ε) / reference)` per frame
pub fn semitone_sequence(frequencies: &[f32], reference: f32, epsilon: f32) -> Vec<f32> {
    frequencies
        .iter()
        .map(|&f| 12.0 * (f.max(epsilon) / reference).log2())
        .collect()
}

/// `(x - mean) / (std + ε)`
pub fn z_score(values: &[f32], epsilon: f32) -> Vec<f32> {
    let m = mean(values);
    let s = std_dev(values) + epsilon;
    values.iter().map(|&x| (x - m) / s).collect()
}

/// Similarity in [0, 100] between the pitch sequences of two proxies
///
/// Pearson correlation of the standardized semitone sequences (truncated to the
/// shorter one), clipped to [0, 1], then `sqrt(corr) * 100`. Undefined correlation
/// (fewer than two frames, or a flat sequence) scores 0.
///
/// # Errors
///
/// Returns `ComparisonError` if f0 tracking fails.
pub fn compare_pitch_sequences(
    proxy1: &[f32],
    proxy2: &[f32],
    sample_rate: u32,
    config: &ComparisonConfig,
) -> Result<f32, ComparisonError> {
    let track1 = track_f0(proxy1, sample_rate, config)?;
    let track2 = track_f0(proxy2, sample_rate, config)?;

    let p1 = z_score(
        &semitone_sequence(&track1.frequencies, config.reference_frequency, config.epsilon),
        config.epsilon,
    );
    let p2 = z_score(
        &semitone_sequence(&track2.frequencies, config.reference_frequency, config.epsilon),
        config.epsilon,
    );

    let n = p1.len().min(p2.len());
    let corr = match pearson(&p1[..n], &p2[..n]) {
        Some(r) => r.clamp(0.0, 1.0),
        None => {
            log::debug!("Pitch correlation undefined over {} frames, scoring 0", n);
            0.0
        }
    };

    Ok(corr.sqrt() * 100.0)
}

/// Pitch-contour score of an aligned pair: melody proxies, then
/// [`compare_pitch_sequences`]
///
/// # Errors
///
/// Returns `ComparisonError` if f0 tracking fails.
pub fn pitch_contour_score(
    pair: &AlignedPair,
    config: &ComparisonConfig,
) -> Result<f32, ComparisonError> {
    let melody1 = extract_melody(&pair.first, config)?;
    let melody2 = extract_melody(&pair.second, config)?;
    compare_pitch_sequences(
        melody1.samples(),
        melody2.samples(),
        pair.first.sample_rate(),
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::AudioSignal;

    /// Tone whose pitch steps through `notes` (Hz), `note_len` samples each
    fn melody(notes: &[f32], note_len: usize) -> Vec<f32> {
        let mut phase = 0.0f64;
        let mut out = Vec::with_capacity(notes.len() * note_len);
        for &f in notes {
            for _ in 0..note_len {
                phase += 2.0 * std::f64::consts::PI * f as f64 / 48_000.0;
                out.push(phase.sin() as f32);
            }
        }
        out
    }

    #[test]
    fn test_semitones() {
        let st = semitone_sequence(&[440.0, 880.0, 220.0], 440.0, 1e-6);
        assert!((st[0]).abs() < 1e-5);
        assert!((st[1] - 12.0).abs() < 1e-4);
        assert!((st[2] + 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_z_score() {
        let z = z_score(&[1.0, 2.0, 3.0], 0.0);
        assert!((mean(&z)).abs() < 1e-6);
        assert!((std_dev(&z) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_same_contour_transposed_scores_high() {
        let config = ComparisonConfig::default();
        let notes = [220.0, 247.0, 262.0, 294.0, 330.0, 294.0, 262.0, 220.0];
        let up: Vec<f32> = notes.iter().map(|f| f * 2.0f32.powf(3.0 / 12.0)).collect();
        let a = melody(&notes, 12_000);
        let b = melody(&up, 12_000);
        let score = compare_pitch_sequences(&a, &b, 48_000, &config).unwrap();
        assert!(score > 90.0, "score {}", score);
    }

    #[test]
    fn test_flat_sequence_scores_zero() {
        let config = ComparisonConfig::default();
        let silence = vec![0.0f32; 20_000];
        let score = compare_pitch_sequences(&silence, &silence, 48_000, &config).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_inverted_contour_clips_to_zero() {
        let config = ComparisonConfig::default();
        let rising = [200.0, 250.0, 300.0, 350.0, 400.0, 450.0];
        let falling = [450.0, 400.0, 350.0, 300.0, 250.0, 200.0];
        let score = compare_pitch_sequences(
            &melody(&rising, 12_000),
            &melody(&falling, 12_000),
            48_000,
            &config,
        )
        .unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_pair_score_bounds() {
        let config = ComparisonConfig::default();
        let samples = melody(&[220.0, 330.0, 262.0, 392.0], 12_000);
        let pair = AlignedPair {
            first: AudioSignal::new(samples.clone(), 48_000),
            second: AudioSignal::new(samples, 48_000),
        };
        let score = pitch_contour_score(&pair, &config).unwrap();
        assert!((0.0..=100.0).contains(&score));
        assert!(score > 95.0, "score {}", score);
    }
}
