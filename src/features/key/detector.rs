//! Key estimation from averaged chroma
//!
//! Each frame is max-normalized so loud passages do not outweigh quiet ones, the
//! frames are averaged, and the pitch class with the largest mean energy wins.

use super::PitchClass;
use crate::config::ComparisonConfig;
use crate::error::ComparisonError;
use crate::features::chroma::normalization::normalize_max;
use crate::features::chroma::{extract_chroma, ChromaProfile, NUM_PITCH_CLASSES};
use crate::io::AudioSignal;

/// Pitch class of maximum average energy in a chroma profile
///
/// Ties resolve to the lowest pitch class, so an all-zero profile yields C.
pub fn key_from_chroma(chroma: &ChromaProfile) -> PitchClass {
    let mean = chroma.mean_profile();
    let mut best = 0usize;
    for pc in 1..NUM_PITCH_CLASSES {
        if mean[pc] > mean[best] {
            best = pc;
        }
    }
    PitchClass(best as u8)
}

/// Estimate the dominant pitch class of a signal
///
/// # Errors
///
/// Returns `ComparisonError` if chroma extraction fails.
pub fn estimate_key(
    signal: &AudioSignal,
    config: &ComparisonConfig,
) -> Result<PitchClass, ComparisonError> {
    let mut chroma = extract_chroma(
        signal.samples(),
        signal.sample_rate(),
        config.chroma_frame_size,
        config.chroma_hop_size,
        config.reference_frequency,
    )?;
    normalize_max(&mut chroma);
    let key = key_from_chroma(&chroma);
    log::debug!(
        "Estimated key {} from {} chroma frames",
        key.name(),
        chroma.num_frames()
    );
    Ok(key)
}

/// Signed semitone shift `key1 - key2` that moves recording 2 into the key of recording 1
///
/// Always within -11..=11.
pub fn key_shift(key1: PitchClass, key2: PitchClass) -> i32 {
    key1.index() as i32 - key2.index() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f32, secs: f32) -> AudioSignal {
        let len = (48_000.0 * secs) as usize;
        let samples = (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / 48_000.0).sin())
            .collect();
        AudioSignal::new(samples, 48_000)
    }

    #[test]
    fn test_estimate_key_of_tones() {
        let config = ComparisonConfig::default();
        assert_eq!(estimate_key(&tone(440.0, 1.0), &config).unwrap(), PitchClass(9));
        assert_eq!(estimate_key(&tone(261.63, 1.0), &config).unwrap(), PitchClass(0));
        assert_eq!(estimate_key(&tone(493.88, 1.0), &config).unwrap(), PitchClass(11));
    }

    #[test]
    fn test_triad_root_dominates_after_doubling() {
        // C major triad with a doubled root
        let config = ComparisonConfig::default();
        let len = 48_000;
        let samples: Vec<f32> = (0..len)
            .map(|i| {
                let t = i as f32 / 48_000.0;
                let w = |f: f32| (2.0 * std::f32::consts::PI * f * t).sin();
                0.6 * w(261.63) + 0.6 * w(523.25) + 0.3 * w(329.63) + 0.3 * w(392.0)
            })
            .collect();
        let key = estimate_key(&AudioSignal::new(samples, 48_000), &config).unwrap();
        assert_eq!(key.name(), "C");
    }

    #[test]
    fn test_silence_defaults_to_c() {
        let config = ComparisonConfig::default();
        let silent = AudioSignal::new(vec![0.0; 10_000], 48_000);
        assert_eq!(estimate_key(&silent, &config).unwrap(), PitchClass(0));
    }

    #[test]
    fn test_key_shift_range() {
        assert_eq!(key_shift(PitchClass(9), PitchClass(11)), -2);
        assert_eq!(key_shift(PitchClass(11), PitchClass(0)), 11);
        assert_eq!(key_shift(PitchClass(0), PitchClass(11)), -11);
        assert_eq!(key_shift(PitchClass(4), PitchClass(4)), 0);
    }
}
