//! Chroma vector extraction
//!
//! Converts the STFT power spectrum to 12-element chroma vectors by assigning every
//! bin between C1 and C8 to its nearest equal-tempered pitch class.

use super::{ChromaProfile, NUM_PITCH_CLASSES};
use crate::error::ComparisonError;
use crate::features::stft::stft;

/// Lowest analyzed frequency (C1)
const MIN_CHROMA_FREQ: f32 = 32.703;

/// Highest analyzed frequency (C8)
const MAX_CHROMA_FREQ: f32 = 4186.0;

/// Pitch class (0 = C) of each STFT bin, `None` outside the analyzed band
fn bin_pitch_classes(
    num_bins: usize,
    frame_size: usize,
    sample_rate: u32,
    reference_frequency: f32,
) -> Vec<Option<usize>> {
    (0..num_bins)
        .map(|k| {
            let freq = k as f32 * sample_rate as f32 / frame_size as f32;
            if !(MIN_CHROMA_FREQ..=MAX_CHROMA_FREQ).contains(&freq) {
                return None;
            }
            // MIDI 69 is A4 at the reference frequency, MIDI 60 is C
            let midi = 69.0 + 12.0 * (freq / reference_frequency).log2();
            Some((midi.round() as i64).rem_euclid(NUM_PITCH_CLASSES as i64) as usize)
        })
        .collect()
}

/// Extract chroma vectors from audio samples
///
/// # Arguments
///
/// * `samples` - Audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `frame_size` - FFT frame size (default: 4096)
/// * `hop_size` - Hop size (default: 512)
/// * `reference_frequency` - Frequency of A4 (default: 440.0)
///
/// # Returns
///
/// Unnormalized chroma (summed bin power per pitch class), one vector per frame
///
/// # Errors
///
/// Returns `ComparisonError::InvalidInput` for a zero sample rate or invalid STFT parameters.
pub fn extract_chroma(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
    reference_frequency: f32,
) -> Result<ChromaProfile, ComparisonError> {
    if sample_rate == 0 {
        return Err(ComparisonError::InvalidInput(
            "Sample rate must be > 0".to_string(),
        ));
    }

    log::debug!(
        "Extracting chroma: {} samples at {} Hz (frame={}, hop={})",
        samples.len(),
        sample_rate,
        frame_size,
        hop_size
    );

    let spec = stft(samples, frame_size, hop_size)?;
    let classes = bin_pitch_classes(spec.num_bins(), frame_size, sample_rate, reference_frequency);

    let frames = spec
        .frames
        .iter()
        .map(|frame| {
            let mut chroma = [0.0f32; NUM_PITCH_CLASSES];
            for (c, class) in frame.iter().zip(classes.iter()) {
                if let Some(pc) = class {
                    chroma[*pc] += c.norm_sqr();
                }
            }
            chroma
        })
        .collect();

    Ok(ChromaProfile { frames })
}
