//! Integer-semitone transposition
//!
//! Pitch shift = phase-vocoder time stretch by `2^(-n/12)` followed by resampling
//! back to the original length, so duration is preserved and every partial moves by
//! `n` semitones.

use std::f32::consts::PI;

use rustfft::num_complex::Complex;

use super::stft::{istft, stft, Spectrogram};
use crate::config::ComparisonConfig;
use crate::error::ComparisonError;
use crate::io::AudioSignal;
use crate::preprocessing::resample::resample_to_length;

/// Wrap a phase into [-π, π]
fn wrap_phase(phase: f32) -> f32 {
    phase - 2.0 * PI * (phase / (2.0 * PI)).round()
}

/// Frame `idx`, or silence past the end
fn frame_or_zero<'a>(
    frames: &'a [Vec<Complex<f32>>],
    idx: usize,
    zero: &'a [Complex<f32>],
) -> &'a [Complex<f32>] {
    frames.get(idx).map(Vec::as_slice).unwrap_or(zero)
}

/// Time-stretch a spectrogram by `rate` (> 1 speeds up, < 1 slows down)
///
/// Magnitudes are linearly interpolated between neighbouring analysis frames and
/// phases are advanced by each bin's instantaneous frequency.
pub fn phase_vocoder(spec: &Spectrogram, rate: f32) -> Spectrogram {
    let num_frames = spec.num_frames();
    let num_bins = spec.num_bins();
    let hop = spec.hop_size as f32;
    let n = spec.frame_size as f32;

    let mut out = Spectrogram {
        frames: Vec::new(),
        frame_size: spec.frame_size,
        hop_size: spec.hop_size,
    };
    if num_frames == 0 || rate <= 0.0 {
        return out;
    }

    // Expected phase advance per hop for each bin
    let phi_advance: Vec<f32> = (0..num_bins)
        .map(|k| 2.0 * PI * k as f32 * hop / n)
        .collect();
    let zero = vec![Complex::new(0.0f32, 0.0); num_bins];

    let mut phase_acc: Vec<f32> = spec.frames[0].iter().map(|c| c.arg()).collect();
    let mut step = 0.0f32;

    while step < num_frames as f32 {
        let idx = step as usize;
        let alpha = step - idx as f32;
        let left = frame_or_zero(&spec.frames, idx, &zero);
        let right = frame_or_zero(&spec.frames, idx + 1, &zero);

        let frame: Vec<Complex<f32>> = (0..num_bins)
            .map(|k| {
                let mag = (1.0 - alpha) * left[k].norm() + alpha * right[k].norm();
                Complex::from_polar(mag, phase_acc[k])
            })
            .collect();
        out.frames.push(frame);

        for k in 0..num_bins {
            let dphase = right[k].arg() - left[k].arg() - phi_advance[k];
            phase_acc[k] += phi_advance[k] + wrap_phase(dphase);
        }

        step += rate;
    }

    out
}

/// Shift a signal by `semitones`, keeping its length
///
/// A shift of 0 returns the signal untouched.
///
/// # Errors
///
/// Returns `ComparisonError` if the STFT parameters in `config` are invalid.
pub fn pitch_shift(
    signal: AudioSignal,
    semitones: i32,
    config: &ComparisonConfig,
) -> Result<AudioSignal, ComparisonError> {
    if semitones == 0 || signal.is_empty() {
        return Ok(signal);
    }

    let rate = 2.0f32.powf(-(semitones as f32) / 12.0);
    log::debug!(
        "Pitch shifting {} samples by {} semitones (stretch rate {:.4})",
        signal.len(),
        semitones,
        rate
    );

    let spec = stft(signal.samples(), config.hpss_frame_size, config.hpss_hop_size)?;
    let stretched_spec = phase_vocoder(&spec, rate);
    let stretched_len = (signal.len() as f32 / rate).round() as usize;
    let stretched = istft(&stretched_spec, stretched_len)?;

    let shifted = resample_to_length(&stretched, signal.len());
    Ok(signal.with_samples(shifted))
}
