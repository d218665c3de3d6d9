//! Short-time Fourier transform and its inverse
//!
//! Frames are centred: frame `t` covers samples `t * hop - frame_size / 2 ..`, with
//! zeros outside the signal, so a signal of `n` samples has `1 + n / hop` frames.
//! The inverse uses weighted overlap-add with window-sum normalization.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::ComparisonError;

/// Window sums below this are treated as uncovered in the inverse transform
const WINDOW_SUM_FLOOR: f32 = 1e-8;

/// Complex half-spectrum frames (`frame_size / 2 + 1` bins each)
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// One entry per frame
    pub frames: Vec<Vec<Complex<f32>>>,
    /// FFT / window length
    pub frame_size: usize,
    /// Hop between frame centres
    pub hop_size: usize,
}

impl Spectrogram {
    /// Number of frequency bins per frame
    pub fn num_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Number of frames
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Magnitude of every bin, frame-major
    pub fn magnitudes(&self) -> Vec<Vec<f32>> {
        self.frames
            .iter()
            .map(|frame| frame.iter().map(|c| c.norm()).collect())
            .collect()
    }
}

/// Periodic Hann window
pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let x = std::f32::consts::PI * i as f32 / size as f32;
            x.sin().powi(2)
        })
        .collect()
}

fn validate(frame_size: usize, hop_size: usize) -> Result<(), ComparisonError> {
    if frame_size < 2 {
        return Err(ComparisonError::InvalidInput(format!(
            "Frame size must be >= 2, got {}",
            frame_size
        )));
    }
    if hop_size == 0 {
        return Err(ComparisonError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Compute the centred STFT of `samples`
///
/// # Errors
///
/// Returns `ComparisonError::InvalidInput` for a frame size below 2 or a zero hop.
pub fn stft(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
) -> Result<Spectrogram, ComparisonError> {
    validate(frame_size, hop_size)?;

    if samples.is_empty() {
        return Ok(Spectrogram {
            frames: Vec::new(),
            frame_size,
            hop_size,
        });
    }

    let num_frames = 1 + samples.len() / hop_size;
    let num_bins = frame_size / 2 + 1;
    let half = (frame_size / 2) as isize;
    let window = hann_window(frame_size);

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(frame_size);
    let mut buffer = vec![Complex::new(0.0f32, 0.0); frame_size];
    let mut frames = Vec::with_capacity(num_frames);

    for t in 0..num_frames {
        let start = (t * hop_size) as isize - half;
        for (i, slot) in buffer.iter_mut().enumerate() {
            let idx = start + i as isize;
            let x = if idx >= 0 && (idx as usize) < samples.len() {
                samples[idx as usize]
            } else {
                0.0
            };
            *slot = Complex::new(x * window[i], 0.0);
        }
        fft.process(&mut buffer);
        frames.push(buffer[..num_bins].to_vec());
    }

    Ok(Spectrogram {
        frames,
        frame_size,
        hop_size,
    })
}

/// Invert a (possibly modified) spectrogram to `length` samples
///
/// # Errors
///
/// Returns `ComparisonError::InvalidInput` if a frame does not have `frame_size / 2 + 1` bins.
pub fn istft(spectrogram: &Spectrogram, length: usize) -> Result<Vec<f32>, ComparisonError> {
    let frame_size = spectrogram.frame_size;
    let hop_size = spectrogram.hop_size;
    validate(frame_size, hop_size)?;

    let num_bins = spectrogram.num_bins();
    if let Some(bad) = spectrogram.frames.iter().position(|f| f.len() != num_bins) {
        return Err(ComparisonError::InvalidInput(format!(
            "Frame {} has {} bins, expected {}",
            bad,
            spectrogram.frames[bad].len(),
            num_bins
        )));
    }

    if spectrogram.frames.is_empty() || length == 0 {
        return Ok(vec![0.0; length]);
    }

    let half = frame_size / 2;
    let window = hann_window(frame_size);
    let total = (spectrogram.frames.len() - 1) * hop_size + frame_size;
    let mut output = vec![0.0f32; total];
    let mut window_sum = vec![0.0f32; total];

    let mut planner = FftPlanner::new();
    let ifft = planner.plan_fft_inverse(frame_size);
    let mut buffer = vec![Complex::new(0.0f32, 0.0); frame_size];
    let scale = 1.0 / frame_size as f32;

    for (t, frame) in spectrogram.frames.iter().enumerate() {
        buffer[..num_bins].copy_from_slice(frame);
        // Hermitian mirror of the positive half
        for k in 1..(frame_size - num_bins + 1) {
            buffer[frame_size - k] = frame[k].conj();
        }
        ifft.process(&mut buffer);

        let pos = t * hop_size;
        for i in 0..frame_size {
            output[pos + i] += buffer[i].re * scale * window[i];
            window_sum[pos + i] += window[i] * window[i];
        }
    }

    for (x, &ws) in output.iter_mut().zip(window_sum.iter()) {
        if ws > WINDOW_SUM_FLOOR {
            *x /= ws;
        }
    }

    let mut result: Vec<f32> = output.into_iter().skip(half).take(length).collect();
    result.resize(length, 0.0);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_frame_count_and_bins() {
        let samples = vec![0.0f32; 48_000];
        let spec = stft(&samples, 2048, 512).unwrap();
        assert_eq!(spec.num_frames(), 1 + 48_000 / 512);
        assert!(spec.frames.iter().all(|f| f.len() == 1025));
    }

    #[test]
    fn test_sine_peak_bin() {
        let samples = sine(1500.0, 48_000.0, 48_000);
        let spec = stft(&samples, 2048, 512).unwrap();
        let mags = spec.magnitudes();
        let mid = &mags[mags.len() / 2];
        let peak_bin = mid
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        // 1500 Hz / (48000 / 2048) = 64 bins
        assert_eq!(peak_bin, 64);
    }

    #[test]
    fn test_roundtrip_reconstructs_signal() {
        let samples = sine(440.0, 48_000.0, 20_000);
        let spec = stft(&samples, 2048, 512).unwrap();
        let rebuilt = istft(&spec, samples.len()).unwrap();
        assert_eq!(rebuilt.len(), samples.len());
        let max_err = samples
            .iter()
            .zip(rebuilt.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(max_err < 1e-3, "max reconstruction error {}", max_err);
    }

    #[test]
    fn test_empty_and_invalid() {
        assert_eq!(stft(&[], 2048, 512).unwrap().num_frames(), 0);
        assert!(stft(&[0.0; 10], 1, 512).is_err());
        assert!(stft(&[0.0; 10], 2048, 0).is_err());
    }
}
