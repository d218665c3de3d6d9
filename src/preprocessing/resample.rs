//! Linear-interpolation resampling
//!
//! Used to bring decoded audio to the pipeline rate and by the transposer to
//! squeeze a time-stretched signal back to its original length.

use crate::error::ComparisonError;

/// Resample `samples` from `from_rate` to `to_rate` by linear interpolation
///
/// Output length is `round(len * to_rate / from_rate)`. Identical rates return a copy.
///
/// # Errors
///
/// Returns `ComparisonError::InvalidInput` if either rate is zero.
pub fn resample_linear(
    samples: &[f32],
    from_rate: u32,
    to_rate: u32,
) -> Result<Vec<f32>, ComparisonError> {
    if from_rate == 0 || to_rate == 0 {
        return Err(ComparisonError::InvalidInput(format!(
            "Invalid resampling rates: {} -> {}",
            from_rate, to_rate
        )));
    }
    if from_rate == to_rate {
        return Ok(samples.to_vec());
    }

    let out_len = (samples.len() as f64 * to_rate as f64 / from_rate as f64).round() as usize;
    log::debug!(
        "Resampling {} samples {} Hz -> {} Hz ({} samples)",
        samples.len(),
        from_rate,
        to_rate,
        out_len
    );
    Ok(interpolate(samples, out_len, from_rate as f64 / to_rate as f64))
}

/// Stretch or squeeze `samples` to exactly `out_len` samples by linear interpolation
pub fn resample_to_length(samples: &[f32], out_len: usize) -> Vec<f32> {
    if samples.is_empty() || out_len == 0 {
        return vec![0.0; out_len];
    }
    if samples.len() == out_len {
        return samples.to_vec();
    }
    let step = samples.len() as f64 / out_len as f64;
    interpolate(samples, out_len, step)
}

/// Read `out_len` samples at source positions `i * step`
fn interpolate(samples: &[f32], out_len: usize, step: f64) -> Vec<f32> {
    if samples.is_empty() {
        return vec![0.0; out_len];
    }
    let last = samples.len() - 1;
    (0..out_len)
        .map(|i| {
            let src_pos = i as f64 * step;
            let idx = src_pos as usize;
            let frac = (src_pos - idx as f64) as f32;
            let s0 = samples[idx.min(last)];
            let s1 = samples[(idx + 1).min(last)];
            s0 + frac * (s1 - s0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_rate_is_identity() {
        let input = vec![0.1, 0.2, 0.3];
        assert_eq!(resample_linear(&input, 48_000, 48_000).unwrap(), input);
    }

    #[test]
    fn test_upsample_length_and_values() {
        let input = vec![0.0, 1.0, 2.0, 3.0];
        let output = resample_linear(&input, 24_000, 48_000).unwrap();
        assert_eq!(output.len(), 8);
        assert!((output[1] - 0.5).abs() < 1e-6);
        assert!((output[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_preserves_sine_frequency() {
        // 441 Hz at 44.1 kHz -> 48 kHz: period goes from 100 to ~108.8 samples
        let input: Vec<f32> = (0..44_100)
            .map(|i| (2.0 * std::f32::consts::PI * 441.0 * i as f32 / 44_100.0).sin())
            .collect();
        let output = resample_linear(&input, 44_100, 48_000).unwrap();
        assert_eq!(output.len(), 48_000);
        let crossings = output
            .windows(2)
            .filter(|w| w[0] <= 0.0 && w[1] > 0.0)
            .count();
        assert!((crossings as i32 - 441).abs() <= 2, "got {} crossings", crossings);
    }

    #[test]
    fn test_zero_rate_rejected() {
        assert!(resample_linear(&[0.0], 0, 48_000).is_err());
    }

    #[test]
    fn test_resample_to_length() {
        let input = vec![0.0, 1.0];
        assert_eq!(resample_to_length(&input, 4), vec![0.0, 0.5, 1.0, 1.0]);
        assert_eq!(resample_to_length(&[], 3), vec![0.0; 3]);
    }
}
