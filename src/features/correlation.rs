//! Correlation utilities
//!
//! - Full linear cross-correlation via zero-padded FFT
//! - Pearson correlation coefficient

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Full cross-correlation of `a` against `b`
///
/// Output has `a.len() + b.len() - 1` entries; entry `k` is
/// `sum_n a[n + k - (b.len() - 1)] * b[n]`, so index `b.len() - 1` is zero lag.
/// Computed in O(n log n) with a zero-padded FFT. Either input empty yields an empty
/// output.
pub fn cross_correlate_full(a: &[f32], b: &[f32]) -> Vec<f32> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let out_len = a.len() + b.len() - 1;
    let fft_size = out_len.next_power_of_two();

    log::debug!(
        "Cross-correlating {} x {} samples (FFT size {})",
        a.len(),
        b.len(),
        fft_size
    );

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    let ifft = planner.plan_fft_inverse(fft_size);

    let mut fa: Vec<Complex<f32>> = a.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fa.resize(fft_size, Complex::new(0.0, 0.0));
    let mut fb: Vec<Complex<f32>> = b.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fb.resize(fft_size, Complex::new(0.0, 0.0));

    fft.process(&mut fa);
    fft.process(&mut fb);
    for (x, y) in fa.iter_mut().zip(fb.iter()) {
        *x *= y.conj();
    }
    drop(fb);
    ifft.process(&mut fa);

    // Circular lag m lives at index m (m >= 0) or fft_size + m (m < 0).
    let scale = 1.0 / fft_size as f32;
    let zero_lag = b.len() - 1;
    (0..out_len)
        .map(|k| {
            let idx = if k >= zero_lag {
                k - zero_lag
            } else {
                fft_size - (zero_lag - k)
            };
            fa[idx].re * scale
        })
        .collect()
}

/// Index of the first maximum (0 for an empty slice)
pub fn argmax(values: &[f32]) -> usize {
    let mut best_idx = 0;
    let mut best = f32::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if v > best {
            best = v;
            best_idx = i;
        }
    }
    best_idx
}

/// Arithmetic mean (0.0 for an empty slice)
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|&x| x as f64).sum::<f64>() / values.len() as f64) as f32
}

/// Population standard deviation (0.0 for an empty slice)
pub fn std_dev(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values) as f64;
    let var = values
        .iter()
        .map(|&x| {
            let d = x as f64 - m;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64;
    var.sqrt() as f32
}

/// Pearson correlation of two equal-length sequences
///
/// Returns `None` when fewer than two points are given, the lengths differ, or either
/// sequence has zero variance (the coefficient is undefined).
pub fn pearson(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.len() < 2 {
        return None;
    }
    let ma = mean(a) as f64;
    let mb = mean(b) as f64;
    let mut cov = 0.0f64;
    let mut va = 0.0f64;
    let mut vb = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let dx = x as f64 - ma;
        let dy = y as f64 - mb;
        cov += dx * dy;
        va += dx * dx;
        vb += dy * dy;
    }
    if va <= 0.0 || vb <= 0.0 {
        return None;
    }
    let r = cov / (va.sqrt() * vb.sqrt());
    if r.is_finite() {
        Some(r.clamp(-1.0, 1.0) as f32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direct O(n*m) reference
    fn naive_full(a: &[f32], b: &[f32]) -> Vec<f32> {
        let out_len = a.len() + b.len() - 1;
        (0..out_len)
            .map(|k| {
                let lag = k as isize - (b.len() as isize - 1);
                b.iter()
                    .enumerate()
                    .filter_map(|(n, &bn)| {
                        let i = n as isize + lag;
                        (i >= 0 && (i as usize) < a.len()).then(|| a[i as usize] * bn)
                    })
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_matches_direct_correlation() {
        let a = vec![1.0, 2.0, 3.0, 0.5, -1.0];
        let b = vec![0.0, 1.0, 0.5];
        let fast = cross_correlate_full(&a, &b);
        let slow = naive_full(&a, &b);
        assert_eq!(fast.len(), slow.len());
        for (x, y) in fast.iter().zip(slow.iter()) {
            assert!((x - y).abs() < 1e-4, "{} vs {}", x, y);
        }
    }

    #[test]
    fn test_zero_lag_for_identical_signals() {
        let a: Vec<f32> = (0..500).map(|i| ((i * 7919) % 101) as f32 / 50.0 - 1.0).collect();
        let corr = cross_correlate_full(&a, &a);
        assert_eq!(argmax(&corr), a.len() - 1);
    }

    #[test]
    fn test_silence_correlation_is_zero() {
        let a = vec![0.0f32; 64];
        let b = vec![0.5f32; 32];
        let corr = cross_correlate_full(&a, &b);
        assert!(corr.iter().all(|&x| x == 0.0));
        assert_eq!(argmax(&corr), 0);
    }

    #[test]
    fn test_pearson() {
        let a = vec![1.0, 2.0, 3.0, 4.0];
        let b = vec![2.0, 4.0, 6.0, 8.0];
        let c = vec![4.0, 3.0, 2.0, 1.0];
        assert!((pearson(&a, &b).unwrap() - 1.0).abs() < 1e-6);
        assert!((pearson(&a, &c).unwrap() + 1.0).abs() < 1e-6);
        assert!(pearson(&a, &[1.0, 1.0, 1.0, 1.0]).is_none());
        assert!(pearson(&[1.0], &[1.0]).is_none());
    }

    #[test]
    fn test_mean_std() {
        let v = vec![1.0, 3.0];
        assert_eq!(mean(&v), 2.0);
        assert_eq!(std_dev(&v), 1.0);
        assert_eq!(std_dev(&[]), 0.0);
    }
}
