//! Temporal chroma smoothing

use super::{ChromaProfile, NUM_PITCH_CLASSES};

/// Symmetric Hann window of `len + 2` points with the zero endpoints dropped,
/// normalized to unit sum
fn smoothing_window(len: usize) -> Vec<f32> {
    let n = len + 2;
    let raw: Vec<f32> = (1..=len)
        .map(|i| {
            let x = std::f32::consts::PI * i as f32 / (n - 1) as f32;
            x.sin().powi(2)
        })
        .collect();
    let sum: f32 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Smooth each pitch class over time with a normalized Hann window
///
/// Frames beyond either end count as zero, so edge frames lose weight; callers
/// renormalize afterwards. A `window_size` of 0 or 1 returns the input unchanged.
///
/// # Arguments
///
/// * `chroma` - Chroma profile to smooth
/// * `window_size` - Smoothing window size in frames (CENS default: 41)
pub fn smooth_chroma(chroma: &ChromaProfile, window_size: usize) -> ChromaProfile {
    if window_size <= 1 || chroma.is_empty() {
        return chroma.clone();
    }

    let window = smoothing_window(window_size);
    let half = (window_size / 2) as isize;
    let n = chroma.num_frames() as isize;

    let frames = (0..n)
        .map(|t| {
            let mut out = [0.0f32; NUM_PITCH_CLASSES];
            for (w_idx, &w) in window.iter().enumerate() {
                let src = t + w_idx as isize - half;
                if src < 0 || src >= n {
                    continue;
                }
                for (o, &v) in out.iter_mut().zip(chroma.frames[src as usize].iter()) {
                    *o += w * v;
                }
            }
            out
        })
        .collect();

    ChromaProfile { frames }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_sums_to_one() {
        let w = smoothing_window(41);
        assert_eq!(w.len(), 41);
        assert!((w.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!(w.iter().all(|&x| x > 0.0));
        // peak in the middle
        assert!(w[20] > w[0] && w[20] > w[40]);
    }

    #[test]
    fn test_constant_interior_preserved() {
        let chroma = ChromaProfile {
            frames: vec![[1.0; 12]; 200],
        };
        let smoothed = smooth_chroma(&chroma, 41);
        assert_eq!(smoothed.num_frames(), 200);
        assert!((smoothed.frames[100][0] - 1.0).abs() < 1e-5);
        assert!(smoothed.frames[0][0] < 1.0);
    }

    #[test]
    fn test_no_smoothing() {
        let chroma = ChromaProfile {
            frames: vec![[0.5; 12]; 3],
        };
        assert_eq!(smooth_chroma(&chroma, 1), chroma);
    }
}
