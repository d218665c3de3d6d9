//! Two-stage temporal synchronization
//!
//! Stage A scans 1-second windows for the first pair with high chroma agreement and
//! cuts both signals there. Stage B refines the offset to the sample with a full
//! cross-correlation and trims both signals to a common length.

use super::similarity::{similarity_over_time, SimilarityVector};
use crate::config::ComparisonConfig;
use crate::error::ComparisonError;
use crate::features::correlation::{argmax, cross_correlate_full};
use crate::io::AudioSignal;

/// Two signals of equal length, aligned sample for sample
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    /// Reference signal
    pub first: AudioSignal,
    /// Candidate signal
    pub second: AudioSignal,
}

impl AlignedPair {
    /// Common length in samples
    pub fn len(&self) -> usize {
        self.first.len()
    }

    /// True when nothing survived alignment
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// Common duration in seconds
    pub fn duration_secs(&self) -> f32 {
        self.first.duration_secs()
    }
}

/// Output of the coarse stage
#[derive(Debug, Clone)]
pub struct CoarseAlignment {
    /// Reference, cut at the start window
    pub first: AudioSignal,
    /// Candidate, cut at the start window
    pub second: AudioSignal,
    /// Index of the chosen window
    pub start_window: usize,
    /// Per-window chroma similarity
    pub similarities: SimilarityVector,
}

/// Full synchronization result
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// Aligned signals
    pub pair: AlignedPair,
    /// Window index chosen by the coarse stage
    pub start_window: usize,
    /// Lag found by the fine stage (positive: reference started later)
    pub lag: i64,
    /// Per-window similarity from the coarse stage
    pub coarse_similarities: SimilarityVector,
}

/// Index of the first value at or above `threshold`, or 0 when none qualifies
pub fn find_first_high_similarity_index(similarities: &SimilarityVector, threshold: f32) -> usize {
    similarities
        .values()
        .iter()
        .position(|&sim| sim >= threshold)
        .unwrap_or(0)
}

/// Coarse alignment on 1-second windows
///
/// Both signals are cut from the same offset; no relative shift is applied here.
///
/// # Errors
///
/// Propagates chroma similarity errors.
pub fn coarse_align(
    first: AudioSignal,
    second: AudioSignal,
    config: &ComparisonConfig,
) -> Result<CoarseAlignment, ComparisonError> {
    let similarities = similarity_over_time(first.samples(), second.samples(), config)?;
    let start_window = find_first_high_similarity_index(&similarities, config.coarse_sync_threshold);
    let start_sample = start_window * config.segment_len();

    log::debug!(
        "Coarse sync: {} windows scanned, starting at window {} (sample {})",
        similarities.len(),
        start_window,
        start_sample
    );

    let first_len = first.len();
    let second_len = second.len();
    Ok(CoarseAlignment {
        first: first.slice(start_sample..first_len),
        second: second.slice(start_sample..second_len),
        start_window,
        similarities,
    })
}

/// Sample-accurate alignment by full cross-correlation
///
/// `lag = argmax(corr) - len(second)`. A positive lag drops `lag` samples from the
/// front of `first`, otherwise `|lag|` samples are dropped from the front of `second`.
/// Both are then cut to the shorter length. Returns the pair and the lag.
pub fn fine_align(first: AudioSignal, second: AudioSignal) -> (AlignedPair, i64) {
    let corr = cross_correlate_full(first.samples(), second.samples());
    let lag = argmax(&corr) as i64 - second.len() as i64;

    let (first, second) = if lag > 0 {
        let first_len = first.len();
        (first.slice(lag as usize..first_len), second)
    } else {
        let second_len = second.len();
        (first, second.slice(lag.unsigned_abs() as usize..second_len))
    };

    let common = first.len().min(second.len());
    log::debug!("Fine sync: lag {} samples, {} aligned samples", lag, common);

    (
        AlignedPair {
            first: first.truncate(common),
            second: second.truncate(common),
        },
        lag,
    )
}

/// Coarse then fine synchronization
///
/// # Errors
///
/// Propagates errors from [`coarse_align`].
pub fn synchronize(
    first: AudioSignal,
    second: AudioSignal,
    config: &ComparisonConfig,
) -> Result<SyncOutcome, ComparisonError> {
    let coarse = coarse_align(first, second, config)?;
    let (pair, lag) = fine_align(coarse.first, coarse.second);
    Ok(SyncOutcome {
        pair,
        start_window: coarse.start_window,
        lag,
        coarse_similarities: coarse.similarities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise(len: usize, seed: u32) -> Vec<f32> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0
            })
            .collect()
    }

    fn tone(freq: f32, secs: f32) -> Vec<f32> {
        let len = (secs * 48_000.0) as usize;
        (0..len)
            .map(|i| 0.8 * (2.0 * std::f32::consts::PI * freq * i as f32 / 48_000.0).sin())
            .collect()
    }

    #[test]
    fn test_coarse_align_cuts_at_first_matching_window() {
        let config = ComparisonConfig::default();
        let mut first = tone(440.0, 2.0);
        first.extend(tone(261.63, 2.0));
        let mut second = tone(369.99, 2.0);
        second.extend(tone(261.63, 2.0));

        let coarse = coarse_align(
            AudioSignal::new(first.clone(), 48_000),
            AudioSignal::new(second, 48_000),
            &config,
        )
        .unwrap();

        let sims = coarse.similarities.values();
        assert_eq!(sims.len(), 4);
        assert!(sims[0] < 0.75 && sims[1] < 0.75, "sims {:?}", sims);
        assert!(sims[2] >= 0.75, "sims {:?}", sims);
        assert_eq!(coarse.start_window, 2);
        assert_eq!(coarse.first.len(), 96_000);
        assert_eq!(coarse.second.len(), 96_000);
        assert_eq!(coarse.first.samples(), &first[96_000..]);
    }

    #[test]
    fn test_first_high_index() {
        let sims = SimilarityVector::new(vec![0.1, 0.5, 0.8, 0.9]);
        assert_eq!(find_first_high_similarity_index(&sims, 0.75), 2);
        let low = SimilarityVector::new(vec![0.1, 0.2]);
        assert_eq!(find_first_high_similarity_index(&low, 0.75), 0);
        assert_eq!(find_first_high_similarity_index(&SimilarityVector::default(), 0.75), 0);
    }

    #[test]
    fn test_fine_align_delayed_reference() {
        let base = noise(4000, 7);
        let mut delayed = vec![0.0f32; 300];
        delayed.extend_from_slice(&base);

        let (pair, lag) = fine_align(
            AudioSignal::new(delayed, 48_000),
            AudioSignal::new(base.clone(), 48_000),
        );
        // Peak at zero-lag index len - 1 + 300, so lag = 299
        assert_eq!(lag, 299);
        assert_eq!(pair.first.len(), pair.second.len());
        assert!((pair.first.samples()[1] - base[0]).abs() < 1e-6);
    }

    #[test]
    fn test_fine_align_delayed_candidate() {
        let base = noise(4000, 11);
        let mut delayed = vec![0.0f32; 250];
        delayed.extend_from_slice(&base);

        let (pair, lag) = fine_align(
            AudioSignal::new(base.clone(), 48_000),
            AudioSignal::new(delayed, 48_000),
        );
        // Zero-lag index len - 1 - 250, one sample past the true offset
        assert_eq!(lag, -251);
        assert_eq!(pair.len(), 3999);
        assert!((pair.second.samples()[0] - base[1]).abs() < 1e-6);
    }

    #[test]
    fn test_fine_align_silence_yields_empty_pair() {
        let (pair, lag) = fine_align(
            AudioSignal::new(vec![0.0; 1000], 48_000),
            AudioSignal::new(vec![0.3; 800], 48_000),
        );
        assert_eq!(lag, -800);
        assert!(pair.is_empty());
        assert!(pair.second.is_empty());
    }

    #[test]
    fn test_synchronize_identical() {
        let config = ComparisonConfig::default();
        let samples: Vec<f32> = (0..48_000 * 3)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 48_000.0).sin())
            .collect();
        let outcome = synchronize(
            AudioSignal::new(samples.clone(), 48_000),
            AudioSignal::new(samples, 48_000),
            &config,
        )
        .unwrap();
        assert_eq!(outcome.start_window, 0);
        assert_eq!(outcome.coarse_similarities.len(), 3);
        assert_eq!(outcome.pair.first.len(), outcome.pair.second.len());
    }
}
