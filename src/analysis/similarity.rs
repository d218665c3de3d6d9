//! Segment-level similarity scoring
//!
//! Signals are cut into fixed-length segments (whole segments only). Each pair of
//! segments is compared on CENS chroma; segments with low tonal agreement fall back to
//! a blend with raw waveform similarity.

use serde::{Deserialize, Serialize};

use crate::config::ComparisonConfig;
use crate::error::ComparisonError;
use crate::features::chroma::chroma_cens;
use crate::features::correlation::{mean, pearson, std_dev};

/// Ordered per-segment similarity values in [0, 1]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityVector(Vec<f32>);

impl SimilarityVector {
    /// Wrap raw values
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Values as a slice
    pub fn values(&self) -> &[f32] {
        &self.0
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no segment was scored
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arithmetic mean (0.0 when empty)
    pub fn mean(&self) -> f32 {
        mean(&self.0)
    }

    /// Mean expressed as a percentage in [0, 100]
    pub fn percent(&self) -> f32 {
        (self.mean() * 100.0).clamp(0.0, 100.0)
    }
}

/// Iterate over aligned whole segments `(index, seg1, seg2)`
fn segments<'a>(
    s1: &'a [f32],
    s2: &'a [f32],
    segment_len: usize,
) -> impl Iterator<Item = (usize, &'a [f32], &'a [f32])> + 'a {
    let total = if segment_len == 0 {
        0
    } else {
        s1.len().min(s2.len()) / segment_len
    };
    (0..total).map(move |i| {
        let range = i * segment_len..(i + 1) * segment_len;
        (i, &s1[range.clone()], &s2[range])
    })
}

/// CENS chroma similarity of two sample windows
///
/// `1 - mean|c1 - c2| / (max(std(c1), std(c2), ε) + ε)` over the CENS matrices
/// (truncated to the shorter frame count), clamped to [0, 1].
///
/// # Errors
///
/// Returns `ComparisonError::NumericalError` if the value is not finite, or any error
/// from chroma extraction.
pub fn chroma_similarity(
    seg1: &[f32],
    seg2: &[f32],
    config: &ComparisonConfig,
) -> Result<f32, ComparisonError> {
    let mut c1 = chroma_cens(seg1, config)?;
    let mut c2 = chroma_cens(seg2, config)?;
    let frames = c1.num_frames().min(c2.num_frames());
    c1.truncate(frames);
    c2.truncate(frames);

    let v1 = c1.flatten();
    let v2 = c2.flatten();
    if v1.is_empty() {
        return Ok(0.0);
    }

    let diffs: Vec<f32> = v1.iter().zip(v2.iter()).map(|(a, b)| (a - b).abs()).collect();
    let eps = config.epsilon;
    let spread = std_dev(&v1).max(std_dev(&v2)).max(eps) + eps;
    let similarity = 1.0 - mean(&diffs) / spread;

    if !similarity.is_finite() {
        return Err(ComparisonError::NumericalError(format!(
            "Non-finite chroma similarity ({})",
            similarity
        )));
    }
    Ok(similarity.clamp(0.0, 1.0))
}

/// `exp(-decay * mean|seg1 - seg2|)` over the common length (1.0 for empty input)
pub fn raw_waveform_similarity(seg1: &[f32], seg2: &[f32], decay: f32) -> f32 {
    let n = seg1.len().min(seg2.len());
    let diffs: Vec<f32> = seg1[..n]
        .iter()
        .zip(seg2[..n].iter())
        .map(|(a, b)| (a - b).abs())
        .collect();
    (-decay * mean(&diffs)).exp()
}

/// Chroma similarity per whole segment; segments that are too short score 0
///
/// # Errors
///
/// Propagates errors from [`chroma_similarity`].
pub fn similarity_over_time(
    s1: &[f32],
    s2: &[f32],
    config: &ComparisonConfig,
) -> Result<SimilarityVector, ComparisonError> {
    let mut values = Vec::new();
    for (_, seg1, seg2) in segments(s1, s2, config.segment_len()) {
        if seg1.len() < config.min_segment_samples || seg2.len() < config.min_segment_samples {
            values.push(0.0);
            continue;
        }
        values.push(chroma_similarity(seg1, seg2, config)?);
    }
    Ok(SimilarityVector::new(values))
}

/// Chroma similarity per segment with a raw-waveform fallback
///
/// Segments whose chroma similarity is below `low_similarity_threshold` are scored
/// `fallback_chroma_weight * chroma + fallback_raw_weight * raw`. Segments that are
/// too short are skipped.
///
/// # Errors
///
/// Propagates errors from [`chroma_similarity`].
pub fn hybrid_segmental_similarity(
    s1: &[f32],
    s2: &[f32],
    config: &ComparisonConfig,
) -> Result<SimilarityVector, ComparisonError> {
    let mut values = Vec::new();
    let mut fallbacks = 0usize;

    for (_, seg1, seg2) in segments(s1, s2, config.segment_len()) {
        if seg1.len() < config.min_segment_samples || seg2.len() < config.min_segment_samples {
            continue;
        }
        let mut sim = chroma_similarity(seg1, seg2, config)?;
        if sim < config.low_similarity_threshold {
            let raw = raw_waveform_similarity(seg1, seg2, config.raw_similarity_decay);
            sim = config.fallback_chroma_weight * sim + config.fallback_raw_weight * raw;
            fallbacks += 1;
        }
        values.push(sim);
    }

    log::debug!(
        "Hybrid similarity: {} segments, {} used raw fallback",
        values.len(),
        fallbacks
    );
    Ok(SimilarityVector::new(values))
}

/// Segment-level score in [0, 100]
pub fn segment_score(similarities: &SimilarityVector) -> f32 {
    similarities.percent()
}

/// Re-examine low-scoring entries of `similarities` on longer segments
///
/// For each entry below `threshold`, the `segment_secs`-long segments at the same
/// index are compared by Pearson correlation of their flattened CENS matrices,
/// clipped to [0, 1]. Segments that are too short are skipped; an undefined
/// correlation counts as 0.
///
/// # Errors
///
/// Propagates chroma extraction errors.
pub fn recompare_low_segments(
    s1: &[f32],
    s2: &[f32],
    similarities: &SimilarityVector,
    segment_secs: f32,
    threshold: f32,
    config: &ComparisonConfig,
) -> Result<Vec<f32>, ComparisonError> {
    let segment_len = (config.sample_rate as f32 * segment_secs) as usize;
    let mut improved = Vec::new();

    for (i, &sim) in similarities.values().iter().enumerate() {
        if sim >= threshold {
            continue;
        }
        let start = i * segment_len;
        let seg1 = &s1[start.min(s1.len())..(start + segment_len).min(s1.len())];
        let seg2 = &s2[start.min(s2.len())..(start + segment_len).min(s2.len())];
        if seg1.len() < config.min_segment_samples || seg2.len() < config.min_segment_samples {
            continue;
        }

        let mut c1 = chroma_cens(seg1, config)?;
        let mut c2 = chroma_cens(seg2, config)?;
        let frames = c1.num_frames().min(c2.num_frames());
        c1.truncate(frames);
        c2.truncate(frames);

        let corr = pearson(&c1.flatten(), &c2.flatten()).unwrap_or(0.0);
        improved.push(corr.clamp(0.0, 1.0));
    }

    Ok(improved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freqs: &[f32], len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = i as f32 / 48_000.0;
                freqs
                    .iter()
                    .map(|f| (2.0 * std::f32::consts::PI * f * t).sin())
                    .sum::<f32>()
                    / freqs.len() as f32
            })
            .collect()
    }

    #[test]
    fn test_identical_segments_score_one() {
        let config = ComparisonConfig::default();
        let seg = tone(&[261.63, 329.63, 392.0], 48_000);
        let sim = chroma_similarity(&seg, &seg, &config).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_different_chords_score_lower() {
        let config = ComparisonConfig::default();
        let c_major = tone(&[261.63, 329.63, 392.0], 48_000);
        let f_sharp = tone(&[369.99, 466.16, 554.37], 48_000);
        let same = chroma_similarity(&c_major, &c_major, &config).unwrap();
        let diff = chroma_similarity(&c_major, &f_sharp, &config).unwrap();
        assert!(diff < same);
        assert!((0.0..=1.0).contains(&diff));
    }

    #[test]
    fn test_raw_similarity() {
        let a = vec![0.5f32; 100];
        assert!((raw_waveform_similarity(&a, &a, 10.0) - 1.0).abs() < 1e-6);
        let b = vec![-0.5f32; 100];
        assert!((raw_waveform_similarity(&a, &b, 10.0) - (-10.0f32).exp()).abs() < 1e-6);
    }

    #[test]
    fn test_whole_segments_only() {
        let config = ComparisonConfig::default();
        let a = tone(&[440.0], 48_000 * 2 + 20_000);
        let b = tone(&[440.0], 48_000 * 3);
        let sims = similarity_over_time(&a, &b, &config).unwrap();
        assert_eq!(sims.len(), 2);

        let hybrid = hybrid_segmental_similarity(&a, &b, &config).unwrap();
        assert_eq!(hybrid.len(), 2);
        assert!(segment_score(&hybrid) > 99.0);
    }

    #[test]
    fn test_short_signals_give_empty_vector() {
        let config = ComparisonConfig::default();
        let a = tone(&[440.0], 1000);
        let hybrid = hybrid_segmental_similarity(&a, &a, &config).unwrap();
        assert!(hybrid.is_empty());
        assert_eq!(segment_score(&hybrid), 0.0);
    }

    #[test]
    fn test_fallback_blend_applied() {
        let config = ComparisonConfig {
            low_similarity_threshold: 1.1,
            ..Default::default()
        };
        let a = tone(&[440.0], 48_000);
        let hybrid = hybrid_segmental_similarity(&a, &a, &config).unwrap();
        // chroma 1.0 and raw 1.0 blend to 1.0
        assert!((hybrid.values()[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_recompare_only_low_entries() {
        let config = ComparisonConfig::default();
        let a = tone(&[261.63, 329.63, 392.0], 48_000 * 4);
        let sims = SimilarityVector::new(vec![0.9, 0.2]);
        let improved = recompare_low_segments(&a, &a, &sims, 2.0, 0.6, &config).unwrap();
        assert_eq!(improved.len(), 1);
        assert!((improved[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_vector_stats() {
        let v = SimilarityVector::new(vec![0.5, 1.0]);
        assert_eq!(v.mean(), 0.75);
        assert_eq!(v.percent(), 75.0);
        assert_eq!(SimilarityVector::default().percent(), 0.0);
    }
}
