//! Comparison result types

use serde::{Deserialize, Serialize};

use super::sync::AlignedPair;

/// Final comparison result
///
/// A score of exactly 0.0 with both traces empty means the comparison could not be
/// completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Similarity score in [0, 100], rounded to two decimals
    pub final_score: f32,

    /// Downsampled aligned reference signal
    pub trace1: Vec<f32>,

    /// Downsampled aligned candidate signal
    pub trace2: Vec<f32>,
}

impl AnalysisResult {
    /// Degraded result returned when any stage fails
    pub fn failed() -> Self {
        Self {
            final_score: 0.0,
            trace1: Vec::new(),
            trace2: Vec::new(),
        }
    }

    /// True for the degraded `{0.0, [], []}` result
    pub fn is_failure(&self) -> bool {
        self.final_score == 0.0 && self.trace1.is_empty() && self.trace2.is_empty()
    }
}

/// Round to two decimal places
pub fn round_score(score: f32) -> f32 {
    (score * 100.0).round() / 100.0
}

/// Keep every `ceil(len / max_points)`-th sample, starting at the first
///
/// Signals with at most `max_points` samples are returned whole.
pub fn downsample_trace(samples: &[f32], max_points: usize) -> Vec<f32> {
    if max_points == 0 {
        return Vec::new();
    }
    if samples.len() <= max_points {
        return samples.to_vec();
    }
    let stride = samples.len().div_ceil(max_points);
    samples.iter().step_by(stride).copied().collect()
}

/// Fuse the two component scores and attach the traces
///
/// `final_score = max(segment_percent, pitch_percent)`, clamped to [0, 100] and rounded.
pub fn aggregate(
    segment_percent: f32,
    pitch_percent: f32,
    pair: &AlignedPair,
    max_points: usize,
) -> AnalysisResult {
    let fused = segment_percent.max(pitch_percent);
    let fused = if fused.is_finite() { fused.clamp(0.0, 100.0) } else { 0.0 };

    AnalysisResult {
        final_score: round_score(fused),
        trace1: downsample_trace(pair.first.samples(), max_points),
        trace2: downsample_trace(pair.second.samples(), max_points),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::AudioSignal;

    #[test]
    fn test_failed_result() {
        let failed = AnalysisResult::failed();
        assert!(failed.is_failure());
        assert_eq!(failed.final_score, 0.0);
        assert!(failed.trace1.is_empty() && failed.trace2.is_empty());
    }

    #[test]
    fn test_downsample_bounds() {
        let samples: Vec<f32> = (0..48_000).map(|i| i as f32).collect();
        let trace = downsample_trace(&samples, 100);
        assert_eq!(trace.len(), 100);
        assert_eq!(trace[0], 0.0);
        assert_eq!(trace[1], 480.0);

        // ceil stride keeps the count at or below the limit
        let odd: Vec<f32> = (0..150).map(|i| i as f32).collect();
        let trace = downsample_trace(&odd, 100);
        assert_eq!(trace.len(), 75);

        let short = vec![1.0, 2.0, 3.0];
        assert_eq!(downsample_trace(&short, 100), short);
    }

    #[test]
    fn test_aggregate_takes_max_and_rounds() {
        let pair = AlignedPair {
            first: AudioSignal::new(vec![0.5; 1000], 48_000),
            second: AudioSignal::new(vec![0.25; 1000], 48_000),
        };
        let result = aggregate(42.123_456, 87.654_321, &pair, 100);
        assert!((result.final_score - 87.65).abs() < 1e-4);
        assert_eq!(result.trace1.len(), 100);
        assert_eq!(result.trace2[0], 0.25);
    }

    #[test]
    fn test_aggregate_guards_nan() {
        let pair = AlignedPair {
            first: AudioSignal::new(vec![], 48_000),
            second: AudioSignal::new(vec![], 48_000),
        };
        let result = aggregate(f32::NAN, f32::NAN, &pair, 100);
        assert!(result.is_failure());
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let result = AnalysisResult {
            final_score: 12.5,
            trace1: vec![0.1],
            trace2: vec![0.9],
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"final_score":12.5,"trace1":[0.1],"trace2":[0.9]}"#);
    }
}
