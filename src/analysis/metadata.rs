//! Comparison metadata and the detailed report

use serde::{Deserialize, Serialize};

use super::result::AnalysisResult;
use super::similarity::SimilarityVector;
use crate::features::key::PitchClass;

/// Intermediate values of one comparison run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetadata {
    /// Estimated key of the reference
    pub key1: PitchClass,

    /// Estimated key of the candidate before transposition
    pub key2: PitchClass,

    /// Semitones applied to the candidate (`key1 - key2`)
    pub semitone_shift: i32,

    /// Window chosen by coarse synchronization
    pub start_window: usize,

    /// Lag in samples found by fine synchronization
    pub lag_samples: i64,

    /// Per-segment hybrid similarity
    pub similarities: SimilarityVector,

    /// Segment-level score in [0, 100]
    pub segment_score: f32,

    /// Pitch-contour score in [0, 100]
    pub pitch_score: f32,

    /// Length of the aligned signals in seconds
    pub aligned_duration_secs: f32,

    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: f32,

    /// Crate version that produced the result
    pub algorithm_version: String,
}

/// Result plus the metadata that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Final result
    pub result: AnalysisResult,

    /// How the result was reached
    pub metadata: ComparisonMetadata,
}
