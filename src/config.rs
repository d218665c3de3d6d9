//! Configuration parameters for audio comparison
//!
//! Every numeric policy of the pipeline lives here so it can be tuned without touching
//! the algorithms. The defaults reproduce the reference scoring behaviour.

use serde::{Deserialize, Serialize};

use crate::error::ComparisonError;

/// Comparison configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    // Loading
    /// Pipeline sample rate in Hz (default: 48000)
    pub sample_rate: u32,

    /// Only the leading `max_duration_secs` of each file are analyzed (default: 60.0)
    pub max_duration_secs: f32,

    // Preprocessing
    /// Absolute amplitude at or below which leading/trailing samples are trimmed (default: 0.01)
    pub silence_threshold: f32,

    // Harmonic/percussive remix
    /// Weight of the harmonic component in the remix (default: 0.7)
    pub harmonic_weight: f32,

    /// Weight of the percussive component in the remix (default: 0.3)
    pub percussive_weight: f32,

    /// STFT frame size for HPSS (default: 2048)
    pub hpss_frame_size: usize,

    /// STFT hop size for HPSS (default: 512)
    pub hpss_hop_size: usize,

    /// Median filter length for both HPSS directions (default: 31)
    pub hpss_kernel_size: usize,

    /// Soft mask exponent (default: 2.0)
    pub hpss_mask_power: f32,

    // Chroma
    /// STFT frame size for chroma extraction (default: 4096)
    pub chroma_frame_size: usize,

    /// STFT hop size for chroma extraction (default: 512)
    pub chroma_hop_size: usize,

    /// Hann smoothing length in frames for CENS (default: 41)
    pub cens_smoothing_frames: usize,

    /// Tuning reference for pitch classes and semitone conversion (default: 440.0 Hz)
    pub reference_frequency: f32,

    // Synchronization and scoring
    /// Window / segment length in seconds (default: 1.0)
    pub segment_secs: f32,

    /// Minimum samples on both sides for a window pair to be scored (default: 1024)
    pub min_segment_samples: usize,

    /// First window at or above this chroma similarity anchors the coarse alignment (default: 0.75)
    pub coarse_sync_threshold: f32,

    /// Segments below this chroma similarity get the raw-waveform fallback (default: 0.6)
    pub low_similarity_threshold: f32,

    /// Weight of chroma similarity in a fallback blend (default: 0.7)
    pub fallback_chroma_weight: f32,

    /// Weight of raw-waveform similarity in a fallback blend (default: 0.3)
    pub fallback_raw_weight: f32,

    /// Decay of `exp(-decay * mean|seg1 - seg2|)` (default: 10.0)
    pub raw_similarity_decay: f32,

    /// Numerical stability epsilon used by the similarity formulas (default: 1e-6)
    pub epsilon: f32,

    // Pitch tracking
    /// Lowest trackable fundamental in Hz (default: 80.0)
    pub min_f0: f32,

    /// Highest trackable fundamental in Hz (default: 1000.0)
    pub max_f0: f32,

    /// YIN frame length (default: 2048)
    pub pitch_frame_size: usize,

    /// YIN hop length (default: 512)
    pub pitch_hop_size: usize,

    /// YIN cumulative-mean-normalized-difference trough threshold (default: 0.1)
    pub yin_threshold: f32,

    /// Median filter applied to the f0 track (default: 7)
    pub f0_median_window: usize,

    /// Median filter applied to the resynthesized melody (default: 5)
    pub melody_median_window: usize,

    /// Frames with f0 at or below this value are held from the previous frame (default: 1.0 Hz)
    pub unvoiced_threshold_hz: f32,

    // Output
    /// Maximum number of points per visualization trace (default: 100)
    pub trace_points: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            max_duration_secs: 60.0,
            silence_threshold: 0.01,
            harmonic_weight: 0.7,
            percussive_weight: 0.3,
            hpss_frame_size: 2048,
            hpss_hop_size: 512,
            hpss_kernel_size: 31,
            hpss_mask_power: 2.0,
            chroma_frame_size: 4096,
            chroma_hop_size: 512,
            cens_smoothing_frames: 41,
            reference_frequency: 440.0,
            segment_secs: 1.0,
            min_segment_samples: 1024,
            coarse_sync_threshold: 0.75,
            low_similarity_threshold: 0.6,
            fallback_chroma_weight: 0.7,
            fallback_raw_weight: 0.3,
            raw_similarity_decay: 10.0,
            epsilon: 1e-6,
            min_f0: 80.0,
            max_f0: 1000.0,
            pitch_frame_size: 2048,
            pitch_hop_size: 512,
            yin_threshold: 0.1,
            f0_median_window: 7,
            melody_median_window: 5,
            unvoiced_threshold_hz: 1.0,
            trace_points: 100,
        }
    }
}

impl ComparisonConfig {
    /// Samples per synchronization window / scoring segment
    pub fn segment_len(&self) -> usize {
        (self.sample_rate as f32 * self.segment_secs) as usize
    }

    /// Maximum number of samples kept per decoded file
    pub fn max_samples(&self) -> usize {
        (self.sample_rate as f32 * self.max_duration_secs) as usize
    }

    /// Check that the configuration can drive the pipeline
    pub fn validate(&self) -> Result<(), ComparisonError> {
        if self.sample_rate == 0 {
            return Err(ComparisonError::InvalidInput(
                "Sample rate must be > 0".to_string(),
            ));
        }
        if self.max_duration_secs <= 0.0 || self.segment_secs <= 0.0 {
            return Err(ComparisonError::InvalidInput(format!(
                "Durations must be positive: max={}, segment={}",
                self.max_duration_secs, self.segment_secs
            )));
        }
        if self.segment_len() == 0 {
            return Err(ComparisonError::InvalidInput(
                "Segment length rounds to zero samples".to_string(),
            ));
        }
        for (name, frame, hop) in [
            ("hpss", self.hpss_frame_size, self.hpss_hop_size),
            ("chroma", self.chroma_frame_size, self.chroma_hop_size),
            ("pitch", self.pitch_frame_size, self.pitch_hop_size),
        ] {
            if frame < 2 || hop == 0 || hop > frame {
                return Err(ComparisonError::InvalidInput(format!(
                    "Invalid {} STFT parameters: frame={}, hop={}",
                    name, frame, hop
                )));
            }
        }
        if self.min_f0 <= 0.0 || self.max_f0 <= self.min_f0 {
            return Err(ComparisonError::InvalidInput(format!(
                "Invalid f0 range: min={}, max={}",
                self.min_f0, self.max_f0
            )));
        }
        // The YIN window is half a frame and the longest lag must fit in the other half
        let max_lag = (self.sample_rate as f32 / self.min_f0).ceil() as usize;
        if self.pitch_frame_size / 2 + max_lag > self.pitch_frame_size {
            return Err(ComparisonError::InvalidInput(format!(
                "Pitch frame {} too short for min f0 {} Hz",
                self.pitch_frame_size, self.min_f0
            )));
        }
        if self.hpss_kernel_size == 0 || self.trace_points == 0 {
            return Err(ComparisonError::InvalidInput(
                "Kernel size and trace points must be > 0".to_string(),
            ));
        }
        if self.reference_frequency <= 0.0 || self.epsilon <= 0.0 {
            return Err(ComparisonError::InvalidInput(
                "Reference frequency and epsilon must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
