//! # Cover Compare
//!
//! Audio cover comparison: decides how closely one recording follows another and
//! produces a similarity score plus two aligned traces for display.
//!
//! ## Features
//!
//! - **Key-aware alignment**: the candidate is transposed to the reference key before
//!   comparison
//! - **Two-stage sync**: coarse chroma window scan, then sample-accurate
//!   cross-correlation
//! - **Hybrid segment scoring**: CENS chroma similarity with a raw waveform fallback
//! - **Melody shape**: pitch-contour correlation of resynthesized melody proxies
//!
//! ## Quick Start
//!
//! ```no_run
//! use cover_compare::compare;
//!
//! let result = compare("reference.mp3", "cover.mp3");
//! println!("Score: {:.2}", result.final_score);
//! println!("Trace points: {} / {}", result.trace1.len(), result.trace2.len());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Load → Normalize/Trim → HPSS mix → Key + Transpose → Coarse/Fine Sync
//!      → Segment score ┐
//!      → Pitch score   ┴→ max → Result
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod comparator;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

use std::path::Path;
use std::time::Instant;

// Re-export main types
pub use analysis::{AnalysisResult, ComparisonMetadata, ComparisonReport, SimilarityVector};
pub use comparator::{check_plagiarism, Comparator, CoverComparator, PlagiarismChecker};
pub use config::ComparisonConfig;
pub use error::ComparisonError;
pub use io::AudioSignal;

use analysis::pitch_contour::pitch_contour_score;
use analysis::result::aggregate;
use analysis::similarity::{hybrid_segmental_similarity, segment_score};
use analysis::sync::synchronize;
use features::hpss::harmonic_percussive_mix;
use features::key::{estimate_key, key_shift};
use features::transposition::pitch_shift;
use io::load_signal;
use preprocessing::{normalize, trim_silence};

/// Compare two audio files with the default configuration
///
/// Never fails: any decoding or processing error is logged and reported as
/// `AnalysisResult::failed()` (`{0.0, [], []}`).
///
/// # Example
///
/// ```no_run
/// use cover_compare::compare;
///
/// let result = compare("a.wav", "b.wav");
/// if result.is_failure() {
///     eprintln!("comparison could not be completed");
/// }
/// ```
pub fn compare(path1: impl AsRef<Path>, path2: impl AsRef<Path>) -> AnalysisResult {
    compare_with_config(path1, path2, &ComparisonConfig::default())
}

/// Compare two audio files with an explicit configuration
///
/// Same failure contract as [`compare`].
pub fn compare_with_config(
    path1: impl AsRef<Path>,
    path2: impl AsRef<Path>,
    config: &ComparisonConfig,
) -> AnalysisResult {
    let path1 = path1.as_ref();
    let path2 = path2.as_ref();
    match try_compare_files(path1, path2, config) {
        Ok(report) => report.result,
        Err(e) => {
            log::error!(
                "Comparison of {} vs {} failed: {}",
                path1.display(),
                path2.display(),
                e
            );
            AnalysisResult::failed()
        }
    }
}

/// Load both files and run [`compare_signals_detailed`]
///
/// # Errors
///
/// Returns `ComparisonError` on invalid configuration, decoding failure, or a
/// processing failure in any stage.
pub fn try_compare_files(
    path1: &Path,
    path2: &Path,
    config: &ComparisonConfig,
) -> Result<ComparisonReport, ComparisonError> {
    config.validate()?;
    log::debug!("Comparing {} vs {}", path1.display(), path2.display());
    let signal1 = load_signal(path1, config)?;
    let signal2 = load_signal(path2, config)?;
    compare_signals_detailed(signal1, signal2, config)
}

/// Compare two decoded signals
///
/// # Errors
///
/// See [`compare_signals_detailed`].
pub fn compare_signals(
    signal1: AudioSignal,
    signal2: AudioSignal,
    config: &ComparisonConfig,
) -> Result<AnalysisResult, ComparisonError> {
    compare_signals_detailed(signal1, signal2, config).map(|report| report.result)
}

/// Compare two decoded signals and report intermediate values
///
/// Both signals must already be mono at `config.sample_rate`.
///
/// # Errors
///
/// Returns `ComparisonError::InvalidInput` for an invalid configuration or a sample
/// rate mismatch, and propagates any stage failure.
pub fn compare_signals_detailed(
    signal1: AudioSignal,
    signal2: AudioSignal,
    config: &ComparisonConfig,
) -> Result<ComparisonReport, ComparisonError> {
    let start_time = Instant::now();
    config.validate()?;

    for signal in [&signal1, &signal2] {
        if signal.sample_rate() != config.sample_rate {
            return Err(ComparisonError::InvalidInput(format!(
                "Expected {} Hz input, got {} Hz",
                config.sample_rate,
                signal.sample_rate()
            )));
        }
    }

    log::debug!(
        "Starting comparison: {} vs {} samples at {} Hz",
        signal1.len(),
        signal2.len(),
        config.sample_rate
    );

    // 1. Normalization and silence trimming
    let signal1 = trim_silence(normalize(signal1), config.silence_threshold);
    let signal2 = trim_silence(normalize(signal2), config.silence_threshold);
    if signal1.peak() == 0.0 || signal2.peak() == 0.0 {
        log::warn!("At least one input is entirely silent");
    }

    // 2. Harmonic/percussive remix
    let mix1 = harmonic_percussive_mix(signal1, config)?;
    let mix2 = harmonic_percussive_mix(signal2, config)?;

    // 3. Key estimation and transposition of the candidate
    let key1 = estimate_key(&mix1, config)?;
    let key2 = estimate_key(&mix2, config)?;
    let shift = key_shift(key1, key2);
    log::debug!(
        "Keys: {} vs {}, shifting candidate by {} semitones",
        key1.name(),
        key2.name(),
        shift
    );
    let mix2 = pitch_shift(mix2, shift, config)?;

    // 4. Coarse and fine synchronization
    let sync = synchronize(mix1, mix2, config)?;
    if sync.pair.is_empty() {
        log::warn!("No overlap after alignment (lag {})", sync.lag);
    }

    // 5. Segment-level similarity
    let similarities =
        hybrid_segmental_similarity(sync.pair.first.samples(), sync.pair.second.samples(), config)?;
    let segment_percent = segment_score(&similarities);

    // 6. Melody-shape similarity
    let pitch_percent = pitch_contour_score(&sync.pair, config)?;

    log::debug!(
        "Segment score {:.2}, pitch score {:.2}",
        segment_percent,
        pitch_percent
    );

    // 7. Fusion
    let result = aggregate(segment_percent, pitch_percent, &sync.pair, config.trace_points);
    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    Ok(ComparisonReport {
        result,
        metadata: ComparisonMetadata {
            key1,
            key2,
            semitone_shift: shift,
            start_window: sync.start_window,
            lag_samples: sync.lag,
            similarities,
            segment_score: segment_percent,
            pitch_score: pitch_percent,
            aligned_duration_secs: sync.pair.duration_secs(),
            processing_time_ms,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
        },
    })
}
