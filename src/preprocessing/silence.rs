//! Leading/trailing silence trimming

use crate::io::AudioSignal;

/// Inclusive index range of the first and last samples whose absolute amplitude
/// exceeds `threshold`, or `None` if no sample does
pub fn detect_active_range(samples: &[f32], threshold: f32) -> Option<(usize, usize)> {
    let first = samples.iter().position(|&x| x.abs() > threshold)?;
    let last = samples.iter().rposition(|&x| x.abs() > threshold)?;
    Some((first, last))
}

/// Trim leading and trailing samples at or below `threshold`
///
/// A signal with no sample above the threshold is returned unchanged rather than
/// collapsed to empty.
///
/// # Arguments
///
/// * `signal` - Signal to trim
/// * `threshold` - Absolute amplitude threshold (pipeline default: 0.01)
pub fn trim_silence(signal: AudioSignal, threshold: f32) -> AudioSignal {
    match detect_active_range(signal.samples(), threshold) {
        Some((first, last)) => {
            log::debug!(
                "Trimming silence: keeping samples {}..={} of {}",
                first,
                last,
                signal.len()
            );
            signal.slice(first..last + 1)
        }
        None => {
            log::warn!(
                "No sample above {} in {} samples, keeping signal untrimmed",
                threshold,
                signal.len()
            );
            signal
        }
    }
}
