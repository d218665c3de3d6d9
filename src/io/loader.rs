//! Signal loader: file → mono signal at the pipeline rate, bounded duration

use std::path::Path;

use super::decoder::decode_audio;
use super::signal::AudioSignal;
use crate::config::ComparisonConfig;
use crate::error::ComparisonError;
use crate::preprocessing::resample::resample_linear;

/// Load the leading `config.max_duration_secs` of an audio file as a mono signal
/// at `config.sample_rate`
///
/// # Errors
///
/// Decoding failures are returned unchanged; the caller decides how to degrade.
pub fn load_signal(path: &Path, config: &ComparisonConfig) -> Result<AudioSignal, ComparisonError> {
    let decoded = decode_audio(path, config.max_duration_secs)?;

    let mut samples = resample_linear(&decoded.samples, decoded.sample_rate, config.sample_rate)?;
    samples.truncate(config.max_samples());

    log::debug!(
        "Loaded {}: {} samples ({:.2}s) at {} Hz (source {} Hz)",
        path.display(),
        samples.len(),
        samples.len() as f32 / config.sample_rate as f32,
        config.sample_rate,
        decoded.sample_rate
    );

    Ok(AudioSignal::new(samples, config.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_stereo_wav(name: &str, secs: f32, sample_rate: u32) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "cover_compare_loader_{}_{}.wav",
            name,
            std::process::id()
        ));
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        let frames = (secs * sample_rate as f32) as usize;
        for i in 0..frames {
            let t = i as f32 / sample_rate as f32;
            let s = (0.5 * (2.0 * std::f32::consts::PI * 440.0 * t).sin() * i16::MAX as f32) as i16;
            writer.write_sample(s).unwrap();
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    #[test]
    fn test_long_input_is_capped_after_resampling() {
        let config = ComparisonConfig {
            max_duration_secs: 1.25,
            ..ComparisonConfig::default()
        };
        assert_eq!(config.max_samples(), 60_000);

        for rate in [44_100, 48_000] {
            let path = write_stereo_wav(&format!("cap_{}", rate), 3.0, rate);
            let signal = load_signal(&path, &config).unwrap();
            assert_eq!(signal.sample_rate(), config.sample_rate);
            assert_eq!(signal.len(), config.max_samples(), "source rate {}", rate);
            assert!(signal.peak() > 0.4);
        }
    }

    #[test]
    fn test_short_input_is_not_padded() {
        let config = ComparisonConfig::default();
        let path = write_stereo_wav("short", 0.5, 48_000);
        let signal = load_signal(&path, &config).unwrap();
        assert_eq!(signal.len(), 24_000);
    }
}
