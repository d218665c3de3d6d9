//! Audio decoding using Symphonia
//!
//! Any container/codec pair enabled in Symphonia is accepted. Samples of every
//! channel are averaged into a single mono stream.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::ComparisonError;
use crate::preprocessing::channel_mixer::downmix_interleaved;

/// Decoded mono PCM at the file's native sample rate
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Native sample rate in Hz
    pub sample_rate: u32,
}

/// Decode an audio file to mono PCM samples
///
/// # Arguments
///
/// * `path` - Path to the audio file
/// * `max_duration_secs` - Stop decoding once this much audio has been produced
///
/// # Errors
///
/// Returns `ComparisonError::DecodingError` if the file cannot be opened, has no
/// decodable audio track, or yields no samples.
pub fn decode_audio(
    path: &Path,
    max_duration_secs: f32,
) -> Result<DecodedAudio, ComparisonError> {
    log::debug!("Decoding audio file: {}", path.display());

    let src = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            ComparisonError::DecodingError(format!(
                "No supported audio track in {}",
                path.display()
            ))
        })?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.ok_or_else(|| {
        ComparisonError::DecodingError(format!("Unknown sample rate in {}", path.display()))
    })?;
    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let frame_limit = (max_duration_secs.max(0.0) * sample_rate as f32).ceil() as usize;
    let mut mono: Vec<f32> = Vec::new();
    let mut channels = 0usize;
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    while mono.len() < frame_limit {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                channels = spec.channels.count();
                let buf = sample_buf.get_or_insert_with(|| {
                    SampleBuffer::<f32>::new(decoded.capacity() as u64, spec)
                });
                if buf.capacity() < decoded.capacity() * channels {
                    *buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                }
                buf.copy_interleaved_ref(decoded);
                mono.extend(downmix_interleaved(buf.samples(), channels));
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                // Corrupted packets are skipped rather than failing the whole file.
                log::warn!("Skipping undecodable packet in {}: {}", path.display(), msg);
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    mono.truncate(frame_limit);

    if mono.is_empty() {
        return Err(ComparisonError::DecodingError(format!(
            "No audio samples decoded from {}",
            path.display()
        )));
    }

    log::debug!(
        "Decoded {} mono samples at {} Hz from {} channel(s)",
        mono.len(),
        sample_rate,
        channels
    );

    Ok(DecodedAudio {
        samples: mono,
        sample_rate,
    })
}
