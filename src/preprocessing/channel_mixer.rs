//! Channel mixing utilities (multi-channel to mono conversion)

/// Average interleaved multi-channel samples into mono
///
/// # Arguments
///
/// * `interleaved` - Samples ordered frame by frame (`L R L R ...` for stereo)
/// * `channels` - Number of interleaved channels
///
/// # Returns
///
/// One sample per frame. A trailing partial frame is dropped.
pub fn downmix_interleaved(interleaved: &[f32], channels: usize) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => interleaved.to_vec(),
        n => interleaved
            .chunks_exact(n)
            .map(|frame| frame.iter().sum::<f32>() / n as f32)
            .collect(),
    }
}
