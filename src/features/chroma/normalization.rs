//! Chroma normalization strategies

use super::{ChromaProfile, NUM_PITCH_CLASSES};

/// Frames whose norm falls below this are left untouched
const NORM_FLOOR: f32 = 1e-10;

/// CENS quantization thresholds, each contributing `CENS_STEP_WEIGHT` when exceeded
const CENS_STEPS: [f32; 4] = [0.4, 0.2, 0.1, 0.05];
const CENS_STEP_WEIGHT: f32 = 0.25;

fn scale_frames(chroma: &mut ChromaProfile, norm: impl Fn(&[f32; NUM_PITCH_CLASSES]) -> f32) {
    for frame in chroma.frames.iter_mut() {
        let n = norm(frame);
        if n > NORM_FLOOR {
            for v in frame.iter_mut() {
                *v /= n;
            }
        }
    }
}

/// Scale each frame so its largest bin is 1.0
pub fn normalize_max(chroma: &mut ChromaProfile) {
    scale_frames(chroma, |f| f.iter().map(|x| x.abs()).fold(0.0f32, f32::max));
}

/// Scale each frame to unit L1 norm
pub fn normalize_l1(chroma: &mut ChromaProfile) {
    scale_frames(chroma, |f| f.iter().map(|x| x.abs()).sum());
}

/// Scale each frame to unit L2 norm
pub fn normalize_l2(chroma: &mut ChromaProfile) {
    scale_frames(chroma, |f| f.iter().map(|x| x * x).sum::<f32>().sqrt());
}

/// Quantize L1-normalized chroma onto the CENS levels {0, 0.25, 0.5, 0.75, 1.0}
pub fn quantize_cens(chroma: &mut ChromaProfile) {
    for frame in chroma.frames.iter_mut() {
        for v in frame.iter_mut() {
            *v = CENS_STEPS
                .iter()
                .filter(|&&step| *v > step)
                .count() as f32
                * CENS_STEP_WEIGHT;
        }
    }
}
