//! Feature extraction modules
//!
//! Signal-level building blocks for the comparison pipeline:
//! - STFT / inverse STFT, median filtering and correlation primitives
//! - Harmonic-percussive separation
//! - Chroma and CENS features, key estimation
//! - Semitone transposition
//! - YIN f0 tracking

pub mod chroma;
pub mod correlation;
pub mod hpss;
pub mod key;
pub mod median;
pub mod pitch;
pub mod stft;
pub mod transposition;
