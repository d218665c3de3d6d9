//! Audio preprocessing modules
//!
//! This module contains utilities for preparing audio for comparison:
//! - Channel mixing (interleaved multi-channel to mono)
//! - Resampling to the pipeline rate
//! - Peak normalization
//! - Leading/trailing silence trimming

pub mod channel_mixer;
pub mod normalization;
pub mod resample;
pub mod silence;

pub use normalization::normalize;
pub use silence::trim_silence;
