//! Audio I/O modules
//!
//! The owned [`signal::AudioSignal`] type, Symphonia-based decoding and the
//! file-to-signal loader used at the start of the pipeline.

pub mod decoder;
pub mod loader;
pub mod signal;

pub use loader::load_signal;
pub use signal::AudioSignal;
