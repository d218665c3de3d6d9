//! Key estimation modules
//!
//! Estimate the dominant pitch class of a signal from its time-averaged chroma and
//! derive the semitone shift that maps one recording onto another.

pub mod detector;

pub use detector::{estimate_key, key_shift};

use serde::{Deserialize, Serialize};

/// Pitch-class names, index 0 = C
const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Dominant pitch class of a recording (0 = C, 1 = C#, ..., 11 = B)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitchClass(pub u8);

impl PitchClass {
    /// Pitch class index in 0..12
    pub fn index(&self) -> u8 {
        self.0 % 12
    }

    /// Note name in sharp notation (e.g. "C", "F#", "A")
    ///
    /// # Example
    ///
    /// ```
    /// use cover_compare::features::key::PitchClass;
    ///
    /// assert_eq!(PitchClass(0).name(), "C");
    /// assert_eq!(PitchClass(6).name(), "F#");
    /// assert_eq!(PitchClass(9).name(), "A");
    /// ```
    pub fn name(&self) -> &'static str {
        NOTE_NAMES[self.index() as usize]
    }
}
