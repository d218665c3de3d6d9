//! Comparison stages and result aggregation
//!
//! - Two-stage synchronization
//! - Hybrid segment similarity
//! - Melody proxy extraction and pitch-contour comparison
//! - Result and metadata types

pub mod melody;
pub mod metadata;
pub mod pitch_contour;
pub mod result;
pub mod similarity;
pub mod sync;

pub use metadata::{ComparisonMetadata, ComparisonReport};
pub use result::AnalysisResult;
pub use similarity::SimilarityVector;
pub use sync::AlignedPair;
