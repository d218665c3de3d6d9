//! Interchangeable comparison entry points
//!
//! Every comparator takes two audio paths and returns an [`AnalysisResult`] without
//! ever failing, so callers can swap implementations freely.

use std::path::Path;

use crate::analysis::AnalysisResult;
use crate::config::ComparisonConfig;

/// Two audio files in, score and traces out
pub trait Comparator: Send + Sync {
    /// Short name used in logs and CLI output
    fn name(&self) -> &'static str;

    /// Compare `reference` against `candidate`
    fn compare(&self, reference: &Path, candidate: &Path) -> AnalysisResult;
}

/// Full cover-comparison pipeline
#[derive(Debug, Clone, Default)]
pub struct CoverComparator {
    config: ComparisonConfig,
}

impl CoverComparator {
    /// Pipeline with a custom configuration
    pub fn new(config: ComparisonConfig) -> Self {
        Self { config }
    }
}

impl Comparator for CoverComparator {
    fn name(&self) -> &'static str {
        "cover"
    }

    fn compare(&self, reference: &Path, candidate: &Path) -> AnalysisResult {
        crate::compare_with_config(reference, candidate, &self.config)
    }
}

/// Placeholder plagiarism check with fixed output
#[derive(Debug, Clone, Copy, Default)]
pub struct PlagiarismChecker;

impl Comparator for PlagiarismChecker {
    fn name(&self) -> &'static str {
        "plagiarism"
    }

    fn compare(&self, reference: &Path, candidate: &Path) -> AnalysisResult {
        log::debug!(
            "Plagiarism placeholder for {} vs {}",
            reference.display(),
            candidate.display()
        );
        AnalysisResult {
            final_score: 15.5,
            trace1: vec![0.1; 3],
            trace2: vec![0.9; 3],
        }
    }
}

/// Run the plagiarism placeholder on two paths
pub fn check_plagiarism(path1: impl AsRef<Path>, path2: impl AsRef<Path>) -> AnalysisResult {
    PlagiarismChecker.compare(path1.as_ref(), path2.as_ref())
}
