//! Presence classification from corner point sets.
//!
//! For every candidate image the corners are paired with the reference
//! corners, the pair distances are sorted and reduced to a median, and all
//! medians feed one threshold. A candidate whose median falls strictly below
//! the threshold is reported as containing the reference object.

pub mod builder;
pub mod classifier;
pub mod config;
pub mod correspondence;
pub mod distance;
pub mod error;
pub mod median;
pub mod sorting;
pub mod threshold;
pub mod types;

pub use builder::ClassifierBuilder;
pub use classifier::DistanceClassifier;
pub use config::ClassifierConfig;
pub use correspondence::{Correspondence, IndexCorrespondence};
pub use distance::DistanceComputer;
pub use error::{ClassifyError, ClassifyResult};
pub use median::MedianReducer;
pub use sorting::Sorter;
pub use threshold::AdaptiveThresholdClassifier;
pub use types::{
    CandidateOutcome, ClassificationReport, DistanceSequence, MedianPolicy, PresenceVector,
    ThresholdStrategy,
};

use presence_core::{CandidateSet, PointSet};

/// One-shot classification with the given configuration
pub fn classify(
    reference: &PointSet,
    candidates: &CandidateSet,
    config: &ClassifierConfig,
) -> ClassifyResult<ClassificationReport> {
    DistanceClassifier::new(config.clone())?.classify(reference, candidates)
}
