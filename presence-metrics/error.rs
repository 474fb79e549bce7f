use presence_core::{CandidateId, CoreError};

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifyError {
    ShapeMismatch {
        candidate: CandidateId,
        reference_len: usize,
        candidate_len: usize,
    },
    EmptySequence { candidate: CandidateId },
    InsufficientCandidates { required: usize, actual: usize },
    UnsupportedCandidateCount { strategy: String, actual: usize },
    MedianIndexOutOfRange {
        candidate: CandidateId,
        index: usize,
        len: usize,
    },
    DuplicateCandidate(CandidateId),
    InvalidConfig(String),
}

impl std::fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifyError::ShapeMismatch { candidate, reference_len, candidate_len } => {
                write!(
                    f,
                    "Point count mismatch for candidate '{}': reference has {}, candidate has {}",
                    candidate, reference_len, candidate_len
                )
            }
            ClassifyError::EmptySequence { candidate } => {
                write!(f, "Candidate '{}' has no distances to take a median of", candidate)
            }
            ClassifyError::InsufficientCandidates { required, actual } => {
                write!(f, "Threshold needs {} candidate medians, got {}", required, actual)
            }
            ClassifyError::UnsupportedCandidateCount { strategy, actual } => {
                write!(f, "Threshold strategy '{}' does not support {} candidates", strategy, actual)
            }
            ClassifyError::MedianIndexOutOfRange { candidate, index, len } => {
                write!(
                    f,
                    "Median index {} out of range for candidate '{}' with {} distances",
                    index, candidate, len
                )
            }
            ClassifyError::DuplicateCandidate(id) => {
                write!(f, "Candidate '{}' appears more than once", id)
            }
            ClassifyError::InvalidConfig(msg) => write!(f, "Invalid classifier config: {}", msg),
        }
    }
}

impl std::error::Error for ClassifyError {}

impl From<CoreError> for ClassifyError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DuplicateCandidate(id) => ClassifyError::DuplicateCandidate(id),
        }
    }
}

pub type ClassifyResult<T> = Result<T, ClassifyError>;
