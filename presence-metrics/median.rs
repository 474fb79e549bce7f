use presence_core::CandidateId;
use crate::error::{ClassifyError, ClassifyResult};
use crate::types::{DistanceSequence, MedianPolicy};

/// Reduces each candidate's sorted distances to one representative value
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianReducer {
    policy: MedianPolicy,
}

impl MedianReducer {
    pub fn new(policy: MedianPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MedianPolicy {
        self.policy
    }

    /// Median of an ascending slice
    pub fn median(&self, candidate_id: &CandidateId, sorted: &[f64]) -> ClassifyResult<f64> {
        let n = sorted.len();
        if n == 0 {
            return Err(ClassifyError::EmptySequence {
                candidate: candidate_id.clone(),
            });
        }

        let at = |index: usize| {
            sorted
                .get(index)
                .copied()
                .ok_or_else(|| ClassifyError::MedianIndexOutOfRange {
                    candidate: candidate_id.clone(),
                    index,
                    len: n,
                })
        };

        match (self.policy, n % 2 == 0) {
            (MedianPolicy::Midpoint, true) => Ok(0.5 * (at(n / 2 - 1)? + at(n / 2)?)),
            (MedianPolicy::Midpoint, false) => at((n - 1) / 2),
            // (n + 1) / 2 == n / 2 for even n, so both terms hit the same element
            (MedianPolicy::Legacy, true) => Ok(0.5 * (at(n / 2)? + at((n + 1) / 2)?)),
            // Out of range when n == 1
            (MedianPolicy::Legacy, false) => at((n + 1) / 2),
        }
    }

    /// One median per sequence, in input order. Sequences must already be sorted.
    pub fn reduce(&self, sequences: &[(CandidateId, DistanceSequence)]) -> ClassifyResult<Vec<f64>> {
        sequences
            .iter()
            .map(|(id, seq)| {
                debug_assert!(seq.is_sorted(), "distances for '{}' must be sorted first", id);
                let median = self.median(id, seq.values())?;
                log::debug!("median distance for candidate {}: {}", id, median);
                Ok(median)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> CandidateId {
        CandidateId::from("B")
    }

    #[test]
    fn test_midpoint_odd_and_even() {
        let reducer = MedianReducer::new(MedianPolicy::Midpoint);
        assert_eq!(reducer.median(&id(), &[1.0, 2.0, 9.0]).unwrap(), 2.0);
        assert_eq!(reducer.median(&id(), &[1.0, 2.0, 4.0, 9.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_legacy_indices() {
        let reducer = MedianReducer::new(MedianPolicy::Legacy);
        // odd: index (3 + 1) / 2 = 2
        assert_eq!(reducer.median(&id(), &[1.0, 2.0, 9.0]).unwrap(), 9.0);
        // even: indices 2 and 2
        assert_eq!(reducer.median(&id(), &[1.0, 2.0, 4.0, 9.0]).unwrap(), 4.0);
    }

    #[test]
    fn test_single_element() {
        let midpoint = MedianReducer::new(MedianPolicy::Midpoint);
        assert_eq!(midpoint.median(&id(), &[7.5]).unwrap(), 7.5);

        // The legacy odd index overshoots a one-element sequence
        let legacy = MedianReducer::new(MedianPolicy::Legacy);
        assert_eq!(
            legacy.median(&id(), &[7.5]).unwrap_err(),
            ClassifyError::MedianIndexOutOfRange { candidate: id(), index: 1, len: 1 }
        );
    }

    #[test]
    fn test_empty_sequence_is_an_error() {
        for policy in [MedianPolicy::Midpoint, MedianPolicy::Legacy] {
            let err = MedianReducer::new(policy).median(&id(), &[]).unwrap_err();
            assert_eq!(err, ClassifyError::EmptySequence { candidate: id() });
        }
    }

    #[test]
    fn test_reduce_keeps_order_and_allows_different_lengths() {
        let mut b = DistanceSequence::from(vec![3.0, 1.0, 2.0]);
        let mut c = DistanceSequence::from(vec![10.0, 20.0]);
        b.sort();
        c.sort();

        let medians = MedianReducer::default()
            .reduce(&[(CandidateId::from("B"), b), (CandidateId::from("C"), c)])
            .unwrap();

        assert_eq!(medians, vec![2.0, 15.0]);
    }
}
