use presence_core::{CandidateId, Point2D, PointSet};
use crate::error::{ClassifyError, ClassifyResult};

/// Decides which reference corner is compared with which candidate corner.
///
/// Nearest-neighbour or minimum-cost bipartite assignment would plug in here;
/// only positional pairing is provided.
pub trait Correspondence: Send + Sync {
    /// `(reference, candidate)` point pairs, in the order distances should be produced
    fn pairs(
        &self,
        candidate_id: &CandidateId,
        reference: &PointSet,
        candidate: &PointSet,
    ) -> ClassifyResult<Vec<(Point2D, Point2D)>>;
}

/// Pairs reference point `i` with candidate point `i`. Both sets must have the same length.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexCorrespondence;

impl Correspondence for IndexCorrespondence {
    fn pairs(
        &self,
        candidate_id: &CandidateId,
        reference: &PointSet,
        candidate: &PointSet,
    ) -> ClassifyResult<Vec<(Point2D, Point2D)>> {
        if reference.len() != candidate.len() {
            return Err(ClassifyError::ShapeMismatch {
                candidate: candidate_id.clone(),
                reference_len: reference.len(),
                candidate_len: candidate.len(),
            });
        }

        Ok(reference
            .iter()
            .zip(candidate.iter())
            .map(|(&r, &c)| (r, c))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_pairs_follow_point_order() {
        let reference: PointSet = vec![(0u32, 0u32), (1, 1), (2, 2)].into_iter().collect();
        let candidate: PointSet = vec![(5u32, 5u32), (6, 6), (7, 7)].into_iter().collect();

        let pairs = IndexCorrespondence
            .pairs(&CandidateId::from("B"), &reference, &candidate)
            .unwrap();

        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[1], (Point2D::new(1.0, 1.0), Point2D::new(6.0, 6.0)));
    }

    #[test]
    fn test_length_mismatch_is_reported() {
        let reference: PointSet = vec![(0u32, 0u32), (1, 1)].into_iter().collect();
        let candidate: PointSet = vec![(0u32, 0u32)].into_iter().collect();

        let err = IndexCorrespondence
            .pairs(&CandidateId::from("C"), &reference, &candidate)
            .unwrap_err();

        assert_eq!(
            err,
            ClassifyError::ShapeMismatch {
                candidate: CandidateId::from("C"),
                reference_len: 2,
                candidate_len: 1,
            }
        );
    }
}
