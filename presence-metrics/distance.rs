use presence_core::{CandidateId, CandidateSet, PointSet};
use crate::correspondence::{Correspondence, IndexCorrespondence};
use crate::error::ClassifyResult;
use crate::types::DistanceSequence;

/// Euclidean distances between corresponding reference and candidate corners
#[derive(Debug, Clone, Default)]
pub struct DistanceComputer<C = IndexCorrespondence> {
    correspondence: C,
}

impl DistanceComputer<IndexCorrespondence> {
    pub fn new() -> Self {
        Self {
            correspondence: IndexCorrespondence,
        }
    }
}

impl<C: Correspondence> DistanceComputer<C> {
    pub fn with_correspondence(correspondence: C) -> Self {
        Self { correspondence }
    }

    /// Append one distance per corresponding pair to `dest`, in pair order
    pub fn compute_into(
        &self,
        candidate_id: &CandidateId,
        reference: &PointSet,
        candidate: &PointSet,
        dest: &mut DistanceSequence,
    ) -> ClassifyResult<()> {
        let pairs = self.correspondence.pairs(candidate_id, reference, candidate)?;
        for (r, c) in pairs {
            dest.push(r.distance_to(&c));
        }
        Ok(())
    }

    pub fn compute(
        &self,
        candidate_id: &CandidateId,
        reference: &PointSet,
        candidate: &PointSet,
    ) -> ClassifyResult<DistanceSequence> {
        let mut dest = DistanceSequence::with_capacity(reference.len());
        self.compute_into(candidate_id, reference, candidate, &mut dest)?;
        Ok(dest)
    }

    /// One independent, unsorted sequence per candidate, in candidate order
    pub fn compute_all(
        &self,
        reference: &PointSet,
        candidates: &CandidateSet,
    ) -> ClassifyResult<Vec<(CandidateId, DistanceSequence)>> {
        candidates
            .iter()
            .map(|c| {
                let seq = self.compute(&c.id, reference, &c.points)?;
                Ok((c.id.clone(), seq))
            })
            .collect()
    }
}
