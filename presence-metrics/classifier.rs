use presence_core::{Candidate, CandidateId, CandidateSet, PointSet};
use crate::config::ClassifierConfig;
use crate::correspondence::{Correspondence, IndexCorrespondence};
use crate::distance::DistanceComputer;
use crate::error::ClassifyResult;
use crate::median::MedianReducer;
use crate::threshold::AdaptiveThresholdClassifier;
use crate::types::{CandidateOutcome, ClassificationReport, DistanceSequence};
use rayon::prelude::*;

/// Distance, sort and median for every candidate, then one shared threshold
pub struct DistanceClassifier<C = IndexCorrespondence> {
    config: ClassifierConfig,
    computer: DistanceComputer<C>,
    reducer: MedianReducer,
    thresholder: AdaptiveThresholdClassifier,
}

impl DistanceClassifier<IndexCorrespondence> {
    pub fn new(config: ClassifierConfig) -> ClassifyResult<Self> {
        Self::with_correspondence(config, IndexCorrespondence)
    }
}

impl<C: Correspondence> DistanceClassifier<C> {
    pub fn with_correspondence(config: ClassifierConfig, correspondence: C) -> ClassifyResult<Self> {
        config.validate()?;
        Ok(Self {
            reducer: MedianReducer::new(config.median_policy),
            thresholder: AdaptiveThresholdClassifier::new(config.threshold_strategy),
            computer: DistanceComputer::with_correspondence(correspondence),
            config,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Sorted distances and median for a single candidate
    fn evaluate(&self, reference: &PointSet, candidate: &Candidate) -> ClassifyResult<(DistanceSequence, f64)> {
        let mut distances = self.computer.compute(&candidate.id, reference, &candidate.points)?;
        distances.sort();
        let median = self.reducer.median(&candidate.id, distances.values())?;
        log::debug!(
            "candidate {}: {} distances, median {}",
            candidate.id,
            distances.len(),
            median
        );
        Ok((distances, median))
    }

    pub fn classify(&self, reference: &PointSet, candidates: &CandidateSet) -> ClassifyResult<ClassificationReport> {
        let evaluated: Vec<(DistanceSequence, f64)> = if self.config.parallel {
            candidates
                .as_slice()
                .par_iter()
                .map(|c| self.evaluate(reference, c))
                .collect::<ClassifyResult<_>>()?
        } else {
            candidates
                .iter()
                .map(|c| self.evaluate(reference, c))
                .collect::<ClassifyResult<_>>()?
        };

        let medians: Vec<f64> = evaluated.iter().map(|(_, m)| *m).collect();
        let (threshold, presence) = self.thresholder.classify(&medians)?;

        let outcomes = candidates
            .ids()
            .zip(evaluated)
            .zip(presence.iter())
            .map(|((id, (distances, median)), present)| CandidateOutcome {
                id: id.clone(),
                median,
                present,
                distances: distances.into_values(),
            })
            .collect();

        Ok(ClassificationReport {
            threshold,
            strategy: self.thresholder.strategy(),
            median_policy: self.reducer.policy(),
            outcomes,
        })
    }

    /// Classify from plain `(label, points)` pairs
    pub fn classify_labelled<I, L>(&self, reference: &PointSet, candidates: I) -> ClassifyResult<ClassificationReport>
    where
        I: IntoIterator<Item = (L, PointSet)>,
        L: Into<CandidateId>,
    {
        let set = CandidateSet::from_candidates(
            candidates.into_iter().map(|(id, points)| Candidate::new(id, points)),
        )?;
        self.classify(reference, &set)
    }
}
