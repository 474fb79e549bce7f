use crate::error::{ClassifyError, ClassifyResult};
use crate::types::{PresenceVector, ThresholdStrategy};

/// Derives one cutoff from all candidate medians and flags the candidates below it
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveThresholdClassifier {
    strategy: ThresholdStrategy,
}

impl AdaptiveThresholdClassifier {
    pub fn new(strategy: ThresholdStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ThresholdStrategy {
        self.strategy
    }

    pub fn threshold(&self, medians: &[f64]) -> ClassifyResult<f64> {
        match self.strategy {
            ThresholdStrategy::NestedPairwise => {
                let required = ThresholdStrategy::NESTED_PAIRWISE_CANDIDATES;
                if medians.len() < required {
                    return Err(ClassifyError::InsufficientCandidates {
                        required,
                        actual: medians.len(),
                    });
                }
                if medians.len() > required {
                    return Err(ClassifyError::UnsupportedCandidateCount {
                        strategy: self.strategy.to_string(),
                        actual: medians.len(),
                    });
                }
                Ok(((medians[1] + medians[0]) / 2.0 + (medians[2] + medians[3]) / 2.0) / 2.0)
            }
            ThresholdStrategy::Mean => {
                if medians.is_empty() {
                    return Err(ClassifyError::InsufficientCandidates { required: 1, actual: 0 });
                }
                Ok(medians.iter().sum::<f64>() / medians.len() as f64)
            }
        }
    }

    /// Present iff the median is strictly below the threshold
    pub fn classify(&self, medians: &[f64]) -> ClassifyResult<(f64, PresenceVector)> {
        let threshold = self.threshold(medians)?;
        log::info!("threshold value: {}", threshold);

        let flags = medians.iter().map(|&m| m < threshold).collect();
        Ok((threshold, PresenceVector::new(flags)))
    }
}
