use crate::classifier::DistanceClassifier;
use crate::config::ClassifierConfig;
use crate::error::ClassifyResult;
use crate::types::{MedianPolicy, ThresholdStrategy};

/// Fluent API builder for classifier configuration
pub struct ClassifierBuilder {
    config: ClassifierConfig,
}

impl ClassifierBuilder {
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::default(),
        }
    }

    pub fn median_policy(mut self, policy: MedianPolicy) -> Self {
        self.config.median_policy = policy;
        self
    }

    pub fn threshold_strategy(mut self, strategy: ThresholdStrategy) -> Self {
        self.config.threshold_strategy = strategy;
        self
    }

    /// Enable/disable evaluating candidates on the rayon pool
    pub fn parallel(mut self, enable: bool) -> Self {
        self.config.parallel = enable;
        self
    }

    pub fn threads(mut self, n_threads: usize) -> Self {
        self.config.n_threads = n_threads;
        self
    }

    /// Historical median indices, sequential evaluation
    pub fn preset_legacy(mut self) -> Self {
        self.config.median_policy = MedianPolicy::Legacy;
        self.config.threshold_strategy = ThresholdStrategy::NestedPairwise;
        self.config.parallel = false;
        self.config.n_threads = 1;
        self
    }

    pub fn build(self) -> ClassifyResult<DistanceClassifier> {
        DistanceClassifier::new(self.config)
    }

    pub fn summary(&self) -> String {
        format!("ClassifierBuilder: {}", self.config.summary())
    }

    pub fn from_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn to_config(self) -> ClassifierConfig {
        self.config
    }
}

impl Default for ClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let config = ClassifierBuilder::new()
            .median_policy(MedianPolicy::Legacy)
            .threshold_strategy(ThresholdStrategy::Mean)
            .parallel(false)
            .threads(3)
            .to_config();

        assert_eq!(config.median_policy, MedianPolicy::Legacy);
        assert_eq!(config.threshold_strategy, ThresholdStrategy::Mean);
        assert!(!config.parallel);
        assert_eq!(config.n_threads, 3);
    }

    #[test]
    fn test_legacy_preset_matches_config_preset() {
        let built = ClassifierBuilder::new().preset_legacy().to_config();
        let preset = ClassifierConfig::legacy_preset();
        assert_eq!(built.median_policy, preset.median_policy);
        assert_eq!(built.threshold_strategy, preset.threshold_strategy);
    }

    #[test]
    fn test_build_validates() {
        assert!(ClassifierBuilder::new().threads(0).build().is_err());
        let classifier = ClassifierBuilder::new().threads(2).build().unwrap();
        assert_eq!(classifier.config().n_threads, 2);
    }
}
