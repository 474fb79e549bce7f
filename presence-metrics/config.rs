use crate::builder::ClassifierBuilder;
use crate::error::{ClassifyError, ClassifyResult};
use crate::types::{MedianPolicy, ThresholdStrategy};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete classifier configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ClassifierConfig {
    pub median_policy: MedianPolicy,
    pub threshold_strategy: ThresholdStrategy,
    /// Evaluate candidates on the rayon pool
    pub parallel: bool,
    pub n_threads: usize,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            median_policy: MedianPolicy::Midpoint,
            threshold_strategy: ThresholdStrategy::NestedPairwise,
            parallel: cfg!(feature = "parallel"),
            n_threads: presence_core::default_thread_count(),
            name: None,
        }
    }
}

impl ClassifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reproduces the historical median indices alongside the four-candidate threshold
    pub fn legacy_preset() -> Self {
        Self {
            median_policy: MedianPolicy::Legacy,
            threshold_strategy: ThresholdStrategy::NestedPairwise,
            parallel: false,
            n_threads: 1,
            name: Some("Legacy".to_string()),
        }
    }

    /// Mean threshold, usable with any number of candidates
    pub fn any_count_preset() -> Self {
        Self {
            threshold_strategy: ThresholdStrategy::Mean,
            name: Some("Any count".to_string()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn to_builder(self) -> ClassifierBuilder {
        ClassifierBuilder::from_config(self)
    }

    pub fn summary(&self) -> String {
        format!(
            "ClassifierConfig: median={}, threshold={}, parallel={}, threads={}",
            self.median_policy, self.threshold_strategy, self.parallel, self.n_threads
        )
    }

    pub fn validate(&self) -> ClassifyResult<()> {
        if self.n_threads == 0 {
            return Err(ClassifyError::InvalidConfig("n_threads must be at least 1".to_string()));
        }
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}
