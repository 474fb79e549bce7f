use presence_core::CandidateId;
use crate::sorting::Sorter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index rule used to pick the median out of a sorted distance sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum MedianPolicy {
    /// Middle element for odd counts, mean of the two middle elements for even counts
    #[default]
    Midpoint,
    /// Odd counts take index `(n + 1) / 2`; even counts average indices `n / 2`
    /// and `(n + 1) / 2`. Kept to reproduce historical results.
    Legacy,
}

impl std::fmt::Display for MedianPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MedianPolicy::Midpoint => f.write_str("midpoint"),
            MedianPolicy::Legacy => f.write_str("legacy"),
        }
    }
}

/// How the per-candidate medians are folded into one cutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum ThresholdStrategy {
    /// `((m1 + m0) / 2 + (m2 + m3) / 2) / 2`, defined for exactly four candidates
    #[default]
    NestedPairwise,
    /// Arithmetic mean of all medians, any non-zero candidate count
    Mean,
}

impl ThresholdStrategy {
    pub const NESTED_PAIRWISE_CANDIDATES: usize = 4;
}

impl std::fmt::Display for ThresholdStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdStrategy::NestedPairwise => f.write_str("nested_pairwise"),
            ThresholdStrategy::Mean => f.write_str("mean"),
        }
    }
}

/// Per-pair distances of one candidate, in point order until sorted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceSequence {
    values: Vec<f64>,
    sorted: bool,
}

impl DistanceSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            sorted: false,
        }
    }

    pub fn push(&mut self, distance: f64) {
        self.values.push(distance);
        self.sorted = false;
    }

    /// Sort ascending in place; the production order is discarded
    pub fn sort(&mut self) -> &mut Self {
        Sorter::sort(&mut self.values);
        self.sorted = true;
        self
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted || self.values.len() < 2
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

impl From<Vec<f64>> for DistanceSequence {
    fn from(values: Vec<f64>) -> Self {
        Self { values, sorted: false }
    }
}

/// One presence decision per candidate, in candidate order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct PresenceVector(Vec<bool>);

impl PresenceVector {
    pub fn new(flags: Vec<bool>) -> Self {
        Self(flags)
    }

    /// 1 = object present, 0 = absent
    pub fn flags(&self) -> Vec<u8> {
        self.0.iter().map(|&present| present as u8).collect()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateOutcome {
    pub id: CandidateId,
    pub median: f64,
    pub present: bool,
    /// Sorted ascending
    pub distances: Vec<f64>,
}

/// Full result of one classification run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassificationReport {
    pub threshold: f64,
    pub strategy: ThresholdStrategy,
    pub median_policy: MedianPolicy,
    pub outcomes: Vec<CandidateOutcome>,
}

impl ClassificationReport {
    pub fn medians(&self) -> Vec<f64> {
        self.outcomes.iter().map(|o| o.median).collect()
    }

    /// Medians in ascending order, detached from their labels
    pub fn sorted_medians(&self) -> Vec<f64> {
        let mut medians = self.medians();
        Sorter::sort(&mut medians);
        medians
    }

    pub fn presence(&self) -> PresenceVector {
        PresenceVector::new(self.outcomes.iter().map(|o| o.present).collect())
    }

    pub fn outcome(&self, id: &CandidateId) -> Option<&CandidateOutcome> {
        self.outcomes.iter().find(|o| &o.id == id)
    }

    pub fn present_ids(&self) -> impl Iterator<Item = &CandidateId> {
        self.outcomes.iter().filter(|o| o.present).map(|o| &o.id)
    }
}
