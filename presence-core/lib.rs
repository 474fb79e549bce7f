#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Corner coordinate in image pixels, as reported by the detector
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Planar Euclidean distance, no normalization
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for Point2D {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x: x as f64, y: y as f64 }
    }
}

impl From<(i32, i32)> for Point2D {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x: x as f64, y: y as f64 }
    }
}

/// Ordered corners of one image. Index `i` of the reference set and index `i`
/// of a candidate set are treated as the same feature.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct PointSet(Vec<Point2D>);

impl PointSet {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self(points)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Point2D> {
        self.0.get(index)
    }

    pub fn points(&self) -> &[Point2D] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point2D> {
        self.0.iter()
    }
}

impl From<Vec<Point2D>> for PointSet {
    fn from(points: Vec<Point2D>) -> Self {
        Self(points)
    }
}

impl<P: Into<Point2D>> FromIterator<P> for PointSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point2D;
    type IntoIter = std::slice::Iter<'a, Point2D>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Label of a candidate image ("B", "C", a file stem, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CandidateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One candidate image's corners together with its label
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    pub id: CandidateId,
    pub points: PointSet,
}

impl Candidate {
    pub fn new(id: impl Into<CandidateId>, points: impl Into<PointSet>) -> Self {
        Self {
            id: id.into(),
            points: points.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    DuplicateCandidate(CandidateId),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::DuplicateCandidate(id) => {
                write!(f, "Candidate '{}' is already present in the set", id)
            }
        }
    }
}

impl std::error::Error for CoreError {}

/// Labelled candidates in insertion order. Identifiers are unique.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Vec<Candidate>", into = "Vec<Candidate>")
)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from labelled point sets, rejecting repeated labels
    pub fn from_candidates<I>(candidates: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = Candidate>,
    {
        let mut set = Self::new();
        for candidate in candidates {
            set.push(candidate)?;
        }
        Ok(set)
    }

    pub fn push(&mut self, candidate: Candidate) -> Result<(), CoreError> {
        if self.get(&candidate.id).is_some() {
            return Err(CoreError::DuplicateCandidate(candidate.id));
        }
        self.candidates.push(candidate);
        Ok(())
    }

    /// Convenience for chaining literal candidates
    pub fn with(mut self, id: impl Into<CandidateId>, points: impl Into<PointSet>) -> Result<Self, CoreError> {
        self.push(Candidate::new(id, points))?;
        Ok(self)
    }

    pub fn get(&self, id: &CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| &c.id == id)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &CandidateId> {
        self.candidates.iter().map(|c| &c.id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }
}

impl TryFrom<Vec<Candidate>> for CandidateSet {
    type Error = CoreError;

    fn try_from(candidates: Vec<Candidate>) -> Result<Self, Self::Error> {
        Self::from_candidates(candidates)
    }
}

impl From<CandidateSet> for Vec<Candidate> {
    fn from(set: CandidateSet) -> Self {
        set.candidates
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

/// Default rayon worker count: one per logical CPU
pub fn default_thread_count() -> usize {
    num_cpus::get().max(1)
}

/// Initialize Rayon thread pool with the specified number of threads
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}
