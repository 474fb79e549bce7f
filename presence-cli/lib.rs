use presence_core::{CandidateId, CandidateSet, PointSet, init_thread_pool};
use presence_detect::{
    CollectError, CollectedImage, CollectorConfig, GoodFeaturesCollector, PointSetCollector,
    collect_candidates, save_annotated, to_candidate_set,
};
use presence_metrics::{ClassificationReport, ClassifierConfig, ClassifyError, DistanceClassifier};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use presence_core::{self, Candidate, Point2D};
pub use presence_detect;
pub use presence_metrics;

#[derive(Debug)]
pub enum PipelineError {
    Collect(CollectError),
    Classify(ClassifyError),
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    TomlDe(toml::de::Error),
    TomlSer(toml::ser::Error),
    UnsupportedFormat(PathBuf),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Collect(e) => write!(f, "Corner collection error: {}", e),
            PipelineError::Classify(e) => write!(f, "Classification error: {}", e),
            PipelineError::Io { path, source } => write!(f, "I/O error on {}: {}", path.display(), source),
            PipelineError::Json(e) => write!(f, "JSON error: {}", e),
            PipelineError::TomlDe(e) => write!(f, "TOML parse error: {}", e),
            PipelineError::TomlSer(e) => write!(f, "TOML write error: {}", e),
            PipelineError::UnsupportedFormat(path) => {
                write!(f, "Unsupported file format for {} (expected .json or .toml)", path.display())
            }
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<CollectError> for PipelineError {
    fn from(err: CollectError) -> Self {
        PipelineError::Collect(err)
    }
}

impl From<ClassifyError> for PipelineError {
    fn from(err: ClassifyError) -> Self {
        PipelineError::Classify(err)
    }
}

impl From<presence_core::CoreError> for PipelineError {
    fn from(err: presence_core::CoreError) -> Self {
        PipelineError::Classify(err.into())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Json(err)
    }
}

impl From<toml::de::Error> for PipelineError {
    fn from(err: toml::de::Error) -> Self {
        PipelineError::TomlDe(err)
    }
}

impl From<toml::ser::Error> for PipelineError {
    fn from(err: toml::ser::Error) -> Self {
        PipelineError::TomlSer(err)
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn from_path(path: &Path) -> PipelineResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(FileFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(FileFormat::Toml),
            _ => Err(PipelineError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

fn read_file(path: &Path) -> PipelineResult<String> {
    std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> PipelineResult<()> {
    std::fs::write(path, contents).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Collector and classifier settings in one file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub classifier: ClassifierConfig,
    pub collector: CollectorConfig,
}

impl PipelineConfig {
    pub fn validate(&self) -> PipelineResult<()> {
        self.classifier.validate()?;
        self.collector.validate()?;
        Ok(())
    }

    pub fn summary(&self) -> String {
        format!("{}\n{}", self.classifier.summary(), self.collector.summary())
    }

    pub fn to_json(&self) -> PipelineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> PipelineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> PipelineResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_toml(toml_str: &str) -> PipelineResult<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` or `.toml` file
    pub fn load<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let content = read_file(path)?;
        match FileFormat::from_path(path)? {
            FileFormat::Json => Self::from_json(&content),
            FileFormat::Toml => Self::from_toml(&content),
        }
    }

    /// Save as `.json` or `.toml`, chosen by extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> PipelineResult<()> {
        let path = path.as_ref();
        let content = match FileFormat::from_path(path)? {
            FileFormat::Json => self.to_json()?,
            FileFormat::Toml => self.to_toml()?,
        };
        write_file(path, &content)
    }
}

/// Pre-extracted corners: one reference set plus labelled candidates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsInput {
    pub reference: PointSet,
    pub candidates: CandidateSet,
}

impl PointsInput {
    pub fn from_json(json: &str) -> PipelineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        Self::from_json(&read_file(path.as_ref())?)
    }
}

/// Everything produced by one image run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub report: ClassificationReport,
    pub reference: CollectedImage,
    pub candidates: Vec<(CandidateId, CollectedImage)>,
}

impl PipelineRun {
    /// Write every image with its corners drawn, named `<label>_corners.png`
    pub fn save_annotated(&self, dir: &Path, reference_label: &str) -> PipelineResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir).map_err(|source| PipelineError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(self.candidates.len() + 1);
        let images = std::iter::once((reference_label, &self.reference))
            .chain(self.candidates.iter().map(|(id, c)| (id.as_str(), c)));
        for (label, collected) in images {
            let path = dir.join(format!("{}_corners.png", label));
            save_annotated(collected, &path)?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Corner collection followed by presence classification
pub struct PresencePipeline {
    collector: GoodFeaturesCollector,
    classifier: DistanceClassifier,
}

impl PresencePipeline {
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        if let Err(e) = init_thread_pool(config.classifier.n_threads) {
            log::debug!("keeping existing rayon pool: {}", e);
        }

        Ok(Self {
            collector: GoodFeaturesCollector::new(config.collector)?,
            classifier: DistanceClassifier::new(config.classifier)?,
        })
    }

    pub fn collector(&self) -> &GoodFeaturesCollector {
        &self.collector
    }

    pub fn classifier(&self) -> &DistanceClassifier {
        &self.classifier
    }

    /// Classify corner sets that were extracted elsewhere
    pub fn classify_points(&self, reference: &PointSet, candidates: &CandidateSet) -> PipelineResult<ClassificationReport> {
        Ok(self.classifier.classify(reference, candidates)?)
    }

    pub fn classify_input(&self, input: &PointsInput) -> PipelineResult<ClassificationReport> {
        self.classify_points(&input.reference, &input.candidates)
    }

    /// Classify images through any point source
    pub fn classify_with<P: PointSetCollector>(
        &self,
        collector: &P,
        reference: &Path,
        candidates: &[(CandidateId, PathBuf)],
    ) -> PipelineResult<ClassificationReport> {
        let reference_points = collector.collect(reference)?;
        let set = CandidateSet::from_candidates(collect_candidates(collector, candidates)?)?;
        self.classify_points(&reference_points, &set)
    }

    /// Detect corners in every image and classify the candidates
    pub fn run(&self, reference: &Path, candidates: &[(CandidateId, PathBuf)]) -> PipelineResult<PipelineRun> {
        let reference_image = self.collector.collect_image(reference)?;
        let collected = self.collector.collect_labelled(candidates)?;
        let set = to_candidate_set(&collected)?;

        let report = self.classify_points(&reference_image.points, &set)?;
        Ok(PipelineRun {
            report,
            reference: reference_image,
            candidates: collected,
        })
    }
}

/// Plain-text report: per-candidate medians, threshold, sorted medians, presence flags
pub fn render_report(report: &ClassificationReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        out.push_str(&format!("Median distance for candidate {}: {}\n", outcome.id, outcome.median));
    }
    out.push_str(&format!("Sorted median distances: {:?}\n", report.sorted_medians()));
    out.push_str(&format!("Threshold value ({}): {}\n", report.strategy, report.threshold));
    out.push_str("1 indicates the reference object appears in the candidate, otherwise 0\n");
    for outcome in &report.outcomes {
        out.push_str(&format!("{}: {}\n", outcome.id, outcome.present as u8));
    }
    out.push_str(&format!("e = {:?}\n", report.presence().flags()));
    out
}

/// Parse `LABEL=PATH`, or a bare path labelled by its file stem
pub fn parse_candidate_arg(arg: &str) -> Result<(CandidateId, PathBuf), String> {
    if let Some((label, path)) = arg.split_once('=') {
        if label.is_empty() || path.is_empty() {
            return Err(format!("expected LABEL=PATH, got '{}'", arg));
        }
        return Ok((CandidateId::from(label), PathBuf::from(path)));
    }

    let path = PathBuf::from(arg);
    let label = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("cannot derive a label from '{}'", arg))?
        .to_string();
    Ok((CandidateId::from(label), path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use presence_metrics::{MedianPolicy, ThresholdStrategy};
    use std::collections::HashMap;

    /// Serves fixed corner sets keyed by path
    struct FixedCollector(HashMap<PathBuf, PointSet>);

    impl PointSetCollector for FixedCollector {
        fn collect(&self, path: &Path) -> presence_detect::CollectResult<PointSet> {
            Ok(self.0.get(path).cloned().unwrap_or_default())
        }
    }

    fn points(coords: &[(f64, f64)]) -> PointSet {
        coords.iter().copied().collect()
    }

    fn sequential_config() -> PipelineConfig {
        PipelineConfig {
            classifier: ClassifierConfig { parallel: false, n_threads: 1, ..ClassifierConfig::default() },
            collector: CollectorConfig::default(),
        }
    }

    const POINTS_JSON: &str = r#"{
        "reference": [{"x": 0, "y": 0}, {"x": 10, "y": 0}],
        "candidates": [
            {"id": "B", "points": [{"x": 0, "y": 0}, {"x": 10, "y": 0}]},
            {"id": "C", "points": [{"x": 100, "y": 0}, {"x": 110, "y": 0}]},
            {"id": "D", "points": [{"x": 1, "y": 0}, {"x": 11, "y": 0}]},
            {"id": "E", "points": [{"x": 50, "y": 0}, {"x": 60, "y": 0}]}
        ]
    }"#;

    #[test]
    fn test_points_input_end_to_end() {
        let input = PointsInput::from_json(POINTS_JSON).unwrap();
        let pipeline = PresencePipeline::new(sequential_config()).unwrap();
        let report = pipeline.classify_input(&input).unwrap();

        assert_eq!(report.threshold, 37.75);
        assert_eq!(report.presence().flags(), vec![1, 0, 1, 0]);

        let text = render_report(&report);
        assert!(text.contains("Median distance for candidate C: 100"));
        assert!(text.contains("Threshold value (nested_pairwise): 37.75"));
        assert!(text.contains("e = [1, 0, 1, 0]"));
    }

    #[test]
    fn test_points_input_rejects_duplicate_labels() {
        let json = r#"{"reference": [], "candidates": [{"id": "B", "points": []}, {"id": "B", "points": []}]}"#;
        assert!(matches!(PointsInput::from_json(json), Err(PipelineError::Json(_))));
    }

    #[test]
    fn test_classify_with_custom_collector() {
        let mut sets = HashMap::new();
        sets.insert(PathBuf::from("a"), points(&[(0.0, 0.0), (4.0, 0.0)]));
        sets.insert(PathBuf::from("b"), points(&[(0.0, 1.0), (4.0, 1.0)]));
        sets.insert(PathBuf::from("c"), points(&[(0.0, 9.0), (4.0, 9.0)]));
        sets.insert(PathBuf::from("d"), points(&[(0.0, 2.0), (4.0, 2.0)]));
        sets.insert(PathBuf::from("e"), points(&[(0.0, 8.0), (4.0, 8.0)]));
        let collector = FixedCollector(sets);

        let candidates: Vec<(CandidateId, PathBuf)> = ["b", "c", "d", "e"]
            .iter()
            .map(|p| (CandidateId::from(p.to_uppercase()), PathBuf::from(p)))
            .collect();

        let pipeline = PresencePipeline::new(sequential_config()).unwrap();
        let report = pipeline.classify_with(&collector, Path::new("a"), &candidates).unwrap();

        assert_eq!(report.medians(), vec![1.0, 9.0, 2.0, 8.0]);
        assert_eq!(report.threshold, 5.0);
        let present: Vec<&str> = report.present_ids().map(CandidateId::as_str).collect();
        assert_eq!(present, vec!["B", "D"]);
    }

    #[test]
    fn test_config_round_trip_through_files() {
        let dir = std::env::temp_dir().join(format!("presence-cli-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut config = PipelineConfig::default();
        config.classifier.median_policy = MedianPolicy::Legacy;
        config.classifier.threshold_strategy = ThresholdStrategy::Mean;
        config.collector.max_corners = 40;

        for name in ["pipeline.toml", "pipeline.json"] {
            let path = dir.join(name);
            config.save(&path).unwrap();
            assert_eq!(PipelineConfig::load(&path).unwrap(), config);
        }

        assert!(matches!(config.save(dir.join("pipeline.yaml")), Err(PipelineError::UnsupportedFormat(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = PipelineConfig::from_toml("[collector]\nmax_corners = 12\n").unwrap();
        assert_eq!(config.collector.max_corners, 12);
        assert_eq!(config.collector.scale_percent, 15);
        assert_eq!(config.classifier.threshold_strategy, ThresholdStrategy::NestedPairwise);
    }

    #[test]
    fn test_invalid_config_file_content() {
        let err = PipelineConfig::from_toml("[collector]\nscale_percent = 0\n").unwrap_err();
        assert!(matches!(err, PipelineError::Collect(CollectError::InvalidConfig(_))));
    }

    #[test]
    fn test_parse_candidate_arg() {
        let (id, path) = parse_candidate_arg("B=images/b.jpg").unwrap();
        assert_eq!(id.as_str(), "B");
        assert_eq!(path, PathBuf::from("images/b.jpg"));

        let (id, path) = parse_candidate_arg("images/Image C.jpg").unwrap();
        assert_eq!(id.as_str(), "Image C");
        assert_eq!(path, PathBuf::from("images/Image C.jpg"));

        assert!(parse_candidate_arg("=b.jpg").is_err());
        assert!(parse_candidate_arg("B=").is_err());
    }

    proptest::proptest! {
        #[test]
        fn prop_labelled_candidate_arg(label in "[A-Za-z0-9_]{1,12}", path in "[a-z0-9_/]{1,20}\\.png") {
            let (id, parsed) = parse_candidate_arg(&format!("{}={}", label, path)).unwrap();
            proptest::prop_assert_eq!(id.as_str(), label.as_str());
            proptest::prop_assert_eq!(parsed, PathBuf::from(&path));
        }
    }
}
