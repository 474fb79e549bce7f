//! Corner collection for the presence pipeline: image loading, downscaling,
//! grayscale conversion and Shi-Tomasi corner detection.

pub mod collector;
pub mod config;
pub mod corners;
pub mod error;

pub use collector::{
    annotate, collect_candidates, save_annotated, to_candidate_set, CollectedImage,
    GoodFeaturesCollector, PointSetCollector,
};
pub use config::CollectorConfig;
pub use corners::{ScoredCorner, ShiTomasi};
pub use error::{CollectError, CollectResult};
