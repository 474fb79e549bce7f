use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use presence_core::{CandidateId, CandidateSet, Candidate, PointSet};
use crate::config::CollectorConfig;
use crate::corners::ShiTomasi;
use crate::error::{CollectError, CollectResult};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Source of the ordered corner set for one image
pub trait PointSetCollector: Send + Sync {
    fn collect(&self, path: &Path) -> CollectResult<PointSet>;
}

/// Downscaled image together with the corners found on it
#[derive(Debug, Clone)]
pub struct CollectedImage {
    pub points: PointSet,
    pub image: RgbImage,
}

/// Load → downscale → grayscale → Shi-Tomasi corners
#[derive(Debug, Clone)]
pub struct GoodFeaturesCollector {
    config: CollectorConfig,
}

impl GoodFeaturesCollector {
    pub fn new(config: CollectorConfig) -> CollectResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn load(&self, path: &Path) -> CollectResult<DynamicImage> {
        let to_err = |source| CollectError::Image {
            path: path.to_path_buf(),
            source,
        };
        let reader = ImageReader::open(path)
            .map_err(|e| to_err(image::ImageError::IoError(e)))?
            .with_guessed_format()
            .map_err(|e| to_err(image::ImageError::IoError(e)))?;
        reader.decode().map_err(to_err)
    }

    /// Resize to `scale_percent` of the original size, truncating like integer pixel math
    pub fn downscale(&self, img: &DynamicImage) -> CollectResult<DynamicImage> {
        if self.config.scale_percent == 100 {
            return Ok(img.clone());
        }
        let width = (img.width() as u64 * self.config.scale_percent as u64 / 100) as u32;
        let height = (img.height() as u64 * self.config.scale_percent as u64 / 100) as u32;
        let min_size = self.config.min_image_size();
        if width < min_size || height < min_size {
            return Err(CollectError::ImageTooSmall { width, height, min_size });
        }
        Ok(img.resize_exact(width, height, FilterType::Triangle))
    }

    pub fn detect_image(&self, img: &DynamicImage) -> CollectResult<CollectedImage> {
        let scaled = self.downscale(img)?;
        let points = ShiTomasi::detect_points(&scaled.to_luma8(), &self.config)?;
        if points.len() < self.config.max_corners {
            log::warn!(
                "found {} corners, fewer than the {} requested",
                points.len(),
                self.config.max_corners
            );
        }
        Ok(CollectedImage {
            points,
            image: scaled.to_rgb8(),
        })
    }

    pub fn collect_image(&self, path: &Path) -> CollectResult<CollectedImage> {
        let img = self.load(path)?;
        let collected = self.detect_image(&img)?;
        log::debug!("{}: {} corners", path.display(), collected.points.len());
        Ok(collected)
    }

    /// Collect several labelled images on the rayon pool, keeping input order
    pub fn collect_labelled(&self, images: &[(CandidateId, PathBuf)]) -> CollectResult<Vec<(CandidateId, CollectedImage)>> {
        images
            .par_iter()
            .map(|(id, path)| Ok((id.clone(), self.collect_image(path)?)))
            .collect()
    }
}

impl PointSetCollector for GoodFeaturesCollector {
    fn collect(&self, path: &Path) -> CollectResult<PointSet> {
        Ok(self.collect_image(path)?.points)
    }
}

/// Corner sets for labelled images from any collector, in input order
pub fn collect_candidates<P: PointSetCollector>(
    collector: &P,
    images: &[(CandidateId, PathBuf)],
) -> CollectResult<Vec<Candidate>> {
    images
        .par_iter()
        .map(|(id, path)| Ok(Candidate::new(id.clone(), collector.collect(path)?)))
        .collect()
}

/// Turn collected images into a candidate set for the classifier
pub fn to_candidate_set(collected: &[(CandidateId, CollectedImage)]) -> Result<CandidateSet, presence_core::CoreError> {
    CandidateSet::from_candidates(
        collected
            .iter()
            .map(|(id, c)| Candidate::new(id.clone(), c.points.clone())),
    )
}

pub const MARKER_RADIUS: i32 = 4;

/// Draw a filled marker on every corner
pub fn annotate(image: &RgbImage, points: &PointSet) -> RgbImage {
    let mut output = image.clone();
    for p in points {
        draw_filled_circle_mut(
            &mut output,
            (p.x.round() as i32, p.y.round() as i32),
            MARKER_RADIUS,
            Rgb([0, 0, 255]),
        );
    }
    output
}

pub fn save_annotated(collected: &CollectedImage, path: &Path) -> CollectResult<()> {
    annotate(&collected.image, &collected.points)
        .save(path)
        .map_err(|source| CollectError::Image {
            path: path.to_path_buf(),
            source,
        })
}
