use crate::error::{CollectError, CollectResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Corner collection settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct CollectorConfig {
    /// Upper bound on corners returned per image
    pub max_corners: usize,
    /// Fraction of the strongest response a corner must reach
    pub quality_level: f32,
    /// Minimum spacing between returned corners, in pixels of the downscaled image
    pub min_distance: f32,
    /// Downscale factor applied before detection, in percent of the original size
    pub scale_percent: u32,
    /// Side of the structure tensor window
    pub block_size: u32,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_corners: 28,
            quality_level: 0.2,
            min_distance: 5.0,
            scale_percent: 15,
            block_size: 3,
        }
    }
}

impl CollectorConfig {
    /// Detect on the image as loaded, without downscaling
    pub fn full_resolution() -> Self {
        Self {
            scale_percent: 100,
            ..Self::default()
        }
    }

    /// Smallest image side the detector accepts
    pub fn min_image_size(&self) -> u32 {
        self.block_size + 2
    }

    pub fn summary(&self) -> String {
        format!(
            "CollectorConfig: max_corners={}, quality={:.2}, min_distance={:.1}, scale={}%, block={}",
            self.max_corners, self.quality_level, self.min_distance, self.scale_percent, self.block_size
        )
    }

    pub fn validate(&self) -> CollectResult<()> {
        if self.max_corners == 0 {
            return Err(CollectError::InvalidConfig("max_corners must be at least 1".to_string()));
        }
        if !(self.quality_level > 0.0 && self.quality_level <= 1.0) {
            return Err(CollectError::InvalidConfig(format!(
                "quality_level {} must be in (0, 1]",
                self.quality_level
            )));
        }
        if !(self.min_distance >= 0.0) {
            return Err(CollectError::InvalidConfig(format!(
                "min_distance {} must be non-negative",
                self.min_distance
            )));
        }
        if self.scale_percent == 0 || self.scale_percent > 100 {
            return Err(CollectError::InvalidConfig(format!(
                "scale_percent {} must be in 1..=100",
                self.scale_percent
            )));
        }
        if self.block_size == 0 || self.block_size % 2 == 0 {
            return Err(CollectError::InvalidConfig(format!(
                "block_size {} must be odd",
                self.block_size
            )));
        }
        Ok(())
    }
}
