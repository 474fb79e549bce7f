use image::GrayImage;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use presence_core::{Point2D, PointSet};
use crate::config::CollectorConfig;
use crate::error::{CollectError, CollectResult};
use rayon::prelude::*;

/// Corner location with its minimum-eigenvalue response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCorner {
    pub x: u32,
    pub y: u32,
    pub response: f32,
}

/// Shi-Tomasi "good features to track" corner detection
pub struct ShiTomasi;

impl ShiTomasi {
    /// Smaller eigenvalue of the gradient structure tensor at every pixel, row-major
    pub fn min_eigen_response(img: &GrayImage, block_size: u32) -> Vec<f32> {
        let (width, height) = img.dimensions();
        let gx = horizontal_sobel(img);
        let gy = vertical_sobel(img);
        let half = (block_size / 2) as i64;
        let (w, h) = (width as i64, height as i64);

        (0..height)
            .into_par_iter()
            .flat_map_iter(|y| {
                let gx = &gx;
                let gy = &gy;
                (0..width).map(move |x| {
                    let mut sxx = 0.0f32;
                    let mut sxy = 0.0f32;
                    let mut syy = 0.0f32;

                    for dy in -half..=half {
                        let yy = (y as i64 + dy).clamp(0, h - 1) as u32;
                        for dx in -half..=half {
                            let xx = (x as i64 + dx).clamp(0, w - 1) as u32;
                            let ix = gx.get_pixel(xx, yy)[0] as f32;
                            let iy = gy.get_pixel(xx, yy)[0] as f32;
                            sxx += ix * ix;
                            sxy += ix * iy;
                            syy += iy * iy;
                        }
                    }

                    let mean = 0.5 * (sxx + syy);
                    let diff = 0.5 * (sxx - syy);
                    mean - (diff * diff + sxy * sxy).sqrt()
                })
            })
            .collect()
    }

    /// Corners above `quality_level * max_response` that are 3x3 local maxima,
    /// strongest first
    pub fn candidates(response: &[f32], width: u32, height: u32, quality_level: f32) -> Vec<ScoredCorner> {
        let max_response = response.iter().cloned().fold(0.0f32, f32::max);
        if max_response <= 0.0 {
            return Vec::new();
        }
        let floor = quality_level * max_response;
        let (w, h) = (width as i64, height as i64);
        let at = |x: i64, y: i64| response[(y * w + x) as usize];

        let mut corners: Vec<ScoredCorner> = (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .filter_map(|(x, y)| {
                let r = at(x, y);
                if r < floor {
                    return None;
                }
                for ny in (y - 1).max(0)..=(y + 1).min(h - 1) {
                    for nx in (x - 1).max(0)..=(x + 1).min(w - 1) {
                        if at(nx, ny) > r {
                            return None;
                        }
                    }
                }
                Some(ScoredCorner { x: x as u32, y: y as u32, response: r })
            })
            .collect();

        // stable: equal responses stay in raster order
        corners.sort_by(|a, b| b.response.total_cmp(&a.response));
        corners
    }

    /// Greedy spacing filter over responses in descending order, capped at `max_corners`
    pub fn enforce_min_distance(sorted: &[ScoredCorner], min_distance: f32, max_corners: usize) -> Vec<ScoredCorner> {
        let min_distance_sq = min_distance * min_distance;
        let mut kept: Vec<ScoredCorner> = Vec::with_capacity(max_corners.min(sorted.len()));

        for candidate in sorted {
            if kept.len() == max_corners {
                break;
            }
            let too_close = kept.iter().any(|existing| {
                let dx = candidate.x as f32 - existing.x as f32;
                let dy = candidate.y as f32 - existing.y as f32;
                dx * dx + dy * dy < min_distance_sq
            });
            if !too_close {
                kept.push(*candidate);
            }
        }

        kept
    }

    pub fn detect(img: &GrayImage, config: &CollectorConfig) -> CollectResult<Vec<ScoredCorner>> {
        config.validate()?;
        let (width, height) = img.dimensions();
        let min_size = config.min_image_size();
        if width < min_size || height < min_size {
            return Err(CollectError::ImageTooSmall { width, height, min_size });
        }

        let response = Self::min_eigen_response(img, config.block_size);
        let candidates = Self::candidates(&response, width, height, config.quality_level);
        let corners = Self::enforce_min_distance(&candidates, config.min_distance, config.max_corners);

        log::debug!(
            "{}x{} image: {} candidate corners, {} kept",
            width,
            height,
            candidates.len(),
            corners.len()
        );
        Ok(corners)
    }

    pub fn detect_points(img: &GrayImage, config: &CollectorConfig) -> CollectResult<PointSet> {
        let corners = Self::detect(img, config)?;
        Ok(corners.iter().map(|c| Point2D::from((c.x, c.y))).collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::Luma;

    /// Dark background with bright axis-aligned squares
    pub(crate) fn squares_image(width: u32, height: u32, squares: &[(u32, u32, u32)]) -> GrayImage {
        let mut img = GrayImage::from_pixel(width, height, Luma([20]));
        for &(x0, y0, side) in squares {
            for y in y0..(y0 + side).min(height) {
                for x in x0..(x0 + side).min(width) {
                    img.put_pixel(x, y, Luma([230]));
                }
            }
        }
        img
    }

    #[test]
    fn test_uniform_image_has_no_corners() {
        let img = GrayImage::from_pixel(32, 32, Luma([128]));
        let corners = ShiTomasi::detect(&img, &CollectorConfig::full_resolution()).unwrap();
        assert!(corners.is_empty());
    }

    #[test]
    fn test_square_corners_found() {
        let img = squares_image(64, 64, &[(20, 20, 20)]);
        let config = CollectorConfig { max_corners: 4, ..CollectorConfig::full_resolution() };
        let corners = ShiTomasi::detect(&img, &config).unwrap();

        assert_eq!(corners.len(), 4);
        // each detection lies near one of the square's corners
        let expected = [(20i64, 20i64), (39, 20), (20, 39), (39, 39)];
        for c in &corners {
            let near = expected
                .iter()
                .any(|&(ex, ey)| (c.x as i64 - ex).abs() <= 2 && (c.y as i64 - ey).abs() <= 2);
            assert!(near, "unexpected corner at ({}, {})", c.x, c.y);
        }
    }

    #[test]
    fn test_strongest_first_and_capped() {
        let img = squares_image(96, 96, &[(10, 10, 15), (50, 50, 30)]);
        let config = CollectorConfig { max_corners: 5, ..CollectorConfig::full_resolution() };
        let corners = ShiTomasi::detect(&img, &config).unwrap();

        assert!(corners.len() <= 5);
        for pair in corners.windows(2) {
            assert!(pair[0].response >= pair[1].response);
        }
    }

    #[test]
    fn test_min_distance_respected() {
        let img = squares_image(80, 80, &[(10, 10, 8), (30, 30, 8), (50, 10, 8)]);
        let config = CollectorConfig {
            max_corners: 50,
            min_distance: 6.0,
            ..CollectorConfig::full_resolution()
        };
        let corners = ShiTomasi::detect(&img, &config).unwrap();

        for i in 0..corners.len() {
            for j in (i + 1)..corners.len() {
                let dx = corners[i].x as f32 - corners[j].x as f32;
                let dy = corners[i].y as f32 - corners[j].y as f32;
                assert!((dx * dx + dy * dy).sqrt() >= 6.0);
            }
        }
    }

    #[test]
    fn test_enforce_min_distance_keeps_strongest() {
        let sorted = [
            ScoredCorner { x: 10, y: 10, response: 9.0 },
            ScoredCorner { x: 11, y: 10, response: 8.0 },
            ScoredCorner { x: 30, y: 10, response: 7.0 },
        ];
        let kept = ShiTomasi::enforce_min_distance(&sorted, 5.0, 10);
        assert_eq!(kept, vec![sorted[0], sorted[2]]);

        let capped = ShiTomasi::enforce_min_distance(&sorted, 0.0, 2);
        assert_eq!(capped.len(), 2);
    }

    proptest::proptest! {
        #[test]
        fn prop_spacing_and_cap(
            raw in proptest::collection::vec((0u32..64, 0u32..64, 0.0f32..100.0), 0..80),
            min_distance in 0.0f32..12.0,
            max_corners in 1usize..30,
        ) {
            let mut sorted: Vec<ScoredCorner> = raw
                .into_iter()
                .map(|(x, y, response)| ScoredCorner { x, y, response })
                .collect();
            sorted.sort_by(|a, b| b.response.total_cmp(&a.response));

            let kept = ShiTomasi::enforce_min_distance(&sorted, min_distance, max_corners);
            proptest::prop_assert!(kept.len() <= max_corners);
            for i in 0..kept.len() {
                for j in (i + 1)..kept.len() {
                    let dx = kept[i].x as f32 - kept[j].x as f32;
                    let dy = kept[i].y as f32 - kept[j].y as f32;
                    proptest::prop_assert!(dx * dx + dy * dy >= min_distance * min_distance);
                }
            }
        }
    }

    #[test]
    fn test_too_small_image() {
        let img = GrayImage::new(4, 4);
        let err = ShiTomasi::detect(&img, &CollectorConfig::full_resolution()).unwrap_err();
        assert!(matches!(err, CollectError::ImageTooSmall { min_size: 5, .. }));
    }

    #[test]
    fn test_points_are_integer_pixels() {
        let img = squares_image(64, 64, &[(20, 20, 20)]);
        let points = ShiTomasi::detect_points(&img, &CollectorConfig::full_resolution()).unwrap();
        assert!(!points.is_empty());
        for p in &points {
            assert_eq!(p.x.fract(), 0.0);
            assert_eq!(p.y.fract(), 0.0);
        }
    }
}
