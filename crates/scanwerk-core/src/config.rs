// SPDX-License-Identifier: MIT
//
// Pipeline configuration.
//
// Everything except the rasterization DPI is a tuned algorithmic constant.
// The defaults below are the values the pipeline was calibrated with; they
// are kept as configuration so that the tuning is documented in one place,
// not because callers are expected to change them.

use serde::{Deserialize, Serialize};

/// Lowest DPI front ends should offer for PDF rasterization.
pub const MIN_DPI: u32 = 100;
/// Highest DPI front ends should offer for PDF rasterization.
pub const MAX_DPI: u32 = 400;

/// Full configuration for one scan job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Resolution used when rasterizing PDF pages, in dots per inch.
    ///
    /// The sensible range is [`MIN_DPI`]..=[`MAX_DPI`]; enforcing it is the
    /// front end's job, the core accepts whatever it is handed.
    pub dpi: u32,
    /// Paper region detector constants.
    pub detector: DetectorParams,
    /// Binarization constants.
    pub binarize: BinarizeParams,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            dpi: 200,
            detector: DetectorParams::default(),
            binarize: BinarizeParams::default(),
        }
    }
}

/// Constants governing paper boundary detection.
///
/// The 4-vertex and 15%-area acceptance gates are empirically tuned; they
/// reject spurious small contours and non-quadrilateral clutter (hands,
/// background objects) without any deeper rationale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorParams {
    /// Fixed working height the raster is downscaled to before any
    /// geometric work. Bounds mask/contour cost independent of input size.
    pub working_height: u32,
    /// Maximum saturation (0-255) for a pixel to count as paper-colored.
    pub saturation_max: u8,
    /// Minimum brightness (0-255) for a pixel to count as paper-colored.
    pub value_min: u8,
    /// Radius of the square structuring element used for the morphological
    /// open/close cleanup. Radius 2 gives a 5x5 element.
    pub morph_radius: u8,
    /// Douglas-Peucker tolerance as a fraction of the contour perimeter.
    pub approx_epsilon_fraction: f64,
    /// Minimum enclosed area of an accepted quadrilateral, as a fraction of
    /// the downscaled frame area.
    pub min_area_fraction: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            working_height: 800,
            saturation_max: 60,
            value_min: 100,
            morph_radius: 2,
            approx_epsilon_fraction: 0.02,
            min_area_fraction: 0.15,
        }
    }
}

/// Constants governing the adaptive binarization stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinarizeParams {
    /// Side length of the Gaussian-weighted neighbourhood each pixel is
    /// compared against. Must be odd.
    pub block_size: u32,
    /// Constant subtracted from the local mean before comparison.
    pub offset: i16,
    /// Radius of the post-threshold median filter. Radius 1 gives 3x3.
    pub median_radius: u32,
}

impl Default for BinarizeParams {
    fn default() -> Self {
        Self {
            block_size: 21,
            offset: 10,
            median_radius: 1,
        }
    }
}

impl BinarizeParams {
    /// Gaussian sigma implied by `block_size`, following the convention of
    /// deriving sigma from the kernel size:
    /// `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
    pub fn sigma(&self) -> f32 {
        0.3 * ((self.block_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dpi_within_documented_range() {
        let config = ScanConfig::default();
        assert!(config.dpi >= MIN_DPI && config.dpi <= MAX_DPI);
    }

    #[test]
    fn sigma_for_block_size_21() {
        let params = BinarizeParams::default();
        assert!((params.sigma() - 3.5).abs() < 1e-6);
    }
}
