// SPDX-License-Identifier: MIT
//
// Binarization stage — converts a rectified page to a flat black-and-white
// rendition via locally adaptive thresholding.

use image::{GrayImage, Luma, RgbImage, imageops};
use imageproc::filter::{gaussian_blur_f32, median_filter};
use scanwerk_core::config::BinarizeParams;
use tracing::{debug, instrument};

/// Convert a page raster to a single-channel black/white image.
///
/// Each pixel is compared against the Gaussian-weighted mean of its
/// `block_size` x `block_size` neighbourhood minus `offset`: pixels above
/// the local threshold become white (255), all others black (0). This is
/// what gives the "flat scanned" look independent of uneven photographed
/// lighting. A small median filter then removes isolated single-pixel
/// noise while preserving edges.
///
/// Deterministic: identical input pixels always produce identical output.
#[instrument(skip(raster, params), fields(width = raster.width(), height = raster.height()))]
pub fn binarize(raster: RgbImage, params: &BinarizeParams) -> GrayImage {
    let gray = imageops::grayscale(&raster);
    let local_mean = gaussian_blur_f32(&gray, params.sigma());

    let (width, height) = gray.dimensions();
    let mut binary = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let threshold = local_mean.get_pixel(x, y).0[0] as i16 - params.offset;
            let pixel = gray.get_pixel(x, y).0[0] as i16;
            let value = if pixel > threshold { 255u8 } else { 0u8 };
            binary.put_pixel(x, y, Luma([value]));
        }
    }

    debug!("adaptive threshold applied");
    median_filter(&binary, params.median_radius, params.median_radius)
}
