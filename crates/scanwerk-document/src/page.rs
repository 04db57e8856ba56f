// SPDX-License-Identifier: MIT
//
// Single-page pipeline — detection, rectification, binarization, in that
// fixed order.

use image::{GrayImage, RgbImage};
use scanwerk_core::config::ScanConfig;
use tracing::instrument;

use crate::{binarize, detect, rectify};

/// Run the full per-page pipeline on one raster.
///
/// Stages always run in the same order and none is ever skipped: the paper
/// region detector looks for the page boundary, the rectifier flattens it
/// (or passes the raster through when nothing was found), and the
/// binarization stage produces the final black-and-white rendition.
#[instrument(skip(raster, config), fields(width = raster.width(), height = raster.height()))]
pub fn process_page(raster: RgbImage, config: &ScanConfig) -> GrayImage {
    let quad = detect::detect_page(&raster, &config.detector);
    let flattened = rectify::rectify(raster, quad);
    binarize::binarize(flattened, &config.binarize)
}
