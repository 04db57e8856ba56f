// SPDX-License-Identifier: MIT
//
// Perspective rectifier — warps a detected page quadrilateral to a flat,
// axis-aligned rectangle. Detection failure or degenerate geometry degrades
// to "no cropping", never to an error.

use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, warp_into};
use tracing::{debug, instrument, warn};

use crate::geometry::{Corners, order_corners, rectify_transform};

/// Flatten the page described by `quad`, or pass the raster through
/// unchanged when no quadrilateral was found.
///
/// The quad's corners may arrive in any order; they are canonicalized here.
/// If the resulting projective transform is degenerate the original raster
/// is returned as-is, so this stage never fails outright.
#[instrument(skip(raster, quad), fields(width = raster.width(), height = raster.height()))]
pub fn rectify(raster: RgbImage, quad: Option<Corners>) -> RgbImage {
    let Some(corners) = quad else {
        debug!("no page boundary detected; skipping rectification");
        return raster;
    };

    let ordered = order_corners(corners);
    let Some((projection, out_w, out_h)) = rectify_transform(ordered) else {
        warn!("degenerate page quadrilateral; returning raster unwarped");
        return raster;
    };

    let mut output = RgbImage::new(out_w, out_h);
    warp_into(
        &raster,
        &projection,
        Interpolation::Bilinear,
        Rgb([0u8, 0, 0]),
        &mut output,
    );

    debug!(out_w, out_h, "page rectified");
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    /// With no quadrilateral the input passes through bit-identically.
    #[test]
    fn not_found_passes_through_unchanged() {
        let img = RgbImage::from_pixel(120, 160, Rgb([80, 90, 100]));
        let original = img.clone();

        let out = rectify(img, None);

        assert_eq!(out.dimensions(), (120, 160));
        assert_eq!(out.as_raw(), original.as_raw());
    }

    /// A degenerate (collinear) quad also passes through unchanged.
    #[test]
    fn degenerate_quad_passes_through_unchanged() {
        let img = RgbImage::from_pixel(50, 50, Rgb([200, 200, 200]));
        let original = img.clone();

        let collinear = [(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)];
        let out = rectify(img, Some(collinear));

        assert_eq!(out.as_raw(), original.as_raw());
    }

    /// Rectifying an axis-aligned rectangle keeps its aspect ratio.
    #[test]
    fn axis_aligned_rectangle_keeps_aspect_ratio() {
        let mut img = RgbImage::from_pixel(400, 400, Rgb([20, 20, 20]));
        for y in 100..300 {
            for x in 50..350 {
                img.put_pixel(x, y, Rgb([240, 240, 240]));
            }
        }

        // The drawn rectangle: 300 wide, 200 tall (aspect 1.5).
        let quad = [(50.0, 100.0), (349.0, 100.0), (349.0, 299.0), (50.0, 299.0)];
        let out = rectify(img, Some(quad));

        let aspect = out.width() as f32 / out.height() as f32;
        assert!(
            (aspect - 1.5).abs() / 1.5 < 0.02,
            "aspect ratio {} outside tolerance",
            aspect
        );
    }
}
