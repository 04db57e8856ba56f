// SPDX-License-Identifier: MIT
//
// Paper region detector — finds the quadrilateral boundary of a document
// page inside a raw photograph.
//
// All geometric work happens on a fixed-height downscaled copy so the cost
// of masking and contour extraction is bounded regardless of input
// resolution. Accepted quadrilaterals are rescaled to the original raster's
// coordinate space before being returned.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};
use imageproc::contours::{BorderType, find_contours};
use imageproc::distance_transform::Norm;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::morphology::{close, open};
use imageproc::point::Point;
use scanwerk_core::config::DetectorParams;
use tracing::{debug, instrument};

use crate::geometry::Corners;

/// Detect the page boundary in a photographed frame.
///
/// Pipeline: downscale to `params.working_height` preserving aspect ratio,
/// build a paper-color mask in HSV space (low saturation, high brightness),
/// clean it with one morphological opening and one closing, take the
/// largest external contour, approximate it as a polygon at 2% of its
/// perimeter, and accept it only if it has exactly four vertices and
/// encloses more than `params.min_area_fraction` of the downscaled frame.
///
/// Returns `None` when no plausible page boundary is found. That is a
/// normal outcome, not an error: the rectifier treats it as "no cropping".
#[instrument(skip(raster, params), fields(width = raster.width(), height = raster.height()))]
pub fn detect_page(raster: &RgbImage, params: &DetectorParams) -> Option<Corners> {
    let (orig_w, orig_h) = raster.dimensions();
    if orig_w == 0 || orig_h == 0 {
        return None;
    }

    let ratio = params.working_height as f32 / orig_h as f32;
    let small_w = (orig_w as f32 * ratio) as u32;
    if small_w == 0 {
        return None;
    }

    let small = imageops::resize(raster, small_w, params.working_height, FilterType::Triangle);

    let mask = paper_mask(&small, params);
    let mask = open(&mask, Norm::LInf, params.morph_radius);
    let mask = close(&mask, Norm::LInf, params.morph_radius);

    let contours = find_contours::<i32>(&mask);
    let largest = contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && c.points.len() >= 3)
        .max_by(|a, b| {
            shoelace_area(&a.points)
                .partial_cmp(&shoelace_area(&b.points))
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

    let perimeter = arc_length(&largest.points, true);
    let approx = approximate_polygon_dp(
        &largest.points,
        params.approx_epsilon_fraction * perimeter,
        true,
    );
    debug!(
        contour_points = largest.points.len(),
        approx_vertices = approx.len(),
        "largest paper contour approximated"
    );

    if approx.len() != 4 {
        return None;
    }

    let area = shoelace_area(&approx);
    let frame_area = (small_w as f64) * (params.working_height as f64);
    if area <= params.min_area_fraction * frame_area {
        debug!(area, frame_area, "candidate quadrilateral too small");
        return None;
    }

    // Back to the original raster's coordinate space.
    let inverse = 1.0 / ratio;
    let corner = |p: &Point<i32>| (p.x as f32 * inverse, p.y as f32 * inverse);
    Some([
        corner(&approx[0]),
        corner(&approx[1]),
        corner(&approx[2]),
        corner(&approx[3]),
    ])
}

/// Binary mask selecting paper-colored pixels: low saturation, high
/// brightness. Saturation and value follow the usual HSV definitions on a
/// 0-255 scale; hue is unconstrained.
fn paper_mask(raster: &RgbImage, params: &DetectorParams) -> GrayImage {
    GrayImage::from_fn(raster.width(), raster.height(), |x, y| {
        let image::Rgb([r, g, b]) = *raster.get_pixel(x, y);
        let value = r.max(g).max(b);
        let min = r.min(g).min(b);
        let saturation = if value == 0 {
            0
        } else {
            ((value - min) as u32 * 255 / value as u32) as u8
        };
        if saturation <= params.saturation_max && value >= params.value_min {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Polygon area via the shoelace formula.
fn shoelace_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0f64;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x as f64 * points[j].y as f64;
        area -= points[j].x as f64 * points[i].y as f64;
    }
    area.abs() / 2.0
}
