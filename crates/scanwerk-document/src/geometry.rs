// SPDX-License-Identifier: MIT
//
// Geometry helpers — corner role assignment and the perspective-correcting
// projection for a detected page quadrilateral.

use imageproc::geometric_transformations::Projection;

/// Four corner points of a page boundary, in raster coordinates.
pub type Corners = [(f32, f32); 4];

/// Assign roles to four unordered corner points, returning them as
/// `[top-left, top-right, bottom-right, bottom-left]`.
///
/// Uses the sum/difference heuristic: the corner with the smallest x+y is
/// top-left, the largest x+y is bottom-right; the corner with the smallest
/// y-x is top-right, the largest y-x is bottom-left. Garbage in, garbage
/// out — a degenerate or non-convex input silently produces a degenerate
/// ordering. Idempotent on already-ordered input.
pub fn order_corners(corners: Corners) -> Corners {
    let by = |key: fn((f32, f32)) -> f32| {
        move |a: &(f32, f32), b: &(f32, f32)| {
            key(*a)
                .partial_cmp(&key(*b))
                .unwrap_or(std::cmp::Ordering::Equal)
        }
    };

    let sum = |p: (f32, f32)| p.0 + p.1;
    let diff = |p: (f32, f32)| p.1 - p.0;

    let top_left = corners.iter().copied().min_by(by(sum)).expect("four corners");
    let bottom_right = corners.iter().copied().max_by(by(sum)).expect("four corners");
    let top_right = corners.iter().copied().min_by(by(diff)).expect("four corners");
    let bottom_left = corners.iter().copied().max_by(by(diff)).expect("four corners");

    [top_left, top_right, bottom_right, bottom_left]
}

/// Compute the projection that maps an ordered quadrilateral onto an
/// axis-aligned rectangle, together with the rectangle's pixel dimensions.
///
/// The output width is the longer of the two horizontal edges, the output
/// height the longer of the two vertical edges, both floored and clamped to
/// at least 1 pixel. Returns `None` when the four points are collinear or
/// coincident and no valid projective transform exists; callers are expected
/// to fall back to the unwarped raster in that case.
pub fn rectify_transform(ordered: Corners) -> Option<(Projection, u32, u32)> {
    let [top_left, top_right, bottom_right, bottom_left] = ordered;

    let width = distance(bottom_right, bottom_left)
        .max(distance(top_right, top_left))
        .floor()
        .max(1.0) as u32;
    let height = distance(top_right, bottom_right)
        .max(distance(top_left, bottom_left))
        .floor()
        .max(1.0) as u32;

    let target: Corners = [
        (0.0, 0.0),
        (width as f32 - 1.0, 0.0),
        (width as f32 - 1.0, height as f32 - 1.0),
        (0.0, height as f32 - 1.0),
    ];

    Projection::from_control_points(ordered, target)
        .map(|projection| (projection, width, height))
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: Corners = [(10.0, 10.0), (90.0, 12.0), (88.0, 110.0), (8.0, 108.0)];

    /// Roles are assigned regardless of input permutation.
    #[test]
    fn order_corners_assigns_roles() {
        let shuffled = [QUAD[2], QUAD[0], QUAD[3], QUAD[1]];
        let ordered = order_corners(shuffled);

        assert_eq!(ordered[0], (10.0, 10.0)); // top-left
        assert_eq!(ordered[1], (90.0, 12.0)); // top-right
        assert_eq!(ordered[2], (88.0, 110.0)); // bottom-right
        assert_eq!(ordered[3], (8.0, 108.0)); // bottom-left
    }

    /// Reordering an already-ordered quad returns the same quad.
    #[test]
    fn order_corners_is_idempotent() {
        let once = order_corners(QUAD);
        let twice = order_corners(once);
        assert_eq!(once, twice);
    }

    /// An axis-aligned WxH rectangle maps to a WxH output within rounding.
    #[test]
    fn rectify_transform_identity_rectangle() {
        let rect: Corners = [(0.0, 0.0), (199.0, 0.0), (199.0, 99.0), (0.0, 99.0)];
        let (_, width, height) = rectify_transform(rect).expect("valid transform");
        assert_eq!(width, 199);
        assert_eq!(height, 99);
    }

    /// Collinear control points have no projective transform.
    #[test]
    fn rectify_transform_collinear_is_none() {
        let degenerate: Corners = [(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)];
        assert!(rectify_transform(order_corners(degenerate)).is_none());
    }

    /// Coincident points degrade to a 1x1 target and still report failure.
    #[test]
    fn rectify_transform_coincident_is_none() {
        let degenerate: Corners = [(5.0, 5.0); 4];
        assert!(rectify_transform(degenerate).is_none());
    }
}
