use super::{Point2, Vector2, TOLERANCE};

/// Bounded segment-segment intersection.
///
/// Solves the 2x2 parametric system by Cramer's rule. Returns
/// `(intersection_point, t, u)` where `t` parametrizes `a0 -> a1` and `u`
/// parametrizes `b0 -> b1`, both in `[0, 1]`. Parallel (or near-parallel)
/// segments report no intersection.
#[must_use]
pub fn segment_segment_intersect(
    a0: Point2,
    a1: Point2,
    b0: Point2,
    b1: Point2,
) -> Option<(Point2, f32, f32)> {
    let da = Vector2::new(a1.x - a0.x, a1.y - a0.y);
    let db = Vector2::new(b1.x - b0.x, b1.y - b0.y);

    let cross = da.x * db.y - da.y * db.x;
    if cross.abs() < TOLERANCE {
        return None;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;
    let t = (dx * db.y - dy * db.x) / cross;
    let u = (dx * da.y - dy * da.x) / cross;

    // Use a small epsilon to include endpoints.
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t_clamped = t.clamp(0.0, 1.0);
        let pt = Point2::new(a0.x + da.x * t_clamped, a0.y + da.y * t_clamped);
        Some((pt, t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Conservative overlap test of two axis-aligned segment bounding boxes.
#[inline]
#[must_use]
pub fn segment_boxes_overlap(a0: Point2, a1: Point2, b0: Point2, b1: Point2) -> bool {
    a0.x.min(a1.x) <= b0.x.max(b1.x)
        && b0.x.min(b1.x) <= a0.x.max(a1.x)
        && a0.y.min(a1.y) <= b0.y.max(b1.y)
        && b0.y.min(b1.y) <= a0.y.max(a1.y)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn segments_crossing_at_center() {
        let (pt, t, u) =
            segment_segment_intersect(p(0.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(2.0, 0.0))
                .unwrap();
        assert!((pt.x - 1.0).abs() < TOLERANCE);
        assert!((pt.y - 1.0).abs() < TOLERANCE);
        assert!((t - 0.5).abs() < TOLERANCE);
        assert!((u - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        assert!(
            segment_segment_intersect(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0))
                .is_none()
        );
    }

    #[test]
    fn disjoint_segments_on_crossing_lines() {
        // The supporting lines cross, the segments themselves do not.
        assert!(
            segment_segment_intersect(p(0.0, 0.0), p(1.0, 0.0), p(3.0, -1.0), p(3.0, 1.0))
                .is_none()
        );
    }

    #[test]
    fn endpoint_touch_is_reported() {
        let (pt, t, u) =
            segment_segment_intersect(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 0.0), p(1.0, 1.0))
                .unwrap();
        assert!((pt.x - 1.0).abs() < TOLERANCE);
        assert!(pt.y.abs() < TOLERANCE);
        assert!((t - 1.0).abs() < TOLERANCE);
        assert!(u.abs() < TOLERANCE);
    }

    #[test]
    fn boxes_overlap_reject() {
        assert!(segment_boxes_overlap(
            p(0.0, 0.0),
            p(1.0, 1.0),
            p(0.5, 0.5),
            p(2.0, 2.0)
        ));
        assert!(!segment_boxes_overlap(
            p(0.0, 0.0),
            p(1.0, 1.0),
            p(2.0, 2.0),
            p(3.0, 3.0)
        ));
    }
}
