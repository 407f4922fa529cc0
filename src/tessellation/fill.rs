use crate::geometry::{Figure, FillRule, VertexKind};
use crate::math::predicates::orientation;
use crate::math::Point2;
use crate::triangulation::Triangulation;

/// Point-in-fill test by horizontal-ray crossing count.
///
/// Casts a ray from `probe` towards +x and accumulates signed boundary
/// crossings per figure (bounding-box rejected), then applies the fill
/// rule. With `curves` enabled, bezier segments are tested against the true
/// quadratic arc; otherwise every segment counts as its chord, which is the
/// form the triangulation probes rely on.
pub(crate) fn point_inside(
    figures: &[Figure],
    fill_rule: FillRule,
    probe: Point2,
    curves: bool,
) -> bool {
    let mut winding = 0i32;
    for figure in figures {
        if figure.len() < 2 || !figure.bounds().may_cross_ray(probe) {
            continue;
        }
        for i in 0..figure.len() {
            let (p0, p1) = figure.segment(i);
            if curves && figure.vertices()[i].kind == VertexKind::Bezier {
                if let Some(c) = control_of(figure, i) {
                    winding += quadratic_crossings(p0, c, p1, probe);
                    continue;
                }
            }
            winding += line_crossing(p0, p1, probe);
        }
    }
    match fill_rule {
        FillRule::EvenOdd => winding % 2 != 0,
        FillRule::NonZero => winding != 0,
    }
}

/// Extracts the interior triangles of the constrained triangulation.
///
/// Every live edge is visited once per primal rotation; each unvisited
/// triangular face is walked with its rotations marked in the per-edge
/// visited bitmask, so the two faces of an edge are processed exactly once
/// each and non-triangular (outer) faces are skipped. A face is kept when
/// it is correctly wound (third vertex strictly left of the base edge) and
/// its representative probe point lies inside the fill.
pub(crate) fn generate_faces(
    tri: &mut Triangulation,
    figures: &[Figure],
    fill_rule: FillRule,
) -> Vec<[u32; 3]> {
    let mut faces = Vec::new();
    let refs: Vec<_> = tri.store.primal_refs().collect();
    for base in refs {
        if tri.store.is_visited(base) {
            continue;
        }
        let mut verts = [0usize; 3];
        let mut count = 0usize;
        let mut e = base;
        loop {
            tri.store.mark_visited(e);
            if count < 3 {
                verts[count] = tri.store.origin(e);
            }
            count += 1;
            e = tri.store.next_left(e);
            if e == base {
                break;
            }
        }
        if count != 3 {
            continue;
        }

        let p0 = tri.pool[verts[0]];
        let p1 = tri.pool[verts[1]];
        let p2 = tri.pool[verts[2]];
        if orientation(p0, p1, p2) <= 0.0 {
            continue;
        }

        // Power-of-two weights keep the probe coordinates exact in the
        // common case, unlike the 1/3-weighted centroid.
        let probe = Point2::new(
            0.25 * p0.x + 0.25 * p1.x + 0.5 * p2.x,
            0.25 * p0.y + 0.25 * p1.y + 0.5 * p2.y,
        );
        if point_inside(figures, fill_rule, probe, false) {
            #[allow(clippy::cast_possible_truncation)]
            faces.push([verts[0] as u32, verts[1] as u32, verts[2] as u32]);
        }
    }
    faces
}

/// Control point belonging to the bezier segment starting at vertex `i`.
fn control_of(figure: &Figure, i: usize) -> Option<Point2> {
    let rank = figure.vertices()[..i]
        .iter()
        .filter(|v| v.kind == VertexKind::Bezier)
        .count();
    figure.controls().get(rank).copied()
}

/// Signed crossing of the +x ray from `probe` with the segment `p0 -> p1`.
fn line_crossing(p0: Point2, p1: Point2, probe: Point2) -> i32 {
    if (p0.y <= probe.y) == (p1.y <= probe.y) {
        return 0;
    }
    let t = (probe.y - p0.y) / (p1.y - p0.y);
    let x = p0.x + t * (p1.x - p0.x);
    if x > probe.x {
        if p1.y > p0.y {
            1
        } else {
            -1
        }
    } else {
        0
    }
}

/// Signed crossings of the +x ray from `probe` with the quadratic arc
/// `(p0, c, p1)`, by solving `y(t) = probe.y` on the half-open `[0, 1)`.
fn quadratic_crossings(p0: Point2, c: Point2, p1: Point2, probe: Point2) -> i32 {
    let a = f64::from(p0.y) - 2.0 * f64::from(c.y) + f64::from(p1.y);
    let b = 2.0 * (f64::from(c.y) - f64::from(p0.y));
    let q = f64::from(p0.y) - f64::from(probe.y);

    let mut winding = 0i32;
    let mut visit = |t: f64| {
        if (0.0..1.0).contains(&t) {
            let mt = 1.0 - t;
            let x = mt * mt * f64::from(p0.x)
                + 2.0 * t * mt * f64::from(c.x)
                + t * t * f64::from(p1.x);
            if x > f64::from(probe.x) {
                let dy = 2.0 * a * t + b;
                if dy > 0.0 {
                    winding += 1;
                } else if dy < 0.0 {
                    winding -= 1;
                }
            }
        }
    };

    if a == 0.0 {
        // Degenerate arc: linear in t.
        if b != 0.0 {
            visit(-q / b);
        }
    } else {
        let disc = b * b - 4.0 * a * q;
        if disc > 0.0 {
            let root = disc.sqrt();
            visit((-b - root) / (2.0 * a));
            visit((-b + root) / (2.0 * a));
        }
    }
    winding
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point2 {
        Point2::new(x, y)
    }

    fn closed_figure(points: &[(f32, f32)]) -> Figure {
        let mut f = Figure::new(p(points[0].0, points[0].1));
        f.set_kind(0, VertexKind::Line);
        for &(x, y) in &points[1..] {
            f.push_vertex(p(x, y), VertexKind::Line);
        }
        f
    }

    #[test]
    fn square_interior_and_exterior() {
        let figures = vec![closed_figure(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 2.0),
            (0.0, 2.0),
        ])];
        assert!(point_inside(&figures, FillRule::EvenOdd, p(1.0, 1.0), false));
        assert!(!point_inside(&figures, FillRule::EvenOdd, p(3.0, 1.0), false));
        assert!(!point_inside(&figures, FillRule::EvenOdd, p(1.0, 3.0), false));
    }

    #[test]
    fn winding_direction_does_not_matter_for_even_odd() {
        let ccw = vec![closed_figure(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 2.0),
            (0.0, 2.0),
        ])];
        let cw = vec![closed_figure(&[
            (0.0, 0.0),
            (0.0, 2.0),
            (2.0, 2.0),
            (2.0, 0.0),
        ])];
        for figures in [&ccw, &cw] {
            assert!(point_inside(figures, FillRule::EvenOdd, p(1.0, 1.0), false));
            assert!(point_inside(figures, FillRule::NonZero, p(1.0, 1.0), false));
        }
    }

    #[test]
    fn opposite_windings_cancel_under_non_zero() {
        // Outer CCW square with a CW inner square: a true hole under both
        // rules.
        let figures = vec![
            closed_figure(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]),
            closed_figure(&[(1.0, 1.0), (1.0, 3.0), (3.0, 3.0), (3.0, 1.0)]),
        ];
        assert!(!point_inside(&figures, FillRule::NonZero, p(2.0, 2.0), false));
        assert!(!point_inside(&figures, FillRule::EvenOdd, p(2.0, 2.0), false));
        assert!(point_inside(&figures, FillRule::NonZero, p(0.5, 2.0), false));
    }

    #[test]
    fn same_windings_diverge_between_rules() {
        let figures = vec![
            closed_figure(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]),
            closed_figure(&[(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)]),
        ];
        assert!(point_inside(&figures, FillRule::NonZero, p(2.0, 2.0), false));
        assert!(!point_inside(&figures, FillRule::EvenOdd, p(2.0, 2.0), false));
    }

    #[test]
    fn curved_boundary_differs_from_chord() {
        // Square whose right edge bulges outward as a quadratic arc.
        let mut f = closed_figure(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        f.set_kind(1, VertexKind::Bezier);
        f.push_control(p(3.0, 1.0));
        let figures = vec![f];
        // Between the chord x=2 and the arc: inside only when the real
        // curve is honored.
        let bulge_probe = p(2.2, 1.0);
        assert!(point_inside(&figures, FillRule::EvenOdd, bulge_probe, true));
        assert!(!point_inside(&figures, FillRule::EvenOdd, bulge_probe, false));
        // Deep interior is inside either way.
        assert!(point_inside(&figures, FillRule::EvenOdd, p(1.0, 1.0), true));
        assert!(!point_inside(&figures, FillRule::EvenOdd, p(3.5, 1.0), true));
    }
}
