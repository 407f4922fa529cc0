use super::fill::point_inside;
use super::BezierVertex;
use crate::geometry::{Figure, FillRule, VertexKind};
use crate::math::intersect_2d::{segment_boxes_overlap, segment_segment_intersect};
use crate::math::{Point2, TOLERANCE};

/// A crossing between two figure segments, recorded once per side that is
/// strictly interior to the crossing. Transient: consumed by the splice
/// pass and discarded.
#[derive(Debug, Clone)]
struct Intersection {
    figure: usize,
    segment: usize,
    t: f32,
    point: Point2,
}

/// Finds every crossing between non-adjacent segments across all figures
/// (including a figure against itself) and splices the crossing points into
/// the contours as new line vertices.
///
/// The sweep is the naive all-pairs test with a bounding-box reject;
/// records are sorted by (figure, segment, parameter) before insertion so
/// the per-figure index shifts stay monotonic. Path vertex counts are small
/// enough that the quadratic cost does not matter.
pub(crate) fn intersect_self(figures: &mut [Figure]) {
    let mut records: Vec<Intersection> = Vec::new();

    for fa in 0..figures.len() {
        let na = figures[fa].len();
        for sa in 0..na {
            // Remaining segments of the same figure, skipping neighbours
            // (adjacent segments always share an endpoint, cyclically so
            // for the first and last).
            for sb in (sa + 2)..na {
                if sa == 0 && sb == na - 1 {
                    continue;
                }
                record_crossing(figures, fa, sa, fa, sb, &mut records);
            }
            // Every segment of every later figure.
            for fb in (fa + 1)..figures.len() {
                for sb in 0..figures[fb].len() {
                    record_crossing(figures, fa, sa, fb, sb, &mut records);
                }
            }
        }
    }

    records.sort_by(|a, b| {
        a.figure
            .cmp(&b.figure)
            .then(a.segment.cmp(&b.segment))
            .then(a.t.total_cmp(&b.t))
    });

    // Splice in order; every insertion shifts the later indices of the same
    // figure by one.
    let mut inserted = vec![0usize; figures.len()];
    for r in &records {
        let at = r.segment + 1 + inserted[r.figure];
        figures[r.figure].insert_vertex(at, r.point, VertexKind::Line);
        inserted[r.figure] += 1;
    }
}

/// Tests one segment pair and records the crossing for each side on which
/// it falls strictly inside the open parameter range.
fn record_crossing(
    figures: &[Figure],
    fa: usize,
    sa: usize,
    fb: usize,
    sb: usize,
    records: &mut Vec<Intersection>,
) {
    let (a0, a1) = figures[fa].segment(sa);
    let (b0, b1) = figures[fb].segment(sb);
    if !segment_boxes_overlap(a0, a1, b0, b1) {
        return;
    }
    let Some((point, t, u)) = segment_segment_intersect(a0, a1, b0, b1) else {
        return;
    };
    let eps = TOLERANCE;
    if t > eps && t < 1.0 - eps {
        records.push(Intersection {
            figure: fa,
            segment: sa,
            t,
            point,
        });
    }
    if u > eps && u < 1.0 - eps {
        records.push(Intersection {
            figure: fb,
            segment: sb,
            t: u,
            point,
        });
    }
}

/// Resolves every bezier-tagged vertex: decides which side of its chord is
/// filled, splices the control point in as a real vertex when it lies
/// inside the fill (keeping the straight-edge triangulation conservative),
/// and emits the three correction-mesh vertices for the arc.
///
/// Figures mutated by earlier arcs are visible to the side tests of later
/// ones; the traversal order is part of the output contract.
pub(crate) fn resolve_beziers(figures: &mut [Figure], fill_rule: FillRule) -> Vec<BezierVertex> {
    let mut out = Vec::new();
    for f in 0..figures.len() {
        let mut control = 0usize;
        let mut i = 0usize;
        while i < figures[f].len() {
            if figures[f].vertices()[i].kind != VertexKind::Bezier {
                i += 1;
                continue;
            }
            let Some(&c) = figures[f].controls().get(control) else {
                break;
            };
            let n = figures[f].len();
            let p0 = figures[f].vertices()[i].point;
            let p1 = figures[f].vertices()[(i + 1) % n].point;

            let inside = point_inside(figures, fill_rule, c, false);
            let sign = if inside { -1.0 } else { 1.0 };
            out.push(BezierVertex {
                position: p0,
                u: 0.0,
                v: 0.0,
                sign,
            });
            out.push(BezierVertex {
                position: c,
                u: 0.5,
                v: 0.0,
                sign,
            });
            out.push(BezierVertex {
                position: p1,
                u: 1.0,
                v: 1.0,
                sign,
            });

            if inside {
                figures[f].insert_vertex(i + 1, c, VertexKind::Line);
                i += 1;
            }
            control += 1;
            i += 1;
        }
    }
    out
}
