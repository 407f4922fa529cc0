pub mod fill;
pub mod preprocess;

use crate::error::Result;
use crate::geometry::{Figure, FillRule};
use crate::math::Point2;
use crate::triangulation::Triangulation;

/// A vertex of the bezier-correction mesh.
///
/// The `(u, v)` texture coordinates parametrize the quadratic arc for the
/// fragment-level implicit-curve test (`u^2 - v`), and `sign` tells which
/// side of the chord is filled: `-1.0` when the control point lies inside
/// the fill (concave bulge), `+1.0` otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierVertex {
    pub position: Point2,
    pub u: f32,
    pub v: f32,
    pub sign: f32,
}

/// GPU-ready output of one tessellation run.
#[derive(Debug, Clone, Default)]
pub struct Tessellation {
    /// The deduplicated, lexicographically sorted vertex pool.
    pub vertices: Vec<Point2>,
    /// Counter-clockwise interior triangles as index triples into
    /// `vertices`.
    pub faces: Vec<[u32; 3]>,
    /// Bezier correction triangles, three vertices per arc, consumed as a
    /// plain (un-indexed) triangle list.
    pub bezier_vertices: Vec<BezierVertex>,
}

/// Runs the full pipeline over a geometry's figures: self-intersection
/// resolution, bezier resolution, vertex-pool construction, constrained
/// Delaunay triangulation, and fill extraction.
///
/// All-or-nothing: on failure every intermediate structure is dropped and
/// no partial output is returned.
///
/// # Errors
///
/// Propagates the topological hard failures from constraint insertion;
/// degenerate inputs that still triangulate cleanly produce an empty face
/// list instead of an error.
pub(crate) fn tessellate(figures: &[Figure], fill_rule: FillRule) -> Result<Tessellation> {
    let mut work = figures.to_vec();
    preprocess::intersect_self(&mut work);
    let bezier_vertices = preprocess::resolve_beziers(&mut work, fill_rule);

    let pool = build_pool(&work);
    if pool.len() < 2 {
        // Nothing to triangulate; a clean empty mesh, not an error.
        return Ok(Tessellation {
            vertices: pool,
            faces: Vec::new(),
            bezier_vertices,
        });
    }

    let mut tri = Triangulation::build(pool)?;
    insert_figure_constraints(&mut tri, &work)?;
    let faces = fill::generate_faces(&mut tri, &work, fill_rule);

    Ok(Tessellation {
        vertices: tri.into_pool(),
        faces,
        bezier_vertices,
    })
}

/// Builds the global vertex pool: every distinct figure vertex, sorted
/// ascending by (x, then y), bit-equal duplicates collapsed.
fn build_pool(figures: &[Figure]) -> Vec<Point2> {
    let mut pool: Vec<Point2> = figures
        .iter()
        .flat_map(|f| f.vertices().iter().map(|v| v.point))
        .collect();
    pool.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pool.dedup_by(|a, b| a.x.to_bits() == b.x.to_bits() && a.y.to_bits() == b.y.to_bits());
    pool
}

/// Index of `p` in the sorted pool.
fn pool_index(pool: &[Point2], p: Point2) -> Option<usize> {
    pool.binary_search_by(|q| q.x.total_cmp(&p.x).then(q.y.total_cmp(&p.y)))
        .ok()
}

/// Forces every figure boundary segment into the triangulation.
fn insert_figure_constraints(tri: &mut Triangulation, figures: &[Figure]) -> Result<()> {
    for figure in figures {
        if figure.len() < 2 {
            continue;
        }
        for i in 0..figure.len() {
            let (s, e) = figure.segment(i);
            let (Some(si), Some(ei)) = (pool_index(tri.pool(), s), pool_index(tri.pool(), e))
            else {
                continue;
            };
            tri.insert_constraint(si, ei)?;
        }
    }
    Ok(())
}
