pub mod constraint;
pub mod delaunay;

use crate::error::{Result, TessellationError};
use crate::math::predicates::{in_circle, orientation};
use crate::math::Point2;
use crate::topology::{EdgeRef, EdgeStore};

/// A Delaunay triangulation under construction: the quad-edge arena plus
/// the sorted, deduplicated vertex pool it references by index.
///
/// The whole structure is dropped when the owning tessellation run ends,
/// whether it succeeded or failed.
#[derive(Debug)]
pub struct Triangulation {
    pub(crate) store: EdgeStore,
    pub(crate) pool: Vec<Point2>,
    hull: Option<(EdgeRef, EdgeRef)>,
}

impl Triangulation {
    /// Builds the Delaunay triangulation of `pool` by divide and conquer.
    ///
    /// The pool must be sorted ascending by (x, then y) and contain no
    /// duplicate points.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientVertices` for fewer than two vertices.
    pub fn build(pool: Vec<Point2>) -> Result<Self> {
        if pool.len() < 2 {
            return Err(TessellationError::InsufficientVertices.into());
        }
        let count = pool.len();
        let mut tri = Self {
            store: EdgeStore::new(),
            pool,
            hull: None,
        };
        tri.hull = Some(tri.delaunay(0, count));
        Ok(tri)
    }

    /// The vertex pool this triangulation references.
    #[must_use]
    pub fn pool(&self) -> &[Point2] {
        &self.pool
    }

    /// The quad-edge arena.
    #[must_use]
    pub fn store(&self) -> &EdgeStore {
        &self.store
    }

    /// The two hull edges: counter-clockwise from the leftmost vertex and
    /// clockwise from the rightmost.
    #[must_use]
    pub fn hull(&self) -> Option<(EdgeRef, EdgeRef)> {
        self.hull
    }

    /// Consumes the triangulation, returning the vertex pool.
    #[must_use]
    pub fn into_pool(self) -> Vec<Point2> {
        self.pool
    }

    /// `true` if an edge between pool vertices `a` and `b` exists.
    #[must_use]
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        let Some(start) = self.store.edge_at(a) else {
            return false;
        };
        let mut e = start;
        loop {
            if self.store.destination(e) == b {
                return true;
            }
            e = self.store.next_origin(e);
            if e == start {
                return false;
            }
        }
    }

    pub(crate) fn orient(&self, a: usize, b: usize, c: usize) -> f64 {
        orientation(self.pool[a], self.pool[b], self.pool[c])
    }

    /// `true` if `d` lies strictly inside the circumcircle of the CCW
    /// triangle `(a, b, c)`.
    pub(crate) fn incircle(&self, a: usize, b: usize, c: usize, d: usize) -> bool {
        in_circle(self.pool[a], self.pool[b], self.pool[c], self.pool[d]) > 0.0
    }

    /// `true` if vertex `p` is strictly left of the directed edge `e`.
    pub(crate) fn left_of(&self, p: usize, e: EdgeRef) -> bool {
        self.orient(self.store.origin(e), self.store.destination(e), p) > 0.0
    }

    /// `true` if vertex `p` is strictly right of the directed edge `e`.
    pub(crate) fn right_of(&self, p: usize, e: EdgeRef) -> bool {
        self.orient(self.store.destination(e), self.store.origin(e), p) > 0.0
    }
}
