//! Constraint-edge insertion with local re-triangulation.
//!
//! A pure Delaunay triangulation of the vertex pool does not respect the
//! path's boundary segments; every figure segment is therefore forced into
//! the mesh after construction. Triangulation edges crossing a constraint
//! are destroyed, the constraint edge is connected across the resulting
//! cavity, and both cavity halves are re-triangulated towards the Delaunay
//! optimum without ever flipping the constraint itself.

use super::Triangulation;
use crate::error::{Result, TessellationError};
use crate::topology::EdgeRef;

impl Triangulation {
    /// Forces the segment between pool vertices `start` and `end` to exist
    /// as a triangulation edge.
    ///
    /// # Errors
    ///
    /// `TriangleNotFound` when no face straddling the segment exists at a
    /// walk origin and `DegenerateFace` when a cavity is malformed; both
    /// indicate degenerate input contours and abort the tessellation.
    pub fn insert_constraint(&mut self, start: usize, end: usize) -> Result<()> {
        if start == end {
            return Ok(());
        }
        let Some(origin) = self.store.edge_at(start) else {
            return Err(TessellationError::TriangleNotFound.into());
        };
        self.insert_segment(origin, end)
    }

    /// Walks the fan of edges around `origin`'s origin vertex looking for
    /// the segment towards `end`: an existing edge completes immediately, a
    /// collinear overlapping edge restarts the walk from its far endpoint,
    /// and a straddled face triggers the cut-and-reconnect path.
    fn insert_segment(&mut self, origin: EdgeRef, end: usize) -> Result<()> {
        let start = self.store.origin(origin);
        let mut e = origin;
        loop {
            let dest = self.store.destination(e);
            if dest == end {
                return Ok(());
            }
            // Partially shared boundary: the edge runs along the constraint
            // segment, so the remainder starts at its far endpoint.
            if self.orient(start, end, dest) == 0.0 && self.strictly_between(start, end, dest) {
                return self.insert_segment(e.sym(), end);
            }

            let next = self.store.next_origin(e);
            let next_dest = self.store.destination(next);
            // The wedge between e and next straddles the segment when one
            // destination lies strictly right of start->end and the other
            // strictly left; the segment then leaves through the far edge
            // of the face between them.
            if self.orient(start, end, dest) < 0.0 && self.orient(start, end, next_dest) > 0.0 {
                let cross = self.store.next_left(e);
                let (last, stop) = self.cut_edges(cross, start, end)?;
                let new_edge = self.store.connect(last, e);
                self.fixup(new_edge)?;
                self.fixup(new_edge.sym())?;
                if stop == end {
                    return Ok(());
                }
                // Stopped at a vertex lying exactly on the segment; the
                // constraint continues from there.
                return self.insert_segment(new_edge, end);
            }

            e = next;
            if e == origin {
                return Err(TessellationError::TriangleNotFound.into());
            }
        }
    }

    /// Destroys every triangulation edge crossed by `start -> end`,
    /// beginning with `cross`, whose origin must lie strictly right of the
    /// segment and destination strictly left.
    ///
    /// Returns the surviving cavity edge whose destination is the stop
    /// vertex, together with that vertex: either `end` itself or an
    /// intermediate vertex lying exactly on the segment.
    fn cut_edges(&mut self, cross: EdgeRef, start: usize, end: usize) -> Result<(EdgeRef, usize)> {
        // The face on the far side of `cross` is (q, p, apex) with q left
        // and p right of the segment.
        let far = self.store.next_left(cross.sym());
        let apex = self.store.destination(far);

        let result = if apex == end || self.orient(start, end, apex) == 0.0 {
            (far, apex)
        } else if self.orient(start, end, apex) < 0.0 {
            // Apex right of the segment: exit through the (apex, q) edge.
            let next_cross = self.store.next_left(far);
            self.cut_edges(next_cross, start, end)?
        } else {
            // Apex left of the segment: exit through the (p, apex) edge.
            self.cut_edges(far, start, end)?
        };

        self.store.destroy_edge(cross);
        Ok(result)
    }

    /// Re-triangulates the polygonal face on the left of `base` by
    /// connecting its endpoints to the fan vertex with the maximal
    /// in-circle violation, then recursing into both sub-faces.
    fn fixup(&mut self, base: EdgeRef) -> Result<()> {
        let a = self.store.origin(base);
        let b = self.store.destination(base);

        let first = self.store.next_left(base);
        if first == base || self.store.next_left(first) == base {
            return Err(TessellationError::DegenerateFace.into());
        }

        // One pass over the fan: candidates are the chain edges whose
        // destination is not yet the base origin.
        let mut cand = first;
        let mut count = 1usize;
        let mut e = self.store.next_left(first);
        while self.store.destination(e) != a {
            if e == base {
                return Err(TessellationError::DegenerateFace.into());
            }
            if self.incircle(a, b, self.store.destination(cand), self.store.destination(e)) {
                cand = e;
            }
            count += 1;
            e = self.store.next_left(e);
        }
        if count <= 1 {
            // The face is already a triangle.
            return Ok(());
        }

        let apex_entry = self.store.next_left(cand);
        // Edge on the base face ending at the winning apex; the first
        // connect moves `cand` onto the split-off sub-face, so the new edge
        // takes over that role.
        let mut apex_edge = cand;
        if cand != first {
            // Close the triangle towards the base destination.
            let c = self.store.connect(base, apex_entry);
            self.fixup(c.sym())?;
            apex_edge = c;
        }
        if self.store.destination(apex_entry) != a {
            // Close the triangle towards the base origin.
            let c = self.store.connect(apex_edge, base);
            self.fixup(c.sym())?;
        }
        Ok(())
    }

    /// `true` if collinear vertex `d` lies strictly inside the closed
    /// segment between `start` and `end`.
    fn strictly_between(&self, start: usize, end: usize, d: usize) -> bool {
        let s = self.pool[start];
        let e = self.pool[end];
        let p = self.pool[d];
        if s.x == e.x {
            p.y > s.y.min(e.y) && p.y < s.y.max(e.y)
        } else {
            p.x > s.x.min(e.x) && p.x < s.x.max(e.x)
        }
    }
}
