//! Divide-and-conquer Delaunay construction over the quad-edge store.
//!
//! The vertex range is split at its midpoint, both halves are triangulated
//! recursively, and the halves are merged by finding the lower common
//! tangent of the two hulls and zipping upwards, keeping the merged region
//! Delaunay through in-circle candidate advancement.

use super::Triangulation;
use crate::topology::EdgeRef;

impl Triangulation {
    /// Triangulates `pool[first..first + count]`, which must be sorted and
    /// hold at least two vertices. Returns the counter-clockwise hull edge
    /// out of the leftmost vertex and the clockwise hull edge out of the
    /// rightmost vertex.
    pub(crate) fn delaunay(&mut self, first: usize, count: usize) -> (EdgeRef, EdgeRef) {
        debug_assert!(count >= 2);
        if count == 2 {
            let a = self.store.make_edge();
            self.store.set_origin(a, first);
            self.store.set_destination(a, first + 1);
            return (a, a.sym());
        }
        if count == 3 {
            let a = self.store.make_edge();
            let b = self.store.make_edge();
            self.store.splice(a.sym(), b);
            self.store.set_origin(a, first);
            self.store.set_destination(a, first + 1);
            self.store.set_origin(b, first + 1);
            self.store.set_destination(b, first + 2);

            let o = self.orient(first, first + 1, first + 2);
            if o > 0.0 {
                self.store.connect(b, a);
                return (a, b.sym());
            }
            if o < 0.0 {
                let c = self.store.connect(b, a);
                return (c.sym(), c);
            }
            // Exactly collinear: leave the two edges unclosed.
            return (a, b.sym());
        }

        let half = count / 2;
        let (ldo, ldi) = self.delaunay(first, half);
        let (rdi, rdo) = self.delaunay(first + half, count - half);
        self.merge(ldo, ldi, rdi, rdo)
    }

    /// Merges two hull-adjacent sub-triangulations along their common
    /// tangent.
    fn merge(
        &mut self,
        mut ldo: EdgeRef,
        mut ldi: EdgeRef,
        mut rdi: EdgeRef,
        mut rdo: EdgeRef,
    ) -> (EdgeRef, EdgeRef) {
        // Lower common tangent of the two hulls.
        loop {
            if self.left_of(self.store.origin(rdi), ldi) {
                ldi = self.store.next_left(ldi);
            } else if self.right_of(self.store.origin(ldi), rdi) {
                rdi = self.store.next_origin(rdi.sym());
            } else {
                break;
            }
        }
        let mut base = self.store.connect(rdi.sym(), ldi);
        if self.store.origin(ldi) == self.store.origin(ldo) {
            ldo = base.sym();
        }
        if self.store.origin(rdi) == self.store.origin(rdo) {
            rdo = base;
        }

        // Zip upwards. Each side advances its candidate, discarding edges
        // that fail the in-circle test against the next candidate, then the
        // side whose candidate keeps the triangulation Delaunay is
        // connected. When neither candidate is valid the hulls have merged.
        loop {
            let mut lcand = self.store.next_origin(base.sym());
            if self.valid(lcand, base) {
                while self.incircle(
                    self.store.destination(base),
                    self.store.origin(base),
                    self.store.destination(lcand),
                    self.store.destination(self.store.next_origin(lcand)),
                ) {
                    let next = self.store.next_origin(lcand);
                    self.store.destroy_edge(lcand);
                    lcand = next;
                }
            }
            let mut rcand = self.store.prev_origin(base);
            if self.valid(rcand, base) {
                while self.incircle(
                    self.store.destination(base),
                    self.store.origin(base),
                    self.store.destination(rcand),
                    self.store.destination(self.store.prev_origin(rcand)),
                ) {
                    let prev = self.store.prev_origin(rcand);
                    self.store.destroy_edge(rcand);
                    rcand = prev;
                }
            }

            let l_valid = self.valid(lcand, base);
            let r_valid = self.valid(rcand, base);
            if !l_valid && !r_valid {
                break;
            }
            if !l_valid
                || (r_valid
                    && self.incircle(
                        self.store.destination(lcand),
                        self.store.origin(lcand),
                        self.store.origin(rcand),
                        self.store.destination(rcand),
                    ))
            {
                base = self.store.connect(rcand, base.sym());
            } else {
                base = self.store.connect(base.sym(), lcand.sym());
            }
        }
        (ldo, rdo)
    }

    /// A candidate edge is usable while its destination lies above the base
    /// edge (strictly right of the right-to-left base).
    fn valid(&self, e: EdgeRef, base: EdgeRef) -> bool {
        self.right_of(self.store.destination(e), base)
    }
}
