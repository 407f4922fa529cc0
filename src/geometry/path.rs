use super::{CubicBezier, Figure, FillRule, QuadraticBezier, VertexKind};
use crate::error::{PathError, Result};
use crate::math::Point2;
use crate::tessellation::{self, fill, Tessellation};

/// Folds `-0.0` to `+0.0` so bit-level vertex deduplication matches value
/// equality.
#[inline]
fn canon(p: Point2) -> Point2 {
    Point2::new(p.x + 0.0, p.y + 0.0)
}

/// A filled path geometry built through the path-sink command interface.
///
/// Commands arrive as `begin_figure` / `add_*` / `end_figure` groups, one
/// group per closed contour, terminated by [`close`](Self::close). Closing
/// runs the full pipeline (self-intersection resolution, bezier
/// resolution, constrained Delaunay triangulation, fill extraction) and
/// either stores the resulting [`Tessellation`] or leaves the geometry in
/// an error state with no partial output.
#[derive(Debug)]
pub struct PathGeometry {
    fill_rule: FillRule,
    figures: Vec<Figure>,
    figure_open: bool,
    closed: bool,
    tessellation: Option<Tessellation>,
}

impl PathGeometry {
    /// Creates an empty geometry with the given fill rule.
    #[must_use]
    pub fn new(fill_rule: FillRule) -> Self {
        Self {
            fill_rule,
            figures: Vec::new(),
            figure_open: false,
            closed: false,
            tessellation: None,
        }
    }

    /// The fill rule this geometry was created with.
    #[must_use]
    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    /// Starts a new figure at `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if the geometry is closed or a figure is open.
    pub fn begin_figure(&mut self, start: Point2) -> Result<()> {
        if self.closed {
            return Err(PathError::GeometryClosed.into());
        }
        if self.figure_open {
            return Err(PathError::FigureAlreadyStarted.into());
        }
        self.figures.push(Figure::new(canon(start)));
        self.figure_open = true;
        Ok(())
    }

    /// Appends a line segment from the current position to `point`.
    ///
    /// # Errors
    ///
    /// Returns an error if no figure is open.
    pub fn add_line(&mut self, point: Point2) -> Result<()> {
        let figure = self.open_figure()?;
        let last = figure.len() - 1;
        figure.set_kind(last, VertexKind::Line);
        figure.push_vertex(canon(point), VertexKind::None);
        Ok(())
    }

    /// Appends a run of line segments.
    ///
    /// # Errors
    ///
    /// Returns an error if no figure is open.
    pub fn add_lines(&mut self, points: &[Point2]) -> Result<()> {
        for &point in points {
            self.add_line(point)?;
        }
        Ok(())
    }

    /// Appends a run of quadratic bezier segments.
    ///
    /// # Errors
    ///
    /// Returns an error if no figure is open.
    pub fn add_quadratic_beziers(&mut self, segments: &[QuadraticBezier]) -> Result<()> {
        for segment in segments {
            let figure = self.open_figure()?;
            let last = figure.len() - 1;
            figure.set_kind(last, VertexKind::Bezier);
            figure.push_control(canon(segment.control));
            figure.push_vertex(canon(segment.end), VertexKind::None);
        }
        Ok(())
    }

    /// Appends a run of cubic bezier segments.
    ///
    /// Each cubic is approximated by a single quadratic with control point
    /// `(3*c1 + 3*c2 - p0 - p3) / 4`. This is a lossy legacy-compatible
    /// approximation, not a true cubic subdivision.
    ///
    /// # Errors
    ///
    /// Returns an error if no figure is open.
    pub fn add_beziers(&mut self, segments: &[CubicBezier]) -> Result<()> {
        for segment in segments {
            let figure = self.open_figure()?;
            let last = figure.len() - 1;
            let p0 = figure.vertices()[last].point;
            let control = Point2::new(
                (3.0 * (segment.control1.x + segment.control2.x) - p0.x - segment.end.x) / 4.0,
                (3.0 * (segment.control1.y + segment.control2.y) - p0.y - segment.end.y) / 4.0,
            );
            figure.set_kind(last, VertexKind::Bezier);
            figure.push_control(canon(control));
            figure.push_vertex(canon(segment.end), VertexKind::None);
        }
        Ok(())
    }

    /// Ends the open figure; the contour closes back to its start point.
    ///
    /// # Errors
    ///
    /// Returns an error if no figure is open.
    pub fn end_figure(&mut self) -> Result<()> {
        if self.closed {
            return Err(PathError::GeometryClosed.into());
        }
        if !self.figure_open {
            return Err(PathError::FigureNotStarted.into());
        }
        self.figure_open = false;
        Ok(())
    }

    /// Closes the geometry and tessellates it.
    ///
    /// On success the triangle mesh and bezier-correction mesh are
    /// available through [`tessellation`](Self::tessellation). On failure
    /// all partial output is discarded and the geometry stays in an error
    /// state.
    ///
    /// # Errors
    ///
    /// Returns an error if a figure is still open, if the geometry was
    /// already closed, or if tessellation fails on degenerate input.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(PathError::GeometryClosed.into());
        }
        if self.figure_open {
            return Err(PathError::FigureNotEnded.into());
        }
        self.closed = true;
        match tessellation::tessellate(&self.figures, self.fill_rule) {
            Ok(t) => {
                self.tessellation = Some(t);
                Ok(())
            }
            Err(e) => {
                self.tessellation = None;
                Err(e)
            }
        }
    }

    /// The tessellation produced by a successful [`close`](Self::close).
    #[must_use]
    pub fn tessellation(&self) -> Option<&Tessellation> {
        self.tessellation.as_ref()
    }

    /// Hit test against the filled interior, honoring the fill rule and the
    /// true curved boundary of bezier segments.
    ///
    /// Only meaningful after a successful close; returns `false` otherwise.
    #[must_use]
    pub fn point_inside(&self, point: Point2) -> bool {
        if self.tessellation.is_none() {
            return false;
        }
        fill::point_inside(&self.figures, self.fill_rule, point, true)
    }

    fn open_figure(&mut self) -> Result<&mut Figure> {
        if self.closed {
            return Err(PathError::GeometryClosed.into());
        }
        if !self.figure_open {
            return Err(PathError::FigureNotStarted.into());
        }
        let Some(figure) = self.figures.last_mut() else {
            return Err(PathError::FigureNotStarted.into());
        };
        Ok(figure)
    }
}

impl Default for PathGeometry {
    fn default() -> Self {
        Self::new(FillRule::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TrigonError;

    fn p(x: f32, y: f32) -> Point2 {
        Point2::new(x, y)
    }

    fn square() -> PathGeometry {
        let mut g = PathGeometry::new(FillRule::EvenOdd);
        g.begin_figure(p(0.0, 0.0)).unwrap();
        g.add_lines(&[p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]).unwrap();
        g.end_figure().unwrap();
        g.close().unwrap();
        g
    }

    // ── command sequencing ─────────────────────────────────────

    #[test]
    fn add_line_without_figure_fails() {
        let mut g = PathGeometry::default();
        assert!(matches!(
            g.add_line(p(1.0, 0.0)),
            Err(TrigonError::Path(PathError::FigureNotStarted))
        ));
    }

    #[test]
    fn begin_figure_twice_fails() {
        let mut g = PathGeometry::default();
        g.begin_figure(p(0.0, 0.0)).unwrap();
        assert!(matches!(
            g.begin_figure(p(1.0, 1.0)),
            Err(TrigonError::Path(PathError::FigureAlreadyStarted))
        ));
    }

    #[test]
    fn close_with_open_figure_fails() {
        let mut g = PathGeometry::default();
        g.begin_figure(p(0.0, 0.0)).unwrap();
        g.add_line(p(1.0, 0.0)).unwrap();
        assert!(matches!(
            g.close(),
            Err(TrigonError::Path(PathError::FigureNotEnded))
        ));
    }

    #[test]
    fn double_close_fails() {
        let mut g = square();
        assert!(matches!(
            g.close(),
            Err(TrigonError::Path(PathError::GeometryClosed))
        ));
    }

    #[test]
    fn commands_after_close_fail() {
        let mut g = square();
        assert!(g.begin_figure(p(5.0, 5.0)).is_err());
    }

    // ── queries ────────────────────────────────────────────────

    #[test]
    fn point_inside_after_close() {
        let g = square();
        assert!(g.point_inside(p(0.5, 0.5)));
        assert!(!g.point_inside(p(1.5, 0.5)));
    }

    #[test]
    fn point_inside_is_idempotent() {
        let g = square();
        let probe = p(0.25, 0.75);
        assert_eq!(g.point_inside(probe), g.point_inside(probe));
    }

    #[test]
    fn point_inside_before_close_is_false() {
        let mut g = PathGeometry::default();
        g.begin_figure(p(0.0, 0.0)).unwrap();
        g.add_lines(&[p(1.0, 0.0), p(0.0, 1.0)]).unwrap();
        g.end_figure().unwrap();
        assert!(!g.point_inside(p(0.25, 0.25)));
    }

    #[test]
    fn cubic_bezier_is_reduced_to_one_quadratic() {
        let mut g = PathGeometry::default();
        g.begin_figure(p(0.0, 0.0)).unwrap();
        g.add_beziers(&[CubicBezier {
            control1: p(0.0, 1.0),
            control2: p(1.0, 1.0),
            end: p(1.0, 0.0),
        }])
        .unwrap();
        g.end_figure().unwrap();
        let figure = &g.figures[0];
        assert_eq!(figure.controls().len(), 1);
        // (3*(0+1) - 0 - 1)/4 = 0.5, (3*(1+1) - 0 - 0)/4 = 1.5
        assert_eq!(figure.controls()[0], p(0.5, 1.5));
    }

    #[test]
    fn negative_zero_coordinates_are_canonicalized() {
        let mut g = PathGeometry::default();
        g.begin_figure(p(-0.0, 0.0)).unwrap();
        g.add_lines(&[p(1.0, -0.0), p(1.0, 1.0)]).unwrap();
        g.end_figure().unwrap();
        let v = g.figures[0].vertices();
        assert!(v[0].point.x.is_sign_positive());
        assert!(v[1].point.y.is_sign_positive());
    }
}
