use thiserror::Error;

/// Top-level error type for the trigon tessellation kernel.
#[derive(Debug, Error)]
pub enum TrigonError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Errors related to path-sink command sequencing.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("no figure has been started")]
    FigureNotStarted,

    #[error("a figure is already open")]
    FigureAlreadyStarted,

    #[error("a figure is still open")]
    FigureNotEnded,

    #[error("geometry has already been closed")]
    GeometryClosed,
}

/// Errors related to tessellation.
///
/// `TriangleNotFound` and `DegenerateFace` are hard failures: they indicate
/// either malformed input geometry (coincident or backtracking contours) or
/// an internal predicate bug, and abort tessellation of the whole geometry.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("no triangle straddling the constraint segment was found")]
    TriangleNotFound,

    #[error("degenerate face in triangulation")]
    DegenerateFace,

    #[error("not enough distinct vertices to triangulate")]
    InsufficientVertices,
}

/// Convenience type alias for results using [`TrigonError`].
pub type Result<T> = std::result::Result<T, TrigonError>;
