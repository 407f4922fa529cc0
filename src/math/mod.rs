pub mod expansion;
pub mod intersect_2d;
pub mod predicates;

/// 2D point type. Path coordinates are single-precision floats.
pub type Point2 = nalgebra::Point2<f32>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f32>;

/// Geometric tolerance for the inexact parametric intersection helpers.
///
/// The adaptive-precision predicates in [`predicates`] do not use it.
pub const TOLERANCE: f32 = 1e-6;
