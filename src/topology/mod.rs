pub mod quad_edge;

pub use quad_edge::{EdgeRef, EdgeStore};
