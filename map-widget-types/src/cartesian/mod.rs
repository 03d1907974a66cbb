//! Points, vectors and extents in a flat coordinate space (projected map units or pixels).

mod rect;
mod size;

pub use rect::Rect;
pub use size::Size;

/// Point in a 2d cartesian space.
pub type Point2d = nalgebra::Point2<f64>;

/// Vector in a 2d cartesian space.
pub type Vector2d = nalgebra::Vector2<f64>;
