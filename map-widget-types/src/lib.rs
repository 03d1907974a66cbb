//! Small set of geometry primitives shared by the map widget crates.
//!
//! * [`geo`] contains points in geographic coordinates (latitude and longitude) and the Web
//!   Mercator projection that converts them into the map plane.
//! * [`cartesian`] contains points, vectors, sizes and rectangles in projected or screen space.

pub mod cartesian;
pub mod geo;
