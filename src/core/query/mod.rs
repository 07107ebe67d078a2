//! Read-side queries over the synchronized table

pub mod bounds;

pub use bounds::{BoundingBox, DEFAULT_RADIUS_METRES, MAX_RADIUS_METRES};
