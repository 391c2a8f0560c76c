//! Geometry utilities for boundary-layer remeshing.
//!
//! Points are plain `[f64; 3]` arrays. [`vector`] holds the small amount of
//! linear algebra the registry needs for interpolation; [`quality`] evaluates
//! signed cell volumes used to detect and repair inverted elements.

pub mod quality;
pub mod vector;

pub use vector::Point3;
