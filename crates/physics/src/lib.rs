#![warn(missing_docs)]
//! Geometry primitives (AABB, rays, segment clipping).

mod aabb;
mod ray;

pub use aabb::Aabb;
pub use ray::{Ray, Segment};

/// Re-export so downstream crates agree on the vector type.
pub use glam::DVec3;
