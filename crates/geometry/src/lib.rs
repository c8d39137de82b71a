//! Geometry kernel: the mesh and line primitives the chart is built from.
//!
//! Buffers follow the conventions of common scene-graph libraries: triangles
//! wind counter-clockwise when seen from outside, indexed meshes can be
//! expanded into one vertex per triangle corner, and normals are either
//! smoothed over shared vertices or flat per face.
//!
//! # Invariants
//! - A `GeometryId` names exactly one geometry allocation; rebuilt geometry
//!   always receives a fresh id.
//! - Rays carry a normalized direction, so hit distances are world units.

mod id;
mod lines;
mod mesh;
mod ray;

pub use id::GeometryId;
pub use lines::LineSegments;
pub use mesh::{MeshData, box_geometry};
pub use ray::{Aabb, MeshHit, Ray, intersect_triangle};

pub fn crate_info() -> &'static str {
    "peakbars-geometry v0.1.0"
}
