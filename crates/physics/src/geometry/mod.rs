//! # Geometric Primitives
//!
//! Pure values and predicates: lines, planes, segments, triangles,
//! axis-aligned boxes, planar cross-sections and tetrahedra. Every
//! equality/containment predicate tolerates [`crate::types::EPSILON`].

mod aabb;
mod cross_section;
mod line;
mod segment;
mod tetrahedron;
mod triangle;

pub use aabb::Aabb;
pub use cross_section::CrossSection;
pub use line::{Line, Plane};
pub use segment::Segment;
pub use tetrahedron::Tetrahedron;
pub use triangle::Triangle;
