//! # Collision Detection and Response
//!
//! Pairs of bodies are routed by their [`ShapeKind`] tags through an
//! exhaustive match (see `dispatcher.rs`). Each narrow-phase routine lives in
//! its own module, answers with an [`Intersection`] record and, when asked
//! to resolve, feeds a [`Contact`] to the shared impulse solver in
//! `response.rs`.

mod broad_phase;
mod dispatcher;
mod polyhedron_polyhedron;
mod polyhedron_wall;
mod primitives;
mod response;
mod sphere_polyhedron;
mod sphere_sphere;
mod sphere_triangle;

pub use broad_phase::may_touch;
pub use dispatcher::{CollisionPair, IntersectionPair, Route};
pub use polyhedron_polyhedron::{detect_polyhedron_polyhedron, resolve_polyhedron_polyhedron};
pub use polyhedron_wall::{detect_polyhedron_wall, resolve_polyhedron_wall};
pub use primitives::{BodyMut, BodyRef};
pub use response::{
    effective_inverse_mass, friction_impulse, resolve_contact, CollisionResponder,
    PolyhedronResponder, SphereResponder,
};
pub use sphere_polyhedron::{detect_sphere_polyhedron, resolve_sphere_polyhedron};
pub use sphere_sphere::{detect_sphere_sphere, resolve_sphere_sphere, restitution_speeds};
pub use sphere_triangle::{detect_sphere_wall, resolve_sphere_wall, sphere_triangle};

use serde::{Deserialize, Serialize};

use crate::inertia::DEFAULT_SLICES;
use crate::material::Material;
use crate::types::Vec3;

/// Shape tag used for routing. The declaration order is also the global
/// lock order across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Sphere,
    Polyhedron,
    Wall,
}

/// Overlap record returned by the narrow phase.
///
/// Normals always point from the second body of the routed pair toward the
/// first; the sphere comes first in sphere pairs and the wall comes last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    None,
    /// Normal is zero when the centres coincide.
    Spheres { normal: Vec3, depth: f64 },
    /// `point` is the closest point of the touched triangle.
    SpherePlane { point: Vec3, normal: Vec3, depth: f64 },
    /// `point` is the mean of all penetrating vertices, `vertex` the deepest.
    PolyhedronPlane {
        point: Vec3,
        vertex: Vec3,
        normal: Vec3,
        depth: f64,
    },
    /// Mean crossing point; normal and depth from the face axis of least
    /// overlap.
    Polyhedra { point: Vec3, normal: Vec3, depth: f64 },
}

impl Intersection {
    pub fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn depth(&self) -> f64 {
        match *self {
            Self::None => 0.0,
            Self::Spheres { depth, .. }
            | Self::SpherePlane { depth, .. }
            | Self::PolyhedronPlane { depth, .. }
            | Self::Polyhedra { depth, .. } => depth,
        }
    }
}

/// Contact information for the impulse solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Contact point in world space
    pub point: Vec3,
    /// Unit normal from the second body toward the first
    pub normal: Vec3,
    /// Penetration depth
    pub depth: f64,
    /// Mean of both restitution coefficients
    pub restitution: f64,
    /// Mean of both friction coefficients
    pub friction: f64,
}

impl Contact {
    pub fn new(point: Vec3, normal: Vec3, depth: f64, mat_a: &Material, mat_b: &Material) -> Self {
        let combined = mat_a.combine(mat_b);
        Self {
            point,
            normal,
            depth,
            friction: combined.friction,
            restitution: combined.restitution,
        }
    }
}

/// Per-step parameters every collision routine reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSettings {
    /// Step length used for predicted poses
    pub dt: f64,
    /// Slab count for moments of inertia
    pub inertia_slices: usize,
    /// Penetration below this is left alone
    pub position_slop: f64,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            dt: 0.01,
            inertia_slices: DEFAULT_SLICES,
            position_slop: 1e-4,
        }
    }
}
