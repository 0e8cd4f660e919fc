//! Borrowed views over the three body kinds, used to build pairs.

use super::ShapeKind;
use crate::body::{Polyhedron, Snapshot, Sphere, Wall};
use crate::geometry::Aabb;
use crate::material::Material;

/// Shared borrow of any body.
#[derive(Debug, Clone, Copy)]
pub enum BodyRef<'a> {
    Sphere(&'a Sphere),
    Polyhedron(&'a Polyhedron),
    Wall(&'a Wall),
}

/// Mutable borrow of a movable body, or a shared borrow of a wall.
#[derive(Debug)]
pub enum BodyMut<'a> {
    Sphere(&'a mut Sphere),
    Polyhedron(&'a mut Polyhedron),
    Wall(&'a Wall),
}

impl<'a> BodyRef<'a> {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Sphere(_) => ShapeKind::Sphere,
            Self::Polyhedron(_) => ShapeKind::Polyhedron,
            Self::Wall(_) => ShapeKind::Wall,
        }
    }

    pub fn material(&self) -> &'a Material {
        match *self {
            Self::Sphere(s) => s.material(),
            Self::Polyhedron(p) => p.material(),
            Self::Wall(w) => w.material(),
        }
    }

    /// Bounding box at `snapshot`; walls never move.
    pub fn aabb(&self, snapshot: Snapshot, dt: f64) -> Aabb {
        match self {
            Self::Sphere(s) => s.aabb(snapshot, dt),
            Self::Polyhedron(p) => p.aabb(snapshot, dt),
            Self::Wall(w) => w.aabb(),
        }
    }
}

impl BodyMut<'_> {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Sphere(_) => ShapeKind::Sphere,
            Self::Polyhedron(_) => ShapeKind::Polyhedron,
            Self::Wall(_) => ShapeKind::Wall,
        }
    }

    pub fn borrowed(&self) -> BodyRef<'_> {
        match self {
            Self::Sphere(s) => BodyRef::Sphere(s),
            Self::Polyhedron(p) => BodyRef::Polyhedron(p),
            Self::Wall(w) => BodyRef::Wall(w),
        }
    }
}
