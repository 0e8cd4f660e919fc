//! Pair construction and routing
//!
//! The routing table is an exhaustive match over both bodies' kinds, so a
//! missing combination is a compile error rather than a lookup miss.
//! (A, B) and (B, A) land on the same routine with the bodies in canonical
//! order: spheres first, walls last.

use super::polyhedron_polyhedron::{detect_polyhedron_polyhedron, resolve_polyhedron_polyhedron, separate_polyhedra};
use super::polyhedron_wall::{detect_polyhedron_wall, resolve_polyhedron_wall, separate_polyhedron_wall};
use super::sphere_polyhedron::{detect_sphere_polyhedron, resolve_sphere_polyhedron, separate_sphere_polyhedron};
use super::sphere_sphere::{detect_sphere_sphere, resolve_sphere_sphere, separate_spheres};
use super::sphere_triangle::{detect_sphere_wall, resolve_sphere_wall, separate_sphere_wall};
use super::{BodyMut, BodyRef, ContactSettings, Intersection, ShapeKind};
use crate::body::{Kinematics, Polyhedron, Snapshot, Sphere, Wall};
use crate::error::{PhysicsError, PhysicsResult};

/// Narrow-phase routine a pair is handled by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SphereSphere,
    SphereWall,
    SpherePolyhedron,
    PolyhedronPolyhedron,
    PolyhedronWall,
}

fn impossible(first: ShapeKind, second: ShapeKind) -> PhysicsError {
    PhysicsError::ImpossiblePair { first, second }
}

#[derive(Debug, Clone, Copy)]
enum Shared<'a> {
    SphereSphere(&'a Sphere, &'a Sphere),
    SphereWall(&'a Sphere, &'a Wall),
    SpherePolyhedron(&'a Sphere, &'a Polyhedron),
    PolyhedronPolyhedron(&'a Polyhedron, &'a Polyhedron),
    PolyhedronWall(&'a Polyhedron, &'a Wall),
}

impl<'a> Shared<'a> {
    fn route(&self) -> Route {
        match self {
            Self::SphereSphere(..) => Route::SphereSphere,
            Self::SphereWall(..) => Route::SphereWall,
            Self::SpherePolyhedron(..) => Route::SpherePolyhedron,
            Self::PolyhedronPolyhedron(..) => Route::PolyhedronPolyhedron,
            Self::PolyhedronWall(..) => Route::PolyhedronWall,
        }
    }

    fn intersection(&self, snapshot: Snapshot, dt: f64) -> Intersection {
        match *self {
            Self::SphereSphere(a, b) => detect_sphere_sphere(a, b, snapshot, dt),
            Self::SphereWall(s, w) => detect_sphere_wall(s, w, snapshot, dt),
            Self::SpherePolyhedron(s, p) => detect_sphere_polyhedron(s, p, snapshot, dt),
            Self::PolyhedronPolyhedron(a, b) => detect_polyhedron_polyhedron(a, b, snapshot, dt),
            Self::PolyhedronWall(p, w) => detect_polyhedron_wall(p, w, snapshot, dt),
        }
    }
}

/// Read-only pair used to ask whether two bodies overlap.
#[derive(Debug, Clone, Copy)]
pub struct IntersectionPair<'a> {
    shapes: Shared<'a>,
}

impl<'a> IntersectionPair<'a> {
    /// Fails with [`PhysicsError::ImpossiblePair`] for two walls.
    pub fn new(first: BodyRef<'a>, second: BodyRef<'a>) -> PhysicsResult<Self> {
        let shapes = match (first, second) {
            (BodyRef::Sphere(a), BodyRef::Sphere(b)) => Shared::SphereSphere(a, b),
            (BodyRef::Sphere(s), BodyRef::Wall(w)) | (BodyRef::Wall(w), BodyRef::Sphere(s)) => {
                Shared::SphereWall(s, w)
            }
            (BodyRef::Sphere(s), BodyRef::Polyhedron(p)) | (BodyRef::Polyhedron(p), BodyRef::Sphere(s)) => {
                Shared::SpherePolyhedron(s, p)
            }
            (BodyRef::Polyhedron(a), BodyRef::Polyhedron(b)) => Shared::PolyhedronPolyhedron(a, b),
            (BodyRef::Polyhedron(p), BodyRef::Wall(w)) | (BodyRef::Wall(w), BodyRef::Polyhedron(p)) => {
                Shared::PolyhedronWall(p, w)
            }
            (BodyRef::Wall(_), BodyRef::Wall(_)) => return Err(impossible(ShapeKind::Wall, ShapeKind::Wall)),
        };
        Ok(Self { shapes })
    }

    pub fn route(&self) -> Route {
        self.shapes.route()
    }

    pub fn intersection(&self, snapshot: Snapshot, dt: f64) -> Intersection {
        self.shapes.intersection(snapshot, dt)
    }

    /// Overlap at the end of the coming step.
    pub fn intersects(&self, dt: f64) -> bool {
        self.intersection(Snapshot::Predicted, dt).is_some()
    }
}

fn restore_into(saved: Option<Kinematics>, mut apply: impl FnMut(Kinematics)) {
    if let Some(k) = saved {
        apply(k);
    }
}

#[derive(Debug)]
enum Exclusive<'a> {
    SphereSphere(&'a mut Sphere, &'a mut Sphere),
    SphereWall(&'a mut Sphere, &'a Wall),
    SpherePolyhedron(&'a mut Sphere, &'a mut Polyhedron),
    PolyhedronPolyhedron(&'a mut Polyhedron, &'a mut Polyhedron),
    PolyhedronWall(&'a mut Polyhedron, &'a Wall),
}

/// Pair with exclusive access to its movable members, able to resolve a
/// collision between them.
#[derive(Debug)]
pub struct CollisionPair<'a> {
    shapes: Exclusive<'a>,
}

impl<'a> CollisionPair<'a> {
    /// Fails with [`PhysicsError::ImpossiblePair`] for two walls.
    pub fn new(first: BodyMut<'a>, second: BodyMut<'a>) -> PhysicsResult<Self> {
        let shapes = match (first, second) {
            (BodyMut::Sphere(a), BodyMut::Sphere(b)) => Exclusive::SphereSphere(a, b),
            (BodyMut::Sphere(s), BodyMut::Wall(w)) | (BodyMut::Wall(w), BodyMut::Sphere(s)) => {
                Exclusive::SphereWall(s, w)
            }
            (BodyMut::Sphere(s), BodyMut::Polyhedron(p)) | (BodyMut::Polyhedron(p), BodyMut::Sphere(s)) => {
                Exclusive::SpherePolyhedron(s, p)
            }
            (BodyMut::Polyhedron(a), BodyMut::Polyhedron(b)) => Exclusive::PolyhedronPolyhedron(a, b),
            (BodyMut::Polyhedron(p), BodyMut::Wall(w)) | (BodyMut::Wall(w), BodyMut::Polyhedron(p)) => {
                Exclusive::PolyhedronWall(p, w)
            }
            (BodyMut::Wall(_), BodyMut::Wall(_)) => return Err(impossible(ShapeKind::Wall, ShapeKind::Wall)),
        };
        Ok(Self { shapes })
    }

    fn shared(&self) -> Shared<'_> {
        match &self.shapes {
            Exclusive::SphereSphere(a, b) => Shared::SphereSphere(a, b),
            Exclusive::SphereWall(s, w) => Shared::SphereWall(s, w),
            Exclusive::SpherePolyhedron(s, p) => Shared::SpherePolyhedron(s, p),
            Exclusive::PolyhedronPolyhedron(a, b) => Shared::PolyhedronPolyhedron(a, b),
            Exclusive::PolyhedronWall(p, w) => Shared::PolyhedronWall(p, w),
        }
    }

    pub fn route(&self) -> Route {
        self.shared().route()
    }

    pub fn intersection(&self, snapshot: Snapshot, dt: f64) -> Intersection {
        self.shared().intersection(snapshot, dt)
    }

    fn kinematics(&self) -> (Option<Kinematics>, Option<Kinematics>) {
        match &self.shapes {
            Exclusive::SphereSphere(a, b) => (Some(*a.kinematics()), Some(*b.kinematics())),
            Exclusive::SphereWall(s, _) => (Some(*s.kinematics()), None),
            Exclusive::SpherePolyhedron(s, p) => (Some(*s.kinematics()), Some(*p.kinematics())),
            Exclusive::PolyhedronPolyhedron(a, b) => (Some(*a.kinematics()), Some(*b.kinematics())),
            Exclusive::PolyhedronWall(p, _) => (Some(*p.kinematics()), None),
        }
    }

    fn restore(&mut self, saved: (Option<Kinematics>, Option<Kinematics>)) {
        let (first, second) = saved;
        match &mut self.shapes {
            Exclusive::SphereSphere(a, b) => {
                restore_into(first, |k| a.restore(k));
                restore_into(second, |k| b.restore(k));
            }
            Exclusive::SphereWall(s, _) => restore_into(first, |k| s.restore(k)),
            Exclusive::SpherePolyhedron(s, p) => {
                restore_into(first, |k| s.restore(k));
                restore_into(second, |k| p.restore(k));
            }
            Exclusive::PolyhedronPolyhedron(a, b) => {
                restore_into(first, |k| a.restore(k));
                restore_into(second, |k| b.restore(k));
            }
            Exclusive::PolyhedronWall(p, _) => restore_into(first, |k| p.restore(k)),
        }
    }

    fn resolve(&mut self, hit: &Intersection, settings: &ContactSettings) -> PhysicsResult<bool> {
        match &mut self.shapes {
            Exclusive::SphereSphere(a, b) => resolve_sphere_sphere(a, b, settings),
            Exclusive::SphereWall(s, w) => resolve_sphere_wall(s, w, hit, settings),
            Exclusive::SpherePolyhedron(s, p) => resolve_sphere_polyhedron(s, p, hit, settings),
            Exclusive::PolyhedronPolyhedron(a, b) => resolve_polyhedron_polyhedron(a, b, hit, settings),
            Exclusive::PolyhedronWall(p, w) => resolve_polyhedron_wall(p, w, hit, settings),
        }
    }

    /// Positional correction at the current snapshot.
    fn separate(&mut self, settings: &ContactSettings) -> PhysicsResult<()> {
        match &mut self.shapes {
            Exclusive::SphereSphere(a, b) => separate_spheres(a, b, settings)?,
            Exclusive::SphereWall(s, w) => separate_sphere_wall(s, w, settings),
            Exclusive::SpherePolyhedron(s, p) => separate_sphere_polyhedron(s, p, settings),
            Exclusive::PolyhedronPolyhedron(a, b) => separate_polyhedra(a, b, settings),
            Exclusive::PolyhedronWall(p, w) => separate_polyhedron_wall(p, w, settings),
        }
        Ok(())
    }

    /// Detects against the predicted snapshot and, on overlap, applies the
    /// collision response followed by positional correction. Returns whether
    /// the bodies were in contact.
    ///
    /// On error both bodies are left exactly as they were before the call,
    /// including when only the positional correction fails.
    pub fn collide(&mut self, settings: &ContactSettings) -> PhysicsResult<bool> {
        let hit = self.intersection(Snapshot::Predicted, settings.dt);
        if !hit.is_some() {
            return Ok(false);
        }
        let saved = self.kinematics();
        let outcome = self.resolve(&hit, settings).and_then(|_| {
            let (first, second) = self.kinematics();
            let finite = first.map_or(true, |k| k.is_finite()) && second.map_or(true, |k| k.is_finite());
            if finite {
                Ok(())
            } else {
                Err(PhysicsError::Degenerate("collision produced a non-finite state"))
            }
        });
        if let Err(err) = outcome.and_then(|()| self.separate(settings)) {
            self.restore(saved);
            return Err(err);
        }
        Ok(true)
    }
}
