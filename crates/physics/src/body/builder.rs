//! # Polyhedron Builder
//!
//! Collects surface points and triangular faces, then derives the volume
//! and centre of mass by splitting the solid into tetrahedra that share the
//! first point as apex.

use super::Face;
use crate::error::{PhysicsError, PhysicsResult};
use crate::geometry::{Tetrahedron, Triangle};
use crate::types::{Vec3, LENGTH_EPSILON};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolyhedronBuilder {
    points: Vec<Vec3>,
    faces: Vec<Face>,
}

impl PolyhedronBuilder {
    pub fn new(points: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self { points, faces }
    }

    pub fn point(mut self, p: Vec3) -> Self {
        self.points.push(p);
        self
    }

    pub fn face(mut self, face: Face) -> Self {
        self.faces.push(face);
        self
    }

    /// Shifts every point and face so the local origin lands on `origin`.
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        for p in &mut self.points {
            *p += origin;
        }
        for face in &mut self.faces {
            face.triangle = face.triangle.translated(origin);
        }
        self
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn triangles(&self) -> Vec<Triangle> {
        self.faces.iter().map(|f| f.triangle).collect()
    }

    fn tetrahedra(&self) -> impl Iterator<Item = Tetrahedron> + '_ {
        let apex = self.points.first().copied().unwrap_or_default();
        self.faces
            .iter()
            .map(move |face| Tetrahedron::new(apex, face.triangle))
    }

    pub fn volume(&self) -> f64 {
        self.tetrahedra().map(|t| t.volume()).sum()
    }

    /// Volume-weighted centroid of the tetrahedra; `None` for a flat solid.
    pub fn center_of_mass(&self) -> Option<Vec3> {
        let volume = self.volume();
        if !(volume > LENGTH_EPSILON) {
            return None;
        }
        let weighted = self
            .tetrahedra()
            .fold(Vec3::ZERO, |acc, t| acc + t.centroid() * t.volume());
        Some(weighted / volume)
    }

    /// Checks the surface can bound a solid and returns its volume and
    /// centre of mass.
    pub(crate) fn validate(&self) -> PhysicsResult<(f64, Vec3)> {
        if self.points.len() < 4 || self.faces.len() < 4 {
            return Err(PhysicsError::ImpossibleObject(format!(
                "polyhedron needs at least 4 points and 4 faces, got {} and {}",
                self.points.len(),
                self.faces.len()
            )));
        }
        let finite = self.points.iter().all(|p| p.is_finite())
            && self
                .faces
                .iter()
                .all(|f| f.triangle.vertices().iter().all(|p| p.is_finite()));
        if !finite {
            return Err(PhysicsError::ImpossibleObject(
                "polyhedron coordinates must be finite".into(),
            ));
        }
        let center = self.center_of_mass().ok_or_else(|| {
            PhysicsError::ImpossibleObject("polyhedron encloses no volume".into())
        })?;
        Ok((self.volume(), center))
    }
}
