//! # Polyhedron
//!
//! Convex solid described by its surface triangles. Geometry is stored in
//! world coordinates and moved in place by every integration step; a
//! [`PolyhedronPose`] is the same geometry carried forward by a pending
//! delta, computed without touching the body.

use super::{Field, Kinematics, PendingDelta, PolyhedronBuilder, QueuedImpulse, Snapshot};
use crate::error::{PhysicsError, PhysicsResult};
use crate::geometry::{Aabb, Line, Plane, Segment, Triangle};
use crate::inertia;
use crate::material::Material;
use crate::types::{Vec3, EPSILON};

/// Surface triangle with the display colour it was loaded with.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub triangle: Triangle,
    pub color: Option<String>,
}

impl Face {
    pub fn new(triangle: Triangle) -> Self {
        Self {
            triangle,
            color: None,
        }
    }

    pub fn colored(triangle: Triangle, color: impl Into<String>) -> Self {
        Self {
            triangle,
            color: Some(color.into()),
        }
    }
}

/// Where a point of the body ends up under `delta`: translate first, then
/// rotate about the translated centre.
fn carry(point: Vec3, delta: PendingDelta, new_center: Vec3) -> Vec3 {
    (point + delta.translation).rotate_about(delta.rotation, new_center)
}

/// Polyhedron geometry at one instant of a step.
#[derive(Clone, Debug)]
pub struct PolyhedronPose {
    pub center: Vec3,
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<Triangle>,
}

impl PolyhedronPose {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().copied())
    }

    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        self.triangles.iter().flat_map(Triangle::edges)
    }

    /// Face planes with normals pointing away from the centre.
    pub fn outward_planes(&self) -> impl Iterator<Item = Plane> + '_ {
        self.triangles.iter().filter_map(move |t| {
            let plane = t.plane()?;
            if plane.signed_distance(self.center) > 0.0 {
                Some(Plane {
                    point: plane.point,
                    normal: -plane.normal,
                })
            } else {
                Some(plane)
            }
        })
    }

    /// Tolerant convex containment.
    pub fn contains(&self, p: Vec3) -> bool {
        self.outward_planes()
            .all(|plane| plane.signed_distance(p) <= EPSILON)
    }

    pub fn moment_about(&self, axis: &Line, density: f64, slices: usize) -> PhysicsResult<f64> {
        inertia::moment_about(&self.triangles, &self.vertices, axis, density, slices)
    }
}

/// Rigid convex polyhedron of uniform density.
#[derive(Clone, Debug)]
pub struct Polyhedron {
    kinematics: Kinematics,
    volume: f64,
    mass: f64,
    material: Material,
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    queued: Vec<QueuedImpulse>,
}

/// Read-only copy of a polyhedron handed to the host.
#[derive(Clone, Debug, PartialEq)]
pub struct PolyhedronSnapshot {
    pub center: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f64,
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<Triangle>,
    pub aabb: Aabb,
}

impl PolyhedronSnapshot {
    /// Vertex positions as tightly packed `f64` triples.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Triangles as nine packed `f64`s each.
    pub fn triangle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }
}

impl Polyhedron {
    /// The centre of mass comes from the builder; mass is `volume·ρ`.
    pub fn new(
        surface: PolyhedronBuilder,
        velocity: Vec3,
        angular_velocity: Vec3,
        material: Material,
    ) -> PhysicsResult<Self> {
        let (volume, center) = surface.validate()?;
        let mass = volume * material.density;
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(PhysicsError::ImpossibleObject(format!(
                "polyhedron mass must be positive, got {mass}"
            )));
        }
        if !(velocity.is_finite() && angular_velocity.is_finite()) {
            return Err(PhysicsError::ImpossibleObject(
                "polyhedron velocity must be finite".into(),
            ));
        }
        Ok(Self {
            kinematics: Kinematics::new(center, velocity, angular_velocity),
            volume,
            mass,
            material,
            vertices: surface.points().to_vec(),
            faces: surface.faces().to_vec(),
            queued: Vec::new(),
        })
    }

    pub fn center(&self) -> Vec3 {
        self.kinematics.position
    }

    /// Replaces the mesh-derived centre of mass with a known one, as when
    /// reloading a persisted body.
    pub fn with_center(mut self, center: Vec3) -> PhysicsResult<Self> {
        if !center.is_finite() {
            return Err(PhysicsError::ImpossibleObject(
                "polyhedron centre must be finite".into(),
            ));
        }
        self.kinematics.position = center;
        Ok(self)
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Current surface, ready to rebuild an identical body.
    pub fn surface(&self) -> PolyhedronBuilder {
        PolyhedronBuilder::new(self.vertices.clone(), self.faces.clone())
    }

    pub fn center_at(&self, snapshot: Snapshot, dt: f64) -> Vec3 {
        self.kinematics.position_at(snapshot, dt)
    }

    pub fn pose(&self, snapshot: Snapshot, dt: f64) -> PolyhedronPose {
        let delta = self.kinematics.delta(snapshot, dt);
        let center = self.center_at(snapshot, dt);
        PolyhedronPose {
            center,
            vertices: self
                .vertices
                .iter()
                .map(|&v| carry(v, delta, center))
                .collect(),
            triangles: self
                .faces
                .iter()
                .map(|f| {
                    let t = f.triangle;
                    Triangle::new(
                        carry(t.a, delta, center),
                        carry(t.b, delta, center),
                        carry(t.c, delta, center),
                    )
                })
                .collect(),
        }
    }

    pub fn aabb(&self, snapshot: Snapshot, dt: f64) -> Aabb {
        self.pose(snapshot, dt).aabb()
    }

    pub fn velocity_at(&self, point: Vec3, center: Vec3) -> Vec3 {
        self.kinematics.point_velocity(point, center)
    }

    /// Moment of inertia about the axis through the pose centre along `axis`.
    pub fn inertia_about(&self, axis: Vec3, pose: &PolyhedronPose, slices: usize) -> PhysicsResult<f64> {
        let moment = pose.moment_about(&Line::new(pose.center, axis), self.material.density, slices)?;
        if moment > 0.0 && moment.is_finite() {
            Ok(moment)
        } else {
            Err(PhysicsError::Degenerate("polyhedron has no moment of inertia about axis"))
        }
    }

    /// Applies `impulse` at `point` of `pose`. Nothing changes when the
    /// result would not be finite.
    pub fn apply_impulse(
        &mut self,
        impulse: Vec3,
        point: Vec3,
        pose: &PolyhedronPose,
        slices: usize,
    ) -> PhysicsResult<()> {
        let torque = (point - pose.center).cross(impulse);
        let spin = match torque.try_normalize() {
            Some(axis) => torque / self.inertia_about(axis, pose, slices)?,
            None => Vec3::ZERO,
        };
        let velocity = self.kinematics.velocity + impulse / self.mass;
        let angular_velocity = self.kinematics.angular_velocity + spin;
        if !(velocity.is_finite() && angular_velocity.is_finite()) {
            return Err(PhysicsError::Degenerate("impulse produced a non-finite velocity"));
        }
        self.kinematics.velocity = velocity;
        self.kinematics.angular_velocity = angular_velocity;
        Ok(())
    }

    pub fn queue_impulse(&mut self, impulse: Vec3, point: Vec3) {
        self.queued.push(QueuedImpulse { impulse, point });
    }

    fn transform(&mut self, delta: PendingDelta, new_center: Vec3) {
        for v in &mut self.vertices {
            *v = carry(*v, delta, new_center);
        }
        for face in &mut self.faces {
            let t = face.triangle;
            face.triangle = Triangle::new(
                carry(t.a, delta, new_center),
                carry(t.b, delta, new_center),
                carry(t.c, delta, new_center),
            );
        }
    }

    pub(crate) fn translate(&mut self, offset: Vec3) {
        self.kinematics.position += offset;
        let shift = PendingDelta {
            translation: offset,
            rotation: Vec3::ZERO,
        };
        self.transform(shift, self.kinematics.position);
    }

    pub(crate) fn restore(&mut self, kinematics: Kinematics) {
        self.kinematics = kinematics;
    }

    pub(crate) fn set_acceleration(&mut self, field: &Field<'_>) {
        self.kinematics.acceleration = field.acceleration_at(self.kinematics.position);
    }

    /// One integration step. Queued impulses that cannot be applied are
    /// dropped with a warning.
    pub fn update(&mut self, dt: f64, field: &Field<'_>, slices: usize) {
        let queued = std::mem::take(&mut self.queued);
        if !queued.is_empty() {
            let pose = self.pose(Snapshot::Current, dt);
            for q in queued {
                if let Err(err) = self.apply_impulse(q.impulse, q.point, &pose, slices) {
                    tracing::warn!(error = %err, "dropping queued impulse");
                }
            }
        }
        let delta = self.kinematics.advance(dt);
        self.transform(delta, self.kinematics.position);
        self.set_acceleration(field);
    }

    pub fn snapshot(&self) -> PolyhedronSnapshot {
        PolyhedronSnapshot {
            center: self.center(),
            velocity: self.kinematics.velocity,
            angular_velocity: self.kinematics.angular_velocity,
            mass: self.mass,
            vertices: self.vertices.clone(),
            triangles: self.faces.iter().map(|f| f.triangle).collect(),
            aabb: Aabb::from_points(self.vertices.iter().copied()),
        }
    }
}
