use std::f64::consts::PI;

use super::{Field, Kinematics, QueuedImpulse, Snapshot};
use crate::error::{PhysicsError, PhysicsResult};
use crate::geometry::Aabb;
use crate::material::Material;
use crate::types::Vec3;

/// Solid ball of uniform density.
#[derive(Clone, Debug)]
pub struct Sphere {
    kinematics: Kinematics,
    radius: f64,
    mass: f64,
    material: Material,
    queued: Vec<QueuedImpulse>,
}

/// Read-only copy of a sphere handed to the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SphereSnapshot {
    pub center: Vec3,
    pub radius: f64,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f64,
    pub aabb: Aabb,
}

impl Sphere {
    /// Mass is `4/3·π·r³·ρ`; a sphere without positive finite mass cannot exist.
    pub fn new(
        center: Vec3,
        velocity: Vec3,
        angular_velocity: Vec3,
        radius: f64,
        material: Material,
    ) -> PhysicsResult<Self> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(PhysicsError::ImpossibleObject(format!(
                "sphere radius must be positive, got {radius}"
            )));
        }
        let mass = 4.0 / 3.0 * PI * radius.powi(3) * material.density;
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(PhysicsError::ImpossibleObject(format!(
                "sphere mass must be positive, got {mass}"
            )));
        }
        let kinematics = Kinematics::new(center, velocity, angular_velocity);
        if !kinematics.is_finite() {
            return Err(PhysicsError::ImpossibleObject(
                "sphere state must be finite".into(),
            ));
        }
        Ok(Self {
            kinematics,
            radius,
            mass,
            material,
            queued: Vec::new(),
        })
    }

    pub fn center(&self) -> Vec3 {
        self.kinematics.position
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// `0.4·m·r²`, the same about every axis through the centre.
    pub fn inertia(&self) -> f64 {
        0.4 * self.mass * self.radius * self.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    pub fn center_at(&self, snapshot: Snapshot, dt: f64) -> Vec3 {
        self.kinematics.position_at(snapshot, dt)
    }

    pub fn aabb(&self, snapshot: Snapshot, dt: f64) -> Aabb {
        Aabb::around_sphere(self.center_at(snapshot, dt), self.radius)
    }

    /// Velocity of a surface point; `point` is measured against `center`.
    pub fn velocity_at(&self, point: Vec3, center: Vec3) -> Vec3 {
        self.kinematics.point_velocity(point, center)
    }

    /// Applies `impulse` at `point`; the lever arm is taken from `center`.
    ///
    /// A central impulse only changes the linear velocity.
    pub fn apply_impulse(&mut self, impulse: Vec3, point: Vec3, center: Vec3) {
        self.kinematics.velocity += impulse / self.mass;
        let torque = (point - center).cross(impulse);
        self.kinematics.angular_velocity += torque / self.inertia();
    }

    /// Schedules an impulse for the next integration. `point` is in world
    /// coordinates at the time the impulse is drained.
    pub fn queue_impulse(&mut self, impulse: Vec3, point: Vec3) {
        self.queued.push(QueuedImpulse { impulse, point });
    }

    pub(crate) fn translate(&mut self, offset: Vec3) {
        self.kinematics.position += offset;
    }

    pub(crate) fn restore(&mut self, kinematics: Kinematics) {
        self.kinematics = kinematics;
    }

    pub(crate) fn set_acceleration(&mut self, field: &Field<'_>) {
        self.kinematics.acceleration = field.acceleration_at(self.kinematics.position);
    }

    /// One integration step: drains queued impulses, moves by the pending
    /// delta and resamples the field at the new position.
    pub fn update(&mut self, dt: f64, field: &Field<'_>) {
        let center = self.center();
        for queued in std::mem::take(&mut self.queued) {
            self.apply_impulse(queued.impulse, queued.point, center);
        }
        self.kinematics.advance(dt);
        self.set_acceleration(field);
    }

    pub fn snapshot(&self) -> SphereSnapshot {
        SphereSnapshot {
            center: self.center(),
            radius: self.radius,
            velocity: self.kinematics.velocity,
            angular_velocity: self.kinematics.angular_velocity,
            mass: self.mass,
            aabb: self.aabb(Snapshot::Current, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(radius: f64) -> Sphere {
        Sphere::new(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, radius, Material::CONSTANTAN).unwrap()
    }

    #[test]
    fn mass_from_volume_and_density() {
        let s = ball(1.0);
        assert!((s.mass() - 4.0 / 3.0 * PI * 1000.0).abs() < 1e-9);
        assert!((s.inertia() - 0.4 * s.mass()).abs() < 1e-9);
    }

    #[test]
    fn zero_radius_is_impossible() {
        let err = Sphere::new(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, 0.0, Material::STEEL);
        assert!(matches!(err, Err(PhysicsError::ImpossibleObject(_))));
    }

    #[test]
    fn zero_density_is_impossible() {
        let vacuum = Material::new(0.0, 1.0, 0.0);
        let err = Sphere::new(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, 1.0, vacuum);
        assert!(matches!(err, Err(PhysicsError::ImpossibleObject(_))));
    }

    #[test]
    fn off_centre_impulse_spins() {
        let mut s = ball(1.0);
        s.apply_impulse(Vec3::X, Vec3::Y, Vec3::ZERO);
        assert!(s.kinematics().velocity.x > 0.0);
        // r × P = Y × X = -Z
        assert!(s.kinematics().angular_velocity.z < 0.0);
    }

    #[test]
    fn queued_impulse_lands_on_update() {
        let mut s = ball(0.5);
        let field = Field::new(Vec3::ZERO, &[]);
        s.queue_impulse(Vec3::X * s.mass(), s.center());
        assert_eq!(s.kinematics().velocity, Vec3::ZERO);
        s.update(0.1, &field);
        assert!((s.kinematics().velocity.x - 1.0).abs() < 1e-12);
        assert!((s.center().x - 0.1).abs() < 1e-12);
    }

    #[test]
    fn update_picks_up_gravity() {
        let mut s = ball(0.5);
        let field = Field::new(Vec3::new(0.0, -9.81, 0.0), &[]);
        s.set_acceleration(&field);
        let predicted = s.center_at(Snapshot::Predicted, 0.01);
        s.update(0.01, &field);
        assert_eq!(s.center(), predicted);
        assert!(s.center().y < 0.0);
    }
}
